//! Stable identities for players and world entities
//!
//! Players are keyed by a UUID that survives sessions; the canonical string
//! form (hyphenated lowercase) is what the role store persists. Living
//! entities share the same id space, so a player id widens losslessly into
//! an entity id for damage attribution and knockback.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a player, valid across sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(Uuid);

/// Identifier for any living entity (players included)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

/// Error parsing a persisted identity string
#[derive(Debug, thiserror::Error)]
#[error("invalid player identity: {0}")]
pub struct IdentityParseError(String);

impl PlayerId {
    /// Generate a fresh random identity (tests, provisioning)
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// The entity this player is in the world
    pub fn as_entity(&self) -> EntityId {
        EntityId(self.0)
    }
}

impl EntityId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<PlayerId> for EntityId {
    fn from(id: PlayerId) -> Self {
        id.as_entity()
    }
}

impl FromStr for PlayerId {
    type Err = IdentityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| IdentityParseError(s.to_string()))
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
