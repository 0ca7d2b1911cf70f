//! Role assignment
//!
//! Players hold exactly one role. `Normal` is a real variant internally so
//! call sites never juggle `Option<Role>`, but it is the implicit default
//! and is never written to the persisted document.

mod registry;
mod store;

pub use registry::RoleRegistry;
pub use store::RoleStore;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The categorical trait driving stat profiles and ability access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Giant,
    Gnome,
    /// Baseline: no registry entry, no persisted form
    #[default]
    Normal,
}

/// Error for an unrecognized role name
#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct RoleParseError(String);

impl Role {
    /// Whether this role occupies a registry entry
    pub fn is_assigned(&self) -> bool {
        *self != Role::Normal
    }

    /// Name used in the persisted document and user messages
    pub fn name(&self) -> &'static str {
        match self {
            Role::Giant => "giant",
            Role::Gnome => "gnome",
            Role::Normal => "normal",
        }
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "giant" => Ok(Role::Giant),
            "gnome" => Ok(Role::Gnome),
            "normal" => Ok(Role::Normal),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
