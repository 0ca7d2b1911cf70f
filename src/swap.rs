//! Kill-triggered role swap offers
//!
//! A qualifying kill opens a timed offer letting the killer exchange roles
//! with the victim. Offers are keyed by killer with at most one pending at
//! a time; a newer kill replaces the previous offer. Resolution always goes
//! through [`SwapBoard::take`]: removing the offer is the idempotence guard,
//! so of two near-simultaneous accept triggers only the first finds an
//! offer to act on.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::identity::PlayerId;
use crate::roles::Role;

/// Chat tokens treated as accepting a pending offer
pub const ACCEPT_TOKENS: [&str; 2] = ["yes", "y"];
/// Chat tokens treated as declining a pending offer
pub const DECLINE_TOKENS: [&str; 2] = ["no", "n"];

/// A pending exchange, with both roles snapshotted at the moment of death
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapOffer {
    pub killer: PlayerId,
    pub victim: PlayerId,
    /// Killer's role when the kill landed
    pub killer_role: Role,
    /// Victim's role when they died
    pub victim_role: Role,
    /// Unix timestamp (ms) of creation
    pub created_at: i64,
}

impl SwapOffer {
    pub fn new(killer: PlayerId, victim: PlayerId, killer_role: Role, victim_role: Role) -> Self {
        Self {
            killer,
            victim,
            killer_role,
            victim_role,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// An offer is only worth making when somebody has a role to trade
    pub fn has_stakes(&self) -> bool {
        self.killer_role.is_assigned() || self.victim_role.is_assigned()
    }
}

/// How a chat message from a player with a pending offer resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapReply {
    Accept,
    Decline,
}

/// Match a chat message against the reply token sets: trimmed,
/// case-insensitive, exact. Anything else is not a reply.
pub fn parse_reply(message: &str) -> Option<SwapReply> {
    let token = message.trim().to_lowercase();
    if ACCEPT_TOKENS.contains(&token.as_str()) {
        Some(SwapReply::Accept)
    } else if DECLINE_TOKENS.contains(&token.as_str()) {
        Some(SwapReply::Decline)
    } else {
        None
    }
}

/// Pending offers keyed by killer
#[derive(Debug, Default)]
pub struct SwapBoard {
    offers: RwLock<HashMap<PlayerId, SwapOffer>>,
}

impl SwapBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an offer, returning the previous pending one for this
    /// killer if the new offer displaced it (its timer must be cancelled).
    pub async fn put(&self, offer: SwapOffer) -> Option<SwapOffer> {
        self.offers.write().await.insert(offer.killer, offer)
    }

    /// Remove and return the pending offer. Resolution paths (accept,
    /// decline, expiry, disconnect) all funnel through here exactly once.
    pub async fn take(&self, killer: PlayerId) -> Option<SwapOffer> {
        self.offers.write().await.remove(&killer)
    }

    /// Whether this killer has an offer pending
    pub async fn contains(&self, killer: PlayerId) -> bool {
        self.offers.read().await.contains_key(&killer)
    }

    pub async fn pending_count(&self) -> usize {
        self.offers.read().await.len()
    }
}
