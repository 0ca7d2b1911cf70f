//! In-memory role registry backed by the flat document
//!
//! The map in memory is authoritative. Every mutation rewrites the backing
//! document synchronously; a failed write is logged and the next successful
//! flush reconciles.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::{info, warn};

use super::{Role, RoleStore};
use crate::identity::PlayerId;

/// PlayerId → Role mapping with write-through persistence
#[derive(Debug)]
pub struct RoleRegistry {
    roles: RwLock<HashMap<PlayerId, Role>>,
    store: RoleStore,
}

impl RoleRegistry {
    pub fn new(store: RoleStore) -> Self {
        Self {
            roles: RwLock::new(HashMap::new()),
            store,
        }
    }

    /// Replace the in-memory map from the backing document. Called once at
    /// startup, before any event processing.
    pub async fn load(&self) -> anyhow::Result<()> {
        let loaded = self.store.load().await?;
        let mut roles = self.roles.write().await;
        *roles = loaded;
        info!("loaded {} persisted roles", roles.len());
        Ok(())
    }

    /// Current role, Normal when absent
    pub async fn get(&self, id: PlayerId) -> Role {
        self.roles.read().await.get(&id).copied().unwrap_or_default()
    }

    /// Assign a role and flush. Setting Normal clears the entry.
    pub async fn set(&self, id: PlayerId, role: Role) {
        {
            let mut roles = self.roles.write().await;
            if role.is_assigned() {
                roles.insert(id, role);
            } else {
                roles.remove(&id);
            }
        }
        self.flush().await;
    }

    /// Remove an assignment and flush. Returns whether an entry existed.
    pub async fn clear(&self, id: PlayerId) -> bool {
        let removed = self.roles.write().await.remove(&id).is_some();
        self.flush().await;
        removed
    }

    /// Exchange two players' roles in one mutation with a single flush
    pub async fn apply_swap(
        &self,
        first: PlayerId,
        first_role: Role,
        second: PlayerId,
        second_role: Role,
    ) {
        {
            let mut roles = self.roles.write().await;
            for (id, role) in [(first, first_role), (second, second_role)] {
                if role.is_assigned() {
                    roles.insert(id, role);
                } else {
                    roles.remove(&id);
                }
            }
        }
        self.flush().await;
    }

    /// Number of assigned (non-Normal) entries
    pub async fn assigned_count(&self) -> usize {
        self.roles.read().await.len()
    }

    /// Rewrite the backing document. Failure leaves the in-memory map as
    /// the unsynced truth until the next successful flush.
    pub async fn flush(&self) {
        let snapshot = self.roles.read().await.clone();
        if let Err(e) = self.store.save(&snapshot).await {
            warn!("failed to persist roles: {e}");
        }
    }
}
