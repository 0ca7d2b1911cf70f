//! Durable role document
//!
//! The backing store is a single flat key-value JSON object: canonical
//! player UUID strings mapped to lowercase role names. A missing key means
//! Normal. Role changes happen on a human timescale, so every mutation
//! rewrites the whole document instead of patching it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::Role;
use crate::identity::PlayerId;

/// Error talking to the backing document
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("role store io: {0}")]
    Io(#[from] std::io::Error),
    #[error("role store parse: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Wholesale load/save of the role document
#[derive(Debug, Clone)]
pub struct RoleStore {
    path: PathBuf,
}

impl RoleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole document. A missing file is an empty map, not an
    /// error. Entries with unparseable keys or unknown role names are
    /// skipped individually.
    pub async fn load(&self) -> Result<HashMap<PlayerId, Role>, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(HashMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }

        let entries: HashMap<String, String> = serde_json::from_str(&raw)?;
        let mut roles = HashMap::with_capacity(entries.len());
        for (key, value) in entries {
            let Ok(id) = key.parse::<PlayerId>() else {
                debug!("skipping malformed identity key in role store: {key}");
                continue;
            };
            let Ok(role) = value.parse::<Role>() else {
                debug!("skipping unknown role {value:?} for {id}");
                continue;
            };
            if role.is_assigned() {
                roles.insert(id, role);
            }
        }

        Ok(roles)
    }

    /// Rewrite the whole document from the in-memory map
    pub async fn save(&self, roles: &HashMap<PlayerId, Role>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let entries: HashMap<String, &'static str> = roles
            .iter()
            .filter(|(_, role)| role.is_assigned())
            .map(|(id, role)| (id.to_string(), role.name()))
            .collect();

        let raw = serde_json::to_string_pretty(&entries)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}
