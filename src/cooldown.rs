//! Per-player ability cooldowns
//!
//! A map of last-use timestamps, in memory only. The check and the stamp
//! happen inside one lock section so two triggers in the same tick can never
//! both pass. Entries are cleared on disconnect; a reconnecting player
//! starts with no cooldown history.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::identity::PlayerId;

/// Outcome of a denied cooldown check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownDenied {
    /// Whole seconds until the ability is available, rounded up
    pub remaining_secs: u64,
}

/// Tracks last-use timestamps per player
#[derive(Debug, Default)]
pub struct CooldownTracker {
    last_use: Mutex<HashMap<PlayerId, i64>>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically check and consume the cooldown window. Allowed when no
    /// prior use is recorded or the window has fully elapsed; `now_ms` is
    /// then recorded as the new stamp.
    pub fn try_consume(
        &self,
        id: PlayerId,
        now_ms: i64,
        cooldown_ms: u64,
    ) -> Result<(), CooldownDenied> {
        let mut last_use = self.last_use.lock();

        if let Some(&last) = last_use.get(&id) {
            let elapsed = now_ms.saturating_sub(last);
            if elapsed < cooldown_ms as i64 {
                let remaining_ms = cooldown_ms as i64 - elapsed;
                return Err(CooldownDenied {
                    remaining_secs: (remaining_ms as u64).div_ceil(1000),
                });
            }
        }

        last_use.insert(id, now_ms);
        Ok(())
    }

    /// Drop a player's stamp (disconnect)
    pub fn clear(&self, id: PlayerId) {
        self.last_use.lock().remove(&id);
    }

    /// Number of tracked players
    pub fn len(&self) -> usize {
        self.last_use.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_use.lock().is_empty()
    }
}
