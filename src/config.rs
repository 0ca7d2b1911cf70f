//! Engine configuration
//!
//! Every gameplay constant lives here so deployments can retune them without
//! touching code. Values are layered: compiled defaults, then a
//! `roleswap.toml` next to the server, then `ROLESWAP_`-prefixed environment
//! variables (e.g. `ROLESWAP_SHOCKWAVE__DAMAGE=7.5`).

use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Default config file name, resolved relative to the host's working dir
pub const CONFIG_FILE: &str = "roleswap.toml";

/// Top-level configuration for the role engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleswapConfig {
    /// Path of the persisted role document
    pub data_file: PathBuf,
    pub shockwave: ShockwaveConfig,
    pub swap: SwapConfig,
}

/// Tunables for the giant shockwave ability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShockwaveConfig {
    /// Minimum time between uses per player, in milliseconds
    pub cooldown_ms: u64,
    /// Time between expansion pulses, in milliseconds
    pub pulse_interval_ms: u64,
    /// Ring radius on the first pulse, in world units
    pub initial_radius: f64,
    /// Radius growth per pulse
    pub radius_step: f64,
    /// Radius beyond which the effect self-terminates
    pub terminal_radius: f64,
    /// Damage applied to each entity caught in a pulse
    pub damage: f64,
    /// Horizontal knockback magnitude
    pub knockback: f64,
    /// Vertical knockback component
    pub knockback_lift: f64,
}

/// Tunables for the kill-triggered role swap offer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapConfig {
    /// How long an offer stays open before it expires, in milliseconds
    pub offer_ttl_ms: u64,
}

impl Default for RoleswapConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("roles.json"),
            shockwave: ShockwaveConfig::default(),
            swap: SwapConfig::default(),
        }
    }
}

impl Default for ShockwaveConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 15_000,
            pulse_interval_ms: 150,
            initial_radius: 1.0,
            radius_step: 0.6,
            terminal_radius: 8.0,
            damage: 5.0,
            knockback: 1.5,
            knockback_lift: 0.5,
        }
    }
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            offer_ttl_ms: 30_000,
        }
    }
}

impl RoleswapConfig {
    /// Load configuration: defaults, then `roleswap.toml`, then env vars
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    /// The layered figment, exposed so hosts can merge their own providers
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed("ROLESWAP_").split("__"))
    }
}
