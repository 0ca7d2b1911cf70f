//! roleswap - role assignment and swap engine for game servers
//!
//! Embeds in a host game server process and manages one categorical trait
//! per player (Giant, Gnome, or the Normal baseline), the stat profile that
//! goes with it, a cooldown-gated shockwave ability for Giants, and timed
//! kill-triggered role swap offers resolved by command or chat reply.
//!
//! The host delivers events ([`RoleEngine::on_interact`], `on_swing`,
//! `on_death`, `on_chat`, `on_disconnect`, `handle_command`) and drives
//! [`RoleEngine::tick`] from its simulation loop; world mutation flows back
//! through the [`Host`] trait.

pub mod attributes;
pub mod commands;
pub mod config;
pub mod cooldown;
pub mod engine;
pub mod host;
pub mod identity;
pub mod roles;
pub mod scheduler;
pub mod shockwave;
pub mod swap;

pub use config::RoleswapConfig;
pub use engine::{ChatDisposition, RoleEngine};
pub use host::{CommandSender, HeldItem, Host, InteractKind, Vec3};
pub use identity::{EntityId, PlayerId};
pub use roles::Role;
