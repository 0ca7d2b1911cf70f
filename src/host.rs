//! Host server integration surface
//!
//! The engine never touches world state directly: everything it needs from
//! the surrounding game server (attribute writes, entity queries, particles,
//! sound, chat delivery, authorization) goes through the [`Host`] trait.
//! Hosts implement it over their own entity and scheduler APIs; tests
//! implement it over an in-memory fake.

use nalgebra::Vector3;

use crate::attributes::AttributeKind;
use crate::identity::{EntityId, PlayerId};

/// World-space position or velocity
pub type Vec3 = Vector3<f64>;

/// Sounds the engine asks the host to play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKind {
    /// Heavy impact played when a shockwave is unleashed
    GroundSlam,
}

/// Particle kinds the engine asks the host to spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Dense burst at the caster when a shockwave starts
    Explosion,
    /// Cosmetic ring sweep as the shockwave expands
    Cloud,
}

/// What the acting player holds in their primary hand
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HeldItem {
    #[default]
    Empty,
    /// Host-defined material name
    Material(String),
}

impl HeldItem {
    pub fn is_empty(&self) -> bool {
        matches!(self, HeldItem::Empty)
    }
}

/// How an interaction event was performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractKind {
    /// Use gesture into the air
    UseAir,
    /// Use gesture on a block
    UseBlock,
    /// Anything else (hits, pressure plates, ...)
    Other,
}

impl InteractKind {
    /// Whether this interaction can trigger an ability
    pub fn is_use(&self) -> bool {
        matches!(self, InteractKind::UseAir | InteractKind::UseBlock)
    }
}

/// Who issued a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSender {
    Player(PlayerId),
    Console,
}

impl CommandSender {
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            CommandSender::Player(id) => Some(*id),
            CommandSender::Console => None,
        }
    }
}

/// A living entity returned from a volume query
#[derive(Debug, Clone, Copy)]
pub struct LivingEntity {
    pub id: EntityId,
    pub position: Vec3,
}

/// The surrounding game server, as seen by the engine.
///
/// Mutating calls are fire-and-forget; the host applies them to its live
/// world. `set_attribute` reports whether the entity exposes that channel so
/// profile application can skip unsupported stats silently.
pub trait Host: Send + Sync {
    /// Whether the player is currently connected
    fn is_online(&self, player: PlayerId) -> bool;

    /// Current world position, `None` if not in the world
    fn location(&self, player: PlayerId) -> Option<Vec3>;

    /// Current health, `None` if not in the world
    fn current_health(&self, player: PlayerId) -> Option<f64>;

    /// Look up a connected player by display name
    fn resolve_name(&self, name: &str) -> Option<PlayerId>;

    /// Display name for notifications, `None` when unknown to the host
    fn display_name(&self, player: PlayerId) -> Option<String>;

    /// Host-side authorization check for a permission node
    fn has_permission(&self, player: PlayerId, node: &str) -> bool;

    /// All living entities inside the axis-aligned box
    /// `center ± (half_x, half_y, half_z)`
    fn nearby_living(&self, center: Vec3, half_x: f64, half_y: f64, half_z: f64)
        -> Vec<LivingEntity>;

    /// Write a named attribute; returns false when the entity does not
    /// expose that channel (the write is then skipped, not an error)
    fn set_attribute(&self, player: PlayerId, attribute: AttributeKind, value: f64) -> bool;

    /// Overwrite current health
    fn set_health(&self, player: PlayerId, value: f64);

    /// Apply damage to an entity, attributed to a player
    fn apply_damage(&self, target: EntityId, amount: f64, attacker: PlayerId);

    /// Replace an entity's velocity
    fn set_velocity(&self, target: EntityId, velocity: Vec3);

    fn play_sound(&self, at: Vec3, sound: SoundKind, volume: f32, pitch: f32);

    fn spawn_particles(&self, at: Vec3, kind: ParticleKind, count: u32, spread: Vec3, speed: f64);

    /// Deliver a chat message to one player
    fn send_message(&self, player: PlayerId, message: &str);
}
