//! Per-role attribute profiles
//!
//! A profile is a fixed table of numeric stats. Application always resets to
//! the Normal baseline first and then overwrites with the target profile, so
//! no stat from a previous role survives a partial apply and applying the
//! same role twice is a no-op. Stats the host does not expose on an entity
//! are skipped per-field.

use crate::host::Host;
use crate::identity::PlayerId;
use crate::roles::Role;

/// Named numeric attribute channels on a player entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    MaxHealth,
    MovementSpeed,
    Scale,
    StepHeight,
    SafeFallDistance,
    BlockInteractionRange,
    EntityInteractionRange,
    KnockbackResistance,
    ExplosionKnockbackResistance,
    AttackKnockback,
    BlockBreakSpeed,
    SneakingSpeed,
    AttackDamage,
}

/// A complete stat table for one role
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeProfile {
    pub max_health: f64,
    pub movement_speed: f64,
    pub scale: f64,
    pub step_height: f64,
    pub safe_fall_distance: f64,
    pub block_interaction_range: f64,
    pub entity_interaction_range: f64,
    pub knockback_resistance: f64,
    pub explosion_knockback_resistance: f64,
    pub attack_knockback: f64,
    pub block_break_speed: f64,
    pub sneaking_speed: f64,
    pub attack_damage: f64,
}

/// Baseline stats for players without a role
pub const NORMAL: AttributeProfile = AttributeProfile {
    max_health: 20.0,
    movement_speed: 0.1,
    scale: 1.0,
    step_height: 0.5,
    safe_fall_distance: 3.0,
    block_interaction_range: 5.0,
    entity_interaction_range: 5.0,
    knockback_resistance: 0.0,
    explosion_knockback_resistance: 0.0,
    attack_knockback: 0.0,
    block_break_speed: 1.0,
    sneaking_speed: 0.3,
    attack_damage: 1.0,
};

/// Slow, huge, hard to move, long reach
pub const GIANT: AttributeProfile = AttributeProfile {
    max_health: 40.0,
    movement_speed: 0.1,
    scale: 1.33,
    step_height: 1.0,
    safe_fall_distance: 10.0,
    block_interaction_range: 6.5,
    entity_interaction_range: 6.5,
    knockback_resistance: 1.0,
    explosion_knockback_resistance: 1.0,
    attack_knockback: 0.5,
    block_break_speed: 1.0,
    sneaking_speed: 0.3,
    attack_damage: 2.5,
};

/// Fast, tiny, fragile, short reach
pub const GNOME: AttributeProfile = AttributeProfile {
    max_health: 14.0,
    movement_speed: 0.16,
    scale: 0.5,
    step_height: 0.49,
    safe_fall_distance: 2.0,
    block_interaction_range: 3.0,
    entity_interaction_range: 3.0,
    knockback_resistance: 0.0,
    explosion_knockback_resistance: 0.0,
    attack_knockback: 0.0,
    block_break_speed: 2.0,
    sneaking_speed: 0.6,
    attack_damage: 1.0,
};

impl AttributeProfile {
    /// The profile for a role
    pub fn for_role(role: Role) -> &'static AttributeProfile {
        match role {
            Role::Giant => &GIANT,
            Role::Gnome => &GNOME,
            Role::Normal => &NORMAL,
        }
    }

    /// Every stat as an independent (channel, value) write. Writes are
    /// order-insensitive; no field depends on another.
    pub fn entries(&self) -> [(AttributeKind, f64); 13] {
        [
            (AttributeKind::MaxHealth, self.max_health),
            (AttributeKind::MovementSpeed, self.movement_speed),
            (AttributeKind::Scale, self.scale),
            (AttributeKind::StepHeight, self.step_height),
            (AttributeKind::SafeFallDistance, self.safe_fall_distance),
            (AttributeKind::BlockInteractionRange, self.block_interaction_range),
            (AttributeKind::EntityInteractionRange, self.entity_interaction_range),
            (AttributeKind::KnockbackResistance, self.knockback_resistance),
            (
                AttributeKind::ExplosionKnockbackResistance,
                self.explosion_knockback_resistance,
            ),
            (AttributeKind::AttackKnockback, self.attack_knockback),
            (AttributeKind::BlockBreakSpeed, self.block_break_speed),
            (AttributeKind::SneakingSpeed, self.sneaking_speed),
            (AttributeKind::AttackDamage, self.attack_damage),
        ]
    }
}

/// Push a role's stats onto a player: baseline reset, target overwrite,
/// then cap current health at the new maximum (never raise it).
pub fn apply_profile(host: &dyn Host, player: PlayerId, role: Role) {
    for (kind, value) in NORMAL.entries() {
        host.set_attribute(player, kind, value);
    }

    let profile = AttributeProfile::for_role(role);
    if role.is_assigned() {
        for (kind, value) in profile.entries() {
            host.set_attribute(player, kind, value);
        }
    }

    if let Some(current) = host.current_health(player) {
        if current > profile.max_health {
            host.set_health(player, profile.max_health);
        }
    }
}
