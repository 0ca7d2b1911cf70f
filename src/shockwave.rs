//! Expanding-ring shockwave effect
//!
//! A pulse starts at a small radius around the caster and grows by a fixed
//! step on every scheduled fire until it passes the terminal radius. Each
//! pulse sweeps a flat box around the caster's *current* position: cosmetic
//! ring particles, then damage plus outward knockback for every living
//! entity caught in the volume. An entity overlapped by several pulses is
//! hit once per pulse; that repetition is the ability's bite, not a bug.
//!
//! Pulses are independent instances. Two casters, or one caster again after
//! cooldown, each get their own radius march.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::config::ShockwaveConfig;
use crate::host::{Host, ParticleKind, SoundKind, Vec3};
use crate::identity::PlayerId;

/// Vertical half-extent of the sweep volume
const SWEEP_HALF_HEIGHT: f64 = 2.0;

/// Result of advancing a pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseStatus {
    /// Still growing; keep the ticker alive
    Expanding,
    /// Past the terminal radius or the caster vanished; stop ticking
    Completed,
}

/// One live shockwave invocation
#[derive(Debug, Clone)]
pub struct ShockwavePulse {
    pub id: Uuid,
    pub caster: PlayerId,
    pub radius: f64,
}

impl ShockwavePulse {
    pub fn new(caster: PlayerId, initial_radius: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            caster,
            radius: initial_radius,
        }
    }

    /// Run one expansion step against the live world
    pub fn advance(&mut self, host: &dyn Host, config: &ShockwaveConfig) -> PulseStatus {
        if self.radius > config.terminal_radius {
            return PulseStatus::Completed;
        }

        // The ring follows the caster; a caster no longer in the world ends
        // the effect.
        let Some(center) = host.location(self.caster) else {
            return PulseStatus::Completed;
        };

        host.spawn_particles(
            center,
            ParticleKind::Cloud,
            20,
            Vec3::new(self.radius, 0.1, self.radius),
            0.02,
        );

        let caster_entity = self.caster.as_entity();
        for entity in host.nearby_living(center, self.radius, SWEEP_HALF_HEIGHT, self.radius) {
            if entity.id == caster_entity {
                continue;
            }
            host.apply_damage(entity.id, config.damage, self.caster);
            host.set_velocity(entity.id, knockback(center, entity.position, config));
        }

        self.radius += config.radius_step;
        PulseStatus::Expanding
    }
}

/// Outward knockback: horizontal unit vector from caster to target scaled
/// by the configured magnitude, with a fixed upward component. Replaces the
/// target's velocity outright.
fn knockback(origin: Vec3, target: Vec3, config: &ShockwaveConfig) -> Vec3 {
    let mut kb = Vec3::new(target.x - origin.x, 0.0, target.z - origin.z);
    let norm = kb.norm();
    if norm > f64::EPSILON {
        kb *= config.knockback / norm;
    }
    // A target sitting on the caster's axis only gets the lift
    kb.y = config.knockback_lift;
    kb
}

/// Live pulse instances, keyed by pulse id
#[derive(Debug, Default)]
pub struct ShockwaveEngine {
    pulses: RwLock<HashMap<Uuid, ShockwavePulse>>,
}

impl ShockwaveEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new pulse at the caster: impact sound, initial burst, then
    /// the ring march begins on the first ticker fire. Returns the pulse id
    /// the ticker should carry.
    pub async fn begin(
        &self,
        host: &dyn Host,
        caster: PlayerId,
        origin: Vec3,
        config: &ShockwaveConfig,
    ) -> Uuid {
        host.play_sound(origin, SoundKind::GroundSlam, 1.5, 0.5);
        host.spawn_particles(
            origin,
            ParticleKind::Explosion,
            6,
            Vec3::new(1.0, 0.2, 1.0),
            0.05,
        );

        let pulse = ShockwavePulse::new(caster, config.initial_radius);
        let id = pulse.id;
        self.pulses.write().await.insert(id, pulse);
        debug!("shockwave started by {caster}");
        id
    }

    /// Advance one pulse; completed pulses are removed. An unknown id (a
    /// ticker that outlived its pulse) reports completion so the caller
    /// cancels it.
    pub async fn advance(
        &self,
        host: &dyn Host,
        pulse_id: Uuid,
        config: &ShockwaveConfig,
    ) -> PulseStatus {
        let mut pulses = self.pulses.write().await;
        let Some(pulse) = pulses.get_mut(&pulse_id) else {
            return PulseStatus::Completed;
        };

        let status = pulse.advance(host, config);
        if status == PulseStatus::Completed {
            pulses.remove(&pulse_id);
        }
        status
    }

    /// Number of live pulses
    pub async fn active_count(&self) -> usize {
        self.pulses.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeKind;
    use crate::host::LivingEntity;
    use crate::identity::EntityId;
    use parking_lot::Mutex;

    /// Minimal world: one caster at the origin, fixed bystanders
    struct PulseWorld {
        caster: PlayerId,
        bystanders: Vec<LivingEntity>,
        damage_log: Mutex<Vec<(EntityId, f64)>>,
        velocity_log: Mutex<Vec<(EntityId, Vec3)>>,
        particle_count: Mutex<u32>,
    }

    impl PulseWorld {
        fn new(caster: PlayerId, bystanders: Vec<LivingEntity>) -> Self {
            Self {
                caster,
                bystanders,
                damage_log: Mutex::new(Vec::new()),
                velocity_log: Mutex::new(Vec::new()),
                particle_count: Mutex::new(0),
            }
        }
    }

    impl Host for PulseWorld {
        fn is_online(&self, player: PlayerId) -> bool {
            player == self.caster
        }
        fn location(&self, player: PlayerId) -> Option<Vec3> {
            (player == self.caster).then(Vec3::zeros)
        }
        fn current_health(&self, _player: PlayerId) -> Option<f64> {
            Some(20.0)
        }
        fn resolve_name(&self, _name: &str) -> Option<PlayerId> {
            None
        }
        fn display_name(&self, _player: PlayerId) -> Option<String> {
            None
        }
        fn has_permission(&self, _player: PlayerId, _node: &str) -> bool {
            false
        }
        fn nearby_living(
            &self,
            center: Vec3,
            half_x: f64,
            half_y: f64,
            half_z: f64,
        ) -> Vec<LivingEntity> {
            // The caster entity is present too, as a real host would report
            let mut found = vec![LivingEntity {
                id: self.caster.as_entity(),
                position: center,
            }];
            found.extend(self.bystanders.iter().copied().filter(|e| {
                let d = e.position - center;
                d.x.abs() <= half_x && d.y.abs() <= half_y && d.z.abs() <= half_z
            }));
            found
        }
        fn set_attribute(&self, _: PlayerId, _: AttributeKind, _: f64) -> bool {
            true
        }
        fn set_health(&self, _: PlayerId, _: f64) {}
        fn apply_damage(&self, target: EntityId, amount: f64, _attacker: PlayerId) {
            self.damage_log.lock().push((target, amount));
        }
        fn set_velocity(&self, target: EntityId, velocity: Vec3) {
            self.velocity_log.lock().push((target, velocity));
        }
        fn play_sound(&self, _: Vec3, _: SoundKind, _: f32, _: f32) {}
        fn spawn_particles(&self, _: Vec3, _: ParticleKind, _: u32, _: Vec3, _: f64) {
            *self.particle_count.lock() += 1;
        }
        fn send_message(&self, _: PlayerId, _: &str) {}
    }

    fn config() -> ShockwaveConfig {
        ShockwaveConfig::default()
    }

    #[test]
    fn test_radius_marches_by_fixed_step() {
        let caster = PlayerId::random();
        let world = PulseWorld::new(caster, Vec::new());
        let config = config();
        let mut pulse = ShockwavePulse::new(caster, config.initial_radius);

        let mut radii = Vec::new();
        while pulse.advance(&world, &config) == PulseStatus::Expanding {
            radii.push(pulse.radius);
        }

        assert!((radii[0] - (config.initial_radius + config.radius_step)).abs() < 1e-9);
        for pair in radii.windows(2) {
            assert!((pair[1] - pair[0] - config.radius_step).abs() < 1e-9);
        }
    }

    #[test]
    fn test_pulse_count_matches_geometry() {
        let caster = PlayerId::random();
        let world = PulseWorld::new(caster, Vec::new());
        let config = config();
        let mut pulse = ShockwavePulse::new(caster, config.initial_radius);

        let mut sweeps = 0;
        while pulse.advance(&world, &config) == PulseStatus::Expanding {
            sweeps += 1;
        }

        let expected = ((config.terminal_radius - config.initial_radius) / config.radius_step)
            .ceil() as u32;
        assert_eq!(sweeps, expected);
        // Every sweep drew its ring
        assert_eq!(*world.particle_count.lock(), expected);
    }

    #[test]
    fn test_caster_never_hit_but_bystander_hit_every_sweep() {
        let caster = PlayerId::random();
        let bystander = EntityId::random();
        let world = PulseWorld::new(
            caster,
            vec![LivingEntity {
                id: bystander,
                position: Vec3::new(0.5, 0.0, 0.0),
            }],
        );
        let config = config();
        let mut pulse = ShockwavePulse::new(caster, config.initial_radius);

        let mut sweeps = 0;
        while pulse.advance(&world, &config) == PulseStatus::Expanding {
            sweeps += 1;
        }

        let damage = world.damage_log.lock();
        assert_eq!(damage.len() as u32, sweeps);
        assert!(damage.iter().all(|(id, amount)| {
            *id == bystander && *amount == config.damage
        }));
    }

    #[test]
    fn test_knockback_replaces_velocity_outward() {
        let caster = PlayerId::random();
        let bystander = EntityId::random();
        let world = PulseWorld::new(
            caster,
            vec![LivingEntity {
                id: bystander,
                position: Vec3::new(0.6, 0.0, 0.8),
            }],
        );
        let config = config();
        let mut pulse = ShockwavePulse::new(caster, config.initial_radius);
        pulse.advance(&world, &config);

        let velocities = world.velocity_log.lock();
        let (_, kb) = velocities[0];
        // Unit (0.6, 0, 0.8) scaled by 1.5, lift 0.5
        assert!((kb.x - 0.9).abs() < 1e-9);
        assert!((kb.z - 1.2).abs() < 1e-9);
        assert!((kb.y - config.knockback_lift).abs() < 1e-9);
    }

    #[test]
    fn test_target_on_caster_axis_gets_lift_only() {
        let config = config();
        let kb = knockback(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0), &config);
        assert_eq!(kb.x, 0.0);
        assert_eq!(kb.z, 0.0);
        assert_eq!(kb.y, config.knockback_lift);
    }

    #[test]
    fn test_vanished_caster_ends_pulse() {
        let caster = PlayerId::random();
        let world = PulseWorld::new(PlayerId::random(), Vec::new());
        let config = config();
        let mut pulse = ShockwavePulse::new(caster, config.initial_radius);
        assert_eq!(pulse.advance(&world, &config), PulseStatus::Completed);
    }

    #[tokio::test]
    async fn test_engine_tracks_independent_pulses() {
        let caster_a = PlayerId::random();
        let caster_b = PlayerId::random();
        let world = PulseWorld::new(caster_a, Vec::new());
        let config = config();
        let engine = ShockwaveEngine::new();

        let a = engine.begin(&world, caster_a, Vec3::zeros(), &config).await;
        let b = engine.begin(&world, caster_b, Vec3::zeros(), &config).await;
        assert_eq!(engine.active_count().await, 2);

        // caster_b is not in the world, so its pulse completes immediately
        assert_eq!(engine.advance(&world, b, &config).await, PulseStatus::Completed);
        assert_eq!(engine.advance(&world, a, &config).await, PulseStatus::Expanding);
        assert_eq!(engine.active_count().await, 1);

        // A ticker outliving its pulse reports completion
        assert_eq!(engine.advance(&world, b, &config).await, PulseStatus::Completed);
    }
}
