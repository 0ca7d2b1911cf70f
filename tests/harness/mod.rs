//! Integration test harness
//!
//! `FakeHost` stands in for the surrounding game server: a scripted world of
//! players and mobs that records every mutation the engine asks for
//! (attribute writes, damage, velocity, sound, particles, chat), so
//! scenarios can drive real engine flows end to end and assert on what
//! reached the world.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::TempDir;

use roleswap::attributes::AttributeKind;
use roleswap::host::{Host, LivingEntity, ParticleKind, SoundKind};
use roleswap::{EntityId, PlayerId, RoleEngine, RoleswapConfig, Vec3};

#[derive(Debug)]
struct FakePlayer {
    name: String,
    online: bool,
    position: Vec3,
    health: f64,
    attributes: HashMap<AttributeKind, f64>,
    missing_channels: HashSet<AttributeKind>,
    permissions: HashSet<String>,
    messages: Vec<String>,
}

#[derive(Default)]
struct World {
    players: HashMap<PlayerId, FakePlayer>,
    mobs: HashMap<EntityId, Vec3>,
    damage: Vec<(EntityId, f64, PlayerId)>,
    velocities: Vec<(EntityId, Vec3)>,
    sounds: Vec<SoundKind>,
    particles: Vec<ParticleKind>,
}

/// In-memory stand-in for the host game server
pub struct FakeHost {
    world: Mutex<World>,
}

impl FakeHost {
    pub fn new() -> Arc<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("roleswap=debug")
            .with_test_writer()
            .try_init();
        Arc::new(Self {
            world: Mutex::new(World::default()),
        })
    }

    /// Connect a fresh player at the origin
    pub fn join(&self, name: &str) -> PlayerId {
        self.join_at(name, Vec3::zeros())
    }

    pub fn join_at(&self, name: &str, position: Vec3) -> PlayerId {
        let id = PlayerId::random();
        self.world.lock().players.insert(
            id,
            FakePlayer {
                name: name.to_string(),
                online: true,
                position,
                health: 20.0,
                attributes: HashMap::new(),
                missing_channels: HashSet::new(),
                permissions: HashSet::new(),
                messages: Vec::new(),
            },
        );
        id
    }

    /// Mark a player offline (the engine is told separately via
    /// `on_disconnect`, as a real host would do)
    pub fn set_offline(&self, player: PlayerId) {
        if let Some(p) = self.world.lock().players.get_mut(&player) {
            p.online = false;
        }
    }

    pub fn set_online(&self, player: PlayerId) {
        if let Some(p) = self.world.lock().players.get_mut(&player) {
            p.online = true;
        }
    }

    pub fn grant(&self, player: PlayerId, node: &str) {
        if let Some(p) = self.world.lock().players.get_mut(&player) {
            p.permissions.insert(node.to_string());
        }
    }

    /// Declare an attribute channel unsupported for a player
    pub fn remove_channel(&self, player: PlayerId, kind: AttributeKind) {
        if let Some(p) = self.world.lock().players.get_mut(&player) {
            p.missing_channels.insert(kind);
        }
    }

    pub fn set_player_health(&self, player: PlayerId, health: f64) {
        if let Some(p) = self.world.lock().players.get_mut(&player) {
            p.health = health;
        }
    }

    pub fn spawn_mob(&self, position: Vec3) -> EntityId {
        let id = EntityId::random();
        self.world.lock().mobs.insert(id, position);
        id
    }

    // ---- inspection ----

    pub fn attribute(&self, player: PlayerId, kind: AttributeKind) -> Option<f64> {
        self.world.lock().players[&player].attributes.get(&kind).copied()
    }

    pub fn attributes_of(&self, player: PlayerId) -> HashMap<AttributeKind, f64> {
        self.world.lock().players[&player].attributes.clone()
    }

    pub fn health(&self, player: PlayerId) -> f64 {
        self.world.lock().players[&player].health
    }

    pub fn messages_of(&self, player: PlayerId) -> Vec<String> {
        self.world.lock().players[&player].messages.clone()
    }

    pub fn last_message(&self, player: PlayerId) -> Option<String> {
        self.messages_of(player).last().cloned()
    }

    pub fn damage_events(&self) -> Vec<(EntityId, f64, PlayerId)> {
        self.world.lock().damage.clone()
    }

    pub fn velocity_events(&self) -> Vec<(EntityId, Vec3)> {
        self.world.lock().velocities.clone()
    }

    pub fn sound_count(&self) -> usize {
        self.world.lock().sounds.len()
    }

    pub fn particle_count(&self) -> usize {
        self.world.lock().particles.len()
    }
}

impl Host for FakeHost {
    fn is_online(&self, player: PlayerId) -> bool {
        self.world
            .lock()
            .players
            .get(&player)
            .is_some_and(|p| p.online)
    }

    fn location(&self, player: PlayerId) -> Option<Vec3> {
        let world = self.world.lock();
        let p = world.players.get(&player)?;
        p.online.then_some(p.position)
    }

    fn current_health(&self, player: PlayerId) -> Option<f64> {
        let world = self.world.lock();
        let p = world.players.get(&player)?;
        p.online.then_some(p.health)
    }

    fn resolve_name(&self, name: &str) -> Option<PlayerId> {
        self.world
            .lock()
            .players
            .iter()
            .find(|(_, p)| p.online && p.name == name)
            .map(|(id, _)| *id)
    }

    fn display_name(&self, player: PlayerId) -> Option<String> {
        self.world.lock().players.get(&player).map(|p| p.name.clone())
    }

    fn has_permission(&self, player: PlayerId, node: &str) -> bool {
        self.world
            .lock()
            .players
            .get(&player)
            .is_some_and(|p| p.permissions.contains(node))
    }

    fn nearby_living(
        &self,
        center: Vec3,
        half_x: f64,
        half_y: f64,
        half_z: f64,
    ) -> Vec<LivingEntity> {
        let inside = |position: Vec3| {
            let d = position - center;
            d.x.abs() <= half_x && d.y.abs() <= half_y && d.z.abs() <= half_z
        };

        let world = self.world.lock();
        let players = world
            .players
            .iter()
            .filter(|(_, p)| p.online && inside(p.position))
            .map(|(id, p)| LivingEntity {
                id: id.as_entity(),
                position: p.position,
            });
        let mobs = world
            .mobs
            .iter()
            .filter(|(_, &position)| inside(position))
            .map(|(&id, &position)| LivingEntity { id, position });
        players.chain(mobs).collect()
    }

    fn set_attribute(&self, player: PlayerId, attribute: AttributeKind, value: f64) -> bool {
        let mut world = self.world.lock();
        let Some(p) = world.players.get_mut(&player) else {
            return false;
        };
        if !p.online || p.missing_channels.contains(&attribute) {
            return false;
        }
        p.attributes.insert(attribute, value);
        true
    }

    fn set_health(&self, player: PlayerId, value: f64) {
        if let Some(p) = self.world.lock().players.get_mut(&player) {
            if p.online {
                p.health = value;
            }
        }
    }

    fn apply_damage(&self, target: EntityId, amount: f64, attacker: PlayerId) {
        self.world.lock().damage.push((target, amount, attacker));
    }

    fn set_velocity(&self, target: EntityId, velocity: Vec3) {
        self.world.lock().velocities.push((target, velocity));
    }

    fn play_sound(&self, _at: Vec3, sound: SoundKind, _volume: f32, _pitch: f32) {
        self.world.lock().sounds.push(sound);
    }

    fn spawn_particles(&self, _at: Vec3, kind: ParticleKind, _count: u32, _spread: Vec3, _speed: f64) {
        self.world.lock().particles.push(kind);
    }

    fn send_message(&self, player: PlayerId, message: &str) {
        if let Some(p) = self.world.lock().players.get_mut(&player) {
            p.messages.push(message.to_string());
        }
    }
}

/// Config pointing at a per-test role document
pub fn test_config(dir: &TempDir) -> RoleswapConfig {
    let mut config = RoleswapConfig::default();
    config.data_file = dir.path().join("roles.json");
    config
}

/// A started engine over the fake host
pub async fn start_engine(host: &Arc<FakeHost>, config: RoleswapConfig) -> RoleEngine {
    let engine = RoleEngine::new(config, host.clone());
    engine.startup().await.expect("engine startup");
    engine
}
