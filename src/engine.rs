//! The coordinating engine
//!
//! `RoleEngine` owns every piece of state in the crate (role registry,
//! cooldowns, pending offers, expiry handles, live pulses, scheduler) and is
//! the only mutation path. The host delivers events into the entry points
//! below and drives [`RoleEngine::tick`] from its simulation loop; the
//! engine answers through the [`Host`] trait.
//!
//! Lifecycle: [`RoleEngine::startup`] loads the persisted roles before any
//! event processing; [`RoleEngine::shutdown`] flushes and cancels every
//! outstanding timer.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::attributes::apply_profile;
use crate::commands::{self, CommandRequest, RoleAction, MANAGE_PERMISSION};
use crate::config::RoleswapConfig;
use crate::cooldown::CooldownTracker;
use crate::host::{CommandSender, HeldItem, Host, InteractKind};
use crate::identity::PlayerId;
use crate::roles::{Role, RoleRegistry, RoleStore};
use crate::scheduler::{Scheduler, TaskId, TaskKind};
use crate::shockwave::{PulseStatus, ShockwaveEngine};
use crate::swap::{parse_reply, SwapBoard, SwapOffer, SwapReply};

/// What the host should do with a chat message after the engine saw it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatDisposition {
    /// Broadcast normally
    PassThrough,
    /// Consumed as a swap reply; suppress from chat
    Intercepted,
}

/// The embedded role/shockwave/swap engine
pub struct RoleEngine {
    config: RoleswapConfig,
    host: Arc<dyn Host>,
    registry: RoleRegistry,
    cooldowns: CooldownTracker,
    offers: SwapBoard,
    /// Live expiry timer per pending offer; a fired timer with any other id
    /// is stale and ignored
    expiry_handles: RwLock<HashMap<PlayerId, TaskId>>,
    scheduler: Scheduler,
    shockwaves: ShockwaveEngine,
}

impl RoleEngine {
    pub fn new(config: RoleswapConfig, host: Arc<dyn Host>) -> Self {
        let registry = RoleRegistry::new(RoleStore::new(config.data_file.clone()));
        Self {
            config,
            host,
            registry,
            cooldowns: CooldownTracker::new(),
            offers: SwapBoard::new(),
            expiry_handles: RwLock::new(HashMap::new()),
            scheduler: Scheduler::new(),
            shockwaves: ShockwaveEngine::new(),
        }
    }

    /// Load persisted roles. Must complete before any event is delivered.
    pub async fn startup(&self) -> anyhow::Result<()> {
        self.registry.load().await?;
        info!("role engine ready");
        Ok(())
    }

    /// Flush the registry and drop every scheduled callback
    pub async fn shutdown(&self) {
        self.registry.flush().await;
        self.scheduler.cancel_all().await;
        info!("role engine stopped");
    }

    /// Current role for a player
    pub async fn role_of(&self, player: PlayerId) -> Role {
        self.registry.get(player).await
    }

    /// Reapply a player's stat profile from their registered role. Hosts
    /// call this when a player rejoins so live stats catch up with the
    /// registry.
    pub async fn refresh_profile(&self, player: PlayerId) {
        let role = self.registry.get(player).await;
        apply_profile(self.host.as_ref(), player, role);
    }

    // -------------------- host events --------------------

    /// Use/right-click interaction
    pub async fn on_interact(
        &self,
        player: PlayerId,
        kind: InteractKind,
        sneaking: bool,
        held: &HeldItem,
    ) {
        if kind.is_use() && sneaking && held.is_empty() {
            self.try_shockwave(player).await;
        }
    }

    /// Arm-swing animation
    pub async fn on_swing(&self, player: PlayerId, sneaking: bool, held: &HeldItem) {
        if sneaking && held.is_empty() {
            self.try_shockwave(player).await;
        }
    }

    /// Death with killer attribution. Opens a swap offer when either
    /// participant has a role worth trading.
    pub async fn on_death(&self, victim: PlayerId, killer: Option<PlayerId>) {
        let Some(killer) = killer else { return };

        let killer_role = self.registry.get(killer).await;
        let victim_role = self.registry.get(victim).await;
        let offer = SwapOffer::new(killer, victim, killer_role, victim_role);
        if !offer.has_stakes() {
            return;
        }

        let victim_name = self
            .host
            .display_name(victim)
            .unwrap_or_else(|| victim.to_string());
        self.host.send_message(
            killer,
            &format!("You killed {victim_name} who was {victim_role}."),
        );
        let ttl_secs = self.config.swap.offer_ttl_ms / 1000;
        self.host.send_message(
            killer,
            &format!("Type /acceptrole or /declinerole ({ttl_secs}s)."),
        );

        if self.offers.put(offer).await.is_some() {
            debug!("newer kill by {killer} displaced their pending offer");
        }
        self.cancel_expiry(killer).await;
        let task = self
            .scheduler
            .schedule_once(TaskKind::OfferExpiry { killer }, self.config.swap.offer_ttl_ms)
            .await;
        self.expiry_handles.write().await.insert(killer, task);
    }

    /// Chat message, possibly from a producer thread. Returns whether the
    /// host should suppress it from broadcast.
    pub async fn on_chat(&self, player: PlayerId, message: &str) -> ChatDisposition {
        if !self.offers.contains(player).await {
            return ChatDisposition::PassThrough;
        }
        let Some(reply) = parse_reply(message) else {
            return ChatDisposition::PassThrough;
        };

        match reply {
            SwapReply::Accept => self.accept(player).await,
            SwapReply::Decline => self.decline(player).await,
        }
        ChatDisposition::Intercepted
    }

    /// Player left the server: drop cooldown history and any pending offer
    pub async fn on_disconnect(&self, player: PlayerId) {
        self.cooldowns.clear(player);
        if self.offers.take(player).await.is_some() {
            debug!("discarded pending offer of disconnecting player {player}");
        }
        self.cancel_expiry(player).await;
    }

    /// Advance time-driven work. Call once per host simulation step.
    pub async fn tick(&self) {
        for fired in self.scheduler.tick().await {
            match fired.kind {
                TaskKind::OfferExpiry { killer } => {
                    self.expire_offer(killer, fired.id).await;
                }
                TaskKind::ShockwavePulse { pulse } => {
                    let status = self
                        .shockwaves
                        .advance(self.host.as_ref(), pulse, &self.config.shockwave)
                        .await;
                    if status == PulseStatus::Completed {
                        self.scheduler.cancel(fired.id).await;
                    }
                }
            }
        }
    }

    // -------------------- commands --------------------

    /// Dispatch a command. Returns true when the command belongs to this
    /// crate, whether or not it succeeded.
    pub async fn handle_command(&self, sender: CommandSender, name: &str, args: &[&str]) -> bool {
        let request = match commands::parse(name, args) {
            None => return false,
            Some(Err(reject)) => {
                self.reply(sender, &reject.to_string());
                return true;
            }
            Some(Ok(request)) => request,
        };

        match request {
            CommandRequest::Role { action, target_name } => {
                self.run_role_command(sender, action, target_name.as_deref()).await;
            }
            CommandRequest::Accept => match sender.player() {
                Some(player) => self.accept(player).await,
                None => self.reply(sender, "Command only for players."),
            },
            CommandRequest::Decline => match sender.player() {
                Some(player) => self.decline(player).await,
                None => self.reply(sender, "Command only for players."),
            },
        }
        true
    }

    async fn run_role_command(
        &self,
        sender: CommandSender,
        action: RoleAction,
        target_name: Option<&str>,
    ) {
        let target = match target_name {
            Some(name) => {
                if let CommandSender::Player(p) = sender {
                    if !self.host.has_permission(p, MANAGE_PERMISSION) {
                        self.reply(sender, "You do not have permission to change others' roles.");
                        return;
                    }
                }
                match self.host.resolve_name(name) {
                    Some(target) => target,
                    None => {
                        self.reply(sender, "Player not found.");
                        return;
                    }
                }
            }
            None => match sender.player() {
                Some(p) => p,
                None => {
                    self.reply(sender, "Console must specify a player.");
                    return;
                }
            },
        };

        match action {
            RoleAction::Assign(role) => {
                self.registry.set(target, role).await;
                apply_profile(self.host.as_ref(), target, role);
                self.host
                    .send_message(target, &format!("You are now a {role}!"));
            }
            RoleAction::Reset => {
                self.registry.clear(target).await;
                apply_profile(self.host.as_ref(), target, Role::Normal);
                self.host
                    .send_message(target, "You have been reset to normal.");
            }
        }
    }

    fn reply(&self, sender: CommandSender, message: &str) {
        match sender {
            CommandSender::Player(p) => self.host.send_message(p, message),
            CommandSender::Console => info!("{message}"),
        }
    }

    // -------------------- shockwave --------------------

    async fn try_shockwave(&self, player: PlayerId) {
        if self.registry.get(player).await != Role::Giant {
            return;
        }

        let now = chrono::Utc::now().timestamp_millis();
        if let Err(denied) =
            self.cooldowns
                .try_consume(player, now, self.config.shockwave.cooldown_ms)
        {
            self.host.send_message(
                player,
                &format!("Shockwave on cooldown ({}s)", denied.remaining_secs),
            );
            return;
        }

        let Some(origin) = self.host.location(player) else {
            return;
        };

        let pulse = self
            .shockwaves
            .begin(self.host.as_ref(), player, origin, &self.config.shockwave)
            .await;
        self.scheduler
            .schedule_repeating(
                TaskKind::ShockwavePulse { pulse },
                self.config.shockwave.pulse_interval_ms,
            )
            .await;
        self.host.send_message(player, "Shockwave unleashed!");
    }

    // -------------------- swap resolution --------------------

    /// Accept the pending offer, if any. Taking the offer off the board is
    /// the guard against double-processing from command + chat.
    pub async fn accept(&self, player: PlayerId) {
        let Some(offer) = self.offers.take(player).await else {
            self.host.send_message(player, "No pending swap.");
            return;
        };
        self.cancel_expiry(player).await;
        self.perform_swap(&offer).await;
        self.host.send_message(player, "You accepted the swap!");
    }

    /// Decline the pending offer, if any
    pub async fn decline(&self, player: PlayerId) {
        if self.offers.take(player).await.is_none() {
            self.host.send_message(player, "No pending swap.");
            return;
        }
        self.cancel_expiry(player).await;
        self.host.send_message(player, "You declined the swap.");
    }

    async fn perform_swap(&self, offer: &SwapOffer) {
        // Each side takes the other's pre-death role; one flush for both
        self.registry
            .apply_swap(
                offer.killer,
                offer.victim_role,
                offer.victim,
                offer.killer_role,
            )
            .await;

        for (player, role) in [
            (offer.killer, offer.victim_role),
            (offer.victim, offer.killer_role),
        ] {
            // An offline participant keeps the registry update; their live
            // stats catch up when the host refreshes them on rejoin
            if self.host.is_online(player) {
                apply_profile(self.host.as_ref(), player, role);
                self.host
                    .send_message(player, &format!("You are now {role}"));
            }
        }
    }

    async fn expire_offer(&self, killer: PlayerId, task: TaskId) {
        {
            let mut handles = self.expiry_handles.write().await;
            // A superseded offer's timer may still fire; only the live
            // handle counts
            if handles.get(&killer) != Some(&task) {
                return;
            }
            handles.remove(&killer);
        }

        if self.offers.take(killer).await.is_some() {
            self.host.send_message(killer, "Role swap expired.");
        }
    }

    async fn cancel_expiry(&self, killer: PlayerId) {
        if let Some(task) = self.expiry_handles.write().await.remove(&killer) {
            self.scheduler.cancel(task).await;
        }
    }

    // -------------------- introspection (tests, host dashboards) --------

    pub async fn pending_offer_count(&self) -> usize {
        self.offers.pending_count().await
    }

    pub async fn active_shockwave_count(&self) -> usize {
        self.shockwaves.active_count().await
    }

    pub async fn scheduled_task_count(&self) -> usize {
        self.scheduler.task_count().await
    }

    pub fn cooldown_entry_count(&self) -> usize {
        self.cooldowns.len()
    }
}
