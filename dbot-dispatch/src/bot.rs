//! Bot facade: owns the session lifecycle, the handler registry, the command catalog and the
//! message lifecycle manager, and routes inbound events to handlers.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use async_trait::async_trait;
use dbot_core::{
    ChannelId, CommandDefinition, DbotError, Embed, EventListener, Interaction, InteractionKind,
    InteractionResponse, Message, MessageId, RegisteredCommand, Result, Session, User,
};
use tracing::{error, info, instrument, warn};

use crate::catalog::{CatalogReport, CommandCatalog};
use crate::command_router;
use crate::config::BotConfig;
use crate::handler::{InteractionHandler, SlashCommandHandler, TextCommandHandler};
use crate::interaction_router;
use crate::lifecycle::{DeletionHandle, DeletionScheduler, MessageLifecycle, TokioDeletionScheduler};
use crate::module::Module;
use crate::registry::Registry;
use crate::stats::{DispatchStats, RouteOutcome, StatsSnapshot, TextOutcome};
use crate::text_router;

struct BotInner {
    session: Arc<dyn Session>,
    config: BotConfig,
    registry: Registry,
    catalog: CommandCatalog,
    lifecycle: MessageLifecycle,
    stats: DispatchStats,
}

/// Cheap-to-clone handle passed to every handler.
#[derive(Clone)]
pub struct DiscordBot {
    inner: Arc<BotInner>,
}

impl DiscordBot {
    /// Validates the config and subscribes the routers to the session's events.
    pub fn new(session: Arc<dyn Session>, config: BotConfig) -> Result<Self> {
        Self::with_scheduler(session, config, Arc::new(TokioDeletionScheduler))
    }

    /// Like [`DiscordBot::new`] with a custom deletion scheduler.
    pub fn with_scheduler(
        session: Arc<dyn Session>,
        config: BotConfig,
        scheduler: Arc<dyn DeletionScheduler>,
    ) -> Result<Self> {
        config.validate().map_err(|e| DbotError::Config(e.to_string()))?;
        let scope = config.scope().map_err(|e| DbotError::Config(e.to_string()))?;

        let inner = Arc::new(BotInner {
            registry: Registry::new(),
            catalog: CommandCatalog::new(session.clone(), scope),
            lifecycle: MessageLifecycle::with_scheduler(session.clone(), scheduler),
            stats: DispatchStats::default(),
            session,
            config,
        });
        // Weak, so the session's listener does not keep the bot alive.
        inner.session.subscribe(Arc::new(Dispatcher {
            bot: Arc::downgrade(&inner),
        }));

        Ok(Self { inner })
    }

    pub fn config(&self) -> &BotConfig {
        &self.inner.config
    }

    pub fn session(&self) -> &Arc<dyn Session> {
        &self.inner.session
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.inner.stats.snapshot()
    }

    /// Commands created remotely by the last registration.
    pub async fn registered_commands(&self) -> Vec<RegisteredCommand> {
        self.inner.catalog.registered_commands().await
    }

    /// Binds text command aliases; may be called before or after [`DiscordBot::start`].
    /// Invalid aliases are logged and skipped.
    pub async fn map_text_commands(&self, commands: HashMap<String, Arc<dyn TextCommandHandler>>) {
        for (alias, handler) in commands {
            match self.inner.registry.register_text(&alias, handler).await {
                Ok(true) => info!(alias = %alias, "Text command handler replaced"),
                Ok(false) => {}
                Err(e) => warn!(error = %e, alias = %alias, "Skipping text command"),
            }
        }
    }

    /// Binds slash command handlers by definition name. Remote registration happens on start
    /// or through [`DiscordBot::register_commands`].
    pub async fn map_slash_commands(
        &self,
        commands: Vec<(CommandDefinition, Arc<dyn SlashCommandHandler>)>,
    ) {
        for (definition, handler) in commands {
            let name = definition.name.clone();
            match self.inner.registry.register_command(Arc::new(definition), handler).await {
                Ok(true) => info!(command = %name, "Slash command handler replaced"),
                Ok(false) => {}
                Err(e) => warn!(error = %e, command = %name, "Skipping slash command"),
            }
        }
    }

    /// Binds interaction handlers by action key.
    pub async fn map_interaction_handlers(
        &self,
        handlers: HashMap<String, Arc<dyn InteractionHandler>>,
    ) {
        for (key, handler) in handlers {
            match self.inner.registry.register_action(&key, handler).await {
                Ok(true) => info!(action = %key, "Interaction handler replaced"),
                Ok(false) => {}
                Err(e) => warn!(error = %e, action = %key, "Skipping interaction handler"),
            }
        }
    }

    /// Maps every handler a module exposes.
    pub async fn load_module(&self, module: &dyn Module) {
        self.map_text_commands(module.text_commands()).await;
        self.map_slash_commands(module.slash_commands()).await;
        self.map_interaction_handlers(module.interaction_handlers()).await;
    }

    /// Opens the session, then syncs the remote catalog in the background if configured.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<()> {
        self.inner.session.open().await.map_err(|e| {
            error!(error = %e, "Failed to open session");
            e
        })?;
        info!("Session opened");

        let config = &self.inner.config;
        if config.register_commands {
            let bot = self.clone();
            tokio::spawn(async move {
                bot.register_commands().await;
            });
        } else if config.unregister_commands {
            let bot = self.clone();
            tokio::spawn(async move {
                bot.unregister_commands().await;
            });
        }
        Ok(())
    }

    /// Closes the session, then unregisters commands if configured. A failed close is returned
    /// and skips unregistration.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> Result<()> {
        self.inner.session.close().await.map_err(|e| {
            error!(error = %e, "Failed to close session");
            e
        })?;
        info!("Session closed");

        if self.inner.config.unregister_commands {
            self.unregister_commands().await;
        }
        Ok(())
    }

    /// Replaces the remote catalog with the registered definitions.
    pub async fn register_commands(&self) -> CatalogReport {
        let definitions = self.inner.registry.command_definitions().await;
        self.inner.catalog.register(&definitions).await
    }

    pub async fn unregister_commands(&self) -> CatalogReport {
        self.inner.catalog.unregister().await
    }

    /// Sends a message that deletes itself after `timeout` (zero keeps it).
    pub async fn send_with_expiry(
        &self,
        channel_id: ChannelId,
        content: &str,
        timeout: Duration,
    ) -> Result<MessageId> {
        self.inner.lifecycle.send_with_expiry(channel_id, content, timeout).await
    }

    pub async fn send_embed_with_expiry(
        &self,
        channel_id: ChannelId,
        embed: Embed,
        timeout: Duration,
    ) -> Result<MessageId> {
        self.inner.lifecycle.send_embed_with_expiry(channel_id, embed, timeout).await
    }

    /// Deletes a message after `timeout`; None (and no timer) when `timeout` is zero.
    pub fn delete_with_timeout(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        timeout: Duration,
    ) -> Option<DeletionHandle> {
        self.inner.lifecycle.schedule_deletion(channel_id, message_id, timeout)
    }

    pub async fn respond_to_interaction(
        &self,
        interaction: &Interaction,
        response: &InteractionResponse,
    ) -> Result<()> {
        self.inner
            .session
            .respond_to_interaction(interaction, response)
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    interaction_id = interaction.id,
                    "Error responding to interaction"
                );
                e
            })
    }

    /// Runs the text command router on one message.
    pub async fn dispatch_message(&self, message: &Message) -> TextOutcome {
        let outcome = text_router::process_message(self, message).await;
        self.inner.stats.record_text(&outcome);
        outcome
    }

    /// Runs both interaction-side routers; returns the outcome of the one the subtype belongs to.
    pub async fn dispatch_interaction(&self, interaction: &Interaction) -> RouteOutcome {
        let command = command_router::process_command(self, interaction).await;
        self.inner.stats.record_command(&command);
        let other = interaction_router::process_interaction(self, interaction).await;
        self.inner.stats.record_interaction(&other);

        match interaction.kind {
            InteractionKind::Command { .. } => command,
            _ => other,
        }
    }
}

/// Session listener forwarding events to the routers.
struct Dispatcher {
    bot: Weak<BotInner>,
}

impl Dispatcher {
    fn bot(&self) -> Option<DiscordBot> {
        self.bot.upgrade().map(|inner| DiscordBot { inner })
    }
}

#[async_trait]
impl EventListener for Dispatcher {
    async fn on_ready(&self, user: &User) {
        info!(user_id = %user.id, username = %user.username, "Bot is up!");
    }

    async fn on_message(&self, message: &Message) {
        if let Some(bot) = self.bot() {
            bot.dispatch_message(message).await;
        }
    }

    async fn on_interaction(&self, interaction: &Interaction) {
        if let Some(bot) = self.bot() {
            bot.dispatch_interaction(interaction).await;
        }
    }
}
