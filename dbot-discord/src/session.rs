//! serenity-backed [`Session`]. REST calls go through a shared `Http` client; `open` starts the
//! gateway client and forwards its events to the subscribed [`EventListener`]s.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use dbot_core::{
    ChannelId, CommandDefinition, CommandId, CommandScope, DbotError, Embed, EventListener,
    Interaction, InteractionResponse, MessageId, RegisteredCommand, Result, Session, User, UserId,
};
use dbot_dispatch::BotConfig;
use serenity::all as sy;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::adapters::{
    build_command, build_embed, build_response, nonzero, DiscordInteractionWrapper,
    DiscordMessageWrapper,
};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

type Listeners = Arc<RwLock<Vec<Arc<dyn EventListener>>>>;

struct Running {
    shard_manager: Arc<sy::ShardManager>,
    task: JoinHandle<serenity::Result<()>>,
}

/// Discord connection implementing [`dbot_core::Session`].
pub struct SerenitySession {
    token: String,
    intents: sy::GatewayIntents,
    http: Arc<sy::Http>,
    listeners: Listeners,
    /// 0 until the gateway reports ready.
    user_id: Arc<AtomicU64>,
    running: Mutex<Option<Running>>,
}

impl SerenitySession {
    /// `intents` is the raw gateway intent bitfield; unknown bits are dropped.
    pub fn new(token: impl Into<String>, intents: u64) -> Self {
        let token = token.into();
        Self {
            http: Arc::new(sy::Http::new(&token)),
            token,
            intents: sy::GatewayIntents::from_bits_truncate(intents),
            listeners: Arc::new(RwLock::new(Vec::new())),
            user_id: Arc::new(AtomicU64::new(0)),
            running: Mutex::new(None),
        }
    }

    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(config.token.clone(), config.intents)
    }

    /// The underlying serenity HTTP client for calls the Session trait does not cover.
    pub fn http(&self) -> &Arc<sy::Http> {
        &self.http
    }
}

fn api_error(e: serenity::Error) -> DbotError {
    DbotError::Api(e.to_string())
}

fn channel(id: ChannelId) -> Result<sy::ChannelId> {
    Ok(sy::ChannelId::new(nonzero(id.get(), "channel")?))
}

fn guild(id: dbot_core::GuildId) -> Result<sy::GuildId> {
    Ok(sy::GuildId::new(nonzero(id.get(), "guild")?))
}

fn describe_exit(
    joined: std::result::Result<serenity::Result<()>, tokio::task::JoinError>,
) -> String {
    match joined {
        Ok(Ok(())) => "gateway client stopped".to_string(),
        Ok(Err(e)) => e.to_string(),
        Err(e) => e.to_string(),
    }
}

#[async_trait]
impl Session for SerenitySession {
    #[instrument(skip(self))]
    async fn open(&self) -> Result<()> {
        let mut running = self.running.lock().await;
        if running.is_some() {
            return Err(DbotError::Connection("session already open".to_string()));
        }

        let (ready_tx, ready_rx) = oneshot::channel();
        let forwarder = Forwarder {
            http: self.http.clone(),
            listeners: self.listeners.clone(),
            user_id: self.user_id.clone(),
            ready_tx: StdMutex::new(Some(ready_tx)),
        };
        let mut client = sy::Client::builder(&self.token, self.intents)
            .event_handler(forwarder)
            .await
            .map_err(|e| DbotError::Connection(e.to_string()))?;
        let shard_manager = client.shard_manager.clone();
        let mut task = tokio::spawn(async move { client.start().await });

        let ready = tokio::select! {
            ready = ready_rx => ready.map_err(|_| {
                DbotError::Connection("gateway closed before ready".to_string())
            }),
            joined = &mut task => Err(DbotError::Connection(describe_exit(joined))),
        };
        if let Err(e) = ready {
            shard_manager.shutdown_all().await;
            task.abort();
            return Err(e);
        }

        info!("Gateway connection ready");
        *running = Some(Running { shard_manager, task });
        Ok(())
    }

    #[instrument(skip(self))]
    async fn close(&self) -> Result<()> {
        let Running { shard_manager, task } = self
            .running
            .lock()
            .await
            .take()
            .ok_or_else(|| DbotError::Connection("session is not open".to_string()))?;
        self.user_id.store(0, Ordering::SeqCst);

        shard_manager.shutdown_all().await;
        match tokio::time::timeout(SHUTDOWN_TIMEOUT, task).await {
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(joined) => Err(DbotError::Connection(describe_exit(joined))),
            Err(_) => {
                warn!("Gateway client did not stop in time");
                Ok(())
            }
        }
    }

    fn subscribe(&self, listener: Arc<dyn EventListener>) {
        match self.listeners.write() {
            Ok(mut listeners) => listeners.push(listener),
            Err(poisoned) => poisoned.into_inner().push(listener),
        }
    }

    fn current_user_id(&self) -> Option<UserId> {
        match self.user_id.load(Ordering::SeqCst) {
            0 => None,
            id => Some(UserId(id)),
        }
    }

    async fn send_message(&self, channel_id: ChannelId, content: &str) -> Result<MessageId> {
        let sent = channel(channel_id)?
            .say(&self.http, content)
            .await
            .map_err(api_error)?;
        Ok(MessageId(sent.id.get()))
    }

    async fn send_embed(&self, channel_id: ChannelId, embed: &Embed) -> Result<MessageId> {
        let sent = channel(channel_id)?
            .send_message(&self.http, sy::CreateMessage::new().embed(build_embed(embed)))
            .await
            .map_err(api_error)?;
        Ok(MessageId(sent.id.get()))
    }

    async fn delete_message(&self, channel_id: ChannelId, message: MessageId) -> Result<()> {
        let message = sy::MessageId::new(nonzero(message.get(), "message")?);
        channel(channel_id)?
            .delete_message(&self.http, message)
            .await
            .map_err(api_error)
    }

    async fn respond_to_interaction(
        &self,
        interaction: &Interaction,
        response: &InteractionResponse,
    ) -> Result<()> {
        let id = sy::InteractionId::new(nonzero(interaction.id, "interaction")?);
        let response = build_response(response);
        self.http
            .create_interaction_response(id, &interaction.token, &response, Vec::new())
            .await
            .map_err(api_error)
    }

    async fn create_remote_command(
        &self,
        scope: CommandScope,
        definition: &CommandDefinition,
    ) -> Result<RegisteredCommand> {
        let builder = build_command(definition);
        let created = match scope {
            CommandScope::Global => sy::Command::create_global_command(&self.http, builder).await,
            CommandScope::Guild(id) => guild(id)?.create_command(&self.http, builder).await,
        }
        .map_err(api_error)?;
        Ok(RegisteredCommand {
            id: CommandId(created.id.get()),
            name: created.name,
        })
    }

    async fn list_remote_commands(&self, scope: CommandScope) -> Result<Vec<RegisteredCommand>> {
        let commands = match scope {
            CommandScope::Global => sy::Command::get_global_commands(&self.http).await,
            CommandScope::Guild(id) => guild(id)?.get_commands(&self.http).await,
        }
        .map_err(api_error)?;
        Ok(commands
            .into_iter()
            .map(|c| RegisteredCommand {
                id: CommandId(c.id.get()),
                name: c.name,
            })
            .collect())
    }

    async fn delete_remote_command(&self, scope: CommandScope, id: CommandId) -> Result<()> {
        let id = sy::CommandId::new(nonzero(id.get(), "command")?);
        match scope {
            CommandScope::Global => sy::Command::delete_global_command(&self.http, id).await,
            CommandScope::Guild(gid) => guild(gid)?.delete_command(&self.http, id).await,
        }
        .map_err(api_error)
    }
}

/// serenity event handler that converts gateway events and hands them to the listeners.
struct Forwarder {
    http: Arc<sy::Http>,
    listeners: Listeners,
    user_id: Arc<AtomicU64>,
    ready_tx: StdMutex<Option<oneshot::Sender<()>>>,
}

impl Forwarder {
    fn listeners(&self) -> Vec<Arc<dyn EventListener>> {
        match self.listeners.read() {
            Ok(listeners) => listeners.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl sy::EventHandler for Forwarder {
    async fn ready(&self, _ctx: sy::Context, ready: sy::Ready) {
        // Command endpoints on the REST client need the application id.
        self.http.set_application_id(ready.application.id);
        self.user_id.store(ready.user.id.get(), Ordering::SeqCst);
        info!(user_id = ready.user.id.get(), username = %ready.user.name, "Gateway ready");

        let ready_tx = match self.ready_tx.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(tx) = ready_tx {
            let _ = tx.send(());
        }

        let user = User {
            id: UserId(ready.user.id.get()),
            username: ready.user.name.clone(),
            bot: ready.user.bot,
        };
        for listener in self.listeners() {
            listener.on_ready(&user).await;
        }
    }

    async fn message(&self, _ctx: sy::Context, new_message: sy::Message) {
        let message = DiscordMessageWrapper(&new_message).to_core();
        for listener in self.listeners() {
            listener.on_message(&message).await;
        }
    }

    async fn interaction_create(&self, _ctx: sy::Context, interaction: sy::Interaction) {
        let Some(interaction) = DiscordInteractionWrapper(&interaction).to_core() else {
            debug!("Ignoring unsupported interaction type");
            return;
        };
        for listener in self.listeners() {
            listener.on_interaction(&interaction).await;
        }
    }
}
