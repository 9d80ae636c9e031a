//! Shared fixtures for dbot-dispatch integration tests.
#![allow(dead_code)]

pub mod log_capture;
pub mod mock_session;
pub mod yielding_session;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dbot_core::{
    ChannelId, DbotError, Interaction, InteractionKind, Message, MessageId, Result, Session, User,
    UserId,
};
use dbot_dispatch::{
    BotConfig, DeletionHandle, DeletionScheduler, DiscordBot, InteractionHandler,
    ScheduledDeletion, SlashCommandHandler, TextCommandHandler,
};
use tokio::sync::oneshot;

pub use log_capture::LogCapture;
pub use mock_session::{MockSession, BOT_USER_ID};
pub use yielding_session::YieldingSession;

pub const CHANNEL: ChannelId = ChannelId(42);
pub const MEMBER: UserId = UserId(7);

pub fn test_config() -> BotConfig {
    BotConfig::with_token("test_token")
}

pub fn bot_with(session: &Arc<MockSession>, config: BotConfig) -> DiscordBot {
    DiscordBot::new(session.clone(), config).unwrap()
}

pub fn message_from(author: UserId, id: u64, content: &str) -> Message {
    Message {
        id: MessageId(id),
        channel_id: CHANNEL,
        guild_id: None,
        author: User {
            id: author,
            username: if author == BOT_USER_ID { "dbot" } else { "member" }.to_string(),
            bot: author == BOT_USER_ID,
        },
        content: content.to_string(),
        created_at: Utc::now(),
    }
}

pub fn interaction(id: u64, kind: InteractionKind) -> Interaction {
    Interaction {
        id,
        token: format!("token-{}", id),
        channel_id: Some(CHANNEL),
        guild_id: None,
        user: User {
            id: MEMBER,
            username: "member".to_string(),
            bot: false,
        },
        kind,
    }
}

/// Records the arguments of every call.
#[derive(Default)]
pub struct RecordingText {
    pub calls: Mutex<Vec<Vec<String>>>,
}

impl RecordingText {
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextCommandHandler for RecordingText {
    async fn handle(&self, _bot: &DiscordBot, _message: &Message, args: &[String]) -> Result<()> {
        self.calls.lock().unwrap().push(args.to_vec());
        Ok(())
    }
}

/// Text handler that always fails.
pub struct FailingText;

#[async_trait]
impl TextCommandHandler for FailingText {
    async fn handle(&self, _bot: &DiscordBot, _message: &Message, _args: &[String]) -> Result<()> {
        Err(DbotError::Handler("boom".to_string()))
    }
}

/// Counts invocations and records the interactions seen.
#[derive(Default)]
pub struct Counting {
    pub count: AtomicUsize,
    pub seen: Mutex<Vec<Interaction>>,
}

impl Counting {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    fn record(&self, interaction: &Interaction) {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(interaction.clone());
    }
}

#[async_trait]
impl SlashCommandHandler for Counting {
    async fn handle(&self, _bot: &DiscordBot, interaction: &Interaction) -> Result<()> {
        self.record(interaction);
        Ok(())
    }
}

#[async_trait]
impl InteractionHandler for Counting {
    async fn handle(&self, _bot: &DiscordBot, interaction: &Interaction) -> Result<()> {
        self.record(interaction);
        Ok(())
    }
}

/// Scheduler that records deletions without arming timers.
#[derive(Default)]
pub struct RecordingScheduler {
    pub scheduled: Mutex<Vec<ScheduledDeletion>>,
}

impl RecordingScheduler {
    pub fn scheduled(&self) -> Vec<ScheduledDeletion> {
        self.scheduled.lock().unwrap().clone()
    }
}

impl DeletionScheduler for RecordingScheduler {
    fn schedule(&self, _session: Arc<dyn Session>, deletion: ScheduledDeletion) -> DeletionHandle {
        self.scheduled.lock().unwrap().push(deletion.clone());
        let (cancel_tx, _cancel_rx) = oneshot::channel();
        DeletionHandle::new(deletion, cancel_tx)
    }
}

/// Polls `condition` until it holds, yielding to spawned tasks in between.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met in time");
}

/// Builds a handler map; `with` arguments coerce to the trait object.
pub struct HandlerMap<H: ?Sized>(HashMap<String, Arc<H>>);

impl<H: ?Sized> HandlerMap<H> {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn with(mut self, key: &str, handler: Arc<H>) -> Self {
        self.0.insert(key.to_string(), handler);
        self
    }

    pub fn build(self) -> HashMap<String, Arc<H>> {
        self.0
    }
}

pub fn text_commands() -> HandlerMap<dyn TextCommandHandler> {
    HandlerMap::new()
}

pub fn interaction_handlers() -> HandlerMap<dyn InteractionHandler> {
    HandlerMap::new()
}
