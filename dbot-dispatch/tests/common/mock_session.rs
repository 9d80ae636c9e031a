//! Mock implementation of [`dbot_core::Session`] for integration tests.
//!
//! Records every outbound call, keeps an in-memory remote command catalog, and lets tests emit
//! inbound events through the subscribed listener or inject failures.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dbot_core::{
    ChannelId, CommandDefinition, CommandId, CommandScope, DbotError, Embed, EventListener,
    Interaction, InteractionResponse, Message, MessageId, RegisteredCommand, Result, Session,
    User, UserId,
};

pub const BOT_USER_ID: UserId = UserId(1000);

pub struct MockSession {
    listener: Mutex<Option<Arc<dyn EventListener>>>,
    next_id: AtomicU64,
    pub opened: AtomicBool,
    pub closed: AtomicBool,
    pub fail_open: AtomicBool,
    pub fail_close: AtomicBool,
    pub fail_send: AtomicBool,
    pub fail_delete_message: AtomicBool,
    pub fail_list: AtomicBool,
    pub fail_create: Mutex<HashSet<String>>,
    pub fail_delete_command: Mutex<HashSet<CommandId>>,
    pub sent: Mutex<Vec<(ChannelId, String)>>,
    pub embeds: Mutex<Vec<(ChannelId, Embed)>>,
    /// Every delete attempt, successful or not.
    pub deleted: Mutex<Vec<(ChannelId, MessageId)>>,
    pub responses: Mutex<Vec<(u64, InteractionResponse)>>,
    /// Remote catalog state.
    pub remote: Mutex<Vec<RegisteredCommand>>,
    pub create_calls: Mutex<Vec<(CommandScope, String)>>,
    pub delete_command_calls: Mutex<Vec<CommandId>>,
    pub list_calls: AtomicUsize,
}

impl MockSession {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            listener: Mutex::new(None),
            next_id: AtomicU64::new(5000),
            opened: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            fail_open: AtomicBool::new(false),
            fail_close: AtomicBool::new(false),
            fail_send: AtomicBool::new(false),
            fail_delete_message: AtomicBool::new(false),
            fail_list: AtomicBool::new(false),
            fail_create: Mutex::new(HashSet::new()),
            fail_delete_command: Mutex::new(HashSet::new()),
            sent: Mutex::new(Vec::new()),
            embeds: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            responses: Mutex::new(Vec::new()),
            remote: Mutex::new(Vec::new()),
            create_calls: Mutex::new(Vec::new()),
            delete_command_calls: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
        })
    }

    /// Seeds the remote catalog as if a previous process had registered these names.
    pub fn with_remote_commands(self: Arc<Self>, names: &[&str]) -> Arc<Self> {
        {
            let mut remote = self.remote.lock().unwrap();
            for name in names {
                remote.push(RegisteredCommand {
                    id: CommandId(self.next_id()),
                    name: name.to_string(),
                });
            }
        }
        self
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn listener(&self) -> Arc<dyn EventListener> {
        self.listener
            .lock()
            .unwrap()
            .clone()
            .expect("no listener subscribed")
    }

    pub async fn emit_ready(&self) {
        let user = User {
            id: BOT_USER_ID,
            username: "dbot".to_string(),
            bot: true,
        };
        self.listener().on_ready(&user).await;
    }

    pub async fn emit_message(&self, message: &Message) {
        self.listener().on_message(message).await;
    }

    pub async fn emit_interaction(&self, interaction: &Interaction) {
        self.listener().on_interaction(interaction).await;
    }

    pub fn has_listener(&self) -> bool {
        self.listener.lock().unwrap().is_some()
    }

    pub fn sent(&self) -> Vec<(ChannelId, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<(ChannelId, MessageId)> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn remote_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .remote
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.name.clone())
            .collect();
        names.sort();
        names
    }
}

#[async_trait]
impl Session for MockSession {
    async fn open(&self) -> Result<()> {
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(DbotError::Connection("authentication failed".to_string()));
        }
        self.opened.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        if self.fail_close.load(Ordering::SeqCst) {
            return Err(DbotError::Connection("close failed".to_string()));
        }
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn subscribe(&self, listener: Arc<dyn EventListener>) {
        *self.listener.lock().unwrap() = Some(listener);
    }

    fn current_user_id(&self) -> Option<UserId> {
        Some(BOT_USER_ID)
    }

    async fn send_message(&self, channel: ChannelId, content: &str) -> Result<MessageId> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(DbotError::Api("Missing Access".to_string()));
        }
        self.sent.lock().unwrap().push((channel, content.to_string()));
        Ok(MessageId(self.next_id()))
    }

    async fn send_embed(&self, channel: ChannelId, embed: &Embed) -> Result<MessageId> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(DbotError::Api("Missing Access".to_string()));
        }
        self.embeds.lock().unwrap().push((channel, embed.clone()));
        Ok(MessageId(self.next_id()))
    }

    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> Result<()> {
        self.deleted.lock().unwrap().push((channel, message));
        if self.fail_delete_message.load(Ordering::SeqCst) {
            return Err(DbotError::Api("Unknown Message".to_string()));
        }
        Ok(())
    }

    async fn respond_to_interaction(
        &self,
        interaction: &Interaction,
        response: &InteractionResponse,
    ) -> Result<()> {
        self.responses
            .lock()
            .unwrap()
            .push((interaction.id, response.clone()));
        Ok(())
    }

    async fn create_remote_command(
        &self,
        scope: CommandScope,
        definition: &CommandDefinition,
    ) -> Result<RegisteredCommand> {
        self.create_calls
            .lock()
            .unwrap()
            .push((scope, definition.name.clone()));
        if self.fail_create.lock().unwrap().contains(&definition.name) {
            return Err(DbotError::Api(format!("Invalid Form Body: {}", definition.name)));
        }
        let command = RegisteredCommand {
            id: CommandId(self.next_id()),
            name: definition.name.clone(),
        };
        self.remote.lock().unwrap().push(command.clone());
        Ok(command)
    }

    async fn list_remote_commands(&self, _scope: CommandScope) -> Result<Vec<RegisteredCommand>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(DbotError::Api("Service Unavailable".to_string()));
        }
        Ok(self.remote.lock().unwrap().clone())
    }

    async fn delete_remote_command(&self, _scope: CommandScope, id: CommandId) -> Result<()> {
        self.delete_command_calls.lock().unwrap().push(id);
        if self.fail_delete_command.lock().unwrap().contains(&id) {
            return Err(DbotError::Api("Unknown Application Command".to_string()));
        }
        self.remote.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }
}
