//! Connection collaborator consumed by the dispatch layer.
//!
//! [`Session`] is transport-agnostic; `dbot-discord` implements it on top of serenity and tests
//! substitute a recording mock. Inbound events reach the dispatch layer through [`EventListener`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    ChannelId, CommandDefinition, CommandId, CommandScope, Embed, Interaction,
    InteractionResponse, Message, MessageId, RegisteredCommand, User, UserId,
};

/// Callbacks for inbound gateway events. The session may invoke them concurrently for distinct
/// events.
#[async_trait]
pub trait EventListener: Send + Sync {
    /// Connection is established and the bot's own identity is known.
    async fn on_ready(&self, _user: &User) {}
    /// A chat message was created in a channel the bot can read.
    async fn on_message(&self, _message: &Message) {}
    /// A command invocation, component click, modal submission or autocomplete request arrived.
    async fn on_interaction(&self, _interaction: &Interaction) {}
}

/// Realtime connection plus the REST calls the dispatch layer needs.
#[async_trait]
pub trait Session: Send + Sync {
    /// Opens the realtime connection. Returns once the connection is ready or has failed.
    async fn open(&self) -> Result<()>;
    /// Closes the realtime connection.
    async fn close(&self) -> Result<()>;
    /// Registers the listener that receives ready, message and interaction events.
    fn subscribe(&self, listener: Arc<dyn EventListener>);
    /// The bot's own user id; None until the connection is ready.
    fn current_user_id(&self) -> Option<UserId>;

    async fn send_message(&self, channel: ChannelId, content: &str) -> Result<MessageId>;
    async fn send_embed(&self, channel: ChannelId, embed: &Embed) -> Result<MessageId>;
    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> Result<()>;
    async fn respond_to_interaction(
        &self,
        interaction: &Interaction,
        response: &InteractionResponse,
    ) -> Result<()>;

    async fn create_remote_command(
        &self,
        scope: CommandScope,
        definition: &CommandDefinition,
    ) -> Result<RegisteredCommand>;
    async fn list_remote_commands(&self, scope: CommandScope) -> Result<Vec<RegisteredCommand>>;
    async fn delete_remote_command(&self, scope: CommandScope, id: CommandId) -> Result<()>;
}
