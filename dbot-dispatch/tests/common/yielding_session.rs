//! [`Session`] wrapper that yields to the scheduler before every remote catalog call, so
//! concurrent catalog syncs on one task actually interleave.

use std::sync::Arc;

use async_trait::async_trait;
use dbot_core::{
    ChannelId, CommandDefinition, CommandId, CommandScope, Embed, EventListener, Interaction,
    InteractionResponse, MessageId, RegisteredCommand, Result, Session, UserId,
};

use super::mock_session::MockSession;

pub struct YieldingSession {
    pub inner: Arc<MockSession>,
}

impl YieldingSession {
    pub fn new(inner: Arc<MockSession>) -> Arc<Self> {
        Arc::new(Self { inner })
    }
}

#[async_trait]
impl Session for YieldingSession {
    async fn open(&self) -> Result<()> {
        self.inner.open().await
    }

    async fn close(&self) -> Result<()> {
        self.inner.close().await
    }

    fn subscribe(&self, listener: Arc<dyn EventListener>) {
        self.inner.subscribe(listener)
    }

    fn current_user_id(&self) -> Option<UserId> {
        self.inner.current_user_id()
    }

    async fn send_message(&self, channel: ChannelId, content: &str) -> Result<MessageId> {
        self.inner.send_message(channel, content).await
    }

    async fn send_embed(&self, channel: ChannelId, embed: &Embed) -> Result<MessageId> {
        self.inner.send_embed(channel, embed).await
    }

    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> Result<()> {
        self.inner.delete_message(channel, message).await
    }

    async fn respond_to_interaction(
        &self,
        interaction: &Interaction,
        response: &InteractionResponse,
    ) -> Result<()> {
        self.inner.respond_to_interaction(interaction, response).await
    }

    async fn create_remote_command(
        &self,
        scope: CommandScope,
        definition: &CommandDefinition,
    ) -> Result<RegisteredCommand> {
        tokio::task::yield_now().await;
        self.inner.create_remote_command(scope, definition).await
    }

    async fn list_remote_commands(&self, scope: CommandScope) -> Result<Vec<RegisteredCommand>> {
        tokio::task::yield_now().await;
        self.inner.list_remote_commands(scope).await
    }

    async fn delete_remote_command(&self, scope: CommandScope, id: CommandId) -> Result<()> {
        tokio::task::yield_now().await;
        self.inner.delete_remote_command(scope, id).await
    }
}
