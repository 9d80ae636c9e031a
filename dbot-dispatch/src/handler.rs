//! Application handler traits for the three routed event kinds.

use async_trait::async_trait;
use dbot_core::{Interaction, Message, Result};

use crate::bot::DiscordBot;

/// Handler for a prefixed text command. `args` are the message tokens after the alias.
#[async_trait]
pub trait TextCommandHandler: Send + Sync {
    async fn handle(&self, bot: &DiscordBot, message: &Message, args: &[String]) -> Result<()>;
}

/// Handler for a structured (slash) command invocation.
#[async_trait]
pub trait SlashCommandHandler: Send + Sync {
    async fn handle(&self, bot: &DiscordBot, interaction: &Interaction) -> Result<()>;
}

/// Handler for component clicks, modal submissions and autocomplete requests routed by action key.
#[async_trait]
pub trait InteractionHandler: Send + Sync {
    async fn handle(&self, bot: &DiscordBot, interaction: &Interaction) -> Result<()>;
}
