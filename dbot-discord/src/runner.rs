//! Runs a [`DiscordBot`] until Ctrl-C, then shuts it down.

use anyhow::Result;
use dbot_dispatch::DiscordBot;
use tracing::{info, instrument};

/// Starts the bot, waits for Ctrl-C and stops it. Start and stop errors are returned.
#[instrument(skip(bot))]
pub async fn run_until_ctrl_c(bot: &DiscordBot) -> Result<()> {
    bot.start().await?;
    info!(
        prefix = %bot.config().command_prefix,
        register_commands = bot.config().register_commands,
        "Bot started, press Ctrl-C to stop"
    );

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    bot.stop().await?;
    let stats = bot.stats();
    info!(
        text_dispatched = stats.text_dispatched,
        commands_dispatched = stats.commands_dispatched,
        interactions_dispatched = stats.interactions_dispatched,
        "Bot stopped"
    );
    Ok(())
}
