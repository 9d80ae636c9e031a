//! Prefixed text commands in ordinary chat messages.
//!
//! Per message: ignore the bot's own messages, ignore bodies without the prefix, schedule the
//! triggering message for deletion, then dispatch on the first space-delimited token. Unknown
//! aliases get a fixed reply.

use dbot_core::Message;
use tracing::{error, info};

use crate::bot::DiscordBot;
use crate::stats::TextOutcome;

/// Reply sent when a prefixed message matches no alias.
pub const UNKNOWN_COMMAND_RESPONSE: &str = "Unknown command.";

/// Splits on single spaces. Token 0 is the alias candidate; the rest (empty tokens included) are
/// arguments.
pub fn tokenize(content: &str) -> (&str, Vec<String>) {
    let mut parts = content.split(' ');
    let alias = parts.next().unwrap_or_default();
    (alias, parts.map(str::to_string).collect())
}

pub(crate) async fn process_message(bot: &DiscordBot, message: &Message) -> TextOutcome {
    if bot.session().current_user_id() == Some(message.author.id) {
        return TextOutcome::IgnoredOwnMessage;
    }

    let config = bot.config();
    if !message.content.starts_with(config.command_prefix.as_str()) {
        return TextOutcome::IgnoredNoPrefix;
    }

    bot.delete_with_timeout(message.channel_id, message.id, config.deletion_timeout);

    let (alias, args) = tokenize(&message.content);
    match bot.registry().lookup_text(alias).await {
        Some(handler) => {
            info!(
                member = %message.author.username,
                channel_id = %message.channel_id,
                alias = %alias,
                args = args.len(),
                "Text command received"
            );
            if let Err(e) = handler.handle(bot, message, &args).await {
                error!(
                    error = %e,
                    alias = %alias,
                    channel_id = %message.channel_id,
                    "Text command handler failed"
                );
            }
            TextOutcome::Dispatched {
                alias: alias.to_lowercase(),
            }
        }
        None => {
            // Send failures are already logged by the lifecycle manager.
            let _ = bot
                .send_with_expiry(
                    message.channel_id,
                    UNKNOWN_COMMAND_RESPONSE,
                    config.response_timeout,
                )
                .await;
            info!(
                member = %message.author.username,
                channel_id = %message.channel_id,
                command = %message.content,
                "Unknown text command"
            );
            TextOutcome::Unknown {
                alias: alias.to_string(),
            }
        }
    }
}
