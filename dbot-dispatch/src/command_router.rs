//! Structured command invocations, matched by command name.
//!
//! Unmatched names are dropped without a reply: the remote catalog and the local registry can
//! briefly disagree, and a reply here could double up with another instance's.

use dbot_core::{Interaction, InteractionKind};
use tracing::{debug, error, info};

use crate::bot::DiscordBot;
use crate::stats::RouteOutcome;

pub(crate) async fn process_command(bot: &DiscordBot, interaction: &Interaction) -> RouteOutcome {
    let InteractionKind::Command { name, .. } = &interaction.kind else {
        return RouteOutcome::NotApplicable;
    };

    match bot.registry().lookup_command(name).await {
        Some(handler) => {
            info!(
                member = %interaction.user.username,
                command = %name,
                "Slash command received"
            );
            if let Err(e) = handler.handle(bot, interaction).await {
                error!(error = %e, command = %name, "Slash command handler failed");
            }
            RouteOutcome::Dispatched { key: name.clone() }
        }
        None => {
            debug!(command = %name, "No handler for slash command, dropped");
            RouteOutcome::Unmatched { key: name.clone() }
        }
    }
}
