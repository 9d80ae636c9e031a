//! Component clicks, modal submissions and autocomplete requests, routed by action key.

use dbot_core::{action_key, Interaction, InteractionKind};
use tracing::{debug, error, info};

use crate::bot::DiscordBot;
use crate::stats::RouteOutcome;

/// Action key for components and modals (custom id before the first `:`), command name for
/// autocomplete. None for command invocations, which belong to the command router.
pub fn routing_key(interaction: &Interaction) -> Option<&str> {
    match &interaction.kind {
        InteractionKind::Component { custom_id, .. }
        | InteractionKind::ModalSubmit { custom_id, .. } => Some(action_key(custom_id)),
        InteractionKind::Autocomplete { name, .. } => Some(name.as_str()),
        InteractionKind::Command { .. } => None,
    }
}

pub(crate) async fn process_interaction(
    bot: &DiscordBot,
    interaction: &Interaction,
) -> RouteOutcome {
    let Some(key) = routing_key(interaction) else {
        return RouteOutcome::NotApplicable;
    };

    match bot.registry().lookup_action(key).await {
        Some(handler) => {
            info!(member = %interaction.user.username, action = %key, "Interaction received");
            if let Err(e) = handler.handle(bot, interaction).await {
                error!(error = %e, action = %key, "Interaction handler failed");
            }
            RouteOutcome::Dispatched { key: key.to_string() }
        }
        None => {
            debug!(action = %key, "No handler for interaction, dropped");
            RouteOutcome::Unmatched { key: key.to_string() }
        }
    }
}
