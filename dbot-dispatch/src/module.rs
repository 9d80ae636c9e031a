//! Pluggable bundles of related handlers.

use std::collections::HashMap;
use std::sync::Arc;

use dbot_core::CommandDefinition;

use crate::handler::{InteractionHandler, SlashCommandHandler, TextCommandHandler};

/// A bot feature exposing any of the three handler maps; load with
/// [`crate::DiscordBot::load_module`].
pub trait Module: Send + Sync {
    /// Text command handlers by alias (including the prefix, e.g. `"!help"`).
    fn text_commands(&self) -> HashMap<String, Arc<dyn TextCommandHandler>> {
        HashMap::new()
    }

    fn slash_commands(&self) -> Vec<(CommandDefinition, Arc<dyn SlashCommandHandler>)> {
        Vec::new()
    }

    /// Interaction handlers by action key (or command name for autocomplete).
    fn interaction_handlers(&self) -> HashMap<String, Arc<dyn InteractionHandler>> {
        HashMap::new()
    }
}
