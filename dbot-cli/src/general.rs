//! Sample module exercising all three handler kinds: `help`/`info` as text and slash commands,
//! a `confirm:<id>` button action and a `color` command with autocomplete.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use dbot_core::{
    AutocompleteChoice, CommandDefinition, DbotError, Embed, Interaction, InteractionKind,
    InteractionResponse, Message, Result,
};
use dbot_dispatch::{
    DiscordBot, InteractionHandler, Module, SlashCommandHandler, StatsSnapshot, TextCommandHandler,
};
use tracing::info;

/// Named colors offered by `/color`.
pub const COLORS: &[(&str, u32)] = &[
    ("black", 0x000000),
    ("blue", 0x3498DB),
    ("gold", 0xF1C40F),
    ("green", 0x2ECC71),
    ("orange", 0xE67E22),
    ("purple", 0x9B59B6),
    ("red", 0xE74C3C),
    ("white", 0xFFFFFF),
];

/// Discord caps autocomplete responses at 25 choices.
const MAX_CHOICES: usize = 25;

pub struct GeneralModule {
    prefix: String,
}

impl GeneralModule {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }
}

impl Module for GeneralModule {
    fn text_commands(&self) -> HashMap<String, Arc<dyn TextCommandHandler>> {
        let mut commands: HashMap<String, Arc<dyn TextCommandHandler>> = HashMap::new();
        commands.insert(format!("{}help", self.prefix), Arc::new(TextHelp));
        commands.insert(format!("{}info", self.prefix), Arc::new(TextInfo));
        commands
    }

    fn slash_commands(&self) -> Vec<(CommandDefinition, Arc<dyn SlashCommandHandler>)> {
        vec![
            (
                CommandDefinition::new("help", "List the available commands"),
                Arc::new(SlashHelp) as Arc<dyn SlashCommandHandler>,
            ),
            (
                CommandDefinition::new("info", "Show dispatch statistics"),
                Arc::new(SlashInfo) as Arc<dyn SlashCommandHandler>,
            ),
            (
                CommandDefinition::new("color", "Look up a color by name")
                    .autocomplete_option("name", "Color name"),
                Arc::new(SlashColor) as Arc<dyn SlashCommandHandler>,
            ),
        ]
    }

    fn interaction_handlers(&self) -> HashMap<String, Arc<dyn InteractionHandler>> {
        let mut handlers: HashMap<String, Arc<dyn InteractionHandler>> = HashMap::new();
        handlers.insert("confirm".to_string(), Arc::new(Confirm));
        handlers.insert("color".to_string(), Arc::new(ColorAutocomplete));
        handlers
    }
}

/// One line per alias, sorted.
pub fn help_text(aliases: &[String]) -> String {
    if aliases.is_empty() {
        return "No commands registered.".to_string();
    }
    let mut text = String::from("Available commands:");
    for alias in aliases {
        text.push_str("\n• ");
        text.push_str(alias);
    }
    text
}

pub fn stats_embed(stats: &StatsSnapshot) -> Embed {
    Embed::new("Dispatch statistics")
        .color(0x5865F2)
        .field("Text commands", stats.text_dispatched.to_string(), true)
        .field("Unknown text", stats.text_unknown.to_string(), true)
        .field("Slash commands", stats.commands_dispatched.to_string(), true)
        .field("Interactions", stats.interactions_dispatched.to_string(), true)
}

pub fn find_color(name: &str) -> Option<u32> {
    let name = name.trim().to_lowercase();
    COLORS.iter().find(|(n, _)| *n == name).map(|(_, hex)| *hex)
}

/// Colors whose name starts with `typed` (case-insensitive).
pub fn color_choices(typed: &str) -> Vec<AutocompleteChoice> {
    let typed = typed.trim().to_lowercase();
    COLORS
        .iter()
        .filter(|(name, _)| name.starts_with(typed.as_str()))
        .take(MAX_CHOICES)
        .map(|(name, _)| AutocompleteChoice {
            name: name.to_string(),
            value: name.to_string(),
        })
        .collect()
}

struct TextHelp;

#[async_trait]
impl TextCommandHandler for TextHelp {
    async fn handle(&self, bot: &DiscordBot, message: &Message, _args: &[String]) -> Result<()> {
        let aliases = bot.registry().text_aliases().await;
        bot.send_with_expiry(
            message.channel_id,
            &help_text(&aliases),
            bot.config().response_timeout,
        )
        .await?;
        Ok(())
    }
}

struct TextInfo;

#[async_trait]
impl TextCommandHandler for TextInfo {
    async fn handle(&self, bot: &DiscordBot, message: &Message, _args: &[String]) -> Result<()> {
        bot.send_embed_with_expiry(
            message.channel_id,
            stats_embed(&bot.stats()),
            bot.config().response_timeout,
        )
        .await?;
        Ok(())
    }
}

struct SlashHelp;

#[async_trait]
impl SlashCommandHandler for SlashHelp {
    async fn handle(&self, bot: &DiscordBot, interaction: &Interaction) -> Result<()> {
        let names: Vec<String> = bot
            .registry()
            .command_definitions()
            .await
            .iter()
            .map(|d| format!("/{}", d.name))
            .collect();
        bot.respond_to_interaction(interaction, &InteractionResponse::ephemeral(help_text(&names)))
            .await
    }
}

struct SlashInfo;

#[async_trait]
impl SlashCommandHandler for SlashInfo {
    async fn handle(&self, bot: &DiscordBot, interaction: &Interaction) -> Result<()> {
        let response = InteractionResponse::Embed {
            embed: stats_embed(&bot.stats()),
            ephemeral: true,
        };
        bot.respond_to_interaction(interaction, &response).await
    }
}

struct SlashColor;

#[async_trait]
impl SlashCommandHandler for SlashColor {
    async fn handle(&self, bot: &DiscordBot, interaction: &Interaction) -> Result<()> {
        let name = interaction.value("name").unwrap_or_default();
        let response = match find_color(name) {
            Some(hex) => InteractionResponse::Embed {
                embed: Embed::new(name.to_lowercase())
                    .description(format!("#{:06X}", hex))
                    .color(hex),
                ephemeral: false,
            },
            None => InteractionResponse::ephemeral(format!("Unknown color `{}`.", name)),
        };
        bot.respond_to_interaction(interaction, &response).await
    }
}

struct ColorAutocomplete;

#[async_trait]
impl InteractionHandler for ColorAutocomplete {
    async fn handle(&self, bot: &DiscordBot, interaction: &Interaction) -> Result<()> {
        let InteractionKind::Autocomplete { options, .. } = &interaction.kind else {
            return Err(DbotError::Handler(
                "color handler expects an autocomplete request".to_string(),
            ));
        };
        let typed = options
            .iter()
            .find(|o| o.focused)
            .map(|o| o.value.as_str())
            .unwrap_or_default();
        let response = InteractionResponse::Autocomplete(color_choices(typed));
        bot.respond_to_interaction(interaction, &response).await
    }
}

/// Handles buttons with custom id `confirm:<id>`.
struct Confirm;

#[async_trait]
impl InteractionHandler for Confirm {
    async fn handle(&self, bot: &DiscordBot, interaction: &Interaction) -> Result<()> {
        let Some(id) = interaction.custom_id_suffix() else {
            return bot
                .respond_to_interaction(interaction, &InteractionResponse::DeferredUpdate)
                .await;
        };
        info!(member = %interaction.user.username, id = %id, "Confirmed");
        let response = InteractionResponse::ephemeral(format!("Confirmed #{}.", id));
        bot.respond_to_interaction(interaction, &response).await
    }
}
