//! Adapters between serenity model/builder types and dbot_core types.
//! Depends only on serenity and dbot_core type definitions.

use chrono::{DateTime, Utc};
use dbot_core::{
    ChannelId, CommandDefinition, DbotError, Embed, GuildId, Interaction, InteractionKind,
    InteractionResponse, InteractionValue, Message, MessageId, OptionKind, Result, User, UserId,
};
use serenity::all as sy;

/// Wraps a serenity User for conversion to core [`User`].
pub struct DiscordUserWrapper<'a>(pub &'a sy::User);

impl<'a> DiscordUserWrapper<'a> {
    pub fn to_core(&self) -> User {
        User {
            id: UserId(self.0.id.get()),
            username: self.0.name.clone(),
            bot: self.0.bot,
        }
    }
}

/// Wraps a serenity Message for conversion to core [`Message`].
pub struct DiscordMessageWrapper<'a>(pub &'a sy::Message);

impl<'a> DiscordMessageWrapper<'a> {
    pub fn to_core(&self) -> Message {
        let msg = self.0;
        Message {
            id: MessageId(msg.id.get()),
            channel_id: ChannelId(msg.channel_id.get()),
            guild_id: msg.guild_id.map(|g| GuildId(g.get())),
            author: DiscordUserWrapper(&msg.author).to_core(),
            content: msg.content.clone(),
            created_at: DateTime::from_timestamp(msg.timestamp.unix_timestamp(), 0)
                .unwrap_or_else(Utc::now),
        }
    }
}

/// Wraps a serenity Interaction for conversion to core [`Interaction`].
pub struct DiscordInteractionWrapper<'a>(pub &'a sy::Interaction);

impl<'a> DiscordInteractionWrapper<'a> {
    /// None for subtypes the dispatch layer does not route (pings and anything newer).
    pub fn to_core(&self) -> Option<Interaction> {
        match self.0 {
            sy::Interaction::Command(cmd) => Some(command_interaction(cmd, false)),
            sy::Interaction::Autocomplete(cmd) => Some(command_interaction(cmd, true)),
            sy::Interaction::Component(component) => Some(Interaction {
                id: component.id.get(),
                token: component.token.clone(),
                channel_id: Some(ChannelId(component.channel_id.get())),
                guild_id: component.guild_id.map(|g| GuildId(g.get())),
                user: DiscordUserWrapper(&component.user).to_core(),
                kind: InteractionKind::Component {
                    custom_id: component.data.custom_id.clone(),
                    values: component_values(&component.data.kind),
                },
            }),
            sy::Interaction::Modal(modal) => Some(Interaction {
                id: modal.id.get(),
                token: modal.token.clone(),
                channel_id: Some(ChannelId(modal.channel_id.get())),
                guild_id: modal.guild_id.map(|g| GuildId(g.get())),
                user: DiscordUserWrapper(&modal.user).to_core(),
                kind: InteractionKind::ModalSubmit {
                    custom_id: modal.data.custom_id.clone(),
                    fields: modal_fields(&modal.data.components),
                },
            }),
            _ => None,
        }
    }
}

fn command_interaction(cmd: &sy::CommandInteraction, autocomplete: bool) -> Interaction {
    let name = cmd.data.name.clone();
    let options = cmd
        .data
        .options
        .iter()
        .map(|opt| InteractionValue {
            name: opt.name.clone(),
            value: option_value_string(&opt.value),
            focused: is_focused(&opt.value),
        })
        .collect();

    Interaction {
        id: cmd.id.get(),
        token: cmd.token.clone(),
        channel_id: Some(ChannelId(cmd.channel_id.get())),
        guild_id: cmd.guild_id.map(|g| GuildId(g.get())),
        user: DiscordUserWrapper(&cmd.user).to_core(),
        kind: if autocomplete {
            InteractionKind::Autocomplete { name, options }
        } else {
            InteractionKind::Command { name, options }
        },
    }
}

/// Stringified option value; subcommands and unknown kinds become empty.
pub fn option_value_string(value: &sy::CommandDataOptionValue) -> String {
    match value {
        sy::CommandDataOptionValue::String(s) => s.clone(),
        sy::CommandDataOptionValue::Integer(i) => i.to_string(),
        sy::CommandDataOptionValue::Number(n) => n.to_string(),
        sy::CommandDataOptionValue::Boolean(b) => b.to_string(),
        sy::CommandDataOptionValue::User(id) => id.get().to_string(),
        sy::CommandDataOptionValue::Channel(id) => id.get().to_string(),
        sy::CommandDataOptionValue::Role(id) => id.get().to_string(),
        sy::CommandDataOptionValue::Autocomplete { value, .. } => value.clone(),
        _ => String::new(),
    }
}

fn is_focused(value: &sy::CommandDataOptionValue) -> bool {
    matches!(value, sy::CommandDataOptionValue::Autocomplete { .. })
}

fn component_values(kind: &sy::ComponentInteractionDataKind) -> Vec<String> {
    match kind {
        sy::ComponentInteractionDataKind::StringSelect { values } => values.clone(),
        sy::ComponentInteractionDataKind::UserSelect { values } => {
            values.iter().map(|id| id.get().to_string()).collect()
        }
        sy::ComponentInteractionDataKind::ChannelSelect { values } => {
            values.iter().map(|id| id.get().to_string()).collect()
        }
        sy::ComponentInteractionDataKind::RoleSelect { values } => {
            values.iter().map(|id| id.get().to_string()).collect()
        }
        _ => Vec::new(),
    }
}

fn modal_fields(rows: &[sy::ActionRow]) -> Vec<InteractionValue> {
    rows.iter()
        .flat_map(|row| row.components.iter())
        .filter_map(|component| match component {
            sy::ActionRowComponent::InputText(input) => Some(InteractionValue::new(
                input.custom_id.clone(),
                input.value.clone().unwrap_or_default(),
            )),
            _ => None,
        })
        .collect()
}

pub fn option_type(kind: OptionKind) -> sy::CommandOptionType {
    match kind {
        OptionKind::String => sy::CommandOptionType::String,
        OptionKind::Integer => sy::CommandOptionType::Integer,
        OptionKind::Boolean => sy::CommandOptionType::Boolean,
        OptionKind::User => sy::CommandOptionType::User,
        OptionKind::Channel => sy::CommandOptionType::Channel,
        OptionKind::Number => sy::CommandOptionType::Number,
    }
}

/// Builds the creation payload for a structured command.
pub fn build_command(definition: &CommandDefinition) -> sy::CreateCommand {
    let command = sy::CreateCommand::new(definition.name.as_str())
        .description(definition.description.as_str());
    definition.options.iter().fold(command, |command, opt| {
        command.add_option(
            sy::CreateCommandOption::new(
                option_type(opt.kind),
                opt.name.as_str(),
                opt.description.as_str(),
            )
            .required(opt.required)
            .set_autocomplete(opt.autocomplete),
        )
    })
}

pub fn build_embed(embed: &Embed) -> sy::CreateEmbed {
    let mut out = sy::CreateEmbed::new()
        .title(embed.title.as_str())
        .description(embed.description.as_str());
    if let Some(color) = embed.color {
        out = out.color(color);
    }
    for field in &embed.fields {
        out = out.field(field.name.as_str(), field.value.as_str(), field.inline);
    }
    if let Some(footer) = &embed.footer {
        out = out.footer(sy::CreateEmbedFooter::new(footer.as_str()));
    }
    out
}

pub fn build_response(response: &InteractionResponse) -> sy::CreateInteractionResponse {
    match response {
        InteractionResponse::Message { content, ephemeral } => {
            sy::CreateInteractionResponse::Message(
                sy::CreateInteractionResponseMessage::new()
                    .content(content.as_str())
                    .ephemeral(*ephemeral),
            )
        }
        InteractionResponse::Embed { embed, ephemeral } => {
            sy::CreateInteractionResponse::Message(
                sy::CreateInteractionResponseMessage::new()
                    .embed(build_embed(embed))
                    .ephemeral(*ephemeral),
            )
        }
        InteractionResponse::DeferredUpdate => sy::CreateInteractionResponse::Acknowledge,
        InteractionResponse::Autocomplete(choices) => sy::CreateInteractionResponse::Autocomplete(
            choices.iter().fold(sy::CreateAutocompleteResponse::new(), |resp, choice| {
                resp.add_string_choice(choice.name.as_str(), choice.value.as_str())
            }),
        ),
    }
}

/// Discord snowflakes are never zero; serenity id constructors panic on it.
pub fn nonzero(id: u64, what: &str) -> Result<u64> {
    if id == 0 {
        return Err(DbotError::Api(format!("{} id must not be zero", what)));
    }
    Ok(id)
}
