//! Core types: snowflake ids, users, messages, embeds, command definitions and interactions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DbotError;

/// Placeholder sent instead of empty bodies and embed fields, which the remote API rejects.
pub const ZERO_WIDTH_SPACE: &str = "\u{200B}";

/// Separator between the action key and the id in a composite custom id (`"confirm:42"`).
pub const ACTION_SEPARATOR: char = ':';

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = DbotError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<u64>().map($name).map_err(|_| {
                    DbotError::Config(format!("Invalid {}: {}", stringify!($name), s))
                })
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                $name(id)
            }
        }
    };
}

snowflake!(
    /// Text channel (guild channel or DM).
    ChannelId
);
snowflake!(
    /// Message within a channel.
    MessageId
);
snowflake!(UserId);
snowflake!(
    /// Guild (server); used as the command registration scope.
    GuildId
);
snowflake!(
    /// Platform-assigned id of a registered structured command.
    CommandId
);

/// User identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub bot: bool,
}

/// Inbound chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub guild_id: Option<GuildId>,
    pub author: User,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// One name/value row of an [`Embed`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}

/// Structured rich message payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: Option<u32>,
    pub fields: Vec<EmbedField>,
    pub footer: Option<String>,
}

impl Embed {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        inline: bool,
    ) -> Self {
        self.fields.push(EmbedField::new(name, value, inline));
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}

/// Type of a structured command parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionKind {
    String,
    Integer,
    Boolean,
    User,
    Channel,
    Number,
}

/// One parameter of a [`CommandDefinition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOption {
    pub name: String,
    pub description: String,
    pub kind: OptionKind,
    pub required: bool,
    pub autocomplete: bool,
}

/// Application-supplied descriptor of a structured (slash) command. Routed by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDefinition {
    pub name: String,
    pub description: String,
    pub options: Vec<CommandOption>,
}

impl CommandDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    pub fn option(
        mut self,
        kind: OptionKind,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        self.options.push(CommandOption {
            name: name.into(),
            description: description.into(),
            kind,
            required,
            autocomplete: false,
        });
        self
    }

    /// Adds a required string parameter whose values are suggested through autocomplete.
    pub fn autocomplete_option(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.options.push(CommandOption {
            name: name.into(),
            description: description.into(),
            kind: OptionKind::String,
            required: true,
            autocomplete: true,
        });
        self
    }
}

/// Remote identity of a command after registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredCommand {
    pub id: CommandId,
    pub name: String,
}

/// Registration boundary for structured commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandScope {
    Global,
    Guild(GuildId),
}

impl fmt::Display for CommandScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandScope::Global => write!(f, "global"),
            CommandScope::Guild(id) => write!(f, "guild:{}", id),
        }
    }
}

/// Name/value of a submitted command option or modal field, stringified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionValue {
    pub name: String,
    pub value: String,
    /// Set on the option the user is currently typing in an autocomplete request.
    pub focused: bool,
}

impl InteractionValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            focused: false,
        }
    }
}

/// Subtype and payload of an [`Interaction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionKind {
    /// Structured command invocation.
    Command {
        name: String,
        options: Vec<InteractionValue>,
    },
    /// Button click or select-menu choice.
    Component {
        custom_id: String,
        values: Vec<String>,
    },
    /// Form submission.
    ModalSubmit {
        custom_id: String,
        fields: Vec<InteractionValue>,
    },
    /// Option suggestions requested while typing a structured command.
    Autocomplete {
        name: String,
        options: Vec<InteractionValue>,
    },
}

/// Inbound interaction event. `id` and `token` identify it for
/// [`crate::Session::respond_to_interaction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: u64,
    pub token: String,
    pub channel_id: Option<ChannelId>,
    pub guild_id: Option<GuildId>,
    pub user: User,
    pub kind: InteractionKind,
}

impl Interaction {
    /// Value of the named command option or modal field, if submitted.
    pub fn value(&self, name: &str) -> Option<&str> {
        let values = match &self.kind {
            InteractionKind::Command { options, .. }
            | InteractionKind::Autocomplete { options, .. } => options,
            InteractionKind::ModalSubmit { fields, .. } => fields,
            InteractionKind::Component { .. } => return None,
        };
        values.iter().find(|v| v.name == name).map(|v| v.value.as_str())
    }

    /// Id part of a composite custom id (`"42"` for `"confirm:42"`); None without a separator.
    pub fn custom_id_suffix(&self) -> Option<&str> {
        match &self.kind {
            InteractionKind::Component { custom_id, .. }
            | InteractionKind::ModalSubmit { custom_id, .. } => {
                custom_id.split_once(ACTION_SEPARATOR).map(|(_, rest)| rest)
            }
            _ => None,
        }
    }
}

/// Substring of a composite custom id before the first `:`; the whole id when there is no
/// separator.
pub fn action_key(custom_id: &str) -> &str {
    custom_id
        .split_once(ACTION_SEPARATOR)
        .map(|(key, _)| key)
        .unwrap_or(custom_id)
}

/// One suggestion in an autocomplete response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteChoice {
    pub name: String,
    pub value: String,
}

/// Reply to an [`Interaction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionResponse {
    Message { content: String, ephemeral: bool },
    Embed { embed: Embed, ephemeral: bool },
    /// Acknowledge a component interaction without changing the message.
    DeferredUpdate,
    Autocomplete(Vec<AutocompleteChoice>),
}

impl InteractionResponse {
    pub fn message(content: impl Into<String>) -> Self {
        Self::Message {
            content: content.into(),
            ephemeral: false,
        }
    }

    /// Message visible only to the invoking user.
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self::Message {
            content: content.into(),
            ephemeral: true,
        }
    }
}
