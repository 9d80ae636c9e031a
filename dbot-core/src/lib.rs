//! # dbot-core
//!
//! Core types and traits for the Discord bot: snowflake ids, [`Message`], [`Interaction`],
//! [`Embed`], [`CommandDefinition`], the [`Session`] collaborator and its [`EventListener`]
//! callbacks, and tracing initialization. Transport-agnostic; used by dbot-dispatch and
//! dbot-discord.

pub mod error;
pub mod logger;
pub mod session;
pub mod types;

pub use error::{DbotError, Result};
pub use logger::init_tracing;
pub use session::{EventListener, Session};
pub use types::{
    action_key, AutocompleteChoice, ChannelId, CommandDefinition, CommandId, CommandOption,
    CommandScope, Embed, EmbedField, GuildId, Interaction, InteractionKind, InteractionResponse,
    InteractionValue, Message, MessageId, OptionKind, RegisteredCommand, User, UserId,
    ACTION_SEPARATOR, ZERO_WIDTH_SPACE,
};
