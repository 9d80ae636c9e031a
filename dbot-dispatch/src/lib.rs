//! # dbot-dispatch
//!
//! Command dispatch on top of a [`dbot_core::Session`]: a handler [`Registry`] for text commands,
//! slash commands and interaction actions; routers for each event kind; [`CommandCatalog`] to
//! keep the remote slash command catalog in sync; and [`MessageLifecycle`] for self-deleting
//! messages. [`DiscordBot`] composes them.

pub mod bot;
pub mod catalog;
mod command_router;
pub mod config;
pub mod handler;
pub mod interaction_router;
pub mod lifecycle;
pub mod module;
pub mod registry;
pub mod stats;
pub mod text_router;

pub use bot::DiscordBot;
pub use catalog::{CatalogReport, CommandCatalog};
pub use config::BotConfig;
pub use handler::{InteractionHandler, SlashCommandHandler, TextCommandHandler};
pub use interaction_router::routing_key;
pub use lifecycle::{
    DeletionHandle, DeletionScheduler, MessageLifecycle, ScheduledDeletion, TokioDeletionScheduler,
};
pub use module::Module;
pub use registry::Registry;
pub use stats::{RouteOutcome, StatsSnapshot, TextOutcome};
pub use text_router::UNKNOWN_COMMAND_RESPONSE;
