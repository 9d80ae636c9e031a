//! # dbot-discord
//!
//! Discord transport for the dispatch layer: type adapters between serenity and [`dbot_core`],
//! [`SerenitySession`] implementing [`dbot_core::Session`], and a Ctrl-C runner.
//! Handles only Discord connectivity; routing and lifecycle logic live in dbot-dispatch.

mod adapters;
mod runner;
mod session;

pub use adapters::{
    build_command, build_embed, build_response, DiscordInteractionWrapper, DiscordMessageWrapper,
    DiscordUserWrapper,
};
pub use runner::run_until_ctrl_c;
pub use session::SerenitySession;
