//! # dbot-cli
//!
//! CLI foundation: argument parsing, config loading and the sample [`GeneralModule`].

pub mod cli;
pub mod general;

pub use cli::{load_config, Cli, Commands};
pub use dbot_dispatch::BotConfig;
pub use general::GeneralModule;
