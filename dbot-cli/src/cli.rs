//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dbot_dispatch::BotConfig;

#[derive(Parser)]
#[command(name = "dbot")]
#[command(about = "Discord Bot CLI", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the Discord bot (config from env; token can override DISCORD_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
}

/// Load BotConfig from environment. If `token` is provided it overrides DISCORD_TOKEN.
pub fn load_config(token: Option<String>) -> Result<BotConfig> {
    BotConfig::from_env(token)
}
