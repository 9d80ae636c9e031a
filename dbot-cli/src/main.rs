//! dbot CLI: run the Discord bot. Config from env (.env supported) and optional CLI args.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use dbot_cli::{load_config, Cli, Commands, GeneralModule};
use dbot_core::init_tracing;
use dbot_discord::{run_until_ctrl_c, SerenitySession};
use dbot_dispatch::DiscordBot;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = load_config(token)?;
            init_tracing(config.log_file.as_deref())?;
            info!(config = ?config, "Configuration loaded");

            let session = Arc::new(SerenitySession::from_config(&config));
            let module = GeneralModule::new(&config.command_prefix);
            let bot = DiscordBot::new(session, config)?;
            bot.load_module(&module).await;

            run_until_ctrl_c(&bot).await
        }
    }
}
