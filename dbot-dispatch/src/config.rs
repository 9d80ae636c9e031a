//! Bot options. Loaded from env: DISCORD_TOKEN (required), DISCORD_GUILD_ID, DISCORD_INTENTS,
//! COMMAND_PREFIX, COMMAND_DELETION_TIMEOUT_SECS, COMMAND_RESPONSE_TIMEOUT_SECS,
//! REGISTER_SLASH_COMMANDS, UNREGISTER_SLASH_COMMANDS, LOG_FILE.

use std::env;
use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use dbot_core::{CommandScope, GuildId};

/// Guild messages, direct messages and message content.
pub const DEFAULT_INTENTS: u64 = (1 << 9) | (1 << 12) | (1 << 15);

pub const DEFAULT_PREFIX: &str = "!";

#[derive(Clone)]
pub struct BotConfig {
    /// DISCORD_TOKEN
    pub token: String,
    /// DISCORD_GUILD_ID; empty registers commands globally
    pub guild_id: String,
    /// DISCORD_INTENTS, gateway intent bits
    pub intents: u64,
    /// COMMAND_PREFIX for text commands, e.g. "!"
    pub command_prefix: String,
    /// Delay before deleting a user's command message; zero keeps it
    pub deletion_timeout: Duration,
    /// Delay before deleting the bot's replies; zero keeps them
    pub response_timeout: Duration,
    /// Re-register slash commands when the bot starts
    pub register_commands: bool,
    /// Unregister slash commands on start (when not registering) and on stop
    pub unregister_commands: bool,
    /// LOG_FILE
    pub log_file: Option<String>,
}

impl BotConfig {
    /// Defaults with the given token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            guild_id: String::new(),
            intents: DEFAULT_INTENTS,
            command_prefix: DEFAULT_PREFIX.to_string(),
            deletion_timeout: Duration::ZERO,
            response_timeout: Duration::ZERO,
            register_commands: false,
            unregister_commands: false,
            log_file: None,
        }
    }

    /// Loads from the environment. `token` overrides DISCORD_TOKEN if provided.
    pub fn from_env(token: Option<String>) -> Result<Self> {
        let token = match token {
            Some(token) => token,
            None => env::var("DISCORD_TOKEN").context("DISCORD_TOKEN not set")?,
        };
        let mut config = Self::with_token(token);

        config.guild_id = env::var("DISCORD_GUILD_ID").unwrap_or_default();
        if let Ok(intents) = env::var("DISCORD_INTENTS") {
            config.intents = intents
                .trim()
                .parse()
                .with_context(|| format!("DISCORD_INTENTS is not a number: {}", intents))?;
        }
        if let Ok(prefix) = env::var("COMMAND_PREFIX") {
            config.command_prefix = prefix;
        }
        config.deletion_timeout = secs_from_env("COMMAND_DELETION_TIMEOUT_SECS")?;
        config.response_timeout = secs_from_env("COMMAND_RESPONSE_TIMEOUT_SECS")?;
        config.register_commands = bool_from_env("REGISTER_SLASH_COMMANDS");
        config.unregister_commands = bool_from_env("UNREGISTER_SLASH_COMMANDS");
        config.log_file = env::var("LOG_FILE").ok().filter(|s| !s.is_empty());

        Ok(config)
    }

    /// Rejects an empty token or prefix and a non-numeric guild id.
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            anyhow::bail!("DISCORD_TOKEN is empty");
        }
        if self.command_prefix.is_empty() {
            anyhow::bail!("COMMAND_PREFIX is empty; every message would be treated as a command");
        }
        self.scope()?;
        Ok(())
    }

    /// Global scope when no guild id is configured.
    pub fn scope(&self) -> Result<CommandScope> {
        let guild_id = self.guild_id.trim();
        if guild_id.is_empty() {
            return Ok(CommandScope::Global);
        }
        let id: GuildId = guild_id
            .parse()
            .map_err(|_| anyhow::anyhow!("DISCORD_GUILD_ID is not a valid id: {}", guild_id))?;
        Ok(CommandScope::Guild(id))
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &mask_token(&self.token))
            .field("guild_id", &self.guild_id)
            .field("intents", &self.intents)
            .field("command_prefix", &self.command_prefix)
            .field("deletion_timeout", &self.deletion_timeout)
            .field("response_timeout", &self.response_timeout)
            .field("register_commands", &self.register_commands)
            .field("unregister_commands", &self.unregister_commands)
            .field("log_file", &self.log_file)
            .finish()
    }
}

/// Keeps the last four characters of a token.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

fn secs_from_env(key: &str) -> Result<Duration> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => {
            let secs: u64 = value
                .trim()
                .parse()
                .with_context(|| format!("{} is not a number of seconds: {}", key, value))?;
            Ok(Duration::from_secs(secs))
        }
        _ => Ok(Duration::ZERO),
    }
}

fn bool_from_env(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}
