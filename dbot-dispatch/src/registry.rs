//! Dispatch registry: alias, command name and action key to handler.
//!
//! Each table sits behind its own async `RwLock`, so lookups from concurrent event callbacks only
//! contend with writes to the same table. Lookups clone the handler `Arc` and release the lock
//! before the handler runs.

use std::collections::HashMap;
use std::sync::Arc;

use dbot_core::{CommandDefinition, DbotError, Result, ACTION_SEPARATOR};
use tokio::sync::RwLock;

use crate::handler::{InteractionHandler, SlashCommandHandler, TextCommandHandler};

/// A structured command definition and the handler bound to its name.
#[derive(Clone)]
pub struct SlashEntry {
    pub definition: Arc<CommandDefinition>,
    pub handler: Arc<dyn SlashCommandHandler>,
}

/// Handler tables. Registration is insert-or-replace (last write wins); lookups never mutate.
#[derive(Default)]
pub struct Registry {
    text: RwLock<HashMap<String, Arc<dyn TextCommandHandler>>>,
    commands: RwLock<HashMap<String, SlashEntry>>,
    actions: RwLock<HashMap<String, Arc<dyn InteractionHandler>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a text alias (stored lowercase). Returns true if an earlier handler was replaced.
    pub async fn register_text(
        &self,
        alias: &str,
        handler: Arc<dyn TextCommandHandler>,
    ) -> Result<bool> {
        if alias.is_empty() {
            return Err(DbotError::InvalidKey("text command alias is empty".to_string()));
        }
        let replaced = self.text.write().await.insert(alias.to_lowercase(), handler);
        Ok(replaced.is_some())
    }

    /// Binds a structured command by its definition's `name`. Returns true if an earlier handler
    /// was replaced.
    pub async fn register_command(
        &self,
        definition: Arc<CommandDefinition>,
        handler: Arc<dyn SlashCommandHandler>,
    ) -> Result<bool> {
        if definition.name.is_empty() {
            return Err(DbotError::InvalidKey("command name is empty".to_string()));
        }
        let name = definition.name.clone();
        let replaced = self
            .commands
            .write()
            .await
            .insert(name, SlashEntry { definition, handler });
        Ok(replaced.is_some())
    }

    /// Binds an interaction action key. Keys must be non-empty and must not contain `:`.
    pub async fn register_action(
        &self,
        key: &str,
        handler: Arc<dyn InteractionHandler>,
    ) -> Result<bool> {
        if key.is_empty() {
            return Err(DbotError::InvalidKey("action key is empty".to_string()));
        }
        if key.contains(ACTION_SEPARATOR) {
            return Err(DbotError::InvalidKey(format!(
                "action key `{}` contains '{}'",
                key, ACTION_SEPARATOR
            )));
        }
        let replaced = self.actions.write().await.insert(key.to_string(), handler);
        Ok(replaced.is_some())
    }

    /// Case-insensitive lookup of a text alias.
    pub async fn lookup_text(&self, token: &str) -> Option<Arc<dyn TextCommandHandler>> {
        self.text.read().await.get(&token.to_lowercase()).cloned()
    }

    pub async fn lookup_command(&self, name: &str) -> Option<Arc<dyn SlashCommandHandler>> {
        self.commands.read().await.get(name).map(|entry| entry.handler.clone())
    }

    pub async fn lookup_action(&self, key: &str) -> Option<Arc<dyn InteractionHandler>> {
        self.actions.read().await.get(key).cloned()
    }

    /// Registered command definitions, ordered by name.
    pub async fn command_definitions(&self) -> Vec<Arc<CommandDefinition>> {
        let mut definitions: Vec<_> = self
            .commands
            .read()
            .await
            .values()
            .map(|entry| entry.definition.clone())
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Registered text aliases, sorted.
    pub async fn text_aliases(&self) -> Vec<String> {
        let mut aliases: Vec<_> = self.text.read().await.keys().cloned().collect();
        aliases.sort();
        aliases
    }

    pub async fn action_keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.actions.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::DiscordBot;
    use async_trait::async_trait;
    use dbot_core::{Interaction, Message};

    struct Noop;

    #[async_trait]
    impl TextCommandHandler for Noop {
        async fn handle(
            &self,
            _bot: &DiscordBot,
            _message: &Message,
            _args: &[String],
        ) -> Result<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl SlashCommandHandler for Noop {
        async fn handle(&self, _bot: &DiscordBot, _interaction: &Interaction) -> Result<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl InteractionHandler for Noop {
        async fn handle(&self, _bot: &DiscordBot, _interaction: &Interaction) -> Result<()> {
            Ok(())
        }
    }

    /// **Test: text aliases are stored lowercase and matched case-insensitively.**
    #[tokio::test]
    async fn test_text_lookup_is_case_insensitive() {
        let registry = Registry::new();
        registry.register_text("!Help", Arc::new(Noop)).await.unwrap();

        assert!(registry.lookup_text("!help").await.is_some());
        assert!(registry.lookup_text("!HELP").await.is_some());
        assert!(registry.lookup_text("!info").await.is_none());
        assert_eq!(registry.text_aliases().await, vec!["!help".to_string()]);
    }

    fn same<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
        Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
    }

    /// **Test: re-registering an alias replaces the handler; only one entry remains.**
    #[tokio::test]
    async fn test_text_reregistration_replaces() {
        let registry = Registry::new();
        let first: Arc<dyn TextCommandHandler> = Arc::new(Noop);
        let second: Arc<dyn TextCommandHandler> = Arc::new(Noop);
        assert!(!registry.register_text("!help", first.clone()).await.unwrap());
        assert!(registry.register_text("!HELP", second.clone()).await.unwrap());

        assert_eq!(registry.text_aliases().await.len(), 1);
        let found = registry.lookup_text("!help").await.unwrap();
        assert!(same(&found, &second));
        assert!(!same(&found, &first));
    }

    /// **Test: command lookup is by definition name and case-sensitive; re-registration keeps one
    /// entry.**
    #[tokio::test]
    async fn test_command_keyed_by_name() {
        let registry = Registry::new();
        let first = Arc::new(CommandDefinition::new("info", "Get Bot Info"));
        let second = Arc::new(CommandDefinition::new("info", "Bot information"));
        registry.register_command(first, Arc::new(Noop)).await.unwrap();
        assert!(registry.register_command(second, Arc::new(Noop)).await.unwrap());

        assert!(registry.lookup_command("info").await.is_some());
        assert!(registry.lookup_command("Info").await.is_none());
        let definitions = registry.command_definitions().await;
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].description, "Bot information");
    }

    #[tokio::test]
    async fn test_command_definitions_sorted() {
        let registry = Registry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry
                .register_command(Arc::new(CommandDefinition::new(name, "d")), Arc::new(Noop))
                .await
                .unwrap();
        }
        let names: Vec<_> = registry
            .command_definitions()
            .await
            .iter()
            .map(|d| d.name.clone())
            .collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    /// **Test: empty keys and action keys containing ':' are rejected.**
    #[tokio::test]
    async fn test_invalid_keys_rejected() {
        let registry = Registry::new();
        assert!(registry.register_text("", Arc::new(Noop)).await.is_err());
        assert!(registry.register_action("", Arc::new(Noop)).await.is_err());
        assert!(registry.register_action("confirm:1", Arc::new(Noop)).await.is_err());
        assert!(registry
            .register_command(Arc::new(CommandDefinition::new("", "d")), Arc::new(Noop))
            .await
            .is_err());
        assert!(registry.action_keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_action_lookup_is_case_sensitive() {
        let registry = Registry::new();
        registry.register_action("confirm", Arc::new(Noop)).await.unwrap();
        assert!(registry.lookup_action("confirm").await.is_some());
        assert!(registry.lookup_action("Confirm").await.is_none());
    }
}
