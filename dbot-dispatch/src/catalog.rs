//! Remote command catalog sync: delete everything, then create every locally registered definition.
//!
//! `register` and `unregister` share one async mutex, so at most one sync runs at a time and
//! later callers wait. Per-command failures are logged and the remaining commands still run.

use std::sync::Arc;

use dbot_core::{CommandDefinition, CommandScope, RegisteredCommand, Session};
use tokio::sync::Mutex;
use tracing::{error, info};

/// Names of the commands a sync created or deleted, and of those that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

impl CatalogReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Tracks the commands this process registered in one scope.
pub struct CommandCatalog {
    session: Arc<dyn Session>,
    scope: CommandScope,
    registered: Mutex<Vec<RegisteredCommand>>,
    in_flight: Mutex<()>,
}

impl CommandCatalog {
    pub fn new(session: Arc<dyn Session>, scope: CommandScope) -> Self {
        Self {
            session,
            scope,
            registered: Mutex::new(Vec::new()),
            in_flight: Mutex::new(()),
        }
    }

    pub fn scope(&self) -> CommandScope {
        self.scope
    }

    /// Snapshot of the commands created by the last `register`.
    pub async fn registered_commands(&self) -> Vec<RegisteredCommand> {
        self.registered.lock().await.clone()
    }

    /// Unregisters stale commands, then creates one remote command per definition.
    /// The report covers the creations only.
    pub async fn register(&self, definitions: &[Arc<CommandDefinition>]) -> CatalogReport {
        let _guard = self.in_flight.lock().await;
        self.unregister_locked().await;

        info!(scope = %self.scope, count = definitions.len(), "Registering slash commands");
        let mut report = CatalogReport::default();
        for definition in definitions {
            match self.session.create_remote_command(self.scope, definition).await {
                Ok(command) => {
                    info!(
                        command = %command.name,
                        command_id = %command.id,
                        "Registered slash command"
                    );
                    report.succeeded.push(command.name.clone());
                    self.registered.lock().await.push(command);
                }
                Err(e) => {
                    error!(error = %e, command = %definition.name, "Cannot create command");
                    report.failed.push(definition.name.clone());
                }
            }
        }
        report
    }

    /// Deletes the tracked commands; with nothing tracked, deletes the whole remote catalog for
    /// the scope.
    pub async fn unregister(&self) -> CatalogReport {
        let _guard = self.in_flight.lock().await;
        self.unregister_locked().await
    }

    async fn unregister_locked(&self) -> CatalogReport {
        info!(scope = %self.scope, "Unregistering slash commands");
        let mut report = CatalogReport::default();

        let mut targets = std::mem::take(&mut *self.registered.lock().await);
        if targets.is_empty() {
            targets = match self.session.list_remote_commands(self.scope).await {
                Ok(commands) => commands,
                Err(e) => {
                    error!(error = %e, scope = %self.scope, "Could not fetch registered commands");
                    return report;
                }
            };
        }

        for command in targets {
            match self.session.delete_remote_command(self.scope, command.id).await {
                Ok(()) => {
                    info!(
                        command = %command.name,
                        command_id = %command.id,
                        "Unregistered slash command"
                    );
                    report.succeeded.push(command.name);
                }
                Err(e) => {
                    error!(
                        error = %e,
                        command = %command.name,
                        command_id = %command.id,
                        "Cannot delete command"
                    );
                    report.failed.push(command.name);
                }
            }
        }
        report
    }
}
