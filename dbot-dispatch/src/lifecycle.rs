//! Expiring messages: one-shot, best-effort deletion of a message after a timeout.
//!
//! A [`ScheduledDeletion`] is handed to a [`DeletionScheduler`]; [`TokioDeletionScheduler`] arms an
//! in-memory timer task. Pending deletions are not persisted and are not awaited at shutdown.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dbot_core::{ChannelId, Embed, MessageId, Result, Session, ZERO_WIDTH_SPACE};
use tokio::sync::oneshot;
use tracing::{debug, error, info};

/// A message to delete once `delay` has elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledDeletion {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub delay: Duration,
    /// Wall-clock time the deletion is due.
    pub fire_at: DateTime<Utc>,
    /// Content or embed title of the message, for log context.
    pub label: Option<String>,
}

impl ScheduledDeletion {
    pub fn new(channel_id: ChannelId, message_id: MessageId, delay: Duration) -> Self {
        let fire_at = chrono::Duration::from_std(delay)
            .ok()
            .and_then(|d| Utc::now().checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            channel_id,
            message_id,
            delay,
            fire_at,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Cancels a pending deletion. Dropping the handle leaves the deletion armed.
#[derive(Debug)]
pub struct DeletionHandle {
    deletion: ScheduledDeletion,
    cancel: oneshot::Sender<()>,
}

impl DeletionHandle {
    pub fn new(deletion: ScheduledDeletion, cancel: oneshot::Sender<()>) -> Self {
        Self { deletion, cancel }
    }

    pub fn deletion(&self) -> &ScheduledDeletion {
        &self.deletion
    }

    /// Cancels the deletion. Returns false if the timer already fired.
    pub fn cancel(self) -> bool {
        self.cancel.send(()).is_ok()
    }
}

/// Arms deletion timers.
pub trait DeletionScheduler: Send + Sync {
    fn schedule(&self, session: Arc<dyn Session>, deletion: ScheduledDeletion) -> DeletionHandle;
}

/// In-memory scheduler: one tokio task per deletion. Requires a running tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioDeletionScheduler;

impl DeletionScheduler for TokioDeletionScheduler {
    fn schedule(&self, session: Arc<dyn Session>, deletion: ScheduledDeletion) -> DeletionHandle {
        let (cancel_tx, mut cancel_rx) = oneshot::channel();
        let pending = deletion.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(pending.delay) => {}
                // A dropped handle yields Err, which leaves only the sleep branch.
                Ok(()) = &mut cancel_rx => {
                    debug!(
                        channel_id = %pending.channel_id,
                        message_id = %pending.message_id,
                        "Scheduled deletion cancelled"
                    );
                    return;
                }
            }
            drop(cancel_rx);

            match session.delete_message(pending.channel_id, pending.message_id).await {
                Ok(()) => debug!(
                    channel_id = %pending.channel_id,
                    message_id = %pending.message_id,
                    "Expired message deleted"
                ),
                Err(e) => error!(
                    error = %e,
                    channel_id = %pending.channel_id,
                    message_id = %pending.message_id,
                    label = ?pending.label,
                    "Error deleting message"
                ),
            }
        });

        DeletionHandle::new(deletion, cancel_tx)
    }
}

/// Replaces empty content with a zero-width placeholder.
pub fn normalize_content(content: &str) -> &str {
    if content.is_empty() {
        ZERO_WIDTH_SPACE
    } else {
        content
    }
}

/// Replaces empty field names/values with the placeholder; an embed with no title, description or
/// fields gets a placeholder description.
pub fn normalize_embed(mut embed: Embed) -> Embed {
    for field in &mut embed.fields {
        if field.name.is_empty() {
            field.name = ZERO_WIDTH_SPACE.to_string();
        }
        if field.value.is_empty() {
            field.value = ZERO_WIDTH_SPACE.to_string();
        }
    }
    if embed.title.is_empty() && embed.description.is_empty() && embed.fields.is_empty() {
        embed.description = ZERO_WIDTH_SPACE.to_string();
    }
    embed
}

/// Sends messages that delete themselves and schedules deletion of existing ones.
#[derive(Clone)]
pub struct MessageLifecycle {
    session: Arc<dyn Session>,
    scheduler: Arc<dyn DeletionScheduler>,
}

impl MessageLifecycle {
    pub fn new(session: Arc<dyn Session>) -> Self {
        Self::with_scheduler(session, Arc::new(TokioDeletionScheduler))
    }

    pub fn with_scheduler(
        session: Arc<dyn Session>,
        scheduler: Arc<dyn DeletionScheduler>,
    ) -> Self {
        Self { session, scheduler }
    }

    /// Deletes the message after `timeout`. Zero timeout is a no-op and returns None.
    pub fn schedule_deletion(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        timeout: Duration,
    ) -> Option<DeletionHandle> {
        self.schedule(ScheduledDeletion::new(channel_id, message_id, timeout))
    }

    fn schedule(&self, deletion: ScheduledDeletion) -> Option<DeletionHandle> {
        if deletion.delay.is_zero() {
            return None;
        }
        debug!(
            channel_id = %deletion.channel_id,
            message_id = %deletion.message_id,
            fire_at = %deletion.fire_at,
            "Deletion scheduled"
        );
        Some(self.scheduler.schedule(self.session.clone(), deletion))
    }

    /// Sends `content` (placeholder if empty) and deletes it after `timeout`.
    /// A failed send is logged and returned; no timer is armed.
    pub async fn send_with_expiry(
        &self,
        channel_id: ChannelId,
        content: &str,
        timeout: Duration,
    ) -> Result<MessageId> {
        let message_id = self
            .session
            .send_message(channel_id, normalize_content(content))
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    channel_id = %channel_id,
                    msg = %content,
                    "Error sending message"
                );
                e
            })?;
        info!(channel_id = %channel_id, message_id = %message_id, "Message sent");

        self.schedule(ScheduledDeletion::new(channel_id, message_id, timeout).with_label(content));
        Ok(message_id)
    }

    /// Sends a normalized embed and deletes it after `timeout`.
    pub async fn send_embed_with_expiry(
        &self,
        channel_id: ChannelId,
        embed: Embed,
        timeout: Duration,
    ) -> Result<MessageId> {
        let title = embed.title.clone();
        let embed = normalize_embed(embed);
        let message_id = self
            .session
            .send_embed(channel_id, &embed)
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    channel_id = %channel_id,
                    title = %title,
                    "Error sending message embed"
                );
                e
            })?;
        info!(channel_id = %channel_id, message_id = %message_id, title = %title, "Embed sent");

        self.schedule(ScheduledDeletion::new(channel_id, message_id, timeout).with_label(title));
        Ok(message_id)
    }
}
