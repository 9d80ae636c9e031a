//! Router outcomes and dispatch counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// What the text router did with one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextOutcome {
    /// Authored by the bot itself.
    IgnoredOwnMessage,
    /// Body does not start with the command prefix.
    IgnoredNoPrefix,
    Dispatched { alias: String },
    /// Prefixed but no alias matched; the unknown-command response was sent.
    Unknown { alias: String },
}

/// What the structured-command or interaction router did with one interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Dispatched { key: String },
    /// No handler bound to the key; dropped silently.
    Unmatched { key: String },
    /// The interaction subtype belongs to the other router.
    NotApplicable,
}

/// Counters for dispatched and dropped events.
#[derive(Debug, Default)]
pub struct DispatchStats {
    text_dispatched: AtomicU64,
    text_unknown: AtomicU64,
    commands_dispatched: AtomicU64,
    commands_unmatched: AtomicU64,
    interactions_dispatched: AtomicU64,
    interactions_unmatched: AtomicU64,
}

/// Point-in-time copy of [`DispatchStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub text_dispatched: u64,
    pub text_unknown: u64,
    pub commands_dispatched: u64,
    pub commands_unmatched: u64,
    pub interactions_dispatched: u64,
    pub interactions_unmatched: u64,
}

impl DispatchStats {
    pub(crate) fn record_text(&self, outcome: &TextOutcome) {
        match outcome {
            TextOutcome::Dispatched { .. } => bump(&self.text_dispatched),
            TextOutcome::Unknown { .. } => bump(&self.text_unknown),
            TextOutcome::IgnoredOwnMessage | TextOutcome::IgnoredNoPrefix => {}
        }
    }

    pub(crate) fn record_command(&self, outcome: &RouteOutcome) {
        match outcome {
            RouteOutcome::Dispatched { .. } => bump(&self.commands_dispatched),
            RouteOutcome::Unmatched { .. } => bump(&self.commands_unmatched),
            RouteOutcome::NotApplicable => {}
        }
    }

    pub(crate) fn record_interaction(&self, outcome: &RouteOutcome) {
        match outcome {
            RouteOutcome::Dispatched { .. } => bump(&self.interactions_dispatched),
            RouteOutcome::Unmatched { .. } => bump(&self.interactions_unmatched),
            RouteOutcome::NotApplicable => {}
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            text_dispatched: self.text_dispatched.load(Ordering::Relaxed),
            text_unknown: self.text_unknown.load(Ordering::Relaxed),
            commands_dispatched: self.commands_dispatched.load(Ordering::Relaxed),
            commands_unmatched: self.commands_unmatched.load(Ordering::Relaxed),
            interactions_dispatched: self.interactions_dispatched.load(Ordering::Relaxed),
            interactions_unmatched: self.interactions_unmatched.load(Ordering::Relaxed),
        }
    }
}

fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}
