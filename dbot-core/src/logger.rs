//! Tracing initialization: one fmt layer (level, target, thread ids, all fields) written to stdout,
//! tee'd to an append-mode log file when a path is given.

use std::fs::OpenOptions;
use std::io;
use std::sync::Arc;

use tracing_subscriber::{
    fmt::format::FmtSpan, fmt::writer::MakeWriterExt, layer::SubscriberExt,
    util::SubscriberInitExt, EnvFilter, Registry,
};

/// Installs the global tracing subscriber.
/// Level comes from `RUST_LOG` (default `info`); load `.env` before calling or it is not seen.
/// Fails if a global subscriber is already set or the log file cannot be opened.
pub fn init_tracing(log_file_path: Option<&str>) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file_path {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let writer = io::stdout.and(Arc::new(file));
            Registry::default()
                .with(env_filter)
                .with(fmt_layer().with_writer(writer))
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))
        }
        None => Registry::default()
            .with(env_filter)
            .with(fmt_layer().with_writer(io::stdout))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e)),
    }
}

fn fmt_layer<S>() -> tracing_subscriber::fmt::Layer<S> {
    tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_thread_ids(true)
        .with_level(true)
        .with_file(false)
        .with_line_number(false)
}
