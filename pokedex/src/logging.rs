//! File-backed tracing setup.
//!
//! The terminal belongs to the UI, so log lines go to a file. Without a log
//! file no subscriber is installed and `tracing` macros are no-ops.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Install a subscriber appending to `path`. `RUST_LOG` wins over `level`.
pub fn init(path: &Path, level: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let fmt_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_target(true)
        .with_thread_names(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init()
        .map_err(|err| io::Error::other(format!("logger init failed: {err}")))?;

    tracing::info!(path = %path.display(), "logging started");
    Ok(())
}
