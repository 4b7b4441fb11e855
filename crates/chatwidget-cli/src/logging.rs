//! Tracing setup for the CLI.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Where log lines go.
pub enum LogTarget<'a> {
    /// Human-readable lines on stderr.
    Stderr,
    /// Appended to a file (no ANSI colors).
    File(&'a Path),
}

/// Build the level filter; `RUST_LOG` overrides `default_directive`.
fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install the global subscriber.
pub fn init(target: LogTarget<'_>, default_directive: &str) -> std::io::Result<()> {
    let filter = env_filter(default_directive);

    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact()
                .try_init();
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
    }

    tracing::debug!("Tracing initialized");
    Ok(())
}
