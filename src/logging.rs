//! Tracing subscriber bootstrap.
//!
//! Logs go to the file named by `DISCUSS_LOG` when set so they never interleave with the chat
//! transcript, and to stderr otherwise. `RUST_LOG` overrides the level chosen from
//! `DISCUSS_DEBUG`.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::EnvConfig;

pub fn default_level(config: &EnvConfig) -> &'static str {
    if config.debug {
        "debug"
    } else {
        "warn"
    }
}

pub fn env_filter(config: &EnvConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level(config)))
}

/// Installs the global subscriber. Fails only when the log file cannot be opened; a subscriber
/// installed earlier by the host is left in place.
pub fn init_logging(config: &EnvConfig) -> io::Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(config));
    let installed = match config.log_file.as_deref() {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
        }
        None => registry
            .with(fmt::layer().with_target(false).with_writer(io::stderr))
            .try_init(),
    };
    if installed.is_err() {
        tracing::debug!("global tracing subscriber already installed");
    }
    Ok(())
}
