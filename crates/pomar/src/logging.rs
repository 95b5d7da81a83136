//! Logging setup.
//!
//! Library code only emits `tracing` events; binaries call [`init`] once to
//! install a subscriber. `RUST_LOG` wins over the level passed in.

use std::str::FromStr;
use tracing_subscriber::EnvFilter;

use crate::result::{PomarError, PomarResult};

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = PomarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(PomarError::config(format!("unknown log format '{other}'"))),
        }
    }
}

/// Default filter for a verbosity count (`-v`, `-vv`, ...); `quiet` wins
#[must_use]
pub fn filter_for_verbosity(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info,pomar=info",
        (false, 2) => "info,pomar=debug",
        _ => "debug,pomar=trace",
    }
}

/// Install the global subscriber, writing to stderr.
///
/// # Errors
///
/// Returns [`PomarError::Config`] if a subscriber is already installed.
pub fn init(default_filter: &str, format: LogFormat) -> PomarResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| PomarError::config(format!("logging already initialised: {e}")))
}
