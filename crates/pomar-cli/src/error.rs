//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// No suite with that name in the catalog
    #[error("Unknown suite '{name}' (run `pomador list` to see the catalog)")]
    UnknownSuite {
        /// Requested name
        name: String,
    },

    /// Some scenarios failed
    #[error("{failed} of {total} scenario(s) failed")]
    TestFailures {
        /// Failed scenarios
        failed: usize,
        /// Scenarios run
        total: usize,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Pomar library error
    #[error("Pomar error: {0}")]
    Pomar(#[from] pomar::PomarError),

    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an unknown-suite error
    #[must_use]
    pub fn unknown_suite(name: impl Into<String>) -> Self {
        Self::UnknownSuite { name: name.into() }
    }

    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Process exit code: 1 for failing scenarios, 2 for everything else
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::TestFailures { .. } => 1,
            _ => 2,
        }
    }
}
