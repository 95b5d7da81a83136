//! Result and error types for Pomar.

use thiserror::Error;

/// Result type for Pomar operations
pub type PomarResult<T> = Result<T, PomarError>;

/// Errors that can occur while driving a suite
#[derive(Debug, Error)]
pub enum PomarError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Page never reached network idle within the navigation timeout
    #[error("Navigation to {url} timed out after {ms}ms")]
    NavigationTimeout {
        /// URL being loaded
        url: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Element never appeared
    #[error(
        "Element {selector} not found after {ms}ms{}",
        .last_error.as_ref().map_or_else(String::new, |e| format!(" (last error: {e})"))
    )]
    ElementNotFound {
        /// Selector that was waited on
        selector: String,
        /// Timeout in milliseconds
        ms: u64,
        /// Last session error seen while polling
        last_error: Option<String>,
    },

    /// Element is attached but not visible
    #[error("Element {selector} is not visible")]
    ElementNotVisible {
        /// Selector of the hidden element
        selector: String,
    },

    /// Normal and forced activation both failed
    #[error("Click on {selector} failed: {message}")]
    ClickFailed {
        /// Selector that was clicked
        selector: String,
        /// Underlying cause
        message: String,
    },

    /// Assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// A fixture could not build its composite
    #[error("Fixture '{fixture}' setup failed: {source}")]
    SetupFailure {
        /// Fixture name
        fixture: String,
        /// Error raised by the failing step
        #[source]
        source: Box<PomarError>,
    },

    /// Page object looked up a key it never registered
    #[error("Page '{page}' has no locator named '{key}'")]
    UnknownLocator {
        /// Page name
        page: String,
        /// Missing key
        key: String,
    },

    /// Operation timed out
    #[error("Operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Browser session failure
    #[error("Browser session error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// HTTP response carried an unexpected status code
    #[error("{method} {url} returned {actual}, expected {expected}: {body}")]
    UnexpectedStatus {
        /// HTTP method
        method: String,
        /// Request URL
        url: String,
        /// Expected status
        expected: u16,
        /// Actual status
        actual: u16,
        /// Response body
        body: String,
    },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PomarError {
    /// Create a session error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Wrap an error raised while a fixture was being set up
    #[must_use]
    pub fn setup_failure(fixture: impl Into<String>, source: Self) -> Self {
        Self::SetupFailure {
            fixture: fixture.into(),
            source: Box::new(source),
        }
    }

    /// The error that started a chain of fixture failures.
    ///
    /// Nested fixtures wrap each other's errors; this walks down to the
    /// step that actually failed.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        let mut current = self;
        while let Self::SetupFailure { source, .. } = current {
            current = source;
        }
        current
    }

    /// Whether the error means "the element is not there"
    #[must_use]
    pub fn is_absence(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::ElementNotFound { .. } | Self::ElementNotVisible { .. }
        )
    }

    /// Whether the error is any kind of timeout
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::Timeout { .. } | Self::NavigationTimeout { .. } | Self::ElementNotFound { .. }
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_navigation_timeout_message() {
        let err = PomarError::NavigationTimeout {
            url: "https://example.test/".to_string(),
            ms: 500,
        };
        assert_eq!(
            err.to_string(),
            "Navigation to https://example.test/ timed out after 500ms"
        );
    }

    #[test]
    fn test_root_cause_walks_nested_setup_failures() {
        let inner = PomarError::ElementNotFound {
            selector: "#submit".to_string(),
            ms: 100,
            last_error: None,
        };
        let err = PomarError::setup_failure(
            "authenticated-user-with-contacts",
            PomarError::setup_failure("authenticated-user", inner),
        );
        assert!(matches!(
            err.root_cause(),
            PomarError::ElementNotFound { selector, .. } if selector == "#submit"
        ));
        assert!(err.is_absence());
    }

    #[test]
    fn test_setup_failure_exposes_source() {
        let err = PomarError::setup_failure("login", PomarError::assertion("bad"));
        let source = err.source().expect("source");
        assert!(source.to_string().contains("bad"));
        assert!(err.to_string().contains("Fixture 'login' setup failed"));
    }

    #[test]
    fn test_timeout_classification() {
        assert!(PomarError::Timeout { ms: 1 }.is_timeout());
        assert!(!PomarError::assertion("x").is_timeout());
        assert!(!PomarError::driver("closed").is_absence());
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: PomarError = io_err.into();
        assert!(err.to_string().contains("I/O"));
    }
}
