//! Assertions for scenario validation.
//!
//! [`Assertion`] checks plain values. The `expect_*` methods on
//! [`Driver`] re-read the page until the expectation holds or the assertion
//! timeout runs out, then fail with [`PomarError::AssertionFailed`] naming
//! the last value observed.

use regex::Regex;
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

use crate::locator::Locator;
use crate::page::Driver;
use crate::result::{PomarError, PomarResult};
use crate::wait::Deadline;

/// Result of an assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResult {
    /// Whether the assertion passed
    pub passed: bool,
    /// Human-readable message
    pub message: String,
}

impl AssertionResult {
    /// Create a passing assertion result
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    /// Create a failing assertion result
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }

    /// Convert into a scenario result
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::AssertionFailed`] when the assertion did not pass.
    pub fn check(self) -> PomarResult<()> {
        if self.passed {
            Ok(())
        } else {
            Err(PomarError::assertion(self.message))
        }
    }
}

/// Value assertions
#[derive(Debug, Clone, Copy)]
pub struct Assertion;

impl Assertion {
    /// Assert two values are equal
    #[must_use]
    pub fn equals<T: PartialEq + Debug + ?Sized>(expected: &T, actual: &T) -> AssertionResult {
        if expected == actual {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected {expected:?}, got {actual:?}"))
        }
    }

    /// Assert a string contains a substring
    #[must_use]
    pub fn contains(haystack: &str, needle: &str) -> AssertionResult {
        if haystack.contains(needle) {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected '{haystack}' to contain '{needle}'"))
        }
    }

    /// Assert a string matches a regular expression
    #[must_use]
    pub fn matches(value: &str, pattern: &Regex) -> AssertionResult {
        if pattern.is_match(value) {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected '{value}' to match /{pattern}/"))
        }
    }

    /// Assert a condition is true
    #[must_use]
    pub fn is_true(condition: bool, message: &str) -> AssertionResult {
        if condition {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(message)
        }
    }

    /// Assert a collection has expected length
    #[must_use]
    pub fn has_length<T>(collection: &[T], expected: usize) -> AssertionResult {
        if collection.len() == expected {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!(
                "expected length {expected}, got {}",
                collection.len()
            ))
        }
    }

    /// Assert an HTTP status code
    #[must_use]
    pub fn status(expected: u16, actual: u16) -> AssertionResult {
        if expected == actual {
            AssertionResult::pass()
        } else {
            AssertionResult::fail(format!("expected status {expected}, got {actual}"))
        }
    }
}

impl Driver<'_> {
    async fn retry_until<F, Fut>(&self, mut observe: F) -> PomarResult<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AssertionResult>,
    {
        let deadline = Deadline::new(self.timeouts().assertion, Duration::from_millis(50));
        loop {
            let result = observe().await;
            if result.passed {
                return Ok(());
            }
            if deadline.expired() {
                tracing::debug!(message = %result.message, "expectation failed");
                return result.check();
            }
            deadline.tick().await;
        }
    }

    /// Expect the element's trimmed text to equal `expected`
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::AssertionFailed`] after the assertion timeout.
    pub async fn expect_text(&self, locator: &Locator, expected: &str) -> PomarResult<()> {
        self.retry_until(|| async move {
            match self.session().text_content(locator.selector()).await {
                Ok(text) => Assertion::equals(expected, text.trim()),
                Err(err) => AssertionResult::fail(format!("{locator}: {err}")),
            }
        })
        .await
    }

    /// Expect the element's text to contain `needle`
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::AssertionFailed`] after the assertion timeout.
    pub async fn expect_contains(&self, locator: &Locator, needle: &str) -> PomarResult<()> {
        self.retry_until(|| async move {
            match self.session().text_content(locator.selector()).await {
                Ok(text) => Assertion::contains(&text, needle),
                Err(err) => AssertionResult::fail(format!("{locator}: {err}")),
            }
        })
        .await
    }

    /// Expect the element's text to match `pattern`
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::AssertionFailed`] after the assertion timeout.
    pub async fn expect_matches(&self, locator: &Locator, pattern: &Regex) -> PomarResult<()> {
        self.retry_until(|| async move {
            match self.session().text_content(locator.selector()).await {
                Ok(text) => Assertion::matches(text.trim(), pattern),
                Err(err) => AssertionResult::fail(format!("{locator}: {err}")),
            }
        })
        .await
    }

    /// Expect an input's value
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::AssertionFailed`] after the assertion timeout.
    pub async fn expect_value(&self, locator: &Locator, expected: &str) -> PomarResult<()> {
        self.retry_until(|| async move {
            match self.session().input_value(locator.selector()).await {
                Ok(value) => Assertion::equals(expected, value.as_str()),
                Err(err) => AssertionResult::fail(format!("{locator}: {err}")),
            }
        })
        .await
    }

    /// Expect the element to be visible
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::AssertionFailed`] after the assertion timeout.
    pub async fn expect_visible(&self, locator: &Locator) -> PomarResult<()> {
        self.retry_until(|| async move {
            let visible = self
                .session()
                .is_visible(locator.selector())
                .await
                .unwrap_or(false);
            Assertion::is_true(visible, &format!("expected {locator} to be visible"))
        })
        .await
    }

    /// Expect the element to be absent or hidden
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::AssertionFailed`] after the assertion timeout.
    pub async fn expect_hidden(&self, locator: &Locator) -> PomarResult<()> {
        self.retry_until(|| async move {
            let visible = self
                .session()
                .is_visible(locator.selector())
                .await
                .unwrap_or(false);
            Assertion::is_true(!visible, &format!("expected {locator} to be hidden"))
        })
        .await
    }

    /// Expect exactly `expected` matches
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::AssertionFailed`] after the assertion timeout.
    pub async fn expect_count(&self, locator: &Locator, expected: usize) -> PomarResult<()> {
        self.retry_until(|| async move {
            match self.session().count(locator.selector()).await {
                Ok(count) if count == expected => AssertionResult::pass(),
                Ok(count) => {
                    AssertionResult::fail(format!("expected {expected} of {locator}, found {count}"))
                }
                Err(err) => AssertionResult::fail(format!("{locator}: {err}")),
            }
        })
        .await
    }

    /// Expect the current URL to contain `fragment`
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::AssertionFailed`] after the assertion timeout.
    pub async fn expect_url_contains(&self, fragment: &str) -> PomarResult<()> {
        self.retry_until(|| async move {
            match self.session().current_url().await {
                Ok(url) => Assertion::contains(&url, fragment),
                Err(err) => AssertionResult::fail(err.to_string()),
            }
        })
        .await
    }

    /// Expect the document title
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::AssertionFailed`] after the assertion timeout.
    pub async fn expect_title(&self, expected: &str) -> PomarResult<()> {
        self.retry_until(|| async move {
            match self.session().title().await {
                Ok(title) => Assertion::equals(expected, title.as_str()),
                Err(err) => AssertionResult::fail(err.to_string()),
            }
        })
        .await
    }
}
