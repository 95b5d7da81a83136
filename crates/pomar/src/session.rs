//! Browser session boundary.
//!
//! A [`BrowserSession`] is the live browser context a scenario runs against.
//! The runner owns it; page objects and fixtures only borrow it through a
//! [`Driver`](crate::page::Driver). Implementations:
//!
//! - [`FakeBrowser`](crate::fake::FakeBrowser): scriptable in-memory DOM
//! - `ChromiumSession`: real Chromium over CDP (feature `browser`)
//! - [`Detached`]: placeholder for API-only scenarios
//!
//! Element operations act on the first match and fail with
//! [`PomarError::ElementNotFound`] when nothing matches. They never wait;
//! auto-waiting is the driver's job.

use async_trait::async_trait;
use std::time::Duration;

use crate::locator::Selector;
use crate::result::{PomarError, PomarResult};
use crate::wait::LoadState;

/// Abstract browser automation session
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Navigate to an absolute URL
    async fn goto(&self, url: &str) -> PomarResult<()>;

    /// Block until the page reaches `state`, or fail with [`PomarError::Timeout`]
    async fn wait_for_load_state(&self, state: LoadState, timeout: Duration) -> PomarResult<()>;

    /// Activate an element. `force` skips the actionability hit-test.
    async fn click(&self, selector: &Selector, force: bool) -> PomarResult<()>;

    /// Replace an input's value
    async fn fill(&self, selector: &Selector, value: &str) -> PomarResult<()>;

    /// Clear an input's value
    async fn clear(&self, selector: &Selector) -> PomarResult<()>;

    /// Press a key while the element has focus
    async fn press(&self, selector: &Selector, key: &str) -> PomarResult<()>;

    /// Pick an option of a `<select>` by value
    async fn select_option(&self, selector: &Selector, value: &str) -> PomarResult<()>;

    /// Dispatch a DOM event on the element
    async fn dispatch_event(&self, selector: &Selector, event: &str) -> PomarResult<()>;

    /// Number of matching elements
    async fn count(&self, selector: &Selector) -> PomarResult<usize>;

    /// Whether the first match is rendered. No match is `false`, not an error.
    async fn is_visible(&self, selector: &Selector) -> PomarResult<bool>;

    /// Whether the first match is enabled
    async fn is_enabled(&self, selector: &Selector) -> PomarResult<bool>;

    /// Whether the first match is checked
    async fn is_checked(&self, selector: &Selector) -> PomarResult<bool>;

    /// Text content of the first match
    async fn text_content(&self, selector: &Selector) -> PomarResult<String>;

    /// Text content of every match
    async fn all_text_contents(&self, selector: &Selector) -> PomarResult<Vec<String>>;

    /// Current value of an input
    async fn input_value(&self, selector: &Selector) -> PomarResult<String>;

    /// Attribute of the first match
    async fn attribute(&self, selector: &Selector, name: &str) -> PomarResult<Option<String>>;

    /// Computed CSS property of the first match
    async fn css_value(&self, selector: &Selector, property: &str) -> PomarResult<String>;

    /// Current page URL
    async fn current_url(&self) -> PomarResult<String>;

    /// Current document title
    async fn title(&self) -> PomarResult<String>;

    /// PNG screenshot of the viewport
    async fn screenshot(&self) -> PomarResult<Vec<u8>>;

    /// Reload the current page
    async fn reload(&self) -> PomarResult<()>;

    /// Go back one history entry
    async fn go_back(&self) -> PomarResult<()>;

    /// Release the session
    async fn close(&self) -> PomarResult<()>;
}

/// Creates one isolated session per scenario attempt
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Open a fresh session
    async fn new_session(&self) -> PomarResult<Box<dyn BrowserSession>>;

    /// Human-readable backend name for logs
    fn backend(&self) -> &str {
        "unknown"
    }
}

/// Session for scenarios that never touch a browser.
///
/// Every operation fails, so an API scenario that accidentally drives a
/// page reports a clear error instead of hanging.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl Detached {
    fn refuse<T>(operation: &str) -> PomarResult<T> {
        Err(PomarError::driver(format!(
            "{operation} requires a browser session; this scenario has none"
        )))
    }
}

#[async_trait]
impl BrowserSession for Detached {
    async fn goto(&self, _url: &str) -> PomarResult<()> {
        Self::refuse("goto")
    }

    async fn wait_for_load_state(&self, _state: LoadState, _timeout: Duration) -> PomarResult<()> {
        Self::refuse("wait_for_load_state")
    }

    async fn click(&self, _selector: &Selector, _force: bool) -> PomarResult<()> {
        Self::refuse("click")
    }

    async fn fill(&self, _selector: &Selector, _value: &str) -> PomarResult<()> {
        Self::refuse("fill")
    }

    async fn clear(&self, _selector: &Selector) -> PomarResult<()> {
        Self::refuse("clear")
    }

    async fn press(&self, _selector: &Selector, _key: &str) -> PomarResult<()> {
        Self::refuse("press")
    }

    async fn select_option(&self, _selector: &Selector, _value: &str) -> PomarResult<()> {
        Self::refuse("select_option")
    }

    async fn dispatch_event(&self, _selector: &Selector, _event: &str) -> PomarResult<()> {
        Self::refuse("dispatch_event")
    }

    async fn count(&self, _selector: &Selector) -> PomarResult<usize> {
        Self::refuse("count")
    }

    async fn is_visible(&self, _selector: &Selector) -> PomarResult<bool> {
        Self::refuse("is_visible")
    }

    async fn is_enabled(&self, _selector: &Selector) -> PomarResult<bool> {
        Self::refuse("is_enabled")
    }

    async fn is_checked(&self, _selector: &Selector) -> PomarResult<bool> {
        Self::refuse("is_checked")
    }

    async fn text_content(&self, _selector: &Selector) -> PomarResult<String> {
        Self::refuse("text_content")
    }

    async fn all_text_contents(&self, _selector: &Selector) -> PomarResult<Vec<String>> {
        Self::refuse("all_text_contents")
    }

    async fn input_value(&self, _selector: &Selector) -> PomarResult<String> {
        Self::refuse("input_value")
    }

    async fn attribute(&self, _selector: &Selector, _name: &str) -> PomarResult<Option<String>> {
        Self::refuse("attribute")
    }

    async fn css_value(&self, _selector: &Selector, _property: &str) -> PomarResult<String> {
        Self::refuse("css_value")
    }

    async fn current_url(&self) -> PomarResult<String> {
        Self::refuse("current_url")
    }

    async fn title(&self) -> PomarResult<String> {
        Self::refuse("title")
    }

    async fn screenshot(&self) -> PomarResult<Vec<u8>> {
        Self::refuse("screenshot")
    }

    async fn reload(&self) -> PomarResult<()> {
        Self::refuse("reload")
    }

    async fn go_back(&self) -> PomarResult<()> {
        Self::refuse("go_back")
    }

    async fn close(&self) -> PomarResult<()> {
        Ok(())
    }
}

/// Factory for builds without a browser backend
#[derive(Debug, Clone, Default)]
pub struct NoBrowserFactory {
    reason: String,
}

impl NoBrowserFactory {
    /// Explain why no browser is available
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl SessionFactory for NoBrowserFactory {
    async fn new_session(&self) -> PomarResult<Box<dyn BrowserSession>> {
        Err(PomarError::BrowserLaunch {
            message: self.reason.clone(),
        })
    }

    fn backend(&self) -> &str {
        "none"
    }
}
