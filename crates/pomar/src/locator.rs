//! Locators and per-page locator registries.
//!
//! A locator is a named reference to one element's selection expression. Each
//! page object owns a [`LocatorRegistry`] mapping stable semantic keys such as
//! `"username"` or `"submit"` to selectors. Nothing is validated when the
//! registry is built; a selector that matches nothing fails only when it is
//! used, with the selector text in the error.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::result::{PomarError, PomarResult};

/// Default timeout for element waits (10 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval for element waits (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS selector (e.g., "#login-button")
    Css(String),
    /// XPath selector
    XPath(String),
    /// Text content selector
    Text(String),
    /// `data-testid` attribute
    TestId(String),
    /// `data-test` attribute
    DataTest(String),
    /// CSS selector narrowed to elements containing some text
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
}

/// Quote a value as a JavaScript string literal
fn js_str(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| String::from("\"\""))
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a `data-testid` selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// Create a `data-test` selector
    #[must_use]
    pub fn data_test(id: impl Into<String>) -> Self {
        Self::DataTest(id.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Create a CSS selector filtered by text
    #[must_use]
    pub fn css_with_text(css: impl Into<String>, text: impl Into<String>) -> Self {
        Self::CssWithText {
            css: css.into(),
            text: text.into(),
        }
    }

    /// Equivalent CSS selector, when one exists.
    ///
    /// Text and XPath selectors have no CSS form.
    #[must_use]
    pub fn as_css(&self) -> Option<String> {
        match self {
            Self::Css(s) => Some(s.clone()),
            Self::TestId(id) => Some(format!("[data-testid=\"{id}\"]")),
            Self::DataTest(id) => Some(format!("[data-test=\"{id}\"]")),
            Self::CssWithText { css, .. } => Some(css.clone()),
            Self::Text(_) | Self::XPath(_) => None,
        }
    }

    /// JavaScript expression evaluating to an array of every matching element
    #[must_use]
    pub fn to_all_query(&self) -> String {
        match self {
            Self::XPath(s) => format!(
                "(() => {{ const r = document.evaluate({}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); \
                 return Array.from({{ length: r.snapshotLength }}, (_, i) => r.snapshotItem(i)); }})()",
                js_str(s)
            ),
            Self::Text(t) => format!(
                "Array.from(document.querySelectorAll('body *')).filter(el => el.textContent.includes({t}) \
                 && !Array.from(el.children).some(c => c.textContent.includes({t})))",
                t = js_str(t)
            ),
            Self::CssWithText { css, text } => format!(
                "Array.from(document.querySelectorAll({})).filter(el => el.textContent.includes({}))",
                js_str(css),
                js_str(text)
            ),
            Self::Css(_) | Self::TestId(_) | Self::DataTest(_) => {
                let css = self.as_css().unwrap_or_default();
                format!("Array.from(document.querySelectorAll({}))", js_str(&css))
            }
        }
    }

    /// JavaScript expression evaluating to the first match (or undefined)
    #[must_use]
    pub fn to_query(&self) -> String {
        format!("({})[0]", self.to_all_query())
    }

    /// JavaScript expression counting matches
    #[must_use]
    pub fn to_count_query(&self) -> String {
        format!("({}).length", self.to_all_query())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) => write!(f, "{s}"),
            Self::XPath(s) => write!(f, "xpath={s}"),
            Self::Text(t) => write!(f, "text={t}"),
            Self::TestId(id) => write!(f, "[data-testid=\"{id}\"]"),
            Self::DataTest(id) => write!(f, "[data-test=\"{id}\"]"),
            Self::CssWithText { css, text } => write!(f, "{css}:has-text(\"{text}\")"),
        }
    }
}

/// Locator options for customizing waits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorOptions {
    /// Per-locator timeout override; the driver's action timeout applies otherwise
    pub timeout: Option<Duration>,
    /// Polling interval for auto-waiting
    pub poll_interval: Duration,
    /// Whether actions wait for visibility (otherwise only attachment)
    pub visible: bool,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            visible: true,
        }
    }
}

/// A named selector plus its wait options.
///
/// Immutable once built; page objects create all of theirs up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    selector: Selector,
    options: LocatorOptions,
}

impl Locator {
    /// Create a new locator with a CSS selector
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self::from_selector(Selector::Css(selector.into()))
    }

    /// Create a locator from a selector
    #[must_use]
    pub fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            options: LocatorOptions::default(),
        }
    }

    /// Narrow a CSS locator to elements containing `text`
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        let css = self.selector.as_css();
        let selector = match (self.selector, css) {
            (Selector::Css(_) | Selector::TestId(_) | Selector::DataTest(_), Some(css)) => {
                Selector::CssWithText {
                    css,
                    text: text.into(),
                }
            }
            (other, _) => other,
        };
        Self {
            selector,
            options: self.options,
        }
    }

    /// Set a custom timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    /// Set visibility requirement
    #[must_use]
    pub const fn with_visible(mut self, visible: bool) -> Self {
        self.options.visible = visible;
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get the options
    #[must_use]
    pub const fn options(&self) -> &LocatorOptions {
        &self.options
    }

    /// Timeout to use, falling back to `default`
    #[must_use]
    pub fn timeout_or(&self, default: Duration) -> Duration {
        self.options.timeout.unwrap_or(default)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.selector.fmt(f)
    }
}

/// Fixed mapping from semantic key to locator for one logical page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorRegistry {
    page: String,
    entries: BTreeMap<String, Locator>,
}

impl LocatorRegistry {
    /// Start building a registry for `page`
    #[must_use]
    pub fn builder(page: impl Into<String>) -> LocatorRegistryBuilder {
        LocatorRegistryBuilder {
            page: page.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Page name this registry belongs to
    #[must_use]
    pub fn page(&self) -> &str {
        &self.page
    }

    /// Look up a locator by key
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::UnknownLocator`] for keys that were never registered.
    pub fn get(&self, key: &str) -> PomarResult<&Locator> {
        self.entries
            .get(key)
            .ok_or_else(|| PomarError::UnknownLocator {
                page: self.page.clone(),
                key: key.to_string(),
            })
    }

    /// Whether `key` is registered
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Registered keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of locators
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for [`LocatorRegistry`]
#[derive(Debug, Clone)]
pub struct LocatorRegistryBuilder {
    page: String,
    entries: BTreeMap<String, Locator>,
}

impl LocatorRegistryBuilder {
    /// Register a prepared locator
    #[must_use]
    pub fn locator(mut self, key: impl Into<String>, locator: Locator) -> Self {
        let _ = self.entries.insert(key.into(), locator);
        self
    }

    /// Register a CSS selector
    #[must_use]
    pub fn css(self, key: impl Into<String>, css: impl Into<String>) -> Self {
        self.locator(key, Locator::new(css))
    }

    /// Register a `data-test` attribute selector
    #[must_use]
    pub fn data_test(self, key: impl Into<String>, id: impl Into<String>) -> Self {
        self.locator(key, Locator::from_selector(Selector::data_test(id)))
    }

    /// Register a `data-testid` attribute selector
    #[must_use]
    pub fn test_id(self, key: impl Into<String>, id: impl Into<String>) -> Self {
        self.locator(key, Locator::from_selector(Selector::test_id(id)))
    }

    /// Register a text selector
    #[must_use]
    pub fn text(self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.locator(key, Locator::from_selector(Selector::text(text)))
    }

    /// Register a CSS selector narrowed by text
    #[must_use]
    pub fn css_with_text(
        self,
        key: impl Into<String>,
        css: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.locator(key, Locator::from_selector(Selector::css_with_text(css, text)))
    }

    /// Finish the registry
    #[must_use]
    pub fn build(self) -> LocatorRegistry {
        LocatorRegistry {
            page: self.page,
            entries: self.entries,
        }
    }
}
