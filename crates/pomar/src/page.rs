//! Page objects and the driver they act through.
//!
//! A [`Driver`] borrows the scenario's [`BrowserSession`] and carries the
//! primitives every page object composes: navigation that waits for network
//! idle, actions that wait for their element first, strict and tolerant
//! queries, and optional steps. Per-site page types hold a `Driver` plus a
//! [`LocatorRegistry`] and expose composite actions built from these
//! primitives.
//!
//! ```ignore
//! struct LoginPage<'s> {
//!     driver: Driver<'s>,
//!     locators: LocatorRegistry,
//! }
//!
//! impl PageObject for LoginPage<'_> {
//!     fn path(&self) -> &str {
//!         "/"
//!     }
//!
//!     fn locators(&self) -> &LocatorRegistry {
//!         &self.locators
//!     }
//! }
//!
//! impl LoginPage<'_> {
//!     pub async fn login(&self, username: &str, password: &str) -> PomarResult<()> {
//!         self.driver.fill(self.locator("username")?, username).await?;
//!         self.driver.fill(self.locator("password")?, password).await?;
//!         self.driver.click(self.locator("submit")?).await
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{SuiteConfig, Timeouts};
use crate::locator::{Locator, LocatorRegistry};
use crate::result::{PomarError, PomarResult};
use crate::session::BrowserSession;
use crate::trace::ActionTrace;
use crate::wait::{Deadline, LoadState, DEFAULT_POLL_INTERVAL_MS};

/// A page or component with a fixed set of locators
pub trait PageObject {
    /// Site-relative path the page is opened at (e.g. `/`, `/contactList`)
    fn path(&self) -> &str;

    /// The page's locator registry
    fn locators(&self) -> &LocatorRegistry;

    /// Page name used in errors and logs
    fn page_name(&self) -> &str {
        self.locators().page()
    }

    /// URL pattern identifying the page (`/users/:id`, `/docs/*`)
    fn url_pattern(&self) -> &str {
        self.path()
    }

    /// Look up a registered locator
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::UnknownLocator`] for keys the page never registered.
    fn locator(&self, key: &str) -> PomarResult<&Locator> {
        self.locators().get(key)
    }
}

/// Result of an optional step
#[derive(Debug)]
pub enum StepOutcome {
    /// The affordance was present and the action succeeded
    Performed,
    /// The affordance was absent; nothing was attempted
    Skipped {
        /// Why the step was skipped
        reason: String,
    },
    /// The affordance was present but the action failed
    Failed(PomarError),
}

impl StepOutcome {
    /// Whether the step ran to completion
    #[must_use]
    pub const fn is_performed(&self) -> bool {
        matches!(self, Self::Performed)
    }

    /// Whether the step was skipped
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    /// Whether the step failed
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Turn a failure back into an error; performed and skipped are `Ok`
    ///
    /// # Errors
    ///
    /// Returns the error of a failed step.
    pub fn into_result(self) -> PomarResult<()> {
        match self {
            Self::Failed(err) => Err(err),
            Self::Performed | Self::Skipped { .. } => Ok(()),
        }
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Performed => f.write_str("performed"),
            Self::Skipped { reason } => write!(f, "skipped ({reason})"),
            Self::Failed(err) => write!(f, "failed ({err})"),
        }
    }
}

/// Primitives shared by every page object.
///
/// Borrows the session; cloning a driver is cheap and every clone acts on
/// the same browser context.
#[derive(Clone)]
pub struct Driver<'s> {
    session: &'s dyn BrowserSession,
    base_url: String,
    timeouts: Timeouts,
    force_click_fallback: bool,
    artifacts_dir: PathBuf,
    trace: Option<Arc<ActionTrace>>,
}

impl fmt::Debug for Driver<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("base_url", &self.base_url)
            .field("timeouts", &self.timeouts)
            .field("force_click_fallback", &self.force_click_fallback)
            .field("tracing", &self.trace.is_some())
            .finish_non_exhaustive()
    }
}

impl<'s> Driver<'s> {
    /// Driver configured from a suite configuration
    #[must_use]
    pub fn new(session: &'s dyn BrowserSession, config: &SuiteConfig) -> Self {
        Self {
            session,
            base_url: config.base_url.clone(),
            timeouts: config.timeouts,
            force_click_fallback: config.force_click_fallback,
            artifacts_dir: config.artifacts_dir.clone(),
            trace: None,
        }
    }

    /// Driver with default timeouts against `base_url`
    #[must_use]
    pub fn with_base_url(session: &'s dyn BrowserSession, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            session,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeouts: Timeouts::default(),
            force_click_fallback: true,
            artifacts_dir: PathBuf::from("test-results"),
            trace: None,
        }
    }

    /// Override timeouts
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Enable or disable the forced-click fallback
    #[must_use]
    pub const fn with_force_click(mut self, enabled: bool) -> Self {
        self.force_click_fallback = enabled;
        self
    }

    /// Override where screenshots are written
    #[must_use]
    pub fn with_artifacts_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.artifacts_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Record every primitive into `trace`
    #[must_use]
    pub fn with_trace(mut self, trace: Arc<ActionTrace>) -> Self {
        self.trace = Some(trace);
        self
    }

    /// Borrowed session
    #[must_use]
    pub fn session(&self) -> &'s dyn BrowserSession {
        self.session
    }

    /// Base URL without trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Active timeouts
    #[must_use]
    pub const fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Absolute URL for a site-relative path; absolute URLs pass through
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    fn traced<T>(&self, action: &str, target: &str, began: Instant, result: PomarResult<T>) -> PomarResult<T> {
        if let Some(trace) = &self.trace {
            trace.record(action, target, began, &result);
        }
        result
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Go to `path` (the base URL when `None`) and wait for network idle
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::NavigationTimeout`] when the page never goes
    /// quiet within the navigation timeout.
    pub async fn navigate(&self, path: Option<&str>) -> PomarResult<()> {
        let url = self.url(path.unwrap_or("/"));
        let began = Instant::now();
        tracing::debug!(%url, "navigate");
        let result = self.load(&url).await;
        self.traced("navigate", &url, began, result)
    }

    async fn load(&self, url: &str) -> PomarResult<()> {
        self.session.goto(url).await?;
        self.wait_for_idle(url).await
    }

    async fn wait_for_idle(&self, url: &str) -> PomarResult<()> {
        let timeout = self.timeouts.navigation;
        match self
            .session
            .wait_for_load_state(LoadState::NetworkIdle, timeout)
            .await
        {
            Err(PomarError::Timeout { ms }) => Err(PomarError::NavigationTimeout {
                url: url.to_string(),
                ms,
            }),
            other => other,
        }
    }

    /// Navigate to a page object's path
    ///
    /// # Errors
    ///
    /// Same as [`Driver::navigate`].
    pub async fn open<P: PageObject + ?Sized>(&self, page: &P) -> PomarResult<()> {
        tracing::info!(page = page.page_name(), "open");
        self.navigate(Some(page.path())).await
    }

    /// Reload and wait for network idle
    ///
    /// # Errors
    ///
    /// Returns an error if the reload fails or never goes idle.
    pub async fn reload(&self) -> PomarResult<()> {
        let began = Instant::now();
        let result = async {
            self.session.reload().await?;
            let url = self.session.current_url().await?;
            self.wait_for_idle(&url).await
        }
        .await;
        self.traced("reload", "", began, result)
    }

    /// Go back one history entry and wait for network idle
    ///
    /// # Errors
    ///
    /// Returns an error if there is no history or the page never goes idle.
    pub async fn go_back(&self) -> PomarResult<()> {
        let began = Instant::now();
        let result = async {
            self.session.go_back().await?;
            let url = self.session.current_url().await?;
            self.wait_for_idle(&url).await
        }
        .await;
        self.traced("go_back", "", began, result)
    }

    /// Current URL
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot report it.
    pub async fn current_url(&self) -> PomarResult<String> {
        self.session.current_url().await
    }

    /// Document title
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot report it.
    pub async fn title(&self) -> PomarResult<String> {
        self.session.title().await
    }

    /// Wait until the current URL's path matches the page's URL pattern
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::AssertionFailed`] naming the last URL seen.
    pub async fn expect_url<P: PageObject + ?Sized>(&self, page: &P) -> PomarResult<()> {
        let matcher = UrlMatcher::new(page.url_pattern());
        let deadline = Deadline::new(self.timeouts.assertion, Duration::from_millis(50));
        loop {
            let seen = match self.session.current_url().await {
                Ok(url) if matcher.matches(url_path(&url)) => return Ok(()),
                Ok(url) => format!("URL is {url}"),
                Err(err) => format!("URL is unreadable: {err}"),
            };
            if deadline.expired() {
                return Err(PomarError::assertion(format!(
                    "expected {} page ({}), but {seen}",
                    page.page_name(),
                    matcher.pattern()
                )));
            }
            deadline.tick().await;
        }
    }

    // =========================================================================
    // Waits
    // =========================================================================

    /// Wait until the locator is visible (or attached, for locators that
    /// opt out of visibility)
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::ElementNotFound`] on timeout.
    pub async fn wait_visible(&self, locator: &Locator) -> PomarResult<()> {
        let timeout = locator.timeout_or(self.timeouts.action);
        self.wait_until_ready(locator, timeout).await
    }

    async fn wait_until_ready(&self, locator: &Locator, timeout: Duration) -> PomarResult<()> {
        let selector = locator.selector();
        let deadline = Deadline::new(timeout, locator.options().poll_interval);
        let mut last_error = None;
        loop {
            let ready = if locator.options().visible {
                self.session.is_visible(selector).await
            } else {
                self.session.count(selector).await.map(|n| n > 0)
            };
            match ready {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(err) => {
                    tracing::debug!(selector = %selector, error = %err, "query failed while waiting");
                    last_error = Some(err.to_string());
                }
            }
            if deadline.expired() {
                return Err(PomarError::ElementNotFound {
                    selector: selector.to_string(),
                    ms: deadline.timeout_ms(),
                    last_error,
                });
            }
            deadline.tick().await;
        }
    }

    /// Wait until any of `locators` is visible and return its position
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::ElementNotFound`] naming every selector on timeout.
    pub async fn wait_visible_any(&self, locators: &[&Locator]) -> PomarResult<usize> {
        let timeout = locators
            .iter()
            .map(|l| l.timeout_or(self.timeouts.action))
            .max()
            .unwrap_or(self.timeouts.action);
        let poll = locators.first().map_or(
            Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            |l| l.options().poll_interval,
        );
        let deadline = Deadline::new(timeout, poll);
        let mut last_error = None;
        loop {
            for (position, locator) in locators.iter().enumerate() {
                match self.session.is_visible(locator.selector()).await {
                    Ok(true) => return Ok(position),
                    Ok(false) => {}
                    Err(err) => last_error = Some(err.to_string()),
                }
            }
            if deadline.expired() {
                let selectors: Vec<String> = locators.iter().map(ToString::to_string).collect();
                return Err(PomarError::ElementNotFound {
                    selector: selectors.join(" | "),
                    ms: deadline.timeout_ms(),
                    last_error,
                });
            }
            deadline.tick().await;
        }
    }

    /// Wait until the locator is absent or hidden
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::Timeout`] if it stays visible.
    pub async fn wait_hidden(&self, locator: &Locator) -> PomarResult<()> {
        let deadline = Deadline::new(
            locator.timeout_or(self.timeouts.action),
            locator.options().poll_interval,
        );
        loop {
            // a failed query is not proof of absence; poll again
            match self.session.is_visible(locator.selector()).await {
                Ok(false) => return Ok(()),
                Ok(true) => {}
                Err(err) => {
                    tracing::debug!(selector = %locator, error = %err, "query failed while waiting");
                }
            }
            if deadline.expired() {
                return Err(PomarError::Timeout {
                    ms: deadline.timeout_ms(),
                });
            }
            deadline.tick().await;
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Wait for the field, clear it, then type `value`
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::ElementNotFound`] if the field never appears.
    pub async fn fill(&self, locator: &Locator, value: &str) -> PomarResult<()> {
        let began = Instant::now();
        tracing::debug!(selector = %locator, "fill");
        let result = async {
            self.wait_visible(locator).await?;
            self.session.clear(locator.selector()).await?;
            self.session.fill(locator.selector(), value).await
        }
        .await;
        self.traced("fill", &locator.to_string(), began, result)
    }

    /// Wait for the element, then click it.
    ///
    /// With the force-click fallback enabled a failed activation is retried
    /// once with forced activation.
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::ElementNotFound`] if the element never appears
    /// and [`PomarError::ClickFailed`] if activation fails.
    pub async fn click(&self, locator: &Locator) -> PomarResult<()> {
        let began = Instant::now();
        tracing::debug!(selector = %locator, "click");
        let result = self.click_inner(locator).await;
        self.traced("click", &locator.to_string(), began, result)
    }

    async fn click_inner(&self, locator: &Locator) -> PomarResult<()> {
        self.wait_visible(locator).await?;
        let selector = locator.selector();
        let first = match self.session.click(selector, false).await {
            Ok(()) => return Ok(()),
            Err(err) => err,
        };
        if !self.force_click_fallback {
            return Err(PomarError::ClickFailed {
                selector: selector.to_string(),
                message: first.to_string(),
            });
        }
        tracing::warn!(selector = %selector, error = %first, "click failed, retrying with force");
        self.session
            .click(selector, true)
            .await
            .map_err(|forced| {
                tracing::error!(selector = %selector, error = %forced, "forced click failed");
                PomarError::ClickFailed {
                    selector: selector.to_string(),
                    message: format!("{first}; forced: {forced}"),
                }
            })
    }

    /// Press `key` on the element
    ///
    /// # Errors
    ///
    /// Returns an error if the element never appears or the key press fails.
    pub async fn press(&self, locator: &Locator, key: &str) -> PomarResult<()> {
        let began = Instant::now();
        let result = async {
            self.wait_visible(locator).await?;
            self.session.press(locator.selector(), key).await
        }
        .await;
        self.traced("press", &locator.to_string(), began, result)
    }

    /// Choose an option of a `<select>` by value
    ///
    /// # Errors
    ///
    /// Returns an error if the select never appears or has no such option.
    pub async fn select_option(&self, locator: &Locator, value: &str) -> PomarResult<()> {
        let began = Instant::now();
        let result = async {
            self.wait_visible(locator).await?;
            self.session.select_option(locator.selector(), value).await
        }
        .await;
        self.traced("select_option", &locator.to_string(), began, result)
    }

    /// Dispatch a DOM event once the element is attached
    ///
    /// # Errors
    ///
    /// Returns an error if the element never attaches.
    pub async fn dispatch_event(&self, locator: &Locator, event: &str) -> PomarResult<()> {
        let began = Instant::now();
        let attached = locator.clone().with_visible(false);
        let result = async {
            self.wait_visible(&attached).await?;
            self.session.dispatch_event(locator.selector(), event).await
        }
        .await;
        self.traced("dispatch_event", &locator.to_string(), began, result)
    }

    /// Save a PNG screenshot as `<artifacts>/screenshots/<name>.png`
    ///
    /// # Errors
    ///
    /// Returns an error if the capture or the write fails.
    pub async fn screenshot(&self, name: &str) -> PomarResult<PathBuf> {
        let bytes = self.session.screenshot().await?;
        let dir = self.artifacts_dir.join("screenshots");
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(format!("{}.png", file_stem(name)));
        tokio::fs::write(&path, bytes).await?;
        tracing::info!(path = %path.display(), "screenshot saved");
        Ok(path)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Trimmed text of the element, waiting for it first
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::ElementNotFound`] if the element never appears.
    pub async fn text(&self, locator: &Locator) -> PomarResult<String> {
        self.wait_visible(locator).await?;
        let text = self.session.text_content(locator.selector()).await?;
        Ok(text.trim().to_string())
    }

    /// Trimmed text, or an empty string on any failure
    pub async fn text_or_default(&self, locator: &Locator) -> String {
        let scoped = locator
            .clone()
            .with_timeout(locator.timeout_or(self.timeouts.presence));
        match self.text(&scoped).await {
            Ok(text) => text,
            Err(err) => {
                tracing::debug!(selector = %locator, error = %err, "text unavailable");
                String::new()
            }
        }
    }

    /// Whether the element shows up within the presence timeout.
    ///
    /// Never fails: any resolution error reads as `false`.
    pub async fn is_visible(&self, locator: &Locator) -> bool {
        let timeout = locator.timeout_or(self.timeouts.presence);
        let visible = locator.clone().with_visible(true);
        self.wait_until_ready(&visible, timeout).await.is_ok()
    }

    /// Whether the element is visible right now, without waiting
    pub async fn is_visible_now(&self, locator: &Locator) -> bool {
        self.session
            .is_visible(locator.selector())
            .await
            .unwrap_or(false)
    }

    /// Current value of an input
    ///
    /// # Errors
    ///
    /// Returns an error if the input never appears.
    pub async fn input_value(&self, locator: &Locator) -> PomarResult<String> {
        self.wait_visible(locator).await?;
        self.session.input_value(locator.selector()).await
    }

    /// Attribute of the element, `None` when unset
    ///
    /// # Errors
    ///
    /// Returns an error if the element never attaches.
    pub async fn attribute(&self, locator: &Locator, name: &str) -> PomarResult<Option<String>> {
        self.wait_visible(&locator.clone().with_visible(false)).await?;
        self.session.attribute(locator.selector(), name).await
    }

    /// Computed CSS property of the element
    ///
    /// # Errors
    ///
    /// Returns an error if the element never appears.
    pub async fn css_value(&self, locator: &Locator, property: &str) -> PomarResult<String> {
        self.wait_visible(locator).await?;
        self.session.css_value(locator.selector(), property).await
    }

    /// Number of matching elements right now
    ///
    /// # Errors
    ///
    /// Returns an error if the session fails.
    pub async fn count(&self, locator: &Locator) -> PomarResult<usize> {
        self.session.count(locator.selector()).await
    }

    /// Trimmed text of every match right now
    ///
    /// # Errors
    ///
    /// Returns an error if the session fails.
    pub async fn all_texts(&self, locator: &Locator) -> PomarResult<Vec<String>> {
        let texts = self.session.all_text_contents(locator.selector()).await?;
        Ok(texts.into_iter().map(|t| t.trim().to_string()).collect())
    }

    /// Whether the element is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if the element never appears.
    pub async fn is_enabled(&self, locator: &Locator) -> PomarResult<bool> {
        self.wait_visible(locator).await?;
        self.session.is_enabled(locator.selector()).await
    }

    /// Whether a checkbox or radio is checked
    ///
    /// # Errors
    ///
    /// Returns an error if the element never attaches.
    pub async fn is_checked(&self, locator: &Locator) -> PomarResult<bool> {
        self.wait_visible(&locator.clone().with_visible(false)).await?;
        self.session.is_checked(locator.selector()).await
    }

    // =========================================================================
    // Optional steps
    // =========================================================================

    /// Run `action` only if `anchor` is present.
    ///
    /// The action future is lazy; when the anchor is absent it is dropped
    /// without being polled.
    pub async fn optional_step<F>(&self, name: &str, anchor: &Locator, action: F) -> StepOutcome
    where
        F: Future<Output = PomarResult<()>>,
    {
        if !self.is_visible(anchor).await {
            tracing::info!(step = name, anchor = %anchor, "optional step skipped");
            return StepOutcome::Skipped {
                reason: format!("{anchor} not present"),
            };
        }
        match action.await {
            Ok(()) => {
                tracing::info!(step = name, "optional step performed");
                StepOutcome::Performed
            }
            Err(err) => {
                tracing::warn!(step = name, error = %err, "optional step failed");
                StepOutcome::Failed(err)
            }
        }
    }
}

/// Path component of a URL, without query or fragment
#[must_use]
pub fn url_path(url: &str) -> &str {
    let rest = url
        .split_once("://")
        .map_or(url, |(_, after)| after.find('/').map_or("/", |i| &after[i..]));
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    &rest[..end]
}

fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// URL pattern matcher for page identification.
///
/// Patterns support literal segments (`/login`), wildcards (`/users/*`) and
/// named parameters (`/users/:id`). Each wildcard or parameter consumes
/// exactly one segment.
#[derive(Debug, Clone)]
pub struct UrlMatcher {
    pattern: String,
    segments: Vec<UrlSegment>,
}

#[derive(Debug, Clone)]
enum UrlSegment {
    Literal(String),
    Wildcard,
    Parameter(String),
}

impl UrlMatcher {
    /// Compile a pattern
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s {
                "*" => UrlSegment::Wildcard,
                _ => s.strip_prefix(':').map_or_else(
                    || UrlSegment::Literal(s.to_string()),
                    |name| UrlSegment::Parameter(name.to_string()),
                ),
            })
            .collect();
        Self {
            pattern: pattern.to_string(),
            segments,
        }
    }

    /// Whether a path matches
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        parts.len() == self.segments.len()
            && self.segments.iter().zip(&parts).all(|(seg, part)| match seg {
                UrlSegment::Literal(lit) => lit == part,
                UrlSegment::Wildcard | UrlSegment::Parameter(_) => true,
            })
    }

    /// Named parameters of a matching path
    #[must_use]
    pub fn extract_params(&self, path: &str) -> HashMap<String, String> {
        let parts = path.split('/').filter(|s| !s.is_empty());
        self.segments
            .iter()
            .zip(parts)
            .filter_map(|(seg, part)| match seg {
                UrlSegment::Parameter(name) => Some((name.clone(), part.to_string())),
                _ => None,
            })
            .collect()
    }

    /// The source pattern
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
