//! In-memory scriptable browser.
//!
//! [`FakeBrowser`] implements [`BrowserSession`] over a tiny DOM model so page
//! objects, fixtures and whole scenarios can be exercised without Chromium.
//! A [`FakeSite`] maps paths to render functions; elements answer to one or
//! more selector aliases and may carry reactions that run when they are
//! clicked, filled, changed or receive an event. Reactions see a [`Dom`]
//! handle that can read inputs, mutate elements, update shared app state and
//! navigate.
//!
//! ```ignore
//! let site = FakeSite::new("https://shop.test")
//!     .page("/", FakePage::new("Login")
//!         .element(FakeElement::new("#user-name"))
//!         .element(FakeElement::new("#login-button").on_click(|dom| {
//!             if dom.value("#user-name") == "standard_user" {
//!                 dom.navigate("/inventory.html");
//!             }
//!         })));
//! let browser = FakeBrowser::new(Arc::new(site));
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::locator::Selector;
use crate::page::UrlMatcher;
use crate::result::{PomarError, PomarResult};
use crate::session::{BrowserSession, SessionFactory};
use crate::wait::LoadState;

/// Shared application state a fake site renders from
pub type AppState = BTreeMap<String, Value>;

type Reaction = Arc<dyn Fn(&mut Dom<'_>) + Send + Sync>;
type Render = Arc<dyn Fn(&AppState) -> FakePage + Send + Sync>;

/// Bytes returned by [`FakeBrowser::screenshot`]: a PNG signature and nothing else
pub const FAKE_PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// One element of a fake page
#[derive(Clone)]
pub struct FakeElement {
    aliases: Vec<String>,
    text: String,
    value: String,
    visible: bool,
    enabled: bool,
    checked: bool,
    obscured: bool,
    attrs: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    options: Vec<String>,
    appears_after: Option<Duration>,
    reactions: BTreeMap<String, Reaction>,
}

impl fmt::Debug for FakeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeElement")
            .field("aliases", &self.aliases)
            .field("text", &self.text)
            .field("value", &self.value)
            .field("visible", &self.visible)
            .field("reactions", &self.reactions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FakeElement {
    /// Element answering to the CSS selector `selector`
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            aliases: vec![selector.into()],
            text: String::new(),
            value: String::new(),
            visible: true,
            enabled: true,
            checked: false,
            obscured: false,
            attrs: BTreeMap::new(),
            styles: BTreeMap::new(),
            options: Vec::new(),
            appears_after: None,
            reactions: BTreeMap::new(),
        }
    }

    /// Also answer to `selector`
    #[must_use]
    pub fn alias(mut self, selector: impl Into<String>) -> Self {
        self.aliases.push(selector.into());
        self
    }

    /// Also answer to `[data-test="id"]`
    #[must_use]
    pub fn data_test(self, id: &str) -> Self {
        self.alias(format!("[data-test=\"{id}\"]"))
    }

    /// Set text content
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set input value
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Attached but not rendered
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Disabled control
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Checked state
    #[must_use]
    pub const fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Covered by another element; only forced clicks get through
    #[must_use]
    pub const fn obscured(mut self) -> Self {
        self.obscured = true;
        self
    }

    /// Render only after `delay` has passed since page load
    #[must_use]
    pub const fn appears_after(mut self, delay: Duration) -> Self {
        self.appears_after = Some(delay);
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attrs.insert(name.into(), value.into());
        self
    }

    /// Set a computed style
    #[must_use]
    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.styles.insert(property.into(), value.into());
        self
    }

    /// Restrict `select_option` to these values
    #[must_use]
    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Run `reaction` when the element is clicked
    #[must_use]
    pub fn on_click<F>(self, reaction: F) -> Self
    where
        F: Fn(&mut Dom<'_>) + Send + Sync + 'static,
    {
        self.on("click", reaction)
    }

    /// Run `reaction` when `key` is pressed on the element
    #[must_use]
    pub fn on_press<F>(self, key: &str, reaction: F) -> Self
    where
        F: Fn(&mut Dom<'_>) + Send + Sync + 'static,
    {
        self.on(&format!("press:{key}"), reaction)
    }

    /// Run `reaction` for a named event (`input`, `change`, `mouseleave`, ...)
    #[must_use]
    pub fn on<F>(mut self, event: &str, reaction: F) -> Self
    where
        F: Fn(&mut Dom<'_>) + Send + Sync + 'static,
    {
        let _ = self.reactions.insert(event.to_string(), Arc::new(reaction));
        self
    }

    fn has_alias(&self, css: &str) -> bool {
        self.aliases.iter().any(|a| a == css)
    }

    fn matches(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Text(t) => !self.text.is_empty() && self.text.contains(t.as_str()),
            Selector::XPath(x) => self.has_alias(&format!("xpath={x}")),
            Selector::CssWithText { css, text } => {
                self.has_alias(css) && self.text.contains(text.as_str())
            }
            other => other.as_css().is_some_and(|css| self.has_alias(&css)),
        }
    }

    fn is_shown(&self, loaded_at: Instant) -> bool {
        self.visible && self.appears_after.map_or(true, |d| loaded_at.elapsed() >= d)
    }
}

/// A rendered fake page
#[derive(Debug, Clone)]
pub struct FakePage {
    title: String,
    elements: Vec<FakeElement>,
    idle_after: Option<Duration>,
}

impl FakePage {
    /// Page with a document title
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            elements: Vec::new(),
            idle_after: Some(Duration::ZERO),
        }
    }

    /// Add an element
    #[must_use]
    pub fn element(mut self, element: FakeElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Add several elements
    #[must_use]
    pub fn elements(mut self, elements: impl IntoIterator<Item = FakeElement>) -> Self {
        self.elements.extend(elements);
        self
    }

    /// Network keeps polling forever; network-idle waits time out
    #[must_use]
    pub const fn never_idle(mut self) -> Self {
        self.idle_after = None;
        self
    }

    /// Network goes quiet `delay` after load
    #[must_use]
    pub const fn idle_after(mut self, delay: Duration) -> Self {
        self.idle_after = Some(delay);
        self
    }

    fn not_found() -> Self {
        Self::new("404 Not Found").element(FakeElement::new("body").text("Not Found"))
    }
}

/// Mutable view handed to element reactions
#[derive(Debug)]
pub struct Dom<'a> {
    page: &'a mut FakePage,
    state: &'a mut AppState,
    navigation: Option<String>,
}

impl Dom<'_> {
    fn find(&self, css: &str) -> Option<&FakeElement> {
        self.page.elements.iter().find(|e| e.has_alias(css))
    }

    fn find_mut(&mut self, css: &str) -> Option<&mut FakeElement> {
        self.page.elements.iter_mut().find(|e| e.has_alias(css))
    }

    /// Input value of the first element answering to `css` (empty if absent)
    #[must_use]
    pub fn value(&self, css: &str) -> String {
        self.find(css).map(|e| e.value.clone()).unwrap_or_default()
    }

    /// Text of the first element answering to `css` (empty if absent)
    #[must_use]
    pub fn text(&self, css: &str) -> String {
        self.find(css).map(|e| e.text.clone()).unwrap_or_default()
    }

    /// Checked state of the first element answering to `css`
    #[must_use]
    pub fn is_checked(&self, css: &str) -> bool {
        self.find(css).is_some_and(|e| e.checked)
    }

    /// Replace text content
    pub fn set_text(&mut self, css: &str, text: impl Into<String>) {
        if let Some(el) = self.find_mut(css) {
            el.text = text.into();
        }
    }

    /// Replace an input value
    pub fn set_value(&mut self, css: &str, value: impl Into<String>) {
        if let Some(el) = self.find_mut(css) {
            el.value = value.into();
        }
    }

    /// Set checked state
    pub fn set_checked(&mut self, css: &str, checked: bool) {
        if let Some(el) = self.find_mut(css) {
            el.checked = checked;
        }
    }

    /// Enable or disable a control
    pub fn set_enabled(&mut self, css: &str, enabled: bool) {
        if let Some(el) = self.find_mut(css) {
            el.enabled = enabled;
        }
    }

    /// Set a computed style
    pub fn set_style(&mut self, css: &str, property: &str, value: &str) {
        if let Some(el) = self.find_mut(css) {
            let _ = el.styles.insert(property.to_string(), value.to_string());
        }
    }

    /// Render a hidden element
    pub fn show(&mut self, css: &str) {
        if let Some(el) = self.find_mut(css) {
            el.visible = true;
            el.appears_after = None;
        }
    }

    /// Stop rendering an element
    pub fn hide(&mut self, css: &str) {
        if let Some(el) = self.find_mut(css) {
            el.visible = false;
        }
    }

    /// Append an element
    pub fn push(&mut self, element: FakeElement) {
        self.page.elements.push(element);
    }

    /// Remove every element answering to `css`
    pub fn remove(&mut self, css: &str) {
        self.page.elements.retain(|e| !e.has_alias(css));
    }

    /// Count elements answering to `css`
    #[must_use]
    pub fn count(&self, css: &str) -> usize {
        self.page.elements.iter().filter(|e| e.has_alias(css)).count()
    }

    /// Replace the document title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.page.title = title.into();
    }

    /// Navigate once the reaction returns
    pub fn navigate(&mut self, path: impl Into<String>) {
        self.navigation = Some(path.into());
    }

    /// Shared app state
    #[must_use]
    pub fn state(&self) -> &AppState {
        self.state
    }

    /// Shared app state, mutable
    pub fn state_mut(&mut self) -> &mut AppState {
        self.state
    }
}

/// Routes of a fake web application
#[derive(Clone)]
pub struct FakeSite {
    base_url: String,
    routes: Vec<(String, Render)>,
    initial_state: AppState,
}

impl fmt::Debug for FakeSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeSite")
            .field("base_url", &self.base_url)
            .field(
                "routes",
                &self.routes.iter().map(|(p, _)| p).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl FakeSite {
    /// Site served at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            routes: Vec::new(),
            initial_state: AppState::new(),
        }
    }

    /// Route rendered from app state. Patterns accept `:param` and `*` segments.
    #[must_use]
    pub fn route<F>(mut self, pattern: impl Into<String>, render: F) -> Self
    where
        F: Fn(&AppState) -> FakePage + Send + Sync + 'static,
    {
        self.routes.push((pattern.into(), Arc::new(render)));
        self
    }

    /// Route with a fixed page
    #[must_use]
    pub fn page(self, pattern: impl Into<String>, page: FakePage) -> Self {
        self.route(pattern, move |_| page.clone())
    }

    /// Seed app state every new session starts from
    #[must_use]
    pub fn with_state(mut self, key: impl Into<String>, value: Value) -> Self {
        let _ = self.initial_state.insert(key.into(), value);
        self
    }

    /// Origin the site is served from
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Site-relative path for `url`, or `None` for other origins
    fn path_of(&self, url: &str) -> Option<String> {
        let rest = if url.starts_with("http://") || url.starts_with("https://") {
            url.strip_prefix(&self.base_url)?
        } else {
            url
        };
        let path = rest.split(['?', '#']).next().unwrap_or_default();
        if path.is_empty() {
            Some("/".to_string())
        } else if path.starts_with('/') {
            Some(path.to_string())
        } else {
            Some(format!("/{path}"))
        }
    }

    fn render(&self, path: &str, state: &AppState) -> FakePage {
        let exact = self.routes.iter().find(|(pattern, _)| pattern == path);
        let found = exact.or_else(|| {
            self.routes
                .iter()
                .find(|(pattern, _)| pattern.contains([':', '*']) && UrlMatcher::new(pattern).matches(path))
        });
        found.map_or_else(FakePage::not_found, |(_, render)| (render.as_ref())(state))
    }
}

struct Inner {
    url: String,
    page: FakePage,
    loaded_at: Instant,
    state: AppState,
    history: Vec<String>,
    calls: Vec<String>,
    closed: bool,
    query_faults: Vec<String>,
}

impl Inner {
    fn ensure_open(&self) -> PomarResult<()> {
        if self.closed {
            Err(PomarError::driver("session is closed"))
        } else {
            Ok(())
        }
    }

    fn take_query_fault(&mut self) -> PomarResult<()> {
        if self.query_faults.is_empty() {
            Ok(())
        } else {
            Err(PomarError::driver(self.query_faults.remove(0)))
        }
    }

    fn load(&mut self, site: &FakeSite, url: &str, push_history: bool) {
        let absolute = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}{}", site.base_url, site.path_of(url).unwrap_or_default())
        };
        if push_history && self.url != "about:blank" {
            self.history.push(self.url.clone());
        }
        self.page = site
            .path_of(&absolute)
            .map_or_else(|| FakePage::new(""), |path| site.render(&path, &self.state));
        self.url = absolute;
        self.loaded_at = Instant::now();
    }

    /// First rendered match, else first attached match
    fn target(&self, selector: &Selector) -> Option<usize> {
        let mut first = None;
        for (i, el) in self.page.elements.iter().enumerate() {
            if el.matches(selector) {
                if el.is_shown(self.loaded_at) {
                    return Some(i);
                }
                first = first.or(Some(i));
            }
        }
        first
    }

    fn require(&self, selector: &Selector) -> PomarResult<usize> {
        self.target(selector).ok_or_else(|| PomarError::ElementNotFound {
            selector: selector.to_string(),
            ms: 0,
            last_error: None,
        })
    }

    fn react(&mut self, site: &FakeSite, index: usize, event: &str) {
        let Some(reaction) = self
            .page
            .elements
            .get(index)
            .and_then(|e| e.reactions.get(event))
            .cloned()
        else {
            return;
        };
        let navigation = {
            let mut dom = Dom {
                page: &mut self.page,
                state: &mut self.state,
                navigation: None,
            };
            (reaction.as_ref())(&mut dom);
            dom.navigation
        };
        if let Some(path) = navigation {
            self.load(site, &path, true);
        }
    }
}

/// Scriptable in-memory [`BrowserSession`]
pub struct FakeBrowser {
    site: Arc<FakeSite>,
    inner: Mutex<Inner>,
}

impl fmt::Debug for FakeBrowser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("FakeBrowser")
            .field("site", &self.site.base_url)
            .field("url", &inner.url)
            .field("calls", &inner.calls.len())
            .finish()
    }
}

impl FakeBrowser {
    /// Fresh session on `site`, starting at `about:blank`
    #[must_use]
    pub fn new(site: Arc<FakeSite>) -> Self {
        let state = site.initial_state.clone();
        Self {
            site,
            inner: Mutex::new(Inner {
                url: "about:blank".to_string(),
                page: FakePage::new(""),
                loaded_at: Instant::now(),
                state,
                history: Vec::new(),
                calls: Vec::new(),
                closed: false,
                query_faults: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every session call so far, e.g. `goto:https://...`, `click(force):#btn`
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Whether any recorded call starts with `prefix`
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.lock().calls.iter().any(|c| c.starts_with(prefix))
    }

    /// Snapshot of the app state
    #[must_use]
    pub fn state(&self) -> AppState {
        self.lock().state.clone()
    }

    /// Make the next `times` visibility or count queries fail with `message`,
    /// the way a real page does while it is being replaced
    pub fn fail_queries(&self, times: usize, message: &str) {
        let mut inner = self.lock();
        inner
            .query_faults
            .extend(std::iter::repeat(message.to_string()).take(times));
    }

    /// Whether [`BrowserSession::close`] has run
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn element_op<T>(
        &self,
        call: String,
        selector: &Selector,
        op: impl FnOnce(&mut Inner, usize) -> PomarResult<T>,
    ) -> PomarResult<T> {
        let mut inner = self.lock();
        inner.ensure_open()?;
        inner.calls.push(call);
        let index = inner.require(selector)?;
        op(&mut inner, index)
    }

    fn input_op(&self, call: String, selector: &Selector, value: Option<&str>, event: &str) -> PomarResult<()> {
        let site = Arc::clone(&self.site);
        self.element_op(call, selector, |inner, index| {
            let el = &mut inner.page.elements[index];
            if !el.enabled {
                return Err(PomarError::driver(format!("{selector} is disabled")));
            }
            if let Some(value) = value {
                if !el.options.is_empty() && !el.options.iter().any(|o| o == value) {
                    return Err(PomarError::driver(format!(
                        "{selector} has no option '{value}'"
                    )));
                }
                el.value = value.to_string();
            } else {
                el.value.clear();
            }
            inner.react(&site, index, event);
            Ok(())
        })
    }
}

#[async_trait]
impl BrowserSession for FakeBrowser {
    async fn goto(&self, url: &str) -> PomarResult<()> {
        let mut inner = self.lock();
        inner.ensure_open()?;
        inner.calls.push(format!("goto:{url}"));
        inner.load(&self.site, url, true);
        Ok(())
    }

    async fn wait_for_load_state(&self, state: LoadState, timeout: Duration) -> PomarResult<()> {
        let pending = {
            let inner = self.lock();
            inner.ensure_open()?;
            if state != LoadState::NetworkIdle {
                return Ok(());
            }
            inner
                .page
                .idle_after
                .map(|d| d.saturating_sub(inner.loaded_at.elapsed()))
        };
        match pending {
            Some(wait) if wait <= timeout => {
                tokio::time::sleep(wait).await;
                Ok(())
            }
            _ => {
                tokio::time::sleep(timeout).await;
                Err(PomarError::Timeout {
                    ms: timeout.as_millis() as u64,
                })
            }
        }
    }

    async fn click(&self, selector: &Selector, force: bool) -> PomarResult<()> {
        let site = Arc::clone(&self.site);
        let call = if force {
            format!("click(force):{selector}")
        } else {
            format!("click:{selector}")
        };
        self.element_op(call, selector, |inner, index| {
            let loaded_at = inner.loaded_at;
            let el = &mut inner.page.elements[index];
            if !el.is_shown(loaded_at) {
                return Err(PomarError::ElementNotVisible {
                    selector: selector.to_string(),
                });
            }
            if el.obscured && !force {
                return Err(PomarError::driver(format!(
                    "{selector} is obscured by another element"
                )));
            }
            if !el.enabled {
                return Err(PomarError::driver(format!("{selector} is disabled")));
            }
            match el.attrs.get("type").map(String::as_str) {
                Some("checkbox") => el.checked = !el.checked,
                Some("radio") => el.checked = true,
                _ => {}
            }
            inner.react(&site, index, "click");
            Ok(())
        })
    }

    async fn fill(&self, selector: &Selector, value: &str) -> PomarResult<()> {
        self.input_op(format!("fill:{selector}"), selector, Some(value), "input")
    }

    async fn clear(&self, selector: &Selector) -> PomarResult<()> {
        self.input_op(format!("clear:{selector}"), selector, None, "input")
    }

    async fn press(&self, selector: &Selector, key: &str) -> PomarResult<()> {
        let site = Arc::clone(&self.site);
        self.element_op(format!("press:{selector}:{key}"), selector, |inner, index| {
            inner.react(&site, index, &format!("press:{key}"));
            Ok(())
        })
    }

    async fn select_option(&self, selector: &Selector, value: &str) -> PomarResult<()> {
        self.input_op(format!("select:{selector}"), selector, Some(value), "change")
    }

    async fn dispatch_event(&self, selector: &Selector, event: &str) -> PomarResult<()> {
        let site = Arc::clone(&self.site);
        self.element_op(format!("event:{selector}:{event}"), selector, |inner, index| {
            inner.react(&site, index, event);
            Ok(())
        })
    }

    async fn count(&self, selector: &Selector) -> PomarResult<usize> {
        let mut inner = self.lock();
        inner.ensure_open()?;
        inner.take_query_fault()?;
        Ok(inner
            .page
            .elements
            .iter()
            .filter(|e| e.matches(selector))
            .count())
    }

    async fn is_visible(&self, selector: &Selector) -> PomarResult<bool> {
        let mut inner = self.lock();
        inner.ensure_open()?;
        inner.take_query_fault()?;
        Ok(inner
            .target(selector)
            .is_some_and(|i| inner.page.elements[i].is_shown(inner.loaded_at)))
    }

    async fn is_enabled(&self, selector: &Selector) -> PomarResult<bool> {
        self.element_op(format!("enabled:{selector}"), selector, |inner, index| {
            Ok(inner.page.elements[index].enabled)
        })
    }

    async fn is_checked(&self, selector: &Selector) -> PomarResult<bool> {
        self.element_op(format!("checked:{selector}"), selector, |inner, index| {
            Ok(inner.page.elements[index].checked)
        })
    }

    async fn text_content(&self, selector: &Selector) -> PomarResult<String> {
        self.element_op(format!("text:{selector}"), selector, |inner, index| {
            Ok(inner.page.elements[index].text.clone())
        })
    }

    async fn all_text_contents(&self, selector: &Selector) -> PomarResult<Vec<String>> {
        let inner = self.lock();
        inner.ensure_open()?;
        Ok(inner
            .page
            .elements
            .iter()
            .filter(|e| e.matches(selector))
            .map(|e| e.text.clone())
            .collect())
    }

    async fn input_value(&self, selector: &Selector) -> PomarResult<String> {
        self.element_op(format!("value:{selector}"), selector, |inner, index| {
            Ok(inner.page.elements[index].value.clone())
        })
    }

    async fn attribute(&self, selector: &Selector, name: &str) -> PomarResult<Option<String>> {
        self.element_op(format!("attr:{selector}:{name}"), selector, |inner, index| {
            Ok(inner.page.elements[index].attrs.get(name).cloned())
        })
    }

    async fn css_value(&self, selector: &Selector, property: &str) -> PomarResult<String> {
        self.element_op(format!("css:{selector}:{property}"), selector, |inner, index| {
            Ok(inner.page.elements[index]
                .styles
                .get(property)
                .cloned()
                .unwrap_or_default())
        })
    }

    async fn current_url(&self) -> PomarResult<String> {
        let inner = self.lock();
        inner.ensure_open()?;
        Ok(inner.url.clone())
    }

    async fn title(&self) -> PomarResult<String> {
        let inner = self.lock();
        inner.ensure_open()?;
        Ok(inner.page.title.clone())
    }

    async fn screenshot(&self) -> PomarResult<Vec<u8>> {
        let mut inner = self.lock();
        inner.ensure_open()?;
        inner.calls.push("screenshot".to_string());
        Ok(FAKE_PNG.to_vec())
    }

    async fn reload(&self) -> PomarResult<()> {
        let mut inner = self.lock();
        inner.ensure_open()?;
        inner.calls.push("reload".to_string());
        let url = inner.url.clone();
        inner.load(&self.site, &url, false);
        Ok(())
    }

    async fn go_back(&self) -> PomarResult<()> {
        let mut inner = self.lock();
        inner.ensure_open()?;
        inner.calls.push("back".to_string());
        if let Some(previous) = inner.history.pop() {
            inner.load(&self.site, &previous, false);
        }
        Ok(())
    }

    async fn close(&self) -> PomarResult<()> {
        let mut inner = self.lock();
        inner.calls.push("close".to_string());
        inner.closed = true;
        Ok(())
    }
}

/// Opens a fresh [`FakeBrowser`] per scenario attempt
#[derive(Debug)]
pub struct FakeSessionFactory {
    site: Arc<FakeSite>,
    opened: AtomicUsize,
}

impl FakeSessionFactory {
    /// Factory serving `site`
    #[must_use]
    pub fn new(site: FakeSite) -> Self {
        Self {
            site: Arc::new(site),
            opened: AtomicUsize::new(0),
        }
    }

    /// Number of sessions handed out
    #[must_use]
    pub fn sessions_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionFactory for FakeSessionFactory {
    async fn new_session(&self) -> PomarResult<Box<dyn BrowserSession>> {
        let _ = self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeBrowser::new(Arc::clone(&self.site))))
    }

    fn backend(&self) -> &str {
        "fake"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn counter_site() -> FakeSite {
        FakeSite::new("https://app.test/")
            .with_state("clicks", json!(0))
            .route("/", |state| {
                let clicks = state.get("clicks").and_then(Value::as_u64).unwrap_or(0);
                FakePage::new("Counter")
                    .element(FakeElement::new("#count").text(clicks.to_string()))
                    .element(FakeElement::new("#name").data_test("name"))
                    .element(FakeElement::new("#increment").on_click(|dom| {
                        let next = dom.state()["clicks"].as_u64().unwrap_or(0) + 1;
                        let _ = dom.state_mut().insert("clicks".into(), json!(next));
                        dom.set_text("#count", next.to_string());
                    }))
                    .element(FakeElement::new("#next").on_click(|dom| dom.navigate("/next")))
                    .element(FakeElement::new("#covered").obscured())
            })
            .page("/next", FakePage::new("Next"))
            .page("/users/:id", FakePage::new("User"))
    }

    async fn open(site: FakeSite) -> FakeBrowser {
        let browser = FakeBrowser::new(Arc::new(site));
        browser.goto("https://app.test/").await.unwrap();
        browser
    }

    mod navigation_tests {
        use super::*;

        #[tokio::test]
        async fn test_goto_renders_route() {
            let browser = open(counter_site()).await;
            assert_eq!(browser.title().await.unwrap(), "Counter");
            assert_eq!(browser.current_url().await.unwrap(), "https://app.test/");
        }

        #[tokio::test]
        async fn test_unknown_route_is_not_found_page() {
            let browser = open(counter_site()).await;
            browser.goto("/missing").await.unwrap();
            assert_eq!(browser.title().await.unwrap(), "404 Not Found");
        }

        #[tokio::test]
        async fn test_pattern_route() {
            let browser = open(counter_site()).await;
            browser.goto("/users/42?tab=1").await.unwrap();
            assert_eq!(browser.title().await.unwrap(), "User");
        }

        #[tokio::test]
        async fn test_click_navigation_and_back() {
            let browser = open(counter_site()).await;
            browser.click(&Selector::css("#next"), false).await.unwrap();
            assert_eq!(browser.title().await.unwrap(), "Next");
            browser.go_back().await.unwrap();
            assert_eq!(browser.title().await.unwrap(), "Counter");
        }

        #[tokio::test]
        async fn test_never_idle_times_out() {
            let site = FakeSite::new("https://app.test").page("/", FakePage::new("Busy").never_idle());
            let browser = open(site).await;
            let err = browser
                .wait_for_load_state(LoadState::NetworkIdle, Duration::from_millis(20))
                .await
                .unwrap_err();
            assert!(matches!(err, PomarError::Timeout { ms: 20 }));
            assert!(browser
                .wait_for_load_state(LoadState::Load, Duration::from_millis(20))
                .await
                .is_ok());
        }
    }

    mod element_tests {
        use super::*;

        #[tokio::test]
        async fn test_click_reaction_updates_state_and_dom() {
            let browser = open(counter_site()).await;
            let button = Selector::css("#increment");
            browser.click(&button, false).await.unwrap();
            browser.click(&button, false).await.unwrap();
            assert_eq!(browser.text_content(&Selector::css("#count")).await.unwrap(), "2");
            assert_eq!(browser.state()["clicks"], json!(2));
        }

        #[tokio::test]
        async fn test_state_survives_rerender() {
            let browser = open(counter_site()).await;
            browser.click(&Selector::css("#increment"), false).await.unwrap();
            browser.reload().await.unwrap();
            assert_eq!(browser.text_content(&Selector::css("#count")).await.unwrap(), "1");
        }

        #[tokio::test]
        async fn test_obscured_needs_force() {
            let browser = open(counter_site()).await;
            let covered = Selector::css("#covered");
            assert!(browser.click(&covered, false).await.is_err());
            assert!(browser.click(&covered, true).await.is_ok());
            assert!(browser.was_called("click(force):#covered"));
        }

        #[tokio::test]
        async fn test_fill_by_data_test_alias() {
            let browser = open(counter_site()).await;
            browser.fill(&Selector::data_test("name"), "Ada").await.unwrap();
            assert_eq!(browser.input_value(&Selector::css("#name")).await.unwrap(), "Ada");
        }

        #[tokio::test]
        async fn test_missing_element() {
            let browser = open(counter_site()).await;
            let missing = Selector::css("#nope");
            assert!(!browser.is_visible(&missing).await.unwrap());
            assert_eq!(browser.count(&missing).await.unwrap(), 0);
            assert!(matches!(
                browser.text_content(&missing).await.unwrap_err(),
                PomarError::ElementNotFound { .. }
            ));
        }

        #[tokio::test]
        async fn test_select_option_rejects_unknown_value() {
            let site = FakeSite::new("https://app.test").page(
                "/",
                FakePage::new("Form").element(FakeElement::new("#sort").options(["az", "za"])),
            );
            let browser = open(site).await;
            let sort = Selector::css("#sort");
            browser.select_option(&sort, "za").await.unwrap();
            assert_eq!(browser.input_value(&sort).await.unwrap(), "za");
            assert!(browser.select_option(&sort, "lohi").await.is_err());
        }

        #[tokio::test]
        async fn test_checkbox_toggles() {
            let site = FakeSite::new("https://app.test").page(
                "/",
                FakePage::new("Form").element(FakeElement::new("#remember").attr("type", "checkbox")),
            );
            let browser = open(site).await;
            let remember = Selector::css("#remember");
            browser.click(&remember, false).await.unwrap();
            assert!(browser.is_checked(&remember).await.unwrap());
        }

        #[tokio::test]
        async fn test_closed_session_refuses_work() {
            let browser = open(counter_site()).await;
            browser.close().await.unwrap();
            assert!(browser.is_closed());
            assert!(browser.title().await.is_err());
        }
    }

    #[tokio::test]
    async fn test_factory_isolates_sessions() {
        let factory = FakeSessionFactory::new(counter_site());
        let first = factory.new_session().await.unwrap();
        first.goto("/").await.unwrap();
        first.click(&Selector::css("#increment"), false).await.unwrap();
        let second = factory.new_session().await.unwrap();
        second.goto("/").await.unwrap();
        assert_eq!(second.text_content(&Selector::css("#count")).await.unwrap(), "0");
        assert_eq!(factory.sessions_opened(), 2);
    }
}
