//! Chromium backend over the Chrome DevTools Protocol.
//!
//! One browser process per [`ChromiumFactory`]; every session gets its own
//! browser context, so cookies and storage never leak between scenarios.
//! Element operations are evaluated in the page against
//! [`Selector::to_query`], which keeps the CSS, text and XPath forms in one
//! place.

#![allow(clippy::module_name_repetitions)]

use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::input::{DispatchKeyEventParams, DispatchKeyEventType};
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, CaptureScreenshotParams};
use chromiumoxide::cdp::browser_protocol::target::{
    BrowserContextId, CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::config::SuiteConfig;
use crate::locator::Selector;
use crate::result::{PomarError, PomarResult};
use crate::session::{BrowserSession, SessionFactory};
use crate::wait::{Deadline, LoadState, DEFAULT_POLL_INTERVAL_MS, NETWORK_IDLE_THRESHOLD_MS};

/// Launch settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromiumConfig {
    /// Run without a window
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Explicit chromium binary
    pub chromium_path: Option<PathBuf>,
    /// Keep the chromium sandbox on
    pub sandbox: bool,
    /// Delay before every operation
    pub slow_mo: Duration,
}

impl Default for ChromiumConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            chromium_path: None,
            sandbox: true,
            slow_mo: Duration::ZERO,
        }
    }
}

impl ChromiumConfig {
    /// Settings taken from a suite configuration
    #[must_use]
    pub fn from_suite(config: &SuiteConfig) -> Self {
        Self {
            headless: config.headless,
            slow_mo: config.slow_mo,
            ..Self::default()
        }
    }

    /// Use a specific chromium binary
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable the sandbox (containers, CI)
    #[must_use]
    pub const fn without_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

fn cdp_error(e: impl std::fmt::Display) -> PomarError {
    PomarError::driver(e.to_string())
}

/// Owns the browser process and hands out isolated sessions
#[derive(Debug)]
pub struct ChromiumFactory {
    config: ChromiumConfig,
    browser: Arc<Mutex<CdpBrowser>>,
    handler: tokio::task::JoinHandle<()>,
}

impl ChromiumFactory {
    /// Launch chromium
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::BrowserLaunch`] when chromium cannot be found or
    /// started.
    pub async fn launch(config: ChromiumConfig) -> PomarResult<Self> {
        let mut builder = CdpConfig::builder().window_size(config.viewport_width, config.viewport_height);
        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(path) = &config.chromium_path {
            builder = builder.chrome_executable(path);
        }
        let cdp_config = builder
            .build()
            .map_err(|message| PomarError::BrowserLaunch { message })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| PomarError::BrowserLaunch {
                    message: e.to_string(),
                })?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });
        tracing::info!(headless = config.headless, "chromium launched");

        Ok(Self {
            config,
            browser: Arc::new(Mutex::new(browser)),
            handler,
        })
    }

    /// Launch settings
    #[must_use]
    pub const fn config(&self) -> &ChromiumConfig {
        &self.config
    }

    /// Close the browser process
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::Driver`] if chromium does not shut down cleanly.
    pub async fn shutdown(self) -> PomarResult<()> {
        let mut browser = self.browser.lock().await;
        let _ = browser.close().await.map_err(cdp_error)?;
        let _ = browser.wait().await;
        self.handler.abort();
        Ok(())
    }
}

#[async_trait]
impl SessionFactory for ChromiumFactory {
    async fn new_session(&self) -> PomarResult<Box<dyn BrowserSession>> {
        let browser = self.browser.lock().await;
        let context = browser
            .execute(CreateBrowserContextParams::default())
            .await
            .map_err(|e| PomarError::BrowserLaunch {
                message: e.to_string(),
            })?;
        let context_id = context.browser_context_id.clone();
        let target = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(context_id.clone())
            .build()
            .map_err(|message| PomarError::BrowserLaunch { message })?;
        let page = browser
            .new_page(target)
            .await
            .map_err(|e| PomarError::BrowserLaunch {
                message: e.to_string(),
            })?;
        drop(browser);

        Ok(Box::new(ChromiumSession {
            page,
            browser: Arc::clone(&self.browser),
            context: context_id,
            slow_mo: self.config.slow_mo,
        }))
    }

    fn backend(&self) -> &str {
        "chromium"
    }
}

#[derive(Debug, Deserialize)]
struct Lookup<T> {
    #[serde(default)]
    missing: bool,
    value: Option<T>,
}

/// One isolated browser context with a single page
#[derive(Debug)]
pub struct ChromiumSession {
    page: CdpPage,
    browser: Arc<Mutex<CdpBrowser>>,
    context: BrowserContextId,
    slow_mo: Duration,
}

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

impl ChromiumSession {
    async fn pace(&self) {
        if !self.slow_mo.is_zero() {
            tokio::time::sleep(self.slow_mo).await;
        }
    }

    async fn eval<T: DeserializeOwned>(&self, script: &str) -> PomarResult<T> {
        let result = self.page.evaluate(script).await.map_err(cdp_error)?;
        result.into_value().map_err(cdp_error)
    }

    /// Run `body` with `el` bound to the first match
    async fn on_element<T: DeserializeOwned>(&self, selector: &Selector, body: &str) -> PomarResult<Option<T>> {
        let script = format!(
            "(() => {{ const el = {}; if (!el) {{ return {{ missing: true }}; }} \
             const value = (() => {{ {body} }})(); return {{ value: value === undefined ? null : value }}; }})()",
            selector.to_query()
        );
        let lookup: Lookup<T> = self.eval(&script).await?;
        if lookup.missing {
            return Err(PomarError::ElementNotFound {
                selector: selector.to_string(),
                ms: 0,
                last_error: None,
            });
        }
        Ok(lookup.value)
    }

    async fn on_element_status(&self, selector: &Selector, body: &str) -> PomarResult<String> {
        Ok(self.on_element::<String>(selector, body).await?.unwrap_or_default())
    }

    async fn load_state_reached(&self, state: LoadState) -> PomarResult<bool> {
        let script = match state {
            LoadState::DomContentLoaded => "document.readyState !== 'loading'",
            LoadState::Load | LoadState::NetworkIdle => "document.readyState === 'complete'",
        };
        self.eval(script).await
    }

    async fn resource_count(&self) -> PomarResult<usize> {
        self.eval("performance.getEntriesByType('resource').length").await
    }

    async fn key_event(&self, kind: DispatchKeyEventType, key: &str) -> PomarResult<()> {
        let mut params = DispatchKeyEventParams::builder().r#type(kind.clone()).key(key);
        let text = match key {
            "Enter" => Some("\r".to_string()),
            "Tab" => Some("\t".to_string()),
            k if k.chars().count() == 1 => Some(k.to_string()),
            _ => None,
        };
        if kind == DispatchKeyEventType::KeyDown {
            if let Some(text) = text {
                params = params.text(text);
            }
        }
        if key == "Enter" {
            params = params.windows_virtual_key_code(13).native_virtual_key_code(13);
        }
        let params = params.build().map_err(PomarError::driver)?;
        let _ = self.page.execute(params).await.map_err(cdp_error)?;
        Ok(())
    }
}

const VISIBLE_JS: &str = "const s = getComputedStyle(el); const r = el.getBoundingClientRect(); \
     return s.visibility !== 'hidden' && s.display !== 'none' && (r.width > 0 || r.height > 0);";

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn goto(&self, url: &str) -> PomarResult<()> {
        self.pace().await;
        let _ = self
            .page
            .goto(url)
            .await
            .map_err(|e| PomarError::NavigationError {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn wait_for_load_state(&self, state: LoadState, timeout: Duration) -> PomarResult<()> {
        let deadline = Deadline::new(timeout, Duration::from_millis(DEFAULT_POLL_INTERVAL_MS));
        let quiet = Duration::from_millis(NETWORK_IDLE_THRESHOLD_MS);
        let mut last_count = None;
        let mut quiet_since = Instant::now();
        loop {
            if self.load_state_reached(state).await? {
                if state != LoadState::NetworkIdle {
                    return Ok(());
                }
                let count = self.resource_count().await?;
                if last_count == Some(count) {
                    if quiet_since.elapsed() >= quiet {
                        return Ok(());
                    }
                } else {
                    last_count = Some(count);
                    quiet_since = Instant::now();
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

    async fn click(&self, selector: &Selector, force: bool) -> PomarResult<()> {
        self.pace().await;
        let body = format!(
            "el.scrollIntoView({{ block: 'center', inline: 'center' }}); \
             if (!{force}) {{ \
               const r = el.getBoundingClientRect(); \
               if (r.width === 0 && r.height === 0) {{ return 'hidden'; }} \
               const top = document.elementFromPoint(r.left + r.width / 2, r.top + r.height / 2); \
               if (top && top !== el && !el.contains(top)) {{ return 'obscured'; }} \
               if (el.disabled) {{ return 'disabled'; }} \
             }} \
             el.click(); return 'ok';"
        );
        match self.on_element_status(selector, &body).await?.as_str() {
            "ok" => Ok(()),
            "hidden" => Err(PomarError::ElementNotVisible {
                selector: selector.to_string(),
            }),
            other => Err(PomarError::ClickFailed {
                selector: selector.to_string(),
                message: format!("element is {other}"),
            }),
        }
    }

    async fn fill(&self, selector: &Selector, value: &str) -> PomarResult<()> {
        self.pace().await;
        let body = format!(
            "if (el.disabled || el.readOnly) {{ return 'disabled'; }} \
             el.focus(); \
             const proto = el instanceof HTMLTextAreaElement ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype; \
             const desc = Object.getOwnPropertyDescriptor(proto, 'value'); \
             if (desc && desc.set && (el instanceof HTMLInputElement || el instanceof HTMLTextAreaElement)) {{ desc.set.call(el, {v}); }} \
             else {{ el.value = {v}; }} \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             return 'ok';",
            v = js_string(value)
        );
        match self.on_element_status(selector, &body).await?.as_str() {
            "ok" => Ok(()),
            other => Err(PomarError::driver(format!("cannot fill {selector}: element is {other}"))),
        }
    }

    async fn clear(&self, selector: &Selector) -> PomarResult<()> {
        self.fill(selector, "").await
    }

    async fn press(&self, selector: &Selector, key: &str) -> PomarResult<()> {
        self.pace().await;
        let _: Option<bool> = self.on_element(selector, "el.focus(); return true;").await?;
        self.key_event(DispatchKeyEventType::KeyDown, key).await?;
        self.key_event(DispatchKeyEventType::KeyUp, key).await
    }

    async fn select_option(&self, selector: &Selector, value: &str) -> PomarResult<()> {
        self.pace().await;
        let body = format!(
            "const v = {v}; \
             if (el.options && !Array.from(el.options).some(o => o.value === v || o.text === v)) {{ return 'no-option'; }} \
             const match = el.options ? Array.from(el.options).find(o => o.value === v || o.text === v) : null; \
             el.value = match ? match.value : v; \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             return 'ok';",
            v = js_string(value)
        );
        match self.on_element_status(selector, &body).await?.as_str() {
            "ok" => Ok(()),
            _ => Err(PomarError::driver(format!("{selector} has no option '{value}'"))),
        }
    }

    async fn dispatch_event(&self, selector: &Selector, event: &str) -> PomarResult<()> {
        self.pace().await;
        let body = format!(
            "const name = {e}; \
             const init = {{ bubbles: true, cancelable: true }}; \
             el.dispatchEvent(/^(click|dblclick|mouse)/.test(name) ? new MouseEvent(name, init) : new Event(name, init)); \
             return true;",
            e = js_string(event)
        );
        let _: Option<bool> = self.on_element(selector, &body).await?;
        Ok(())
    }

    async fn count(&self, selector: &Selector) -> PomarResult<usize> {
        self.eval(&selector.to_count_query()).await
    }

    async fn is_visible(&self, selector: &Selector) -> PomarResult<bool> {
        match self.on_element::<bool>(selector, VISIBLE_JS).await {
            Ok(visible) => Ok(visible.unwrap_or(false)),
            Err(PomarError::ElementNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn is_enabled(&self, selector: &Selector) -> PomarResult<bool> {
        Ok(self
            .on_element::<bool>(selector, "return !el.disabled;")
            .await?
            .unwrap_or(true))
    }

    async fn is_checked(&self, selector: &Selector) -> PomarResult<bool> {
        Ok(self
            .on_element::<bool>(selector, "return !!el.checked;")
            .await?
            .unwrap_or(false))
    }

    async fn text_content(&self, selector: &Selector) -> PomarResult<String> {
        Ok(self
            .on_element::<String>(selector, "return el.textContent || '';")
            .await?
            .unwrap_or_default())
    }

    async fn all_text_contents(&self, selector: &Selector) -> PomarResult<Vec<String>> {
        let script = format!(
            "Array.from({}).map(e => e.textContent || '')",
            selector.to_all_query()
        );
        self.eval(&script).await
    }

    async fn input_value(&self, selector: &Selector) -> PomarResult<String> {
        Ok(self
            .on_element::<String>(selector, "return el.value === undefined ? '' : String(el.value);")
            .await?
            .unwrap_or_default())
    }

    async fn attribute(&self, selector: &Selector, name: &str) -> PomarResult<Option<String>> {
        let body = format!("return el.getAttribute({});", js_string(name));
        self.on_element::<String>(selector, &body).await
    }

    async fn css_value(&self, selector: &Selector, property: &str) -> PomarResult<String> {
        let body = format!(
            "return getComputedStyle(el).getPropertyValue({});",
            js_string(property)
        );
        Ok(self.on_element::<String>(selector, &body).await?.unwrap_or_default())
    }

    async fn current_url(&self) -> PomarResult<String> {
        self.eval("window.location.href").await
    }

    async fn title(&self) -> PomarResult<String> {
        self.eval("document.title").await
    }

    async fn screenshot(&self) -> PomarResult<Vec<u8>> {
        use base64::Engine;

        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let shot = self.page.execute(params).await.map_err(cdp_error)?;
        base64::engine::general_purpose::STANDARD
            .decode(&shot.data)
            .map_err(cdp_error)
    }

    async fn reload(&self) -> PomarResult<()> {
        self.pace().await;
        let _ = self.page.reload().await.map_err(cdp_error)?;
        Ok(())
    }

    async fn go_back(&self) -> PomarResult<()> {
        self.pace().await;
        let _: bool = self.eval("(() => { history.back(); return true; })()").await?;
        Ok(())
    }

    async fn close(&self) -> PomarResult<()> {
        let page = self.page.clone();
        page.close().await.map_err(cdp_error)?;
        let browser = self.browser.lock().await;
        let _ = browser
            .execute(DisposeBrowserContextParams::new(self.context.clone()))
            .await
            .map_err(cdp_error)?;
        Ok(())
    }
}
