//! Suite configuration.
//!
//! Every suite resolves one immutable [`SuiteConfig`] before any scenario
//! runs, then hands it to drivers and fixtures. Values come from environment
//! variables with hard-coded fallbacks. Suite-prefixed variables
//! (`SAUCEDEMO_BASE_URL`) win over unprefixed ones (`BASE_URL`), which win
//! over the defaults compiled into the suite.
//!
//! | variable | meaning |
//! |---|---|
//! | `BASE_URL` | system under test |
//! | `USERNAME`, `PASSWORD` (also `DEFAULT_USERNAME`, `ADMIN_USERNAME`, ...) | credentials |
//! | `TIMEOUT` | element action timeout (ms) |
//! | `NAVIGATION_TIMEOUT`, `ASSERTION_TIMEOUT`, `PRESENCE_TIMEOUT`, `SCENARIO_TIMEOUT` | ms |
//! | `HEADLESS`, `SLOW_MO` | browser launch |
//! | `RETRIES`, `WORKERS` | runner |
//! | `ENABLE_TRACE`, `ENABLE_VIDEO`, `ENABLE_SCREENSHOTS` | capture |
//! | `FORCE_CLICK_FALLBACK` | retry obscured clicks with force |
//! | `ARTIFACTS_DIR` | screenshots, traces, reports |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::result::{PomarError, PomarResult};

/// Timeouts applied by drivers and the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeouts {
    /// Wait for an element before acting on it
    pub action: Duration,
    /// Wait for a page to go network-idle
    pub navigation: Duration,
    /// Retry window of auto-retrying expectations
    pub assertion: Duration,
    /// Window of tolerant presence checks (`is_visible`)
    pub presence: Duration,
    /// Whole-scenario budget
    pub scenario: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            action: Duration::from_millis(10_000),
            navigation: Duration::from_millis(30_000),
            assertion: Duration::from_millis(10_000),
            presence: Duration::from_millis(2_000),
            scenario: Duration::from_millis(60_000),
        }
    }
}

impl Timeouts {
    /// Same timeout everywhere; handy in tests
    #[must_use]
    pub const fn uniform(timeout: Duration) -> Self {
        Self {
            action: timeout,
            navigation: timeout,
            assertion: timeout,
            presence: timeout,
            scenario: timeout,
        }
    }
}

/// What to capture while scenarios run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSettings {
    /// Record an action trace and keep it when a scenario fails
    pub trace: bool,
    /// Record video. No backend supports it; enabling it logs a warning
    pub video: bool,
    /// Screenshot on failure
    pub screenshots: bool,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            trace: false,
            video: false,
            screenshots: true,
        }
    }
}

/// Username/password pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Username
    pub username: String,
    /// Password
    #[serde(skip_serializing)]
    pub password: String,
}

impl Credentials {
    /// Create credentials
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Hard-coded fallbacks compiled into a suite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteDefaults {
    /// Suite name, also the environment prefix source
    pub name: &'static str,
    /// Default system under test
    pub base_url: &'static str,
    /// Default username
    pub username: &'static str,
    /// Default password
    pub password: &'static str,
}

impl SuiteDefaults {
    /// Defaults without credentials
    #[must_use]
    pub const fn new(name: &'static str, base_url: &'static str) -> Self {
        Self {
            name,
            base_url,
            username: "",
            password: "",
        }
    }

    /// Attach default credentials
    #[must_use]
    pub const fn with_credentials(mut self, username: &'static str, password: &'static str) -> Self {
        self.username = username;
        self.password = password;
        self
    }
}

/// Resolved configuration of one suite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Suite name
    pub suite: String,
    /// System under test
    pub base_url: String,
    /// Default credentials
    pub credentials: Credentials,
    /// Timeouts
    pub timeouts: Timeouts,
    /// Capture settings
    pub capture: CaptureSettings,
    /// Launch the browser without a window
    pub headless: bool,
    /// Delay inserted between browser operations
    pub slow_mo: Duration,
    /// Whole-scenario retries
    pub retries: u32,
    /// Concurrent scenarios (0 = one per CPU)
    pub workers: usize,
    /// Retry obscured clicks once with forced activation
    pub force_click_fallback: bool,
    /// Where screenshots, traces and reports go
    pub artifacts_dir: PathBuf,
}

impl SuiteConfig {
    /// Configuration from defaults alone
    #[must_use]
    pub fn new(defaults: &SuiteDefaults) -> Self {
        Self {
            suite: defaults.name.to_string(),
            base_url: defaults.base_url.trim_end_matches('/').to_string(),
            credentials: Credentials::new(defaults.username, defaults.password),
            timeouts: Timeouts::default(),
            capture: CaptureSettings::default(),
            headless: true,
            slow_mo: Duration::ZERO,
            retries: 0,
            workers: 0,
            force_click_fallback: true,
            artifacts_dir: PathBuf::from("test-results"),
        }
    }

    /// Configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::Config`] when a variable is set to an unparsable value.
    pub fn from_env(defaults: &SuiteDefaults) -> PomarResult<Self> {
        Self::from_lookup(defaults, |key| std::env::var(key).ok())
    }

    /// Configuration from an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::Config`] when a variable is set to an unparsable value.
    pub fn from_lookup<F>(defaults: &SuiteDefaults, lookup: F) -> PomarResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Lookup {
            prefix: env_prefix(defaults.name),
            lookup,
        };
        let mut config = Self::new(defaults);

        if let Some(url) = env.string(&["BASE_URL"]) {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(username) = env.string(&["USERNAME", "DEFAULT_USERNAME", "ADMIN_USERNAME"]) {
            config.credentials.username = username;
        }
        if let Some(password) = env.string(&["PASSWORD", "DEFAULT_PASSWORD", "ADMIN_PASSWORD"]) {
            config.credentials.password = password;
        }

        let t = &mut config.timeouts;
        t.action = env.millis("TIMEOUT")?.unwrap_or(t.action);
        t.navigation = env.millis("NAVIGATION_TIMEOUT")?.unwrap_or(t.navigation);
        t.assertion = env.millis("ASSERTION_TIMEOUT")?.unwrap_or(t.assertion);
        t.presence = env.millis("PRESENCE_TIMEOUT")?.unwrap_or(t.presence);
        t.scenario = env.millis("SCENARIO_TIMEOUT")?.unwrap_or(t.scenario);

        config.headless = env.flag("HEADLESS")?.unwrap_or(config.headless);
        config.slow_mo = env.millis("SLOW_MO")?.unwrap_or(config.slow_mo);
        config.retries = env.number("RETRIES")?.unwrap_or(u64::from(config.retries)) as u32;
        config.workers = env.number("WORKERS")?.unwrap_or(config.workers as u64) as usize;
        config.force_click_fallback = env
            .flag("FORCE_CLICK_FALLBACK")?
            .unwrap_or(config.force_click_fallback);
        config.capture.trace = env.flag("ENABLE_TRACE")?.unwrap_or(config.capture.trace);
        config.capture.video = env.flag("ENABLE_VIDEO")?.unwrap_or(config.capture.video);
        config.capture.screenshots = env
            .flag("ENABLE_SCREENSHOTS")?
            .unwrap_or(config.capture.screenshots);
        if let Some(dir) = env.string(&["ARTIFACTS_DIR"]) {
            config.artifacts_dir = PathBuf::from(dir);
        }

        for key in config.ignored_settings() {
            tracing::warn!(suite = defaults.name, key, "setting has no effect on the browser backend");
        }
        Ok(config)
    }

    /// Requested settings that no session backend honours
    #[must_use]
    pub fn ignored_settings(&self) -> Vec<&'static str> {
        let mut ignored = Vec::new();
        if self.capture.video {
            ignored.push("ENABLE_VIDEO");
        }
        ignored
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override timeouts
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Override retries
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Override headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Override capture settings
    #[must_use]
    pub const fn with_capture(mut self, capture: CaptureSettings) -> Self {
        self.capture = capture;
        self
    }

    /// Enable or disable the forced-click fallback
    #[must_use]
    pub const fn with_force_click_fallback(mut self, enabled: bool) -> Self {
        self.force_click_fallback = enabled;
        self
    }

    /// Override the artifacts directory
    #[must_use]
    pub fn with_artifacts_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.artifacts_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Absolute URL for a site-relative path; absolute URLs pass through
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.is_empty() {
            format!("{}/", self.base_url)
        } else if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

/// Environment prefix for a suite name: `contact-list` → `CONTACT_LIST`
#[must_use]
pub fn env_prefix(suite: &str) -> String {
    suite
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Load a `.env` file from the working directory or its parents.
///
/// Returns the path that was loaded; a missing file is not an error.
///
/// # Errors
///
/// Returns [`PomarError::Config`] when the file exists but cannot be read
/// or parsed.
pub fn load_dotenv() -> PomarResult<Option<PathBuf>> {
    dotenv_outcome(dotenvy::dotenv())
}

/// Load a specific `.env`-style file
///
/// # Errors
///
/// Returns [`PomarError::Config`] when the file exists but cannot be read
/// or parsed.
pub fn load_dotenv_from(path: &Path) -> PomarResult<Option<PathBuf>> {
    dotenv_outcome(dotenvy::from_path(path).map(|()| path.to_path_buf()))
}

fn dotenv_outcome(result: dotenvy::Result<PathBuf>) -> PomarResult<Option<PathBuf>> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(PomarError::config(format!("unreadable .env: {err}"))),
    }
}

struct Lookup<F> {
    prefix: String,
    lookup: F,
}

impl<F> Lookup<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// First non-empty value among `<PREFIX>_<key>` then `<key>` for each key
    fn string(&self, keys: &[&str]) -> Option<String> {
        let prefixed = keys.iter().map(|k| format!("{}_{k}", self.prefix));
        let plain = keys.iter().map(|k| (*k).to_string());
        prefixed
            .chain(plain)
            .filter_map(|k| (self.lookup)(&k))
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty())
    }

    fn number(&self, key: &str) -> PomarResult<Option<u64>> {
        self.string(&[key])
            .map(|raw| {
                raw.parse::<u64>().map_err(|_| {
                    PomarError::config(format!("{key} must be a non-negative integer, got '{raw}'"))
                })
            })
            .transpose()
    }

    fn millis(&self, key: &str) -> PomarResult<Option<Duration>> {
        Ok(self.number(key)?.map(Duration::from_millis))
    }

    fn flag(&self, key: &str) -> PomarResult<Option<bool>> {
        self.string(&[key])
            .map(|raw| match raw.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(PomarError::config(format!(
                    "{key} must be true or false, got '{raw}'"
                ))),
            })
            .transpose()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const DEFAULTS: SuiteDefaults =
        SuiteDefaults::new("contact-list", "https://contacts.test/").with_credentials("admin", "admin");

    fn from_pairs(pairs: &[(&str, &str)]) -> PomarResult<SuiteConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        SuiteConfig::from_lookup(&DEFAULTS, |k| vars.get(k).cloned())
    }

    mod precedence_tests {
        use super::*;

        #[test]
        fn test_defaults_when_environment_is_empty() {
            let config = from_pairs(&[]).unwrap();
            assert_eq!(config, SuiteConfig::new(&DEFAULTS));
            assert_eq!(config.base_url, "https://contacts.test");
            assert_eq!(config.credentials.username, "admin");
            assert!(config.headless);
        }

        #[test]
        fn test_unprefixed_overrides_default() {
            let config = from_pairs(&[("BASE_URL", "https://staging.test")]).unwrap();
            assert_eq!(config.base_url, "https://staging.test");
        }

        #[test]
        fn test_prefixed_overrides_unprefixed() {
            let config = from_pairs(&[
                ("BASE_URL", "https://staging.test"),
                ("CONTACT_LIST_BASE_URL", "https://contacts.local/"),
            ])
            .unwrap();
            assert_eq!(config.base_url, "https://contacts.local");
        }

        #[test]
        fn test_blank_values_are_ignored() {
            let config = from_pairs(&[("CONTACT_LIST_BASE_URL", "  "), ("BASE_URL", "https://b.test")])
                .unwrap();
            assert_eq!(config.base_url, "https://b.test");
        }

        #[test]
        fn test_credential_aliases() {
            let config = from_pairs(&[("DEFAULT_USERNAME", "booker"), ("ADMIN_PASSWORD", "pw")]).unwrap();
            assert_eq!(config.credentials, Credentials::new("booker", "pw"));
        }
    }

    mod parsing_tests {
        use super::*;

        #[test]
        fn test_timeouts_and_flags() {
            let config = from_pairs(&[
                ("TIMEOUT", "5000"),
                ("NAVIGATION_TIMEOUT", "45000"),
                ("HEADLESS", "false"),
                ("SLOW_MO", "250"),
                ("ENABLE_TRACE", "yes"),
                ("RETRIES", "2"),
                ("WORKERS", "4"),
            ])
            .unwrap();
            assert_eq!(config.timeouts.action, Duration::from_millis(5000));
            assert_eq!(config.timeouts.navigation, Duration::from_millis(45_000));
            assert!(!config.headless);
            assert_eq!(config.slow_mo, Duration::from_millis(250));
            assert!(config.capture.trace);
            assert_eq!(config.retries, 2);
            assert_eq!(config.workers, 4);
        }

        #[test]
        fn test_bad_number_is_config_error() {
            let err = from_pairs(&[("TIMEOUT", "soon")]).unwrap_err();
            assert!(matches!(err, PomarError::Config { .. }));
            assert!(err.to_string().contains("TIMEOUT"));
        }

        #[test]
        fn test_bad_flag_is_config_error() {
            assert!(from_pairs(&[("HEADLESS", "maybe")]).is_err());
        }

        #[test]
        fn test_builders_override_capture() {
            let capture = CaptureSettings {
                trace: true,
                video: false,
                screenshots: false,
            };
            let config = SuiteConfig::new(&DEFAULTS)
                .with_capture(capture)
                .with_force_click_fallback(false);
            assert_eq!(config.capture, capture);
            assert!(!config.force_click_fallback);
        }
    }

    mod ignored_setting_tests {
        use super::*;

        #[test]
        fn test_video_toggle_is_reported_as_ignored() {
            let config = from_pairs(&[("ENABLE_VIDEO", "true")]).unwrap();
            assert!(config.capture.video);
            assert_eq!(config.ignored_settings(), vec!["ENABLE_VIDEO"]);
        }

        #[test]
        fn test_defaults_ignore_nothing() {
            assert!(SuiteConfig::new(&DEFAULTS).ignored_settings().is_empty());
        }
    }

    mod dotenv_tests {
        use super::*;

        #[test]
        fn test_missing_file_is_not_an_error() {
            let dir = tempfile::tempdir().unwrap();
            let loaded = load_dotenv_from(&dir.path().join(".env")).unwrap();
            assert!(loaded.is_none());
        }

        #[test]
        fn test_malformed_file_is_config_error() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join(".env");
            std::fs::write(&path, "NOT A VALID LINE\n").unwrap();
            let err = load_dotenv_from(&path).unwrap_err();
            assert!(matches!(err, PomarError::Config { .. }));
            assert!(err.to_string().contains(".env"));
        }

        #[test]
        fn test_valid_file_is_loaded() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join(".env");
            std::fs::write(&path, "POMAR_DOTENV_LOAD_CHECK=loaded\n").unwrap();
            assert_eq!(load_dotenv_from(&path).unwrap(), Some(path.clone()));
            assert_eq!(std::env::var("POMAR_DOTENV_LOAD_CHECK").unwrap(), "loaded");
        }
    }

    mod url_tests {
        use super::*;

        #[test]
        fn test_url_joins_paths() {
            let config = SuiteConfig::new(&DEFAULTS);
            assert_eq!(config.url("/addUser"), "https://contacts.test/addUser");
            assert_eq!(config.url("contactList"), "https://contacts.test/contactList");
            assert_eq!(config.url(""), "https://contacts.test/");
            assert_eq!(config.url("https://other.test/x"), "https://other.test/x");
        }

        #[test]
        fn test_env_prefix() {
            assert_eq!(env_prefix("contact-list"), "CONTACT_LIST");
            assert_eq!(env_prefix("saucedemo"), "SAUCEDEMO");
        }
    }
}
