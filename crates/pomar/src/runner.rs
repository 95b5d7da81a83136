//! Scenario runner.
//!
//! A [`Scenario`] is an async script over a [`ScenarioContext`]. The
//! [`Runner`] gives every attempt a fresh session from its
//! [`SessionFactory`], runs up to `workers` scenarios at once, bounds each
//! attempt with the scenario timeout, retries whole scenarios, and captures
//! a screenshot and trace when an attempt fails.
//!
//! ```ignore
//! fn login(ctx: &ScenarioContext) -> ScenarioFuture<'_> {
//!     Box::pin(async move {
//!         let page = LoginPage::new(ctx.driver());
//!         page.open().await?;
//!         page.login("standard_user", "secret_sauce").await
//!     })
//! }
//!
//! let suite = Suite::new(config).with_scenario(Scenario::ui("login", login));
//! let reporter = Runner::new(factory, RunOptions::default()).run(&[suite]).await;
//! ```

use futures::future::BoxFuture;
use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::SuiteConfig;
use crate::data::DataGenerator;
use crate::http::ApiClient;
use crate::page::Driver;
use crate::reporter::{Reporter, ScenarioResult};
use crate::result::{PomarError, PomarResult};
use crate::session::{BrowserSession, Detached, SessionFactory};
use crate::trace::ActionTrace;

/// Future returned by a scenario body
pub type ScenarioFuture<'a> = BoxFuture<'a, PomarResult<()>>;

type ScenarioBody = dyn for<'a> Fn(&'a ScenarioContext) -> ScenarioFuture<'a> + Send + Sync;

/// Called with every finished scenario
pub type ResultObserver = Arc<dyn Fn(&ScenarioResult) + Send + Sync>;

/// Whether a scenario needs a browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioKind {
    /// Drives pages through a browser session
    Ui,
    /// Talks HTTP only; runs against a detached session
    Api,
}

/// A named scenario body
#[derive(Clone)]
pub struct Scenario {
    name: String,
    tags: Vec<String>,
    kind: ScenarioKind,
    body: Arc<ScenarioBody>,
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl Scenario {
    fn new<F>(name: impl Into<String>, kind: ScenarioKind, body: F) -> Self
    where
        F: for<'a> Fn(&'a ScenarioContext) -> ScenarioFuture<'a> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            tags: Vec::new(),
            kind,
            body: Arc::new(body),
        }
    }

    /// Browser scenario
    #[must_use]
    pub fn ui<F>(name: impl Into<String>, body: F) -> Self
    where
        F: for<'a> Fn(&'a ScenarioContext) -> ScenarioFuture<'a> + Send + Sync + 'static,
    {
        Self::new(name, ScenarioKind::Ui, body)
    }

    /// API-only scenario
    #[must_use]
    pub fn api<F>(name: impl Into<String>, body: F) -> Self
    where
        F: for<'a> Fn(&'a ScenarioContext) -> ScenarioFuture<'a> + Send + Sync + 'static,
    {
        Self::new(name, ScenarioKind::Api, body)
    }

    /// Add a tag (`smoke`, `regression`, ...)
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Scenario name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tags
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Kind
    #[must_use]
    pub const fn kind(&self) -> ScenarioKind {
        self.kind
    }

    /// Whether `filter` selects this scenario: a `tag:` prefix matches tags,
    /// anything else is a case-insensitive substring of the name
    #[must_use]
    pub fn matches(&self, filter: &str) -> bool {
        if let Some(tag) = filter.strip_prefix("tag:") {
            return self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag));
        }
        self.name.to_lowercase().contains(&filter.to_lowercase())
    }
}

/// What one scenario attempt gets to work with
pub struct ScenarioContext {
    suite: String,
    name: String,
    attempt: u32,
    session: Box<dyn BrowserSession>,
    config: Arc<SuiteConfig>,
    data: DataGenerator,
    api: ApiClient,
    trace: Option<Arc<ActionTrace>>,
}

impl fmt::Debug for ScenarioContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioContext")
            .field("suite", &self.suite)
            .field("name", &self.name)
            .field("attempt", &self.attempt)
            .finish_non_exhaustive()
    }
}

impl ScenarioContext {
    /// Context over an existing session; useful for driving scenarios by hand
    #[must_use]
    pub fn new(session: Box<dyn BrowserSession>, config: Arc<SuiteConfig>, data: DataGenerator) -> Self {
        let api = ApiClient::new(config.base_url.clone());
        Self {
            suite: config.suite.clone(),
            name: String::new(),
            attempt: 1,
            session,
            config,
            data,
            api,
            trace: None,
        }
    }

    /// Driver over this attempt's session
    #[must_use]
    pub fn driver(&self) -> Driver<'_> {
        let driver = Driver::new(self.session.as_ref(), &self.config);
        match &self.trace {
            Some(trace) => driver.with_trace(Arc::clone(trace)),
            None => driver,
        }
    }

    /// The session itself
    #[must_use]
    pub fn session(&self) -> &dyn BrowserSession {
        self.session.as_ref()
    }

    /// Suite configuration
    #[must_use]
    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Test-data generator
    #[must_use]
    pub const fn data(&self) -> &DataGenerator {
        &self.data
    }

    /// HTTP client rooted at the suite's base URL
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// 1-based attempt number
    #[must_use]
    pub const fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Scenario name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A configured set of scenarios against one site
#[derive(Debug, Clone)]
pub struct Suite {
    config: Arc<SuiteConfig>,
    scenarios: Vec<Scenario>,
}

impl Suite {
    /// Empty suite
    #[must_use]
    pub fn new(config: SuiteConfig) -> Self {
        Self {
            config: Arc::new(config),
            scenarios: Vec::new(),
        }
    }

    /// Add a scenario
    #[must_use]
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }

    /// Add scenarios
    #[must_use]
    pub fn with_scenarios(mut self, scenarios: impl IntoIterator<Item = Scenario>) -> Self {
        self.scenarios.extend(scenarios);
        self
    }

    /// Suite name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.suite
    }

    /// Configuration
    #[must_use]
    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Scenarios in declaration order
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Number of scenarios
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Whether the suite has no scenarios
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

/// What to do after a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Run everything and collect all failures
    #[default]
    CollectAll,
    /// Skip scenarios that have not started once one fails
    FailFast,
}

/// Runner settings; `None` falls back to the suite configuration
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Concurrent scenarios (0 = one per CPU)
    pub workers: Option<usize>,
    /// Whole-scenario retries
    pub retries: Option<u32>,
    /// Per-attempt budget
    pub scenario_timeout: Option<Duration>,
    /// Failure handling
    pub failure_mode: FailureMode,
    /// Scenario filter (see [`Scenario::matches`])
    pub filter: Option<String>,
    /// Seed for the per-scenario data generators
    pub seed: Option<u64>,
}

impl RunOptions {
    /// Defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set worker count
    #[must_use]
    pub const fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Set retries
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Set the per-attempt timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.scenario_timeout = Some(timeout);
        self
    }

    /// Stop scheduling after the first failure
    #[must_use]
    pub const fn fail_fast(mut self) -> Self {
        self.failure_mode = FailureMode::FailFast;
        self
    }

    /// Only run matching scenarios
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Seed test data
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Executes suites
pub struct Runner {
    factory: Arc<dyn SessionFactory>,
    options: RunOptions,
    observer: Option<ResultObserver>,
}

impl fmt::Debug for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("backend", &self.factory.backend())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

struct Plan {
    factory: Arc<dyn SessionFactory>,
    config: Arc<SuiteConfig>,
    retries: u32,
    timeout: Duration,
    fail_fast: bool,
    seed: Option<u64>,
    stop: Arc<AtomicBool>,
    observer: Option<ResultObserver>,
}

struct AttemptFailure {
    error: PomarError,
    screenshot: Option<PathBuf>,
    trace: Option<PathBuf>,
}

impl AttemptFailure {
    const fn bare(error: PomarError) -> Self {
        Self {
            error,
            screenshot: None,
            trace: None,
        }
    }
}

impl Runner {
    /// Runner drawing sessions from `factory`
    #[must_use]
    pub fn new(factory: Arc<dyn SessionFactory>, options: RunOptions) -> Self {
        Self {
            factory,
            options,
            observer: None,
        }
    }

    /// Notify `observer` as scenarios finish
    #[must_use]
    pub fn with_observer(mut self, observer: ResultObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Options in effect
    #[must_use]
    pub const fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Scenarios of `suite` selected by the filter
    #[must_use]
    pub fn selected<'a>(&self, suite: &'a Suite) -> Vec<&'a Scenario> {
        suite
            .scenarios()
            .iter()
            .filter(|s| self.options.filter.as_deref().map_or(true, |f| s.matches(f)))
            .collect()
    }

    /// Run every suite in order and collect the results
    pub async fn run(&self, suites: &[Suite]) -> Reporter {
        let stop = Arc::new(AtomicBool::new(false));
        let mut reporter = Reporter::new("Pomar");
        for suite in suites {
            let results = self.run_with_stop(suite, Arc::clone(&stop)).await;
            reporter.extend(results);
        }
        reporter
    }

    /// Run one suite; results come back in declaration order
    pub async fn run_suite(&self, suite: &Suite) -> Vec<ScenarioResult> {
        self.run_with_stop(suite, Arc::new(AtomicBool::new(false))).await
    }

    fn workers_for(&self, config: &SuiteConfig) -> usize {
        let requested = self.options.workers.unwrap_or(config.workers);
        if requested > 0 {
            return requested;
        }
        std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
    }

    async fn run_with_stop(&self, suite: &Suite, stop: Arc<AtomicBool>) -> Vec<ScenarioResult> {
        let selected: Vec<Scenario> = self.selected(suite).into_iter().cloned().collect();
        let workers = self.workers_for(suite.config());
        let plan = Arc::new(Plan {
            factory: Arc::clone(&self.factory),
            config: Arc::clone(&suite.config),
            retries: self.options.retries.unwrap_or(suite.config.retries),
            timeout: self
                .options
                .scenario_timeout
                .unwrap_or(suite.config.timeouts.scenario),
            fail_fast: self.options.failure_mode == FailureMode::FailFast,
            seed: self.options.seed,
            stop,
            observer: self.observer.clone(),
        });
        tracing::info!(
            suite = suite.name(),
            scenarios = selected.len(),
            workers,
            backend = self.factory.backend(),
            "running suite"
        );

        let semaphore = Arc::new(Semaphore::new(workers));
        let mut tasks = JoinSet::new();
        for (index, scenario) in selected.into_iter().enumerate() {
            let plan = Arc::clone(&plan);
            let semaphore = Arc::clone(&semaphore);
            let _ = tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let result = if plan.stop.load(Ordering::SeqCst) {
                    ScenarioResult::skipped(
                        &plan.config.suite,
                        scenario.name(),
                        "not run: stopped after an earlier failure",
                    )
                } else {
                    execute(&plan, &scenario, index).await
                };
                if plan.fail_fast && result.status.is_failed() {
                    plan.stop.store(true, Ordering::SeqCst);
                }
                if let Some(observer) = &plan.observer {
                    observer(&result);
                }
                (index, result)
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(entry) => results.push(entry),
                Err(err) => tracing::error!(error = %err, "scenario task aborted"),
            }
        }
        results.sort_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, result)| result).collect()
    }
}

async fn execute(plan: &Plan, scenario: &Scenario, index: usize) -> ScenarioResult {
    let suite = plan.config.suite.as_str();
    let started = Instant::now();
    let attempts = plan.retries.saturating_add(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        let seed = plan.seed.map(|seed| attempt_seed(seed, index, attempt));
        match run_attempt(plan, scenario, seed, attempt).await {
            Ok(()) => {
                tracing::info!(suite, scenario = scenario.name(), attempt, "passed");
                return ScenarioResult::passed(suite, scenario.name(), started.elapsed())
                    .with_attempts(attempt)
                    .with_seed(seed);
            }
            Err(failure) if attempt < attempts => {
                tracing::warn!(
                    suite,
                    scenario = scenario.name(),
                    attempt,
                    seed,
                    error = %failure.error,
                    "attempt failed, retrying"
                );
            }
            Err(failure) => {
                tracing::error!(suite, scenario = scenario.name(), attempt, error = %failure.error, "failed");
                let mut result = ScenarioResult::failed(
                    suite,
                    scenario.name(),
                    started.elapsed(),
                    failure.error.to_string(),
                )
                .with_attempts(attempt)
                .with_seed(seed);
                result.screenshot = failure.screenshot;
                result.trace = failure.trace;
                return result;
            }
        }
    }
}

/// Data seed for one attempt; distinct per scenario and per retry
#[must_use]
pub fn attempt_seed(seed: u64, index: usize, attempt: u32) -> u64 {
    seed ^ (index as u64) ^ (u64::from(attempt) << 32)
}

async fn run_attempt(
    plan: &Plan,
    scenario: &Scenario,
    seed: Option<u64>,
    attempt: u32,
) -> Result<(), AttemptFailure> {
    let config = &plan.config;
    let session: Box<dyn BrowserSession> = match scenario.kind {
        ScenarioKind::Ui => plan
            .factory
            .new_session()
            .await
            .map_err(AttemptFailure::bare)?,
        ScenarioKind::Api => Box::new(Detached),
    };
    let artifact = format!("{}-{}-attempt{attempt}", config.suite, scenario.name());
    let trace = config
        .capture
        .trace
        .then(|| Arc::new(ActionTrace::new(artifact.clone())));
    let data = seed.map_or_else(DataGenerator::from_entropy, DataGenerator::seeded);
    let mut ctx = ScenarioContext::new(session, Arc::clone(config), data);
    ctx.name = scenario.name().to_string();
    ctx.attempt = attempt;
    ctx.trace = trace.clone();

    let body = AssertUnwindSafe((scenario.body)(&ctx)).catch_unwind();
    let outcome = match tokio::time::timeout(plan.timeout, body).await {
        Err(_) => Err(PomarError::Timeout {
            ms: plan.timeout.as_millis() as u64,
        }),
        Ok(Err(panic)) => Err(PomarError::driver(format!(
            "scenario panicked: {}",
            panic_message(panic.as_ref())
        ))),
        Ok(Ok(result)) => result,
    };

    let failure = match outcome {
        Ok(()) => None,
        Err(error) => {
            let screenshot = if scenario.kind == ScenarioKind::Ui && config.capture.screenshots {
                match ctx.driver().screenshot(&artifact).await {
                    Ok(path) => Some(path),
                    Err(err) => {
                        tracing::warn!(error = %err, "failure screenshot not captured");
                        None
                    }
                }
            } else {
                None
            };
            let trace = trace.and_then(|trace| {
                let path = config
                    .artifacts_dir
                    .join("traces")
                    .join(format!("{}.json", sanitize(&artifact)));
                match trace.save_json(&path) {
                    Ok(()) => Some(path),
                    Err(err) => {
                        tracing::warn!(error = %err, "trace not saved");
                        None
                    }
                }
            });
            Some(AttemptFailure {
                error,
                screenshot,
                trace,
            })
        }
    };

    if let Err(err) = ctx.session.close().await {
        tracing::warn!(scenario = scenario.name(), error = %err, "closing session failed");
    }
    failure.map_or(Ok(()), Err)
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

/// Run a single scenario body against `session`, outside any runner.
///
/// # Errors
///
/// Returns whatever the body returns.
pub async fn run_once(scenario: &Scenario, ctx: &ScenarioContext) -> PomarResult<()> {
    (scenario.body)(ctx).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::config::{SuiteDefaults, Timeouts};
    use crate::fake::{FakeElement, FakePage, FakeSessionFactory, FakeSite};
    use crate::locator::Locator;
    use crate::reporter::TestStatus;
    use crate::session::NoBrowserFactory;
    use std::sync::atomic::AtomicU32;
    use std::sync::Mutex;

    const DEFAULTS: SuiteDefaults = SuiteDefaults::new("shop", "https://shop.test");

    fn config(dir: &std::path::Path) -> SuiteConfig {
        SuiteConfig::new(&DEFAULTS)
            .with_timeouts(Timeouts::uniform(Duration::from_millis(200)))
            .with_artifacts_dir(dir)
    }

    fn factory() -> Arc<FakeSessionFactory> {
        let site = FakeSite::new("https://shop.test").page(
            "/",
            FakePage::new("Shop").element(FakeElement::new(".title").text("Products")),
        );
        Arc::new(FakeSessionFactory::new(site))
    }

    fn reads_title(ctx: &ScenarioContext) -> ScenarioFuture<'_> {
        Box::pin(async move {
            let driver = ctx.driver();
            driver.navigate(None).await?;
            driver.expect_text(&Locator::new(".title"), "Products").await
        })
    }

    fn wrong_title(ctx: &ScenarioContext) -> ScenarioFuture<'_> {
        Box::pin(async move {
            let driver = ctx.driver();
            driver.navigate(None).await?;
            driver.expect_text(&Locator::new(".title"), "Checkout").await
        })
    }

    fn runner(factory: &Arc<FakeSessionFactory>, options: RunOptions) -> Runner {
        let factory: Arc<dyn SessionFactory> = Arc::clone(factory) as Arc<dyn SessionFactory>;
        Runner::new(factory, options)
    }

    mod scenario_tests {
        use super::*;

        #[test]
        fn test_filter_by_name_and_tag() {
            let scenario = Scenario::ui("Login with standard user", reads_title).with_tag("smoke");
            assert!(scenario.matches("standard"));
            assert!(scenario.matches("LOGIN"));
            assert!(scenario.matches("tag:smoke"));
            assert!(!scenario.matches("tag:regression"));
            assert_eq!(scenario.kind(), ScenarioKind::Ui);
        }

        #[tokio::test]
        async fn test_run_once_outside_runner() {
            let dir = tempfile::tempdir().unwrap();
            let session = factory().new_session().await.unwrap();
            let ctx = ScenarioContext::new(session, Arc::new(config(dir.path())), DataGenerator::seeded(1));
            run_once(&Scenario::ui("title", reads_title), &ctx).await.unwrap();
        }
    }

    mod execution_tests {
        use super::*;

        #[tokio::test]
        async fn test_pass_and_fail_with_screenshot() {
            let dir = tempfile::tempdir().unwrap();
            let factory = factory();
            let suite = Suite::new(config(dir.path()))
                .with_scenario(Scenario::ui("title", reads_title))
                .with_scenario(Scenario::ui("wrong title", wrong_title));

            let results = runner(&factory, RunOptions::new().with_workers(2))
                .run_suite(&suite)
                .await;

            assert_eq!(results.len(), 2);
            assert_eq!(results[0].status, TestStatus::Passed);
            assert_eq!(results[1].status, TestStatus::Failed);
            let error = results[1].error.as_deref().unwrap();
            assert!(error.contains("Checkout"));
            assert!(results[1].screenshot.as_ref().unwrap().exists());
            assert_eq!(factory.sessions_opened(), 2);
        }

        #[tokio::test]
        async fn test_retry_on_fresh_session_marks_flaky() {
            let dir = tempfile::tempdir().unwrap();
            let factory = factory();
            let calls = Arc::new(AtomicU32::new(0));
            let counter = Arc::clone(&calls);
            let suite = Suite::new(config(dir.path())).with_scenario(Scenario::ui(
                "flaky",
                move |ctx| {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    Box::pin(async move {
                        if n == 0 {
                            Err(PomarError::assertion("first attempt fails"))
                        } else {
                            assert_eq!(ctx.attempt(), 2);
                            Ok(())
                        }
                    })
                },
            ));

            let results = runner(&factory, RunOptions::new().with_retries(1))
                .run_suite(&suite)
                .await;

            assert_eq!(results[0].status, TestStatus::Flaky);
            assert_eq!(results[0].attempts, 2);
            assert_eq!(factory.sessions_opened(), 2);
        }

        #[tokio::test]
        async fn test_retry_draws_fresh_seeded_data() {
            let dir = tempfile::tempdir().unwrap();
            let factory = factory();
            let emails = Arc::new(Mutex::new(Vec::<String>::new()));
            let seen = Arc::clone(&emails);
            let suite = Suite::new(config(dir.path())).with_scenario(Scenario::api(
                "register",
                move |ctx| {
                    let email = ctx.data().email();
                    let mut seen = seen.lock().unwrap();
                    let taken = seen.contains(&email);
                    seen.push(email);
                    let first = seen.len() == 1;
                    Box::pin(async move {
                        if taken {
                            Err(PomarError::assertion("Email address is already in use"))
                        } else if first {
                            Err(PomarError::assertion("signup page did not load"))
                        } else {
                            Ok(())
                        }
                    })
                },
            ));

            let results = runner(&factory, RunOptions::new().with_seed(42).with_retries(1))
                .run_suite(&suite)
                .await;

            let emails = emails.lock().unwrap().clone();
            assert_eq!(emails.len(), 2);
            assert_ne!(emails[0], emails[1]);
            assert_eq!(results[0].status, TestStatus::Flaky);
            assert_eq!(results[0].seed, Some(attempt_seed(42, 0, 2)));
        }

        #[test]
        fn test_attempt_seeds_are_distinct() {
            let seeds = [
                attempt_seed(42, 0, 1),
                attempt_seed(42, 0, 2),
                attempt_seed(42, 1, 1),
                attempt_seed(42, 1, 2),
            ];
            for (i, a) in seeds.iter().enumerate() {
                assert!(seeds[i + 1..].iter().all(|b| a != b));
            }
            assert_eq!(attempt_seed(7, 3, 1), attempt_seed(7, 3, 1));
        }

        #[tokio::test]
        async fn test_unseeded_run_records_no_seed() {
            let dir = tempfile::tempdir().unwrap();
            let factory = factory();
            let suite = Suite::new(config(dir.path())).with_scenario(Scenario::ui("title", reads_title));

            let results = runner(&factory, RunOptions::new()).run_suite(&suite).await;

            assert_eq!(results[0].status, TestStatus::Passed);
            assert_eq!(results[0].seed, None);
        }

        #[tokio::test]
        async fn test_timeout_aborts_scenario() {
            let dir = tempfile::tempdir().unwrap();
            let factory = factory();
            let suite = Suite::new(config(dir.path())).with_scenario(Scenario::ui(
                "hangs",
                |_ctx| {
                    Box::pin(async move {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        Ok(())
                    })
                },
            ));

            let results = runner(&factory, RunOptions::new().with_timeout(Duration::from_millis(50)))
                .run_suite(&suite)
                .await;

            assert_eq!(results[0].status, TestStatus::Failed);
            assert!(results[0].error.as_deref().unwrap().contains("timed out after 50ms"));
        }

        #[tokio::test]
        async fn test_panicking_scenario_is_failure() {
            let dir = tempfile::tempdir().unwrap();
            let factory = factory();
            let suite = Suite::new(config(dir.path())).with_scenario(Scenario::api(
                "panics",
                |_ctx| {
                    Box::pin(async move {
                        let explode = true;
                        if explode {
                            panic!("boom");
                        }
                        Ok(())
                    })
                },
            ));

            let results = runner(&factory, RunOptions::new()).run_suite(&suite).await;

            assert_eq!(results[0].status, TestStatus::Failed);
            assert!(results[0].error.as_deref().unwrap().contains("scenario panicked: boom"));
        }

        #[tokio::test]
        async fn test_api_scenarios_never_open_browser() {
            let dir = tempfile::tempdir().unwrap();
            let factory = factory();
            let suite = Suite::new(config(dir.path())).with_scenario(Scenario::api(
                "detached",
                |ctx| {
                    Box::pin(async move {
                        assert!(ctx.session().goto("https://shop.test").await.is_err());
                        assert_eq!(ctx.api().base_url(), "https://shop.test");
                        Ok(())
                    })
                },
            ));

            let results = runner(&factory, RunOptions::new()).run_suite(&suite).await;

            assert_eq!(results[0].status, TestStatus::Passed);
            assert_eq!(factory.sessions_opened(), 0);
        }

        #[tokio::test]
        async fn test_launch_failure_is_reported() {
            let dir = tempfile::tempdir().unwrap();
            let suite = Suite::new(config(dir.path())).with_scenario(Scenario::ui("title", reads_title));
            let runner = Runner::new(Arc::new(NoBrowserFactory::new("no chromium")), RunOptions::new());

            let results = runner.run_suite(&suite).await;

            assert_eq!(results[0].status, TestStatus::Failed);
            assert!(results[0].error.as_deref().unwrap().contains("no chromium"));
            assert!(results[0].screenshot.is_none());
        }

        #[tokio::test]
        async fn test_trace_saved_on_failure() {
            let dir = tempfile::tempdir().unwrap();
            let factory = factory();
            let mut config = config(dir.path());
            config.capture.trace = true;
            let suite = Suite::new(config).with_scenario(Scenario::ui("wrong title", wrong_title));

            let results = runner(&factory, RunOptions::new()).run_suite(&suite).await;

            let trace = results[0].trace.as_ref().unwrap();
            let archive = crate::trace::TraceArchive::load_json(trace).unwrap();
            assert_eq!(archive.steps[0].action, "navigate");
        }
    }

    mod scheduling_tests {
        use super::*;

        #[tokio::test]
        async fn test_fail_fast_skips_remaining() {
            let dir = tempfile::tempdir().unwrap();
            let factory = factory();
            let suite = Suite::new(config(dir.path()))
                .with_scenario(Scenario::ui("wrong title", wrong_title))
                .with_scenario(Scenario::ui("title", reads_title))
                .with_scenario(Scenario::ui("title again", reads_title));

            let results = runner(&factory, RunOptions::new().with_workers(1).fail_fast())
                .run_suite(&suite)
                .await;

            assert_eq!(results[0].status, TestStatus::Failed);
            assert_eq!(results[1].status, TestStatus::Skipped);
            assert_eq!(results[2].status, TestStatus::Skipped);
        }

        #[tokio::test]
        async fn test_filter_selects_scenarios() {
            let dir = tempfile::tempdir().unwrap();
            let factory = factory();
            let suite = Suite::new(config(dir.path()))
                .with_scenario(Scenario::ui("title", reads_title).with_tag("smoke"))
                .with_scenario(Scenario::ui("wrong title", wrong_title));
            let runner = runner(&factory, RunOptions::new().with_filter("tag:smoke"));

            assert_eq!(runner.selected(&suite).len(), 1);
            let reporter = runner.run(&[suite]).await;
            assert_eq!(reporter.total_count(), 1);
            assert!(reporter.all_passed());
        }

        #[tokio::test]
        async fn test_observer_sees_every_result() {
            let dir = tempfile::tempdir().unwrap();
            let factory = factory();
            let seen = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&seen);
            let suite = Suite::new(config(dir.path()))
                .with_scenario(Scenario::ui("title", reads_title))
                .with_scenario(Scenario::ui("wrong title", wrong_title));
            let runner = runner(&factory, RunOptions::new()).with_observer(Arc::new(move |r: &ScenarioResult| {
                sink.lock().unwrap().push(r.name.clone());
            }));

            let _ = runner.run_suite(&suite).await;

            let mut names = seen.lock().unwrap().clone();
            names.sort();
            assert_eq!(names, vec!["title".to_string(), "wrong title".to_string()]);
        }
    }
}
