//! CLI configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use pomar::{ReportFormat, RunOptions, SuiteConfig};
use serde::{Deserialize, Serialize};

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - minimal output
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// Verbosity for `-q` and a `-v` count; quiet wins
    #[must_use]
    pub const fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => console::Term::stderr().features().colors_supported(),
        }
    }
}

/// Settings of one `pomador run`, layered over each suite's own configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Concurrent scenarios; `None` keeps the suite setting
    pub workers: Option<usize>,
    /// Retries; `None` keeps the suite setting
    pub retries: Option<u32>,
    /// Per-attempt timeout; `None` keeps the suite setting
    pub scenario_timeout: Option<Duration>,
    /// Fail fast on first error
    pub fail_fast: bool,
    /// Scenario filter
    pub filter: Option<String>,
    /// Data seed
    pub seed: Option<u64>,
    /// Show the browser window
    pub headed: bool,
    /// Output directory for reports and artifacts
    pub output_dir: PathBuf,
    /// Reports to write
    #[serde(skip)]
    pub formats: Vec<ReportFormat>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Normal,
            color: ColorChoice::Auto,
            workers: None,
            retries: None,
            scenario_timeout: None,
            fail_fast: false,
            filter: None,
            seed: None,
            headed: false,
            output_dir: PathBuf::from("test-results"),
            formats: vec![ReportFormat::Html],
        }
    }
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set worker count
    #[must_use]
    pub const fn with_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers;
        self
    }

    /// Set retries
    #[must_use]
    pub const fn with_retries(mut self, retries: Option<u32>) -> Self {
        self.retries = retries;
        self
    }

    /// Set the per-attempt timeout
    #[must_use]
    pub const fn with_scenario_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.scenario_timeout = timeout;
        self
    }

    /// Set fail fast
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Set the scenario filter
    #[must_use]
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    /// Set the data seed
    #[must_use]
    pub const fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Show or hide the browser
    #[must_use]
    pub const fn with_headed(mut self, headed: bool) -> Self {
        self.headed = headed;
        self
    }

    /// Set output directory
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set report formats
    #[must_use]
    pub fn with_formats(mut self, formats: Vec<ReportFormat>) -> Self {
        self.formats = formats;
        self
    }

    /// Artifacts directory of one suite
    #[must_use]
    pub fn artifacts_dir(&self, suite: &str) -> PathBuf {
        self.output_dir.join(suite)
    }

    /// Overlay the command-line settings onto a suite's configuration
    #[must_use]
    pub fn apply_to(&self, config: SuiteConfig) -> SuiteConfig {
        let mut config = config;
        if self.headed {
            config = config.with_headless(false);
        }
        let dir = self.artifacts_dir(&config.suite);
        config.with_artifacts_dir(dir)
    }

    /// Runner options carrying every override that was given
    #[must_use]
    pub fn run_options(&self) -> RunOptions {
        let mut options = RunOptions::new();
        if let Some(workers) = self.workers {
            options = options.with_workers(workers);
        }
        if let Some(retries) = self.retries {
            options = options.with_retries(retries);
        }
        if let Some(timeout) = self.scenario_timeout {
            options = options.with_timeout(timeout);
        }
        if self.fail_fast {
            options = options.fail_fast();
        }
        if let Some(filter) = &self.filter {
            options = options.with_filter(filter.clone());
        }
        if let Some(seed) = self.seed {
            options = options.with_seed(seed);
        }
        options
    }

    /// Where reports are written
    #[must_use]
    pub fn report_dir(&self) -> &Path {
        &self.output_dir
    }
}
