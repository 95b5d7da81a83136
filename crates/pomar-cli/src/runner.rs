//! Suite runner: resolves suites, picks a browser backend, runs and reports

use std::path::PathBuf;
use std::sync::Arc;

use pomar::{NoBrowserFactory, Reporter, Runner, SessionFactory, Suite, SuiteConfig};
use pomar_suites::SuiteEntry;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;

/// Catalog entries for the requested names; every suite when none are given
///
/// # Errors
///
/// Returns [`CliError::UnknownSuite`] for a name the catalog does not know.
pub fn resolve_suites(names: &[String]) -> CliResult<Vec<&'static SuiteEntry>> {
    if names.is_empty() {
        return Ok(pomar_suites::catalog().iter().collect());
    }
    let mut entries: Vec<&'static SuiteEntry> = Vec::with_capacity(names.len());
    for name in names {
        let entry = pomar_suites::find(name).ok_or_else(|| CliError::unknown_suite(name))?;
        if !entries.iter().any(|e| e.name() == entry.name()) {
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// Config the shared browser launches with: the first suite that needs one
fn browser_config<'a>(suites: &'a [Suite], entries: &[&SuiteEntry]) -> Option<&'a SuiteConfig> {
    suites
        .iter()
        .zip(entries)
        .find(|(_, entry)| entry.needs_browser)
        .map(|(suite, _)| suite.config())
}

/// Session source for one run
struct Backend {
    factory: Arc<dyn SessionFactory>,
    #[cfg(feature = "browser")]
    chromium: Option<Arc<pomar::ChromiumFactory>>,
}

impl Backend {
    fn without_browser(reason: &str) -> Self {
        Self {
            factory: Arc::new(NoBrowserFactory::new(reason)),
            #[cfg(feature = "browser")]
            chromium: None,
        }
    }

    #[cfg(feature = "browser")]
    async fn for_suites(browser_suite: Option<&SuiteConfig>) -> CliResult<Self> {
        let Some(config) = browser_suite else {
            return Ok(Self::without_browser("no selected suite needs a browser"));
        };
        tracing::debug!(suite = %config.suite, "launching chromium");
        let chromium =
            Arc::new(pomar::ChromiumFactory::launch(pomar::ChromiumConfig::from_suite(config)).await?);
        Ok(Self {
            factory: Arc::clone(&chromium) as Arc<dyn SessionFactory>,
            chromium: Some(chromium),
        })
    }

    #[cfg(not(feature = "browser"))]
    #[allow(clippy::unused_async)]
    async fn for_suites(browser_suite: Option<&SuiteConfig>) -> CliResult<Self> {
        if browser_suite.is_some() {
            tracing::warn!("built without the `browser` feature; UI scenarios will fail");
        }
        Ok(Self::without_browser("built without the `browser` feature"))
    }

    #[cfg_attr(not(feature = "browser"), allow(clippy::unused_async))]
    async fn shutdown(self) {
        drop(self.factory);
        #[cfg(feature = "browser")]
        if let Some(chromium) = self.chromium {
            match Arc::try_unwrap(chromium) {
                Ok(chromium) => {
                    if let Err(err) = chromium.shutdown().await {
                        tracing::warn!(error = %err, "chromium did not shut down cleanly");
                    }
                }
                Err(_) => tracing::warn!("chromium still in use; leaving it to exit with the process"),
            }
        }
    }
}

/// Runs catalog suites with command-line overrides
#[derive(Debug)]
pub struct SuiteRunner {
    config: CliConfig,
    reporter: ProgressReporter,
}

impl SuiteRunner {
    /// Create a new suite runner
    #[must_use]
    pub fn new(config: CliConfig) -> Self {
        let reporter =
            ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
        Self { config, reporter }
    }

    /// Build each suite from its environment plus the command-line overrides
    ///
    /// # Errors
    ///
    /// Returns a config error when an environment override is unparsable.
    pub fn build_suites(&self, entries: &[&SuiteEntry]) -> CliResult<Vec<Suite>> {
        entries
            .iter()
            .map(|entry| -> CliResult<Suite> {
                let config = SuiteConfig::from_env(&entry.defaults)?;
                Ok(entry.build(self.config.apply_to(config)))
            })
            .collect()
    }

    /// Run the named suites and write every requested report
    ///
    /// # Errors
    ///
    /// Returns an error for unknown suites, a browser that fails to launch
    /// or a report that cannot be written. Failing scenarios are not an
    /// error here; see [`check`].
    pub async fn run(&mut self, names: &[String]) -> CliResult<Reporter> {
        let entries = resolve_suites(names)?;
        let suites = self.build_suites(&entries)?;
        let backend = Backend::for_suites(browser_config(&suites, &entries)).await?;
        tracing::info!(
            suites = suites.len(),
            backend = backend.factory.backend(),
            "starting run"
        );

        let runner = Runner::new(Arc::clone(&backend.factory), self.config.run_options());
        let total: usize = suites.iter().map(|s| runner.selected(s).len()).sum();
        self.reporter.header("Pomar");
        self.reporter.start_progress(total as u64, "Running");
        let runner = runner.with_observer(self.reporter.observer());

        let report = runner.run(&suites).await;
        self.reporter.finish();
        drop(runner);
        backend.shutdown().await;

        self.reporter.summary(&report);
        for path in self.write_reports(&report)? {
            self.reporter.info(&format!("Report written to {}", path.display()));
        }
        Ok(report)
    }

    fn write_reports(&self, report: &Reporter) -> CliResult<Vec<PathBuf>> {
        let mut paths = Vec::with_capacity(self.config.formats.len());
        for format in &self.config.formats {
            paths.push(report.write(*format, self.config.report_dir())?);
        }
        Ok(paths)
    }
}

/// Turn a finished run into the process outcome
///
/// # Errors
///
/// Returns [`CliError::TestFailures`] when any scenario failed.
pub fn check(report: &Reporter) -> CliResult<()> {
    let failed = report.failed_count();
    if failed > 0 {
        return Err(CliError::TestFailures {
            failed,
            total: report.total_count(),
        });
    }
    Ok(())
}
