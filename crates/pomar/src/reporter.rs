//! Scenario reporting.
//!
//! The runner feeds one [`ScenarioResult`] per scenario into a [`Reporter`],
//! which renders the run as HTML (failure screenshots inlined), JSON or
//! JUnit XML for CI.

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

use crate::result::{PomarError, PomarResult};

/// Scenario outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// Passed on the first attempt
    Passed,
    /// Failed on every attempt
    Failed,
    /// Never ran (filtered out or stopped by fail-fast)
    Skipped,
    /// Passed after at least one failed attempt
    Flaky,
}

impl TestStatus {
    /// Passed, possibly after retries
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed | Self::Flaky)
    }

    /// Failed
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    const fn css_class(self) -> &'static str {
        match self {
            Self::Passed => "pass",
            Self::Failed => "fail",
            Self::Skipped => "skip",
            Self::Flaky => "flaky",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
            Self::Flaky => "flaky",
        };
        f.write_str(label)
    }
}

/// Result of one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Suite the scenario belongs to
    pub suite: String,
    /// Scenario name
    pub name: String,
    /// Outcome
    pub status: TestStatus,
    /// Wall time across all attempts
    pub duration: Duration,
    /// Attempts made
    pub attempts: u32,
    /// Error of the last failed attempt
    pub error: Option<String>,
    /// Failure screenshot
    pub screenshot: Option<PathBuf>,
    /// Saved action trace
    pub trace: Option<PathBuf>,
    /// Data seed of the last attempt, when the run was seeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// When the scenario finished
    pub finished_at: DateTime<Utc>,
}

impl ScenarioResult {
    fn new(suite: &str, name: &str, status: TestStatus, duration: Duration) -> Self {
        Self {
            suite: suite.to_string(),
            name: name.to_string(),
            status,
            duration,
            attempts: 1,
            error: None,
            screenshot: None,
            trace: None,
            seed: None,
            finished_at: Utc::now(),
        }
    }

    /// Passing result
    #[must_use]
    pub fn passed(suite: &str, name: &str, duration: Duration) -> Self {
        Self::new(suite, name, TestStatus::Passed, duration)
    }

    /// Failing result
    #[must_use]
    pub fn failed(suite: &str, name: &str, duration: Duration, error: impl Into<String>) -> Self {
        let mut result = Self::new(suite, name, TestStatus::Failed, duration);
        result.error = Some(error.into());
        result
    }

    /// Skipped result
    #[must_use]
    pub fn skipped(suite: &str, name: &str, reason: impl Into<String>) -> Self {
        let mut result = Self::new(suite, name, TestStatus::Skipped, Duration::ZERO);
        result.attempts = 0;
        result.error = Some(reason.into());
        result
    }

    /// Record the number of attempts; a pass after retries becomes flaky
    #[must_use]
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        if attempts > 1 && self.status == TestStatus::Passed {
            self.status = TestStatus::Flaky;
        }
        self
    }

    /// Record the data seed the attempt ran with
    #[must_use]
    pub const fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Attach a failure screenshot
    #[must_use]
    pub fn with_screenshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.screenshot = Some(path.into());
        self
    }

    /// Attach a saved trace
    #[must_use]
    pub fn with_trace(mut self, path: impl Into<PathBuf>) -> Self {
        self.trace = Some(path.into());
        self
    }

    /// `suite::name`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}::{}", self.suite, self.name)
    }
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Self-contained HTML page
    #[default]
    Html,
    /// Machine-readable JSON
    Json,
    /// JUnit XML
    Junit,
}

impl ReportFormat {
    /// File name the report is written to
    #[must_use]
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Html => "report.html",
            Self::Json => "report.json",
            Self::Junit => "junit.xml",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = PomarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            "junit" | "xml" => Ok(Self::Junit),
            other => Err(PomarError::config(format!("unknown report format '{other}'"))),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    run_id: String,
    title: &'a str,
    started_at: DateTime<Utc>,
    total: usize,
    passed: usize,
    failed: usize,
    skipped: usize,
    flaky: usize,
    results: &'a [ScenarioResult],
}

/// Collects scenario results for one run
#[derive(Debug, Clone)]
pub struct Reporter {
    run_id: Uuid,
    title: String,
    started_at: DateTime<Utc>,
    results: Vec<ScenarioResult>,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new("Pomar")
    }
}

impl Reporter {
    /// Reporter titled `title`
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            title: title.into(),
            started_at: Utc::now(),
            results: Vec::new(),
        }
    }

    /// Run id
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Record a result
    pub fn record(&mut self, result: ScenarioResult) {
        self.results.push(result);
    }

    /// Record several results
    pub fn extend(&mut self, results: impl IntoIterator<Item = ScenarioResult>) {
        self.results.extend(results);
    }

    /// All results
    #[must_use]
    pub fn results(&self) -> &[ScenarioResult] {
        &self.results
    }

    fn count(&self, status: TestStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    /// Passed, including flaky
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_passed()).count()
    }

    /// Failed
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(TestStatus::Failed)
    }

    /// Skipped
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(TestStatus::Skipped)
    }

    /// Passed only after retries
    #[must_use]
    pub fn flaky_count(&self) -> usize {
        self.count(TestStatus::Flaky)
    }

    /// Total
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.results.len()
    }

    /// Pass rate among scenarios that ran (0.0 to 1.0)
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        let ran = self.total_count() - self.skipped_count();
        if ran == 0 {
            return 1.0;
        }
        self.passed_count() as f64 / ran as f64
    }

    /// Whether every scenario passed (skipped ones count against the run)
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.status.is_passed())
    }

    /// Sum of scenario durations
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.results.iter().map(|r| r.duration).sum()
    }

    /// Failed scenarios
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioResult> {
        self.results.iter().filter(|r| r.status.is_failed()).collect()
    }

    /// One-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{}: {}/{} passed ({:.1}%)",
            self.title,
            self.passed_count(),
            self.total_count(),
            self.pass_rate() * 100.0
        );
        if self.flaky_count() > 0 {
            line.push_str(&format!(", {} flaky", self.flaky_count()));
        }
        if self.skipped_count() > 0 {
            line.push_str(&format!(", {} skipped", self.skipped_count()));
        }
        line
    }

    fn by_suite(&self) -> BTreeMap<&str, Vec<&ScenarioResult>> {
        let mut suites: BTreeMap<&str, Vec<&ScenarioResult>> = BTreeMap::new();
        for result in &self.results {
            suites.entry(result.suite.as_str()).or_default().push(result);
        }
        suites
    }

    /// Render the HTML report
    #[must_use]
    pub fn render_html(&self) -> String {
        let mut html = String::new();

        html.push_str(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Pomar Report</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 20px; }
        .summary { background: #f5f5f5; padding: 20px; border-radius: 8px; margin-bottom: 20px; }
        .progress-bar { background: #ddd; height: 20px; border-radius: 10px; overflow: hidden; }
        .passed { background: #4caf50; height: 100%; }
        .test { padding: 10px; margin: 5px 0; border-radius: 4px; }
        .test.pass { background: #e8f5e9; border-left: 4px solid #4caf50; }
        .test.flaky { background: #fffde7; border-left: 4px solid #fbc02d; }
        .test.fail { background: #ffebee; border-left: 4px solid #f44336; }
        .test.skip { background: #fff3e0; border-left: 4px solid #ff9800; }
        .error { color: #d32f2f; font-family: monospace; white-space: pre-wrap; }
        .screenshot img { max-width: 480px; border: 1px solid #ddd; margin-top: 8px; }
    </style>
</head>
<body>
"#,
        );

        html.push_str(&format!(
            r#"<div class="summary">
    <h1>{}</h1>
    <h2>Results: {}/{} passed ({:.1}%)</h2>
    <div class="progress-bar">
        <div class="passed" style="width: {:.1}%"></div>
    </div>
    <p>Run {} started {} &middot; duration {:.2}s &middot; {} flaky &middot; {} skipped</p>
</div>
"#,
            escape_xml(&self.title),
            self.passed_count(),
            self.total_count(),
            self.pass_rate() * 100.0,
            self.pass_rate() * 100.0,
            self.run_id,
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.total_duration().as_secs_f64(),
            self.flaky_count(),
            self.skipped_count(),
        ));

        for (suite, results) in self.by_suite() {
            html.push_str(&format!("<h2>{}</h2>\n", escape_xml(suite)));
            for result in results {
                html.push_str(&format!(
                    r#"<div class="test {}">
    <strong>{}</strong> - {} ({:.2}ms, {} attempt(s))
"#,
                    result.status.css_class(),
                    escape_xml(&result.name),
                    result.status,
                    result.duration.as_secs_f64() * 1000.0,
                    result.attempts,
                ));
                if let Some(error) = &result.error {
                    html.push_str(&format!(
                        "    <div class=\"error\">{}</div>\n",
                        escape_xml(error)
                    ));
                }
                if let Some(img) = result.screenshot.as_deref().and_then(inline_png) {
                    html.push_str(&format!(
                        "    <div class=\"screenshot\"><img alt=\"failure screenshot\" src=\"{img}\"></div>\n"
                    ));
                }
                html.push_str("</div>\n");
            }
        }

        html.push_str(
            r#"
<footer>
    <p>Generated by Pomar</p>
</footer>
</body>
</html>
"#,
        );

        html
    }

    /// Render JUnit XML, one `<testsuite>` per suite
    #[must_use]
    pub fn render_junit(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<testsuites name="{}" tests="{}" failures="{}" skipped="{}" time="{:.3}">"#,
            escape_xml(&self.title),
            self.total_count(),
            self.failed_count(),
            self.skipped_count(),
            self.total_duration().as_secs_f64()
        ));
        xml.push('\n');

        for (suite, results) in self.by_suite() {
            let failures = results.iter().filter(|r| r.status.is_failed()).count();
            let skipped = results
                .iter()
                .filter(|r| r.status == TestStatus::Skipped)
                .count();
            let time: Duration = results.iter().map(|r| r.duration).sum();
            xml.push_str(&format!(
                r#"  <testsuite name="{}" tests="{}" failures="{}" skipped="{}" time="{:.3}">"#,
                escape_xml(suite),
                results.len(),
                failures,
                skipped,
                time.as_secs_f64()
            ));
            xml.push('\n');

            for result in results {
                xml.push_str(&format!(
                    r#"    <testcase classname="{}" name="{}" time="{:.3}">"#,
                    escape_xml(suite),
                    escape_xml(&result.name),
                    result.duration.as_secs_f64()
                ));
                xml.push('\n');
                match (result.status, &result.error) {
                    (TestStatus::Failed, Some(error)) => {
                        xml.push_str(&format!(
                            r#"      <failure message="{}">{}</failure>"#,
                            escape_xml(error),
                            escape_xml(error)
                        ));
                        xml.push('\n');
                    }
                    (TestStatus::Skipped, reason) => {
                        xml.push_str(&format!(
                            r#"      <skipped message="{}"/>"#,
                            escape_xml(reason.as_deref().unwrap_or_default())
                        ));
                        xml.push('\n');
                    }
                    _ => {}
                }
                xml.push_str("    </testcase>\n");
            }
            xml.push_str("  </testsuite>\n");
        }

        xml.push_str("</testsuites>\n");
        xml
    }

    /// Render the JSON report
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::Json`] if serialization fails.
    pub fn render_json(&self) -> PomarResult<String> {
        let report = JsonReport {
            run_id: self.run_id.to_string(),
            title: &self.title,
            started_at: self.started_at,
            total: self.total_count(),
            passed: self.passed_count(),
            failed: self.failed_count(),
            skipped: self.skipped_count(),
            flaky: self.flaky_count(),
            results: &self.results,
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    /// Render in `format`
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::Json`] if JSON serialization fails.
    pub fn render(&self, format: ReportFormat) -> PomarResult<String> {
        match format {
            ReportFormat::Html => Ok(self.render_html()),
            ReportFormat::Json => self.render_json(),
            ReportFormat::Junit => Ok(self.render_junit()),
        }
    }

    /// Write the report into `dir`, returning the file path
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn write(&self, format: ReportFormat, dir: &Path) -> PomarResult<PathBuf> {
        let content = self.render(format)?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format.file_name());
        std::fs::write(&path, content)?;
        Ok(path)
    }
}

/// `data:` URI for a PNG on disk, `None` if unreadable
fn inline_png(path: &Path) -> Option<String> {
    let bytes = std::fs::read(path).ok()?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Some(format!("data:image/png;base64,{encoded}"))
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
