//! Output formatting and progress reporting

use std::sync::Arc;

use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use pomar::runner::ResultObserver;
use pomar::{Reporter, ScenarioResult, TestStatus};

/// Progress reporter for scenario runs
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

fn prefix(use_color: bool, status: TestStatus) -> String {
    match (use_color, status) {
        (true, TestStatus::Passed) => style("✓").green().bold().to_string(),
        (true, TestStatus::Flaky) => style("~").yellow().bold().to_string(),
        (true, TestStatus::Failed) => style("✗").red().bold().to_string(),
        (true, TestStatus::Skipped) => style("-").dim().to_string(),
        (false, TestStatus::Passed) => "PASS".to_string(),
        (false, TestStatus::Flaky) => "FLAKY".to_string(),
        (false, TestStatus::Failed) => "FAIL".to_string(),
        (false, TestStatus::Skipped) => "SKIP".to_string(),
    }
}

/// Line printed when a scenario finishes
#[must_use]
pub fn result_line(result: &ScenarioResult, use_color: bool) -> String {
    let mut line = format!(
        "{} {} ({:.2}s)",
        prefix(use_color, result.status),
        result.full_name(),
        result.duration.as_secs_f64()
    );
    if result.attempts > 1 {
        line.push_str(&format!(" after {} attempts", result.attempts));
    }
    if let Some(error) = &result.error {
        if result.status.is_failed() {
            line.push_str(&format!("\n    {error}"));
        }
    }
    line
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over `total` scenarios
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_with_message("Done");
        }
    }

    /// Observer for [`pomar::Runner::with_observer`]: advances the bar and
    /// prints each finished scenario (failures only when quiet)
    #[must_use]
    pub fn observer(&self) -> ResultObserver {
        let bar = self.progress_bar.clone();
        let use_color = self.use_color;
        let quiet = self.quiet;
        Arc::new(move |result: &ScenarioResult| {
            if !quiet || result.status.is_failed() {
                let line = result_line(result, use_color);
                match &bar {
                    Some(pb) => pb.println(line),
                    None => {
                        let _ = Term::stderr().write_line(&line);
                    }
                }
            }
            if let Some(pb) = &bar {
                pb.set_message(result.name.clone());
                pb.inc(1);
            }
        })
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&styled);
    }

    /// Print the run summary
    pub fn summary(&self, report: &Reporter) {
        let failed = report.failed_count();
        if self.quiet && failed == 0 {
            return;
        }
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&self.summary_line(report));
    }

    /// Summary text, styled when colors are on
    #[must_use]
    pub fn summary_line(&self, report: &Reporter) -> String {
        let passed = report.passed_count();
        let failed = report.failed_count();
        let skipped = report.skipped_count();
        let flaky = report.flaky_count();
        let total = report.total_count();
        let secs = report.total_duration().as_secs_f64();

        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();
            let skipped_style = Style::new().yellow();

            let status = if failed > 0 {
                failed_style.apply_to("FAILED")
            } else {
                passed_style.apply_to("PASSED")
            };
            format!(
                "{status} {total} scenarios in {secs:.2}s ({} passed, {} failed, {} skipped, {} flaky)",
                passed_style.apply_to(passed),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
                skipped_style.apply_to(skipped),
                skipped_style.apply_to(flaky),
            )
        } else {
            let status = if failed > 0 { "FAILED" } else { "PASSED" };
            format!(
                "{status} {total} scenarios in {secs:.2}s ({passed} passed, {failed} failed, {skipped} skipped, {flaky} flaky)"
            )
        }
    }
}
