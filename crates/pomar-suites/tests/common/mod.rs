//! Shared helpers for the suite integration tests.
//!
//! Every hosted demo is replaced by an in-memory [`FakeSite`] replica (UI
//! suites) or a local axum server (REST suites), so whole scenario
//! catalogues run offline through the real runner.

#![allow(dead_code)]

pub mod booker;
pub mod contacts;
pub mod demos;
pub mod forms;
pub mod shop;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use pomar::{
    FakeSessionFactory, FakeSite, RunOptions, Runner, ScenarioResult, Suite, SuiteConfig,
    SuiteDefaults, Timeouts,
};

/// Seed shared by every run so generated data is reproducible
pub const SEED: u64 = 20_240_601;

/// Short timeouts: fakes answer instantly, absences should not stall the run
pub fn test_timeouts() -> Timeouts {
    Timeouts {
        action: Duration::from_millis(1_500),
        navigation: Duration::from_millis(1_500),
        assertion: Duration::from_millis(1_500),
        presence: Duration::from_millis(200),
        scenario: Duration::from_secs(20),
    }
}

/// Suite configuration pointing at `base_url`, writing artifacts under `dir`
pub fn test_config(defaults: &SuiteDefaults, base_url: &str, dir: &Path) -> SuiteConfig {
    SuiteConfig::new(defaults)
        .with_base_url(base_url)
        .with_timeouts(test_timeouts())
        .with_artifacts_dir(dir)
}

/// Run every scenario of `suite` against `site`
pub async fn run_on_site(suite: &Suite, site: FakeSite) -> Vec<ScenarioResult> {
    let factory = Arc::new(FakeSessionFactory::new(site));
    Runner::new(factory, RunOptions::new().with_seed(SEED))
        .run_suite(suite)
        .await
}

/// Run the scenarios of `suite` whose name or tag matches `filter`
pub async fn run_filtered(suite: &Suite, site: FakeSite, filter: &str) -> Vec<ScenarioResult> {
    let factory = Arc::new(FakeSessionFactory::new(site));
    Runner::new(factory, RunOptions::new().with_seed(SEED).with_filter(filter))
        .run_suite(suite)
        .await
}

/// Fail with every failing scenario and its error
pub fn assert_all_passed(results: &[ScenarioResult]) {
    assert!(!results.is_empty(), "no scenario ran");
    let failures: Vec<String> = results
        .iter()
        .filter(|r| !r.status.is_passed())
        .map(|r| format!("{}: {}", r.name, r.error.as_deref().unwrap_or("no error")))
        .collect();
    assert!(failures.is_empty(), "failing scenarios:\n{}", failures.join("\n"));
}

/// Serve `app` on an ephemeral local port; returns its base URL
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _ = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}
