//! The small demo catalogues against their replicas.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use common::demos::{acme_site, bookstore_site, github_search_site, parabank_site, the_internet_site};
use common::{assert_all_passed, run_on_site, test_config};
use pomar::{FakeSite, TestStatus};
use pomar_suites::{acme, bookstore, github_search, parabank, the_internet};

#[tokio::test]
async fn test_acme_scenarios_pass() {
    let dir = tempfile::tempdir().unwrap();
    let defaults = acme::DEFAULTS;
    let suite = acme::suite(test_config(&defaults, defaults.base_url, dir.path()));

    assert_all_passed(&run_on_site(&suite, acme_site()).await);
}

#[tokio::test]
async fn test_parabank_scenarios_pass() {
    let dir = tempfile::tempdir().unwrap();
    let defaults = parabank::DEFAULTS;
    let suite = parabank::suite(test_config(&defaults, defaults.base_url, dir.path()));

    assert_all_passed(&run_on_site(&suite, parabank_site()).await);
}

#[tokio::test]
async fn test_github_search_scenarios_pass() {
    let dir = tempfile::tempdir().unwrap();
    let defaults = github_search::DEFAULTS;
    let suite = github_search::suite(test_config(&defaults, defaults.base_url, dir.path()));

    assert_all_passed(&run_on_site(&suite, github_search_site()).await);
}

#[tokio::test]
async fn test_bookstore_searches_pass() {
    let dir = tempfile::tempdir().unwrap();
    let defaults = bookstore::DEFAULTS;
    let suite = bookstore::suite(test_config(&defaults, defaults.base_url, dir.path()));

    let results = run_on_site(&suite, bookstore_site()).await;

    assert_eq!(results.len(), bookstore::SEARCHES.len());
    assert_all_passed(&results);
}

#[tokio::test]
async fn test_exit_intent_scenarios_pass() {
    let dir = tempfile::tempdir().unwrap();
    let defaults = the_internet::DEFAULTS;
    let suite = the_internet::suite(test_config(&defaults, defaults.base_url, dir.path()));

    assert_all_passed(&run_on_site(&suite, the_internet_site()).await);
}

#[tokio::test]
async fn test_missing_modal_fails_the_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let defaults = the_internet::DEFAULTS;
    let suite = the_internet::suite(test_config(&defaults, defaults.base_url, dir.path()));
    let site = FakeSite::new(defaults.base_url).page(
        "/exit_intent",
        pomar::FakePage::new("The Internet").element(pomar::FakeElement::new("html")),
    );

    let results = run_on_site(&suite, site).await;

    assert!(results.iter().all(|r| r.status == TestStatus::Failed));
}
