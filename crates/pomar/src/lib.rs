//! Pomar: page objects and fixtures for end-to-end web suites
//!
//! Pomar (Portuguese: "orchard") grows test suites out of three parts:
//! page objects that own selectors and user intentions, fixtures that
//! compose them into ready-to-use state, and a runner that gives every
//! scenario an isolated browser session.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        POMAR Architecture                         │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌────────────┐   ┌───────────┐   ┌───────────┐  │
//! │  │ Scenario  │──►│ Fixtures   │──►│ Page      │──►│ Browser   │  │
//! │  │ (runner)  │   │ (setup/    │   │ Objects   │   │ Session   │  │
//! │  │           │   │  teardown) │   │ (Driver)  │   │ (CDP/fake)│  │
//! │  └───────────┘   └────────────┘   └───────────┘   └───────────┘  │
//! │        │                                                          │
//! │        └──► Reporter (HTML / JSON / JUnit) + screenshots, traces  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sessions come from a [`SessionFactory`]: [`ChromiumFactory`] with the
//! `browser` feature, or [`FakeSessionFactory`] for an in-memory site.

#![warn(missing_docs)]

mod assertion;
/// Chromium over CDP
#[cfg(feature = "browser")]
pub mod chromium;
/// Suite configuration and environment overrides
pub mod config;
/// Randomized test data
pub mod data;
/// Scriptable in-memory browser
pub mod fake;
mod fixture;
/// JSON API client
pub mod http;
mod locator;
/// Subscriber setup for binaries
pub mod logging;
mod page;
/// Run reports
pub mod reporter;
mod result;
/// Scenario runner
pub mod runner;
mod session;
/// Action traces
pub mod trace;
/// Load states and polling deadlines
pub mod wait;

pub use assertion::{Assertion, AssertionResult};
#[cfg(feature = "browser")]
pub use chromium::{ChromiumConfig, ChromiumFactory, ChromiumSession};
pub use config::{CaptureSettings, Credentials, SuiteConfig, SuiteDefaults, Timeouts};
pub use data::{with_overrides, DataGenerator, Generate};
pub use fake::{FakeBrowser, FakeElement, FakePage, FakeSessionFactory, FakeSite};
pub use fixture::{with_fixture, Fixture, Provided};
pub use http::{ApiClient, ApiResponse};
pub use locator::{Locator, LocatorOptions, LocatorRegistry, LocatorRegistryBuilder, Selector};
pub use page::{url_path, Driver, PageObject, StepOutcome, UrlMatcher};
pub use reporter::{ReportFormat, Reporter, ScenarioResult, TestStatus};
pub use result::{PomarError, PomarResult};
pub use runner::{
    FailureMode, RunOptions, Runner, Scenario, ScenarioContext, ScenarioFuture, ScenarioKind, Suite,
};
pub use session::{BrowserSession, Detached, NoBrowserFactory, SessionFactory};
pub use trace::{ActionTrace, TraceArchive, TraceStep};
pub use wait::{Deadline, LoadState};

/// Everything a suite module usually needs
pub mod prelude {
    pub use super::{
        with_fixture, with_overrides, ApiClient, ApiResponse, Assertion, DataGenerator, Driver,
        Fixture, Generate, Locator, LocatorRegistry, PageObject, PomarError, PomarResult,
        Provided, Scenario, ScenarioContext, ScenarioFuture, Selector, StepOutcome, Suite,
        SuiteConfig, SuiteDefaults,
    };
}
