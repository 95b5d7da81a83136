//! Scenario catalogues for public demo sites.
//!
//! Each module targets one externally hosted application and carries its
//! page objects, fixed and generated test data, fixtures and a
//! `suite(config)` function building the scenario catalogue:
//!
//! | module | system under test |
//! |---|---|
//! | [`saucedemo`] | login / inventory / cart e-commerce demo |
//! | [`contact_list`] | contact-list CRUD app (UI and REST API) |
//! | [`booker`] | restful-booker REST API |
//! | [`practice_form`] | demoqa automation practice form |
//! | [`acme`] | ACME demo bank login and dashboard |
//! | [`parabank`] | ParaBank administration page |
//! | [`github_search`] | GitHub user search app |
//! | [`bookstore`] | demoqa book store search |
//! | [`the_internet`] | the-internet exit intent modal |
//!
//! [`catalog`] lists every suite with its defaults so a runner can resolve
//! configuration and build suites by name.

#![warn(missing_docs)]

pub mod acme;
pub mod booker;
pub mod bookstore;
pub mod contact_list;
pub mod github_search;
pub mod parabank;
pub mod practice_form;
pub mod saucedemo;
pub mod the_internet;

use pomar::{PomarResult, Suite, SuiteConfig, SuiteDefaults};

/// A suite the catalog knows how to build
#[derive(Debug, Clone, Copy)]
pub struct SuiteEntry {
    /// Name, base URL and default credentials
    pub defaults: SuiteDefaults,
    /// One-line description for listings
    pub description: &'static str,
    /// Whether the suite needs a browser
    pub needs_browser: bool,
    build: fn(SuiteConfig) -> Suite,
}

impl SuiteEntry {
    /// Suite name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.defaults.name
    }

    /// Build the suite from an explicit configuration
    #[must_use]
    pub fn build(&self, config: SuiteConfig) -> Suite {
        (self.build)(config)
    }

    /// Build the suite from the environment
    ///
    /// # Errors
    ///
    /// Returns a config error when an environment variable is unparsable.
    pub fn from_env(&self) -> PomarResult<Suite> {
        Ok(self.build(SuiteConfig::from_env(&self.defaults)?))
    }
}

const CATALOG: &[SuiteEntry] = &[
    SuiteEntry {
        defaults: saucedemo::DEFAULTS,
        description: "Sauce Demo login, inventory and cart",
        needs_browser: true,
        build: saucedemo::suite,
    },
    SuiteEntry {
        defaults: contact_list::DEFAULTS,
        description: "Contact List app: sign-up, contacts CRUD, REST API",
        needs_browser: true,
        build: contact_list::suite,
    },
    SuiteEntry {
        defaults: booker::DEFAULTS,
        description: "Restful Booker REST API",
        needs_browser: false,
        build: booker::suite,
    },
    SuiteEntry {
        defaults: practice_form::DEFAULTS,
        description: "DemoQA automation practice form",
        needs_browser: true,
        build: practice_form::suite,
    },
    SuiteEntry {
        defaults: acme::DEFAULTS,
        description: "ACME demo app login and dashboard",
        needs_browser: true,
        build: acme::suite,
    },
    SuiteEntry {
        defaults: parabank::DEFAULTS,
        description: "ParaBank administration settings",
        needs_browser: true,
        build: parabank::suite,
    },
    SuiteEntry {
        defaults: github_search::DEFAULTS,
        description: "GitHub user search",
        needs_browser: true,
        build: github_search::suite,
    },
    SuiteEntry {
        defaults: bookstore::DEFAULTS,
        description: "DemoQA book store search",
        needs_browser: true,
        build: bookstore::suite,
    },
    SuiteEntry {
        defaults: the_internet::DEFAULTS,
        description: "The Internet exit intent modal",
        needs_browser: true,
        build: the_internet::suite,
    },
];

/// Every known suite, in listing order
#[must_use]
pub fn catalog() -> &'static [SuiteEntry] {
    CATALOG
}

/// Look a suite up by name (case-insensitive; `_` and `-` are interchangeable)
#[must_use]
pub fn find(name: &str) -> Option<&'static SuiteEntry> {
    let wanted = name.trim().to_ascii_lowercase().replace('_', "-");
    CATALOG.iter().find(|entry| entry.name() == wanted)
}
