//! Pomador: command-line runner for the Pomar suite catalog
//!
//! Lists the catalog, resolves per-suite configuration from the environment
//! and runs suites with progress output and HTML, JSON or JUnit reports.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)]
#![allow(clippy::missing_errors_doc)]

mod catalog;
mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use catalog::{list_suites, render_json, render_table, resolved_config, ScenarioListing, SuiteListing};
pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, ListArgs, LogFormatArg, ReportFormatArg, RunArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{result_line, ProgressReporter};
pub use runner::{check, resolve_suites, SuiteRunner};
