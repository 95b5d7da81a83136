//! `list` and `config` commands

use pomar::{ScenarioKind, SuiteConfig};
use serde::Serialize;

use crate::error::{CliError, CliResult};

/// One scenario in a listing
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioListing {
    /// Scenario name
    pub name: String,
    /// `ui` or `api`
    pub kind: &'static str,
    /// Filter tags
    pub tags: Vec<String>,
}

/// One catalog suite in a listing
#[derive(Debug, Clone, Serialize)]
pub struct SuiteListing {
    /// Suite name
    pub name: &'static str,
    /// Default system under test
    pub base_url: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Whether the suite needs a browser
    pub needs_browser: bool,
    /// Scenarios, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenarios: Option<Vec<ScenarioListing>>,
}

/// Every catalog suite, optionally with its scenarios
#[must_use]
pub fn list_suites(with_scenarios: bool) -> Vec<SuiteListing> {
    pomar_suites::catalog()
        .iter()
        .map(|entry| {
            let scenarios = with_scenarios.then(|| {
                entry
                    .build(SuiteConfig::new(&entry.defaults))
                    .scenarios()
                    .iter()
                    .map(|scenario| ScenarioListing {
                        name: scenario.name().to_string(),
                        kind: match scenario.kind() {
                            ScenarioKind::Ui => "ui",
                            ScenarioKind::Api => "api",
                        },
                        tags: scenario.tags().to_vec(),
                    })
                    .collect()
            });
            SuiteListing {
                name: entry.name(),
                base_url: entry.defaults.base_url,
                description: entry.description,
                needs_browser: entry.needs_browser,
                scenarios,
            }
        })
        .collect()
}

/// Plain-text table of a listing
#[must_use]
pub fn render_table(listings: &[SuiteListing]) -> String {
    let width = listings.iter().map(|l| l.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for listing in listings {
        let marker = if listing.needs_browser { "ui " } else { "api" };
        out.push_str(&format!(
            "{:width$}  {marker}  {}  ({})\n",
            listing.name, listing.description, listing.base_url
        ));
        for scenario in listing.scenarios.iter().flatten() {
            out.push_str(&format!("    {} [{}]", scenario.name, scenario.kind));
            if !scenario.tags.is_empty() {
                out.push_str(&format!(" #{}", scenario.tags.join(" #")));
            }
            out.push('\n');
        }
    }
    out
}

/// Listing as pretty JSON
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| CliError::config(e.to_string()))
}

/// Configuration a suite would run with under the current environment
///
/// # Errors
///
/// Returns [`CliError::UnknownSuite`] or a config error for a bad override.
pub fn resolved_config(name: &str) -> CliResult<SuiteConfig> {
    let entry = pomar_suites::find(name).ok_or_else(|| CliError::unknown_suite(name))?;
    Ok(SuiteConfig::from_env(&entry.defaults)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_covers_catalog() {
        let listings = list_suites(false);
        assert_eq!(listings.len(), pomar_suites::catalog().len());
        assert!(listings.iter().all(|l| l.scenarios.is_none()));
    }

    #[test]
    fn test_listing_with_scenarios() {
        let listings = list_suites(true);
        let booker = listings.iter().find(|l| l.name == "booker").unwrap();
        let scenarios = booker.scenarios.as_ref().unwrap();
        assert!(!scenarios.is_empty());
        assert!(scenarios.iter().all(|s| s.kind == "api"));
    }

    #[test]
    fn test_table_has_a_row_per_suite() {
        let listings = list_suites(false);
        let table = render_table(&listings);
        assert_eq!(table.lines().count(), listings.len());
        assert!(table.contains("saucedemo"));
    }

    #[test]
    fn test_json_skips_missing_scenarios() {
        let json = render_json(&list_suites(false)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value[0].get("scenarios").is_none());
        assert_eq!(value[0]["needs_browser"], true);
    }

    #[test]
    fn test_resolved_config_unknown() {
        assert!(matches!(resolved_config("nope"), Err(CliError::UnknownSuite { .. })));
    }

    #[test]
    fn test_resolved_config_hides_password() {
        let config = resolved_config("booker").unwrap();
        let json = render_json(&config).unwrap();
        assert!(json.contains("base_url"));
        assert!(!json.contains("\"password\""));
    }
}
