//! Action traces.
//!
//! When `capture.trace` is on, every driver primitive appends a
//! [`TraceStep`] to the scenario's [`ActionTrace`]. The runner writes the
//! trace to `<artifacts>/traces/<scenario>.json` when the scenario fails.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;
use uuid::Uuid;

use crate::result::PomarResult;

/// One traced action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    /// Primitive name (`click`, `fill`, `navigate`, ...)
    pub action: String,
    /// Selector or URL the action targeted
    pub target: String,
    /// Start offset from trace start (ms)
    pub start_ms: u64,
    /// Action duration (ms)
    pub duration_ms: u64,
    /// Rendered error when the action failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TraceStep {
    /// Whether the action failed
    #[must_use]
    pub const fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Serializable snapshot of a trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceArchive {
    /// Unique trace id
    pub id: String,
    /// Scenario name
    pub scenario: String,
    /// Wall clock at trace start
    pub started_at: chrono::DateTime<chrono::Utc>,
    /// Steps in execution order
    pub steps: Vec<TraceStep>,
}

impl TraceArchive {
    /// Load an archive from JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_json(path: &Path) -> PomarResult<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Steps that failed
    #[must_use]
    pub fn failures(&self) -> Vec<&TraceStep> {
        self.steps
            .iter()
            .filter(|s| s.failed())
            .collect()
    }
}

/// Thread-safe recorder shared by the drivers of one scenario
#[derive(Debug)]
pub struct ActionTrace {
    id: Uuid,
    scenario: String,
    started: Instant,
    started_at: chrono::DateTime<chrono::Utc>,
    steps: Mutex<Vec<TraceStep>>,
}

impl ActionTrace {
    /// Start a trace for `scenario`
    #[must_use]
    pub fn new(scenario: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            scenario: scenario.into(),
            started: Instant::now(),
            started_at: chrono::Utc::now(),
            steps: Mutex::new(Vec::new()),
        }
    }

    /// Trace id
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Record a finished action that began at `began`
    pub fn record<T>(&self, action: &str, target: &str, began: Instant, result: &PomarResult<T>) {
        let step = TraceStep {
            action: action.to_string(),
            target: target.to_string(),
            start_ms: began.saturating_duration_since(self.started).as_millis() as u64,
            duration_ms: began.elapsed().as_millis() as u64,
            error: result.as_ref().err().map(ToString::to_string),
        };
        self.steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(step);
    }

    /// Number of recorded steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot the trace
    #[must_use]
    pub fn archive(&self) -> TraceArchive {
        TraceArchive {
            id: self.id.to_string(),
            scenario: self.scenario.clone(),
            started_at: self.started_at,
            steps: self
                .steps
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }

    /// Write the trace as pretty JSON, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_json(&self, path: &Path) -> PomarResult<()> {
        let json = serde_json::to_string_pretty(&self.archive())?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json)?;
        Ok(())
    }
}
