//! Run accumulation and summary rendering.
//!
//! A sweep accumulates its per-batch outcomes into a [`SweepOutcome`]; the
//! [`RunReport`] wrapper projects that outcome into the JSON summary envelope
//! the CLI prints. Both are plain data; neither touches the network.

use crate::engine::Mode;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// One record that could not be deleted, with the remote diagnostic attached.
#[derive(Debug, Clone, Serialize)]
pub struct Failure<T> {
    /// The record as fetched.
    #[serde(flatten)]
    pub record: T,
    /// Remote error text, carried verbatim.
    pub error: String,
}

/// Accumulated results of one sweep run.
///
/// `scanned` counts every fetched record, including records later dropped
/// for lacking an identifier. `deletions` holds deleted records in apply
/// mode and would-delete records in dry-run mode, in fetch order.
#[derive(Debug, Clone)]
pub struct SweepOutcome<T> {
    /// Total records fetched across all pages.
    pub scanned: u64,
    /// Records deleted (apply) or selected for deletion (dry-run).
    pub deletions: Vec<T>,
    /// Records whose batch was rejected by the delete endpoint.
    pub failures: Vec<Failure<T>>,
}

impl<T> SweepOutcome<T> {
    /// Create an empty outcome.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scanned: 0,
            deletions: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Number of deleted (or would-delete) records.
    #[must_use]
    pub fn deleted(&self) -> usize {
        self.deletions.len()
    }

    /// Number of failed records.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

impl<T> Default for SweepOutcome<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Final report for one sweep run.
///
/// The summary keys are derived from the record noun, e.g. an `images` run
/// produces `images_scanned` and either `images_deleted`/`images_failed`
/// (apply) or `images_would_delete` (dry-run).
#[derive(Debug, Clone)]
pub struct RunReport<T> {
    noun: &'static str,
    mode: Mode,
    filters: Value,
    source: Option<String>,
    outcome: SweepOutcome<T>,
}

impl<T: Serialize> RunReport<T> {
    /// Wrap a finished outcome for rendering.
    #[must_use]
    pub fn new(noun: &'static str, mode: Mode, filters: Value, outcome: SweepOutcome<T>) -> Self {
        Self {
            noun,
            mode,
            filters,
            source: None,
            outcome,
        }
    }

    /// Record the input file path for file-driven runs.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The run mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// The accumulated outcome.
    #[must_use]
    pub const fn outcome(&self) -> &SweepOutcome<T> {
        &self.outcome
    }

    /// Render the machine-readable summary envelope.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut summary = Map::new();
        summary.insert(
            format!("{}_scanned", self.noun),
            json!(self.outcome.scanned),
        );
        match self.mode {
            Mode::Apply => {
                summary.insert(
                    format!("{}_deleted", self.noun),
                    json!(self.outcome.deleted()),
                );
                summary.insert(
                    format!("{}_failed", self.noun),
                    json!(self.outcome.failed()),
                );
            }
            Mode::DryRun => {
                summary.insert(
                    format!("{}_would_delete", self.noun),
                    json!(self.outcome.deleted()),
                );
                summary.insert(format!("{}_failed", self.noun), json!(0));
            }
        }

        let mut root = Map::new();
        root.insert("mode".to_string(), json!(self.mode.as_str()));
        root.insert("summary".to_string(), Value::Object(summary));
        root.insert("filters".to_string(), self.filters.clone());
        if let Some(source) = &self.source {
            root.insert("source".to_string(), json!(source));
        }
        root.insert("deletions".to_string(), json!(self.outcome.deletions));
        if !self.outcome.failures.is_empty() {
            root.insert("failures".to_string(), json!(self.outcome.failures));
        }
        Value::Object(root)
    }
}
