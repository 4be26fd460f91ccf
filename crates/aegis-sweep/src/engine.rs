//! The page-at-a-time sweep loop.
//!
//! A sweep fetches one page of candidate records, filters it, submits the
//! survivors to the bulk-delete endpoint batch by batch, folds the outcomes
//! into the running totals, and only then fetches the next page. Nothing from
//! a processed page is retained beyond the accumulated summary, so peak
//! memory is bounded by the page size rather than the collection size.

use crate::record::SweepRecord;
use crate::report::{Failure, SweepOutcome};
use aegis_core::Result;
use async_trait::async_trait;

/// Whether a run mutates the remote collection or only simulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Simulate: classify every eligible record as "would delete", issue no
    /// delete calls.
    DryRun,
    /// Mutate: issue one bulk-delete call per batch.
    Apply,
}

impl Mode {
    /// String form used in the summary envelope.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DryRun => "dry_run",
            Self::Apply => "apply",
        }
    }

    /// Returns true in apply mode.
    #[must_use]
    pub const fn is_apply(self) -> bool {
        matches!(self, Self::Apply)
    }
}

/// Page-index progression for mutating runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    /// Increment the page index after every non-empty page. Used by read-only
    /// runs and by removers that delete out-of-band (single-resource DELETE
    /// with client-side selection).
    Advance,
    /// Hold the page index at 1 for the whole run. Deleting everything on
    /// page 1 shrinks the remote collection, so the next "page 1" carries
    /// what used to be page 2; incrementing would skip records. Termination
    /// is an empty page, never an exhausted page count.
    HoldFirst,
}

/// Fate of one bulk-delete call, applied to every record in the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchDisposition {
    /// The endpoint accepted the batch; all records are deleted.
    Accepted,
    /// The endpoint rejected the batch; all records failed.
    Rejected {
        /// HTTP status returned by the delete endpoint.
        status: u16,
        /// Response body, carried verbatim into each failure descriptor.
        body: String,
    },
}

impl BatchDisposition {
    /// Classify a delete response status. The success class is 200, 202,
    /// and 204; everything else rejects the whole batch.
    #[must_use]
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        match status {
            200 | 202 | 204 => Self::Accepted,
            _ => Self::Rejected {
                status,
                body: body.into(),
            },
        }
    }
}

/// Produces pages of candidate records.
///
/// The sequence is lazy, finite, and non-restartable; a fetch error is fatal
/// for the whole run.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Record type this source yields.
    type Record: SweepRecord;

    /// Fetch one page. `page` is 1-based.
    ///
    /// # Errors
    ///
    /// Any error aborts the calling sweep.
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<Vec<Self::Record>>;
}

/// Submits one batch to the bulk-delete endpoint.
#[async_trait]
pub trait BatchRemover: Send + Sync {
    /// Record type this remover accepts.
    type Record: SweepRecord;

    /// Issue exactly one delete call for the batch. Every record in the
    /// batch has a key. Non-success statuses are reported through the
    /// disposition, not as errors; an `Err` aborts the whole run.
    ///
    /// # Errors
    ///
    /// Transport-level failures only.
    async fn remove_batch(&self, batch: &[Self::Record]) -> Result<BatchDisposition>;
}

/// Caller-side knobs for one sweep run.
#[derive(Debug, Clone)]
pub struct SweepOptions {
    /// Dry-run or apply.
    pub mode: Mode,
    /// Records requested per page.
    pub page_size: u32,
    /// Records per delete call; `None` submits each page as one batch.
    pub batch_size: Option<usize>,
    /// Page-index progression in apply mode; dry-run always advances.
    pub page_mode: PageMode,
}

impl SweepOptions {
    /// Dry-run options with the given page size, whole-page batches.
    #[must_use]
    pub const fn dry_run(page_size: u32) -> Self {
        Self {
            mode: Mode::DryRun,
            page_size,
            batch_size: None,
            page_mode: PageMode::Advance,
        }
    }

    /// Apply-mode options with the given page size and progression.
    #[must_use]
    pub const fn apply(page_size: u32, page_mode: PageMode) -> Self {
        Self {
            mode: Mode::Apply,
            page_size,
            batch_size: None,
            page_mode,
        }
    }

    /// Override the batch size.
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }
}

/// Run one sweep to completion.
///
/// `keep` is the client-side record filter; records it rejects are counted
/// as scanned but never batched. Records without a key are likewise dropped
/// from batches while still counting as scanned.
///
/// # Errors
///
/// Fatal errors only: a failed fetch, or a transport failure inside the
/// remover. Batch rejections are folded into the outcome instead.
pub async fn run_sweep<S, R, P>(
    source: &S,
    remover: &R,
    keep: P,
    options: &SweepOptions,
) -> Result<SweepOutcome<S::Record>>
where
    S: PageSource,
    R: BatchRemover<Record = S::Record>,
    P: Fn(&S::Record) -> bool,
{
    let mut outcome = SweepOutcome::new();
    let mut page: u32 = 1;

    loop {
        let records = source.fetch_page(page, options.page_size).await?;
        if records.is_empty() {
            break;
        }
        outcome.scanned += records.len() as u64;
        tracing::debug!(page, fetched = records.len(), "processing page");

        let mut eligible = Vec::with_capacity(records.len());
        for record in records {
            if record.key().is_none() {
                tracing::debug!(record = %record.label(), "record has no identifier, skipping");
                continue;
            }
            if keep(&record) {
                eligible.push(record);
            }
        }

        match options.mode {
            Mode::DryRun => {
                outcome.deletions.extend(eligible);
                page += 1;
            }
            Mode::Apply => {
                let batch_size = options.batch_size.unwrap_or_else(|| eligible.len().max(1));
                for batch in eligible.chunks(batch_size) {
                    match remover.remove_batch(batch).await? {
                        BatchDisposition::Accepted => {
                            tracing::debug!(records = batch.len(), "batch deleted");
                            outcome.deletions.extend_from_slice(batch);
                        }
                        BatchDisposition::Rejected { status, body } => {
                            let error = format!("HTTP {status}: {body}");
                            tracing::warn!(records = batch.len(), %error, "batch rejected");
                            outcome
                                .failures
                                .extend(batch.iter().cloned().map(|record| Failure {
                                    record,
                                    error: error.clone(),
                                }));
                        }
                    }
                }
                if options.page_mode == PageMode::Advance {
                    page += 1;
                }
            }
        }
    }

    Ok(outcome)
}
