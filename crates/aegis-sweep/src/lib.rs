//! # aegis-sweep
//!
//! Paginated bulk-mutation workflow engine for the Aegis platform.
//!
//! A sweep walks a remote collection one page at a time, filters each page,
//! submits the survivors to a bulk-delete endpoint in batches (or merely
//! tallies them in dry-run mode), and folds every outcome into a single run
//! summary. Batch failures are isolated: one rejected delete call fails that
//! batch's records and the sweep moves on.
//!
//! ## Modules
//!
//! - [`engine`] - The page-at-a-time sweep loop and its trait seams
//! - [`record`] - The record contract (delete key, label)
//! - [`report`] - Outcome accumulation and the JSON summary envelope
//! - [`file`] - CSV-driven sweeps bypassing the listing API

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod engine;
pub mod file;
pub mod record;
pub mod report;

// Re-export commonly used types
pub use engine::{
    run_sweep, BatchDisposition, BatchRemover, Mode, PageMode, PageSource, SweepOptions,
};
pub use record::SweepRecord;
pub use report::{Failure, RunReport, SweepOutcome};
