//! The record contract for sweep workflows.

use serde::Serialize;

/// A candidate record flowing through a sweep.
///
/// Records come out of a [`PageSource`](crate::engine::PageSource) and, when
/// eligible, into a [`BatchRemover`](crate::engine::BatchRemover). A record
/// without a key cannot be submitted for deletion; the engine drops it from
/// batches silently while still counting it as scanned.
pub trait SweepRecord: Clone + Serialize + Send + Sync {
    /// Identifier the bulk-delete endpoint expects for this record type.
    type Key: Clone + Send + Sync;

    /// The record's delete identifier, absent when the listing omitted it.
    fn key(&self) -> Option<Self::Key>;

    /// Human-oriented label for log lines.
    fn label(&self) -> String;
}
