//! File-driven sweeps.
//!
//! Instead of paging through the listing API, a run can take its candidates
//! from a CSV export with the header `image_id,image_name,registry_id,created`.
//! The file's rows become a single page; batching against the delete endpoint
//! is governed by the caller's batch size as usual. Rows with an empty or
//! non-integer `image_id` stay in the page (so they count as scanned) but
//! carry no key and are never batched.

use crate::engine::PageSource;
use crate::record::SweepRecord;
use aegis_core::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    image_id: String,
    #[serde(default)]
    image_name: String,
    #[serde(default)]
    registry_id: String,
    #[serde(default)]
    created: String,
}

/// One image row from a CSV export.
#[derive(Debug, Clone, Serialize)]
pub struct CsvImageRecord {
    /// Delete identifier; `None` when the row's `image_id` was empty or not
    /// an integer.
    pub image_id: Option<i64>,
    /// Registry the image lives in.
    pub registry: String,
    /// Repository part of `image_name` (everything before the last `:`).
    pub repository: String,
    /// Tag part of `image_name`; empty when the name carries no `:`.
    pub tag: String,
    /// The full `image_name` as exported.
    pub name: String,
    /// Creation timestamp as exported, uninterpreted.
    pub created: String,
}

impl SweepRecord for CsvImageRecord {
    type Key = i64;

    fn key(&self) -> Option<i64> {
        self.image_id
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

/// Split an exported image name into repository and tag on the last `:`.
#[must_use]
pub fn split_image_name(name: &str) -> (String, String) {
    match name.rsplit_once(':') {
        Some((repository, tag)) => (repository.to_string(), tag.to_string()),
        None => (name.to_string(), String::new()),
    }
}

/// Parse CSV rows from any reader.
///
/// # Errors
///
/// Returns [`Error::InputFile`] on malformed CSV.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<CsvImageRecord>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for row in csv_reader.deserialize::<CsvRow>() {
        let row = row.map_err(|e| Error::InputFile(format!("Malformed CSV row: {e}")))?;
        let image_id = row.image_id.trim().parse::<i64>().ok();
        if image_id.is_none() {
            tracing::debug!(name = %row.image_name, "row has no usable image_id");
        }
        let (repository, tag) = split_image_name(&row.image_name);
        records.push(CsvImageRecord {
            image_id,
            registry: row.registry_id,
            repository,
            tag,
            name: row.image_name,
            created: row.created,
        });
    }
    Ok(records)
}

/// Page source backed by a CSV export.
///
/// Serves the whole file as page 1 and an empty page afterwards, so a sweep
/// over it must run with [`PageMode::Advance`](crate::engine::PageMode).
#[derive(Debug)]
pub struct CsvSource {
    records: Vec<CsvImageRecord>,
}

impl CsvSource {
    /// Load a CSV export from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputFile`] when the file is missing, unreadable,
    /// or malformed.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| Error::InputFile(format!("Cannot open {}: {e}", path.display())))?;
        Ok(Self {
            records: parse_records(file)?,
        })
    }

    /// Wrap already-parsed records.
    #[must_use]
    pub fn from_records(records: Vec<CsvImageRecord>) -> Self {
        Self { records }
    }

    /// Number of rows loaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when the file held no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl PageSource for CsvSource {
    type Record = CsvImageRecord;

    async fn fetch_page(&self, page: u32, _page_size: u32) -> Result<Vec<CsvImageRecord>> {
        if page <= 1 {
            Ok(self.records.clone())
        } else {
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{
        run_sweep, BatchDisposition, BatchRemover, Mode, PageMode, SweepOptions,
    };
    use std::sync::Mutex;

    const EXPORT: &str = "\
image_id,image_name,registry_id,created
101,web/frontend:v1.0.3,Docker Hub,2023-01-10T08:00:00Z
102,my-repo/sub-path/image:v1.2.3,Docker Hub,2023-02-11T08:00:00Z
,orphan:latest,Docker Hub,2023-03-12T08:00:00Z
abc,bad-id:latest,Docker Hub,2023-03-13T08:00:00Z
103,no-tag-image,Harbor,2023-04-14T08:00:00Z
";

    #[test]
    fn image_names_split_on_the_last_colon() {
        assert_eq!(
            split_image_name("my-repo/sub-path/image:v1.2.3"),
            ("my-repo/sub-path/image".to_string(), "v1.2.3".to_string())
        );
        assert_eq!(
            split_image_name("no-tag-image"),
            ("no-tag-image".to_string(), String::new())
        );
    }

    #[test]
    fn rows_with_unusable_ids_keep_their_place_without_a_key() {
        let records = parse_records(EXPORT.as_bytes()).unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].image_id, Some(101));
        assert_eq!(records[2].image_id, None);
        assert_eq!(records[3].image_id, None);
        assert_eq!(records[4].repository, "no-tag-image");
        assert_eq!(records[4].tag, "");
        assert_eq!(records[1].registry, "Docker Hub");
    }

    struct CountingRemover {
        batch_sizes: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl BatchRemover for CountingRemover {
        type Record = CsvImageRecord;

        async fn remove_batch(&self, batch: &[CsvImageRecord]) -> aegis_core::Result<BatchDisposition> {
            self.batch_sizes.lock().unwrap().push(batch.len());
            Ok(BatchDisposition::Accepted)
        }
    }

    #[tokio::test]
    async fn file_sweep_batches_rows_and_counts_skipped_ones_as_scanned() {
        let source = CsvSource::from_records(parse_records(EXPORT.as_bytes()).unwrap());
        let remover = CountingRemover {
            batch_sizes: Mutex::new(Vec::new()),
        };
        let options = SweepOptions::apply(200, PageMode::Advance).with_batch_size(2);

        let outcome = run_sweep(&source, &remover, |_| true, &options).await.unwrap();

        assert_eq!(outcome.scanned, 5);
        assert_eq!(outcome.deleted(), 3);
        assert_eq!(remover.batch_sizes.lock().unwrap().clone(), vec![2, 1]);
        assert_eq!(options.mode, Mode::Apply);
    }

    #[tokio::test]
    async fn five_keyed_rows_with_batch_size_two_make_three_delete_calls() {
        let export = "\
image_id,image_name,registry_id,created
1,a:1,R,c
2,b:1,R,c
3,c:1,R,c
4,d:1,R,c
5,e:1,R,c
";
        let source = CsvSource::from_records(parse_records(export.as_bytes()).unwrap());
        let remover = CountingRemover {
            batch_sizes: Mutex::new(Vec::new()),
        };
        let options = SweepOptions::apply(200, PageMode::Advance).with_batch_size(2);

        run_sweep(&source, &remover, |_| true, &options).await.unwrap();

        assert_eq!(remover.batch_sizes.lock().unwrap().clone(), vec![2, 2, 1]);
    }

    #[test]
    fn missing_file_is_an_input_file_error() {
        let err = CsvSource::from_path(Path::new("/nonexistent/stale.csv")).unwrap_err();
        assert!(matches!(err, aegis_core::Error::InputFile(_)));
    }
}
