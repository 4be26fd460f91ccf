//! Pagination envelope types.
//!
//! The platform exposes two pagination envelope families. The console and
//! registry APIs wrap pages as `{"result": [...], "count": N}`; the Supply
//! Chain API wraps them as `{"data": [...], "next_page": N, "total_count": N}`.
//! Each client crate picks one decoding strategy at construction time via the
//! concrete envelope type; there is no runtime shape sniffing.

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Common access to a decoded page, independent of the envelope family.
pub trait PageBody {
    /// Record type carried by the page.
    type Record;

    /// Consume the page and return its records in order.
    fn into_records(self) -> Vec<Self::Record>;

    /// Number of records on this page.
    fn len(&self) -> usize;

    /// Returns true when the page carries no records, which terminates a
    /// pagination sequence.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Server-reported total across all pages, when the envelope carries one.
    fn total(&self) -> Option<u64>;
}

/// Console/registry envelope family: `{"result": [...], "count": N}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultPage<T> {
    /// Records on this page.
    #[serde(default = "Vec::new")]
    pub result: Vec<T>,
    /// Total record count across all pages.
    #[serde(default)]
    pub count: u64,
}

impl<T: DeserializeOwned> PageBody for ResultPage<T> {
    type Record = T;

    fn into_records(self) -> Vec<T> {
        self.result
    }

    fn len(&self) -> usize {
        self.result.len()
    }

    fn total(&self) -> Option<u64> {
        Some(self.count)
    }
}

/// Supply Chain envelope family:
/// `{"data": [...], "next_page": N, "total_count": N}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CursorPage<T> {
    /// Records on this page.
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    /// Next page index, absent on the final page.
    #[serde(default)]
    pub next_page: Option<u64>,
    /// Total record count across all pages.
    #[serde(default)]
    pub total_count: u64,
}

impl<T: DeserializeOwned> PageBody for CursorPage<T> {
    type Record = T;

    fn into_records(self) -> Vec<T> {
        self.data
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn total(&self) -> Option<u64> {
        Some(self.total_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn result_page_decodes_records_and_count() {
        let page: ResultPage<serde_json::Value> = serde_json::from_value(json!({
            "result": [{"name": "a"}, {"name": "b"}],
            "count": 17
        }))
        .unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page.total(), Some(17));
        assert!(!page.is_empty());
        assert_eq!(page.into_records().len(), 2);
    }

    #[test]
    fn result_page_tolerates_missing_fields() {
        let page: ResultPage<serde_json::Value> = serde_json::from_value(json!({})).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total(), Some(0));
    }

    #[test]
    fn cursor_page_decodes_next_page() {
        let page: CursorPage<serde_json::Value> = serde_json::from_value(json!({
            "data": [{"name": "repo"}],
            "next_page": 2,
            "total_count": 120
        }))
        .unwrap();

        assert_eq!(page.next_page, Some(2));
        assert_eq!(page.total(), Some(120));
        assert_eq!(page.len(), 1);
    }

    #[test]
    fn cursor_page_final_page_has_no_next() {
        let page: CursorPage<serde_json::Value> = serde_json::from_value(json!({
            "data": [],
            "total_count": 120
        }))
        .unwrap();

        assert!(page.next_page.is_none());
        assert!(page.is_empty());
    }
}
