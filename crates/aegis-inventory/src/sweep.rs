//! Sweep adapters for image cleanup runs.

use crate::client::InventoryClient;
use crate::models::{ImageFilter, ImageRecord};
use aegis_core::page::PageBody;
use aegis_core::Result;
use aegis_sweep::file::CsvImageRecord;
use aegis_sweep::{BatchDisposition, BatchRemover, PageSource, SweepRecord};
use async_trait::async_trait;

/// Pages through the image inventory with the configured filters.
pub struct ImagePageSource {
    client: InventoryClient,
    filter: ImageFilter,
}

impl ImagePageSource {
    /// Build a source over the given client and filters.
    #[must_use]
    pub fn new(client: InventoryClient, filter: ImageFilter) -> Self {
        Self { client, filter }
    }
}

#[async_trait]
impl PageSource for ImagePageSource {
    type Record = ImageRecord;

    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<Vec<ImageRecord>> {
        let body = self.client.list_images(page, page_size, &self.filter).await?;
        Ok(body.into_records())
    }
}

/// Deletes image batches through the bulk-delete endpoint.
pub struct ImageBulkRemover {
    client: InventoryClient,
}

impl ImageBulkRemover {
    /// Build a remover over the given client.
    #[must_use]
    pub fn new(client: InventoryClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BatchRemover for ImageBulkRemover {
    type Record = ImageRecord;

    async fn remove_batch(&self, batch: &[ImageRecord]) -> Result<BatchDisposition> {
        let keys: Vec<String> = batch.iter().filter_map(SweepRecord::key).collect();
        let (status, body) = self.client.delete_images(&keys).await?;
        Ok(BatchDisposition::from_status(status, body))
    }
}

/// Deletes CSV-sourced batches by numeric image id.
pub struct CsvImageRemover {
    client: InventoryClient,
}

impl CsvImageRemover {
    /// Build a remover over the given client.
    #[must_use]
    pub fn new(client: InventoryClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BatchRemover for CsvImageRemover {
    type Record = CsvImageRecord;

    async fn remove_batch(&self, batch: &[CsvImageRecord]) -> Result<BatchDisposition> {
        let keys: Vec<i64> = batch.iter().filter_map(SweepRecord::key).collect();
        let (status, body) = self.client.delete_images(&keys).await?;
        Ok(BatchDisposition::from_status(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_core::auth::StaticTokenProvider;
    use aegis_core::{ApiClient, PlatformConfig};
    use aegis_sweep::{run_sweep, Mode, PageMode, RunReport, SweepOptions};
    use secrecy::SecretString;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer) -> InventoryClient {
        let config = PlatformConfig::new(server.uri()).unwrap();
        let api = ApiClient::new(
            &config,
            Arc::new(StaticTokenProvider::new("tok")),
            SecretString::from("tok".to_string()),
        )
        .unwrap();
        InventoryClient::new(api)
    }

    #[tokio::test]
    async fn apply_run_deletes_a_page_and_terminates_on_the_empty_refetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/hub/inventory/assets/images"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": [
                    {"image_uid": "1", "registry": "R", "repository": "a", "tag": "v1", "name": "a:v1"},
                    {"image_uid": "2", "registry": "R", "repository": "b", "tag": "v2", "name": "b:v2"}
                ],
                "count": 2
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v2/hub/inventory/assets/images"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"result": [], "count": 0})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v2/images/actions/delete"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server).await;
        let filter = ImageFilter::stale(90);
        let source = ImagePageSource::new(client.clone(), filter.clone());
        let remover = ImageBulkRemover::new(client);
        let options = SweepOptions::apply(200, PageMode::HoldFirst);

        let outcome = run_sweep(&source, &remover, |_| true, &options)
            .await
            .unwrap();
        let report = RunReport::new("images", Mode::Apply, filter.as_json(), outcome);
        let rendered = report.to_json();

        assert_eq!(rendered["mode"], "apply");
        assert_eq!(rendered["summary"]["images_scanned"], 2);
        assert_eq!(rendered["summary"]["images_deleted"], 2);
        assert_eq!(rendered["summary"]["images_failed"], 0);
    }

    #[tokio::test]
    async fn fatal_listing_error_aborts_with_no_partial_summary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/hub/inventory/assets/images"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client(&server).await;
        let source = ImagePageSource::new(client.clone(), ImageFilter::stale(90));
        let remover = ImageBulkRemover::new(client);
        let options = SweepOptions::dry_run(200);

        let err = run_sweep(&source, &remover, |_| true, &options)
            .await
            .unwrap_err();
        assert!(matches!(err, aegis_core::Error::UnexpectedStatus { status: 500, .. }));
    }
}
