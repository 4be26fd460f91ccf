//! Inventory API client.

use crate::models::{ImageFilter, ImageRecord, Vm};
use aegis_core::page::ResultPage;
use aegis_core::query::QueryParams;
use aegis_core::{ApiClient, Result};
use serde::Serialize;

const IMAGES_PATH: &str = "api/v2/hub/inventory/assets/images";
const IMAGE_DELETE_PATH: &str = "api/v2/images/actions/delete";
const VMS_PATH: &str = "api/v2/hub/inventory/assets/vms";

/// Page size used when walking the VM inventory.
pub const VM_PAGE_SIZE: u32 = 100;

/// Client for the image and VM inventory endpoints.
#[derive(Clone)]
pub struct InventoryClient {
    api: ApiClient,
}

impl InventoryClient {
    /// Wrap a configured [`ApiClient`].
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch one page of the image inventory.
    ///
    /// # Errors
    ///
    /// Any non-success status is fatal.
    pub async fn list_images(
        &self,
        page: u32,
        page_size: u32,
        filter: &ImageFilter,
    ) -> Result<ResultPage<ImageRecord>> {
        self.api
            .get_json(IMAGES_PATH, &filter.to_query(page, page_size))
            .await
    }

    /// Submit one bulk image deletion and return the raw status and body.
    ///
    /// The status is interpreted by the caller: 200/202/204 delete the whole
    /// batch, anything else fails it.
    ///
    /// # Errors
    ///
    /// Transport failures only; a rejecting status is not an error.
    pub async fn delete_images<K>(&self, keys: &[K]) -> Result<(u16, String)>
    where
        K: Serialize + Sync,
    {
        tracing::debug!(batch = keys.len(), "submitting image deletion");
        let body = serde_json::json!({ "image_uids": keys });
        let (status, body) = self.api.post_status(IMAGE_DELETE_PATH, &body).await?;
        Ok((status.as_u16(), body))
    }

    /// Fetch one page of the VM inventory.
    ///
    /// # Errors
    ///
    /// Any non-success status is fatal.
    pub async fn list_vms(
        &self,
        page: u32,
        page_size: u32,
        scope: Option<&str>,
    ) -> Result<ResultPage<Vm>> {
        let mut params = QueryParams::paged(page, page_size);
        params.push_opt("scope", scope);
        self.api.get_json(VMS_PATH, &params.into_pairs()).await
    }

    /// Fetch the whole VM inventory plus the server-reported total.
    ///
    /// # Errors
    ///
    /// Any non-success status on any page is fatal.
    pub async fn all_vms(&self, scope: Option<&str>) -> Result<(Vec<Vm>, u64)> {
        let mut vms = Vec::new();
        let mut total = 0;
        let mut page = 1;
        loop {
            let body = self.list_vms(page, VM_PAGE_SIZE, scope).await?;
            total = body.count;
            let fetched = body.result.len();
            vms.extend(body.result);
            if fetched < VM_PAGE_SIZE as usize {
                break;
            }
            page += 1;
        }
        Ok((vms, total))
    }

    /// Server-reported VM count, without fetching the inventory.
    ///
    /// # Errors
    ///
    /// Any non-success status is fatal.
    pub async fn vm_count(&self, scope: Option<&str>) -> Result<u64> {
        let body = self.list_vms(1, 1, scope).await?;
        Ok(body.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_core::auth::StaticTokenProvider;
    use aegis_core::PlatformConfig;
    use secrecy::SecretString;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, method, path, query_param};
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
    async fn list_images_passes_filters_server_side() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/hub/inventory/assets/images"))
            .and(query_param("page", "1"))
            .and(query_param("page_size", "200"))
            .and(query_param("first_found_date", "over|90|days"))
            .and(query_param("has_workloads", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": [{
                    "image_uid": "abc",
                    "registry": "Docker Hub",
                    "repository": "web/frontend",
                    "tag": "v1",
                    "name": "web/frontend:v1"
                }],
                "count": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client(&server)
            .await
            .list_images(1, 200, &ImageFilter::stale(90))
            .await
            .unwrap();
        assert_eq!(page.result.len(), 1);
        assert_eq!(page.result[0].image_uid.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn delete_images_posts_keys_and_reports_raw_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/images/actions/delete"))
            .and(body_json(json!({"image_uids": ["a", "b"]})))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let (status, _) = client(&server)
            .await
            .delete_images(&["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert_eq!(status, 202);
    }

    #[tokio::test]
    async fn all_vms_walks_pages_until_a_short_page() {
        let server = MockServer::start().await;
        let full_page: Vec<_> = (0..VM_PAGE_SIZE)
            .map(|i| json!({"id": format!("vm-{i}"), "name": format!("vm-{i}")}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/api/v2/hub/inventory/assets/vms"))
            .and(query_param("page", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"result": full_page, "count": 130})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v2/hub/inventory/assets/vms"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": (0..30).map(|i| json!({"id": format!("vm-1{i}"), "name": "x"})).collect::<Vec<_>>(),
                "count": 130
            })))
            .mount(&server)
            .await;

        let (vms, total) = client(&server).await.all_vms(None).await.unwrap();
        assert_eq!(vms.len(), 130);
        assert_eq!(total, 130);
    }

    #[tokio::test]
    async fn vm_count_reads_the_total_from_a_single_record_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/hub/inventory/assets/vms"))
            .and(query_param("page_size", "1"))
            .and(query_param("scope", "production"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": [{"id": "vm-0", "name": "vm-0"}],
                "count": 4211
            })))
            .mount(&server)
            .await;

        let count = client(&server)
            .await
            .vm_count(Some("production"))
            .await
            .unwrap();
        assert_eq!(count, 4211);
    }
}
