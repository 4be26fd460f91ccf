//! Registry repository API client.

use crate::models::Repository;
use aegis_core::page::ResultPage;
use aegis_core::query::QueryParams;
use aegis_core::{ApiClient, Result};
use std::fmt::Write;

const REPOSITORIES_PATH: &str = "api/v2/repositories";

/// Percent-encode one path segment; repository names may contain slashes.
fn encode_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}

/// Client for the registry repository endpoints.
#[derive(Clone)]
pub struct RegistryClient {
    api: ApiClient,
}

impl RegistryClient {
    /// Wrap a configured [`ApiClient`].
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch one page of repositories, optionally restricted to a registry.
    ///
    /// # Errors
    ///
    /// Any non-success status is fatal.
    pub async fn list_repositories(
        &self,
        page: u32,
        page_size: u32,
        registry: Option<&str>,
    ) -> Result<ResultPage<Repository>> {
        let mut params = QueryParams::paged(page, page_size);
        params.push_opt("registry", registry);
        self.api
            .get_json(REPOSITORIES_PATH, &params.into_pairs())
            .await
    }

    /// Delete one repository and return the raw status and body.
    ///
    /// The platform deletes repositories one at a time; 202 means the delete
    /// was accepted for asynchronous processing.
    ///
    /// # Errors
    ///
    /// Transport failures only; a rejecting status is not an error.
    pub async fn delete_repository(&self, registry: &str, name: &str) -> Result<(u16, String)> {
        let path = format!(
            "{REPOSITORIES_PATH}/{}/{}",
            encode_segment(registry),
            encode_segment(name)
        );
        tracing::debug!(registry, name, "deleting repository");
        let (status, body) = self.api.delete_status(&path).await?;
        Ok((status.as_u16(), body))
    }
}
