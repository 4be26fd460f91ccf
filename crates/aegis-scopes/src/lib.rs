//! # aegis-scopes
//!
//! Application scope client for the Aegis platform.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use aegis_core::page::ResultPage;
use aegis_core::query::QueryParams;
use aegis_core::{ApiClient, Result};
use serde::{Deserialize, Serialize};

const SCOPES_PATH: &str = "api/v2/access_management/scopes";

/// Page size used when accumulating all scopes.
pub const SCOPE_PAGE_SIZE: u32 = 25;

/// One application scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scope {
    /// Scope name.
    #[serde(default)]
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

/// Client for the application scope endpoints.
#[derive(Clone)]
pub struct ScopeClient {
    api: ApiClient,
}

impl ScopeClient {
    /// Wrap a configured [`ApiClient`].
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch one page of scopes, ordered by name.
    ///
    /// # Errors
    ///
    /// Any non-success status is fatal.
    pub async fn list_scopes(&self, page: u32, page_size: u32) -> Result<ResultPage<Scope>> {
        let mut params = QueryParams::new();
        params.push("page", page);
        params.push("pagesize", page_size);
        params.push("order_by", "name");
        self.api.get_json(SCOPES_PATH, &params.into_pairs()).await
    }

    /// Accumulate every scope across all pages.
    ///
    /// # Errors
    ///
    /// Any non-success status on any page is fatal.
    pub async fn all_scopes(&self) -> Result<Vec<Scope>> {
        let mut scopes = Vec::new();
        let mut page = 1;
        loop {
            let body = self.list_scopes(page, SCOPE_PAGE_SIZE).await?;
            if body.result.is_empty() {
                break;
            }
            scopes.extend(body.result);
            page += 1;
        }
        Ok(scopes)
    }
}
