//! # aegis-supplychain
//!
//! Supply Chain code repository client for the Aegis platform.
//!
//! The Supply Chain API lives on its own regional host, derived from the
//! console endpoint, and uses the cursor pagination envelope
//! (`{"data": [...], "next_page": N, "total_count": N}`).

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use aegis_core::page::CursorPage;
use aegis_core::query::QueryParams;
use aegis_core::{ApiClient, Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;

const CODE_REPOSITORIES_PATH: &str = "v2/build/repositories";

/// Page size used when accumulating all code repositories.
pub const CODE_REPO_PAGE_SIZE: u32 = 100;

/// One code repository known to the Supply Chain service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeRepository {
    /// Repository name.
    #[serde(default)]
    pub name: String,
    /// Source control system label.
    #[serde(default)]
    pub scm: String,
    /// Last scan timestamp, uninterpreted.
    #[serde(default)]
    pub scan_date: Option<String>,
}

/// Returns true for host labels shaped like a region, e.g. `eu-1`.
fn looks_like_region(label: &str) -> bool {
    label.rsplit_once('-').is_some_and(|(name, digits)| {
        !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            && !digits.is_empty()
            && digits.chars().all(|c| c.is_ascii_digit())
    })
}

/// Derive the Supply Chain base URL from the console endpoint.
///
/// A regional console host such as `tenant.eu-1.cloud.example.com` maps to
/// `https://api.eu-1.supply-chain.cloud.example.com`. When the console host
/// carries no region, the auth endpoint (shaped `eu-1.api....`) is consulted;
/// with no region anywhere the non-regional `api.supply-chain.` host is used.
///
/// # Errors
///
/// Returns [`Error::InvalidEndpoint`] when the console URL has no host.
pub fn supply_chain_base_url(csp_endpoint: &str, auth_endpoint: Option<&str>) -> Result<Url> {
    let url = Url::parse(csp_endpoint)?;
    let host = url
        .host_str()
        .ok_or_else(|| Error::InvalidEndpoint(format!("No host in {csp_endpoint}")))?;
    let labels: Vec<&str> = host.split('.').collect();

    let cloud_idx = labels.iter().position(|label| *label == "cloud");
    let mut region = cloud_idx
        .filter(|&i| i >= 1 && looks_like_region(labels[i - 1]))
        .map(|i| labels[i - 1].to_string());

    if region.is_none() {
        if let Some(auth) = auth_endpoint {
            if let Ok(auth_url) = Url::parse(auth) {
                region = auth_url
                    .host_str()
                    .and_then(|h| h.split('.').next())
                    .filter(|label| looks_like_region(label))
                    .map(ToString::to_string);
            }
        }
    }

    // Keep the domain from the "cloud" label onward; with no such label,
    // drop the tenant label instead.
    let tail = match cloud_idx {
        Some(i) => labels[i..].join("."),
        None => labels.get(1..).unwrap_or_default().join("."),
    };

    let derived = match region {
        Some(region) => format!("https://api.{region}.supply-chain.{tail}"),
        None => format!("https://api.supply-chain.{tail}"),
    };
    Url::parse(&derived).map_err(Error::from)
}

/// Client for the Supply Chain code repository endpoints.
///
/// Built over an [`ApiClient`] whose base URL is the Supply Chain host, not
/// the console; see [`supply_chain_base_url`].
#[derive(Clone)]
pub struct SupplyChainClient {
    api: ApiClient,
}

impl SupplyChainClient {
    /// Wrap a configured [`ApiClient`].
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch one page of code repositories, most recently scanned first.
    ///
    /// # Errors
    ///
    /// Any non-success status is fatal.
    pub async fn list_code_repositories(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<CursorPage<CodeRepository>> {
        let mut params = QueryParams::paged(page, page_size);
        params.push("order_by", "-scan_date");
        params.push("no_scan_repositories", "true");
        self.api
            .get_json(CODE_REPOSITORIES_PATH, &params.into_pairs())
            .await
    }

    /// Accumulate every code repository across all pages.
    ///
    /// # Errors
    ///
    /// Any non-success status on any page is fatal.
    pub async fn all_code_repositories(&self) -> Result<Vec<CodeRepository>> {
        let mut repos = Vec::new();
        let mut page = 1;
        loop {
            let body = self
                .list_code_repositories(page, CODE_REPO_PAGE_SIZE)
                .await?;
            let total = body.total_count;
            let next = body.next_page;
            let fetched = body.data.len();
            repos.extend(body.data);
            if fetched == 0
                || next.is_none()
                || repos.len() as u64 >= total
                || fetched < CODE_REPO_PAGE_SIZE as usize
            {
                break;
            }
            page += 1;
        }
        Ok(repos)
    }

    /// Total code repository count, from a single-record page.
    ///
    /// # Errors
    ///
    /// Any non-success status is fatal.
    pub async fn code_repo_count(&self) -> Result<u64> {
        let body = self.list_code_repositories(1, 1).await?;
        Ok(body.total_count)
    }
}
