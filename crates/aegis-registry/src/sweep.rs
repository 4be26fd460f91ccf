//! Sweep adapters for repository deletion runs.
//!
//! Repository deletion differs from image cleanup in two ways: the platform
//! deletes repositories one at a time, and selection (the `--empty-only`
//! filter) happens client-side, so not every fetched record is deleted.
//! Runs therefore use single-record batches and advancing page indices.

use crate::client::RegistryClient;
use crate::models::Repository;
use aegis_core::page::PageBody;
use aegis_core::Result;
use aegis_sweep::{BatchDisposition, BatchRemover, PageSource};
use async_trait::async_trait;

/// Page size used when walking the repository listing.
pub const REPO_PAGE_SIZE: u32 = 50;

/// Pages through the repository listing.
pub struct RepoPageSource {
    client: RegistryClient,
    registry: Option<String>,
}

impl RepoPageSource {
    /// Build a source over the given client, optionally restricted to one
    /// registry.
    #[must_use]
    pub fn new(client: RegistryClient, registry: Option<String>) -> Self {
        Self { client, registry }
    }
}

#[async_trait]
impl PageSource for RepoPageSource {
    type Record = Repository;

    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<Vec<Repository>> {
        let body = self
            .client
            .list_repositories(page, page_size, self.registry.as_deref())
            .await?;
        Ok(body.into_records())
    }
}

/// Deletes repositories one per batch.
///
/// Must be driven with a batch size of 1 so that each repository gets its
/// own delete call and its own success/failure accounting.
pub struct RepoRemover {
    client: RegistryClient,
}

impl RepoRemover {
    /// Build a remover over the given client.
    #[must_use]
    pub fn new(client: RegistryClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BatchRemover for RepoRemover {
    type Record = Repository;

    async fn remove_batch(&self, batch: &[Repository]) -> Result<BatchDisposition> {
        let mut disposition = BatchDisposition::Accepted;
        for repo in batch {
            let (status, body) = self
                .client
                .delete_repository(&repo.registry, &repo.name)
                .await?;
            let this = BatchDisposition::from_status(status, body);
            if matches!(this, BatchDisposition::Rejected { .. }) {
                disposition = this;
            }
        }
        Ok(disposition)
    }
}
