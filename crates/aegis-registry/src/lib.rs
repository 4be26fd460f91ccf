//! # aegis-registry
//!
//! Registry repository client for the Aegis platform.
//!
//! Covers the repository listing and single-repository delete endpoints and
//! the sweep adapters that drive repository deletion runs with per-record
//! accounting.
//!
//! ## Modules
//!
//! - [`client`] - The repository HTTP client
//! - [`models`] - Repository data types and deletion filters
//! - [`sweep`] - Page source and remover for repository deletion runs

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod models;
pub mod sweep;

// Re-export commonly used types
pub use client::RegistryClient;
pub use models::{RepoFilter, Repository};
pub use sweep::{RepoPageSource, RepoRemover, REPO_PAGE_SIZE};
