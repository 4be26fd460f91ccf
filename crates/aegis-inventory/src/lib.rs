//! # aegis-inventory
//!
//! Image and VM inventory client for the Aegis platform.
//!
//! Covers the image inventory listing and bulk-delete endpoints, the VM
//! inventory, and the client-side VM filters and statistics, plus the sweep
//! adapters that plug the image endpoints into `aegis-sweep`.
//!
//! ## Modules
//!
//! - [`client`] - The inventory HTTP client
//! - [`models`] - Image and VM data types and listing filters
//! - [`filters`] - Pure client-side VM filters and statistics
//! - [`sweep`] - Page source and batch remover for image cleanup runs

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod filters;
pub mod models;
pub mod sweep;

// Re-export commonly used types
pub use client::InventoryClient;
pub use models::{ImageFilter, ImageRecord, Vm, VmStats};
pub use sweep::{CsvImageRemover, ImageBulkRemover, ImagePageSource};
