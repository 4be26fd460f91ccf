//! # aegis-core
//!
//! Core types and HTTP plumbing for the Aegis platform clients.
//!
//! This crate provides the configuration, authentication, and request
//! execution layers shared by every Aegis client crate.
//!
//! ## Modules
//!
//! - [`error`] - Error types shared across all client crates
//! - [`config`] - Connection configuration for the platform endpoints
//! - [`auth`] - Sign-in flows and the token provider abstraction
//! - [`client`] - The re-authenticating HTTP request executor
//! - [`page`] - Pagination envelope types
//! - [`query`] - Query parameter builder

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod page;
pub mod query;

// Re-export commonly used types
pub use client::ApiClient;
pub use config::PlatformConfig;
pub use error::{Error, Result};
