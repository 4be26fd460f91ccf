//! Command implementations.

pub mod code_repos;
pub mod images;
pub mod profile;
pub mod repos;
pub mod scopes;
pub mod setup;
pub mod vm;
