//! Convenience builder for HTTP query parameters.
//!
//! Every listing endpoint in the platform takes the same pagination pair plus
//! a varying set of optional filters; this helper starts from the pagination
//! pair and collects the filters into URL query pairs without per-call
//! boilerplate.

use std::fmt::Display;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Builder pre-loaded with the `page`/`page_size` pair every listing
    /// endpoint takes.
    #[must_use]
    pub fn paged(page: u32, page_size: u32) -> Self {
        let mut params = Self::new();
        params.push("page", page);
        params.push("page_size", page_size);
        params
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: ToString,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
