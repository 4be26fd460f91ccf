//! Registry repository data types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One repository as returned by the registry listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    /// Repository name, may contain slashes.
    #[serde(default)]
    pub name: String,
    /// Registry the repository belongs to.
    #[serde(default)]
    pub registry: String,
    /// Number of images currently in the repository.
    #[serde(default)]
    pub num_images: u64,
}

impl Repository {
    /// Returns true when the repository holds no images.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.num_images == 0
    }
}

impl aegis_sweep::SweepRecord for Repository {
    type Key = (String, String);

    fn key(&self) -> Option<(String, String)> {
        if self.name.is_empty() {
            None
        } else {
            Some((self.registry.clone(), self.name.clone()))
        }
    }

    fn label(&self) -> String {
        format!("{}/{}", self.registry, self.name)
    }
}

/// Selection criteria for repository deletion runs.
#[derive(Debug, Clone, Default)]
pub struct RepoFilter {
    /// Restrict to one registry.
    pub registry: Option<String>,
    /// Only delete repositories with no images.
    pub empty_only: bool,
}

impl RepoFilter {
    /// Filter description for the run summary.
    #[must_use]
    pub fn as_json(&self) -> Value {
        json!({
            "registry": self.registry,
            "empty_only": self.empty_only,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_sweep::SweepRecord;

    #[test]
    fn repository_key_is_registry_and_name() {
        let repo = Repository {
            name: "team/service".into(),
            registry: "Harbor".into(),
            num_images: 3,
        };
        assert_eq!(
            repo.key(),
            Some(("Harbor".to_string(), "team/service".to_string()))
        );
        assert_eq!(repo.label(), "Harbor/team/service");
        assert!(!repo.is_empty());
    }

    #[test]
    fn nameless_repository_has_no_key() {
        let repo: Repository = serde_json::from_value(json!({"registry": "Harbor"})).unwrap();
        assert!(repo.key().is_none());
    }
}
