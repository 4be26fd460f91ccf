//! Inventory data types.

use aegis_core::query::QueryParams;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// One container image as returned by the inventory listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Platform-wide image identifier; required for deletion.
    #[serde(default)]
    pub image_uid: Option<String>,
    /// Registry the image lives in.
    #[serde(default)]
    pub registry: String,
    /// Repository within the registry.
    #[serde(default)]
    pub repository: String,
    /// Image tag.
    #[serde(default)]
    pub tag: String,
    /// Full image name.
    #[serde(default)]
    pub name: String,
}

impl ImageRecord {
    /// Display form `registry/repository:tag`.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{}/{}:{}", self.registry, self.repository, self.tag)
    }
}

impl aegis_sweep::SweepRecord for ImageRecord {
    type Key = String;

    fn key(&self) -> Option<String> {
        self.image_uid.clone().filter(|uid| !uid.is_empty())
    }

    fn label(&self) -> String {
        self.display_name()
    }
}

/// Server-side filters for the image listing endpoint.
///
/// Age is expressed as the coarse `over|N|days` token the endpoint expects;
/// absent filters are simply omitted from the query.
#[derive(Debug, Clone, Default)]
pub struct ImageFilter {
    /// Minimum age in days.
    pub days: Option<u32>,
    /// Registry name.
    pub registry: Option<String>,
    /// Application scope name.
    pub scope: Option<String>,
    /// Restrict to images with (true) or without (false) active workloads.
    pub has_workloads: Option<bool>,
}

impl ImageFilter {
    /// The stale-image selection used by cleanup runs: older than `days`,
    /// no active workloads.
    #[must_use]
    pub const fn stale(days: u32) -> Self {
        Self {
            days: Some(days),
            registry: None,
            scope: None,
            has_workloads: Some(false),
        }
    }

    /// Set the registry filter.
    #[must_use]
    pub fn with_registry(mut self, registry: Option<String>) -> Self {
        self.registry = registry;
        self
    }

    /// Set the scope filter.
    #[must_use]
    pub fn with_scope(mut self, scope: Option<String>) -> Self {
        self.scope = scope;
        self
    }

    /// Build the listing query for one page.
    #[must_use]
    pub fn to_query(&self, page: u32, page_size: u32) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::paged(page, page_size);
        params.push_opt(
            "first_found_date",
            self.days.map(|days| format!("over|{days}|days")),
        );
        params.push_opt("registry_name", self.registry.clone());
        params.push_opt("scope", self.scope.clone());
        params.push_opt("has_workloads", self.has_workloads);
        params.into_pairs()
    }

    /// Filter description for the run summary.
    #[must_use]
    pub fn as_json(&self) -> Value {
        json!({
            "days": self.days,
            "registry": self.registry,
            "scope": self.scope,
            "has_workloads": self.has_workloads,
        })
    }
}

/// One VM as returned by the workload inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vm {
    /// Platform identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// VM name.
    #[serde(default)]
    pub name: String,
    /// Cloud provider label.
    #[serde(default)]
    pub cloud_provider: String,
    /// Cloud region.
    #[serde(default)]
    pub region: String,
    /// Operating system description.
    #[serde(default)]
    pub os: String,
    /// Highest risk level found on the VM.
    #[serde(default)]
    pub highest_risk: String,
    /// Coverage tags (enforcer/agent types protecting the VM).
    #[serde(default)]
    pub covered_by: Vec<String>,
    /// Whether the VM is compliant.
    #[serde(default)]
    pub compliant: bool,
}

/// Aggregate VM statistics for the count breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct VmStats {
    /// Total VMs reported by the server.
    pub total_vms: u64,
    /// VMs with no enforcer-class coverage tag.
    pub vms_without_vm_enforcer: u64,
    /// VMs with at least one enforcer-class coverage tag.
    pub vms_with_vm_enforcer: u64,
    /// VM count per coverage tag.
    pub coverage_breakdown: BTreeMap<String, u64>,
    /// VM count per cloud provider.
    pub cloud_provider_breakdown: BTreeMap<String, u64>,
    /// VM count per risk level.
    pub risk_level_breakdown: BTreeMap<String, u64>,
}
