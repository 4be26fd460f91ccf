//! Client-side VM filters and statistics.
//!
//! These are pure functions over already-fetched records; server-side
//! filtering for VMs is limited to the scope parameter.

use crate::models::{Vm, VmStats};
use std::collections::BTreeMap;

/// Coverage tags that count as enforcer-class protection.
pub const ENFORCER_COVERAGE_TAGS: [&str; 4] =
    ["vm_enforcer", "host_enforcer", "aqua_enforcer", "agent"];

/// Returns true when the VM carries none of the excluded coverage tags.
#[must_use]
pub fn lacks_coverage(vm: &Vm, excluded: &[&str]) -> bool {
    !vm.covered_by
        .iter()
        .any(|tag| excluded.contains(&tag.as_str()))
}

/// Keep VMs that carry none of the excluded coverage tags.
#[must_use]
pub fn filter_by_coverage(vms: Vec<Vm>, excluded: &[&str]) -> Vec<Vm> {
    vms.into_iter()
        .filter(|vm| lacks_coverage(vm, excluded))
        .collect()
}

/// Keep VMs from the given cloud provider (case-insensitive).
#[must_use]
pub fn filter_by_cloud(vms: Vec<Vm>, cloud: &str) -> Vec<Vm> {
    vms.into_iter()
        .filter(|vm| vm.cloud_provider.eq_ignore_ascii_case(cloud))
        .collect()
}

/// Keep VMs from the given region (case-insensitive).
#[must_use]
pub fn filter_by_region(vms: Vec<Vm>, region: &str) -> Vec<Vm> {
    vms.into_iter()
        .filter(|vm| vm.region.eq_ignore_ascii_case(region))
        .collect()
}

/// Keep VMs at the given risk level (case-insensitive).
#[must_use]
pub fn filter_by_risk(vms: Vec<Vm>, risk: &str) -> Vec<Vm> {
    vms.into_iter()
        .filter(|vm| vm.highest_risk.eq_ignore_ascii_case(risk))
        .collect()
}

/// Compute the count breakdown over a full VM listing.
#[must_use]
pub fn vm_stats(vms: &[Vm], total: u64) -> VmStats {
    let uncovered = vms
        .iter()
        .filter(|vm| lacks_coverage(vm, &ENFORCER_COVERAGE_TAGS))
        .count() as u64;

    let mut coverage = BTreeMap::new();
    let mut clouds = BTreeMap::new();
    let mut risks = BTreeMap::new();
    for vm in vms {
        for tag in &vm.covered_by {
            *coverage.entry(tag.clone()).or_insert(0) += 1;
        }
        let cloud = if vm.cloud_provider.is_empty() {
            "Unknown".to_string()
        } else {
            vm.cloud_provider.clone()
        };
        *clouds.entry(cloud).or_insert(0) += 1;
        let risk = if vm.highest_risk.is_empty() {
            "unknown".to_string()
        } else {
            vm.highest_risk.clone()
        };
        *risks.entry(risk).or_insert(0) += 1;
    }

    VmStats {
        total_vms: total,
        vms_without_vm_enforcer: uncovered,
        vms_with_vm_enforcer: total.saturating_sub(uncovered),
        coverage_breakdown: coverage,
        cloud_provider_breakdown: clouds,
        risk_level_breakdown: risks,
    }
}
