//! `aegisctl vm` - VM inventory extraction.

use crate::output;
use crate::session::Session;
use crate::{VmCountArgs, VmListArgs};
use aegis_inventory::filters::{
    filter_by_cloud, filter_by_coverage, filter_by_region, filter_by_risk, vm_stats,
    ENFORCER_COVERAGE_TAGS,
};
use aegis_inventory::{InventoryClient, Vm};
use anyhow::Result;
use serde_json::json;

/// `vm list`: fetch the inventory and apply the client-side filters.
pub async fn list(session: &Session, args: &VmListArgs, verbose: bool) -> Result<()> {
    let inventory = InventoryClient::new(session.api.clone());
    let (mut vms, _) = inventory.all_vms(args.scope.as_deref()).await?;

    if args.no_enforcer {
        vms = filter_by_coverage(vms, &ENFORCER_COVERAGE_TAGS);
    }
    if let Some(cloud) = &args.cloud {
        vms = filter_by_cloud(vms, cloud);
    }
    if let Some(region) = &args.region {
        vms = filter_by_region(vms, region);
    }
    if let Some(risk) = &args.risk_level {
        vms = filter_by_risk(vms, risk);
    }

    if args.csv {
        write_vm_csv(&vms, std::io::stdout())?;
    } else if verbose {
        print_vm_table(&vms);
    } else {
        output::print_json(&json!({ "count": vms.len(), "vms": vms }));
    }
    Ok(())
}

fn write_vm_csv<W: std::io::Write>(vms: &[Vm], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "name",
        "cloud_provider",
        "region",
        "os",
        "highest_risk",
        "covered_by",
        "compliant",
    ])?;
    for vm in vms {
        let coverage = vm.covered_by.join(";");
        writer.write_record([
            vm.name.as_str(),
            vm.cloud_provider.as_str(),
            vm.region.as_str(),
            vm.os.as_str(),
            vm.highest_risk.as_str(),
            coverage.as_str(),
            if vm.compliant { "true" } else { "false" },
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// `vm count`: server-reported total, with an optional breakdown.
pub async fn count(session: &Session, args: &VmCountArgs, verbose: bool) -> Result<()> {
    let inventory = InventoryClient::new(session.api.clone());

    if args.breakdown {
        let (vms, total) = inventory.all_vms(args.scope.as_deref()).await?;
        let stats = vm_stats(&vms, total);
        if verbose {
            print_stats_table(&stats);
        } else {
            output::print_json(&serde_json::to_value(&stats)?);
        }
    } else {
        let total = inventory.vm_count(args.scope.as_deref()).await?;
        if verbose {
            println!("Total VMs: {total}");
        } else {
            output::print_json(&json!({ "total_vms": total }));
        }
    }
    Ok(())
}

fn print_vm_table(vms: &[Vm]) {
    if vms.is_empty() {
        println!("No VMs found");
        return;
    }
    println!(
        "{:<30} {:<10} {:<15} {:<20} {:<8} {:<30} {}",
        "Name", "Cloud", "Region", "OS", "Risk", "Coverage", "Compliant"
    );
    for vm in vms {
        let coverage = truncated(&vm.covered_by.join(", "), 30);
        println!(
            "{:<30} {:<10} {:<15} {:<20} {:<8} {:<30} {}",
            truncated(&vm.name, 30),
            vm.cloud_provider,
            vm.region,
            truncated(&vm.os, 20),
            vm.highest_risk,
            coverage,
            if vm.compliant { "Yes" } else { "No" }
        );
    }
    println!("\nTotal: {}", vms.len());
}

fn print_stats_table(stats: &aegis_inventory::VmStats) {
    output::print_rows(
        "VM Statistics",
        &[
            ("Total VMs".to_string(), stats.total_vms.to_string()),
            (
                "VMs without enforcer".to_string(),
                stats.vms_without_vm_enforcer.to_string(),
            ),
            (
                "VMs with enforcer".to_string(),
                stats.vms_with_vm_enforcer.to_string(),
            ),
        ],
    );

    let sections: [(&str, &std::collections::BTreeMap<String, u64>); 3] = [
        ("Coverage Breakdown", &stats.coverage_breakdown),
        ("Cloud Provider Breakdown", &stats.cloud_provider_breakdown),
        ("Risk Level Breakdown", &stats.risk_level_breakdown),
    ];
    for (title, breakdown) in sections {
        if breakdown.is_empty() {
            continue;
        }
        let rows: Vec<(String, String)> = breakdown
            .iter()
            .map(|(label, count)| (label.clone(), count.to_string()))
            .collect();
        output::print_rows(title, &rows);
    }
}

fn truncated(text: &str, max: usize) -> String {
    if text.len() <= max {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max.saturating_sub(3)).collect();
        out.push_str("...");
        out
    }
}
