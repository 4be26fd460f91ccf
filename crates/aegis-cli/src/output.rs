//! Output rendering.
//!
//! JSON is the default, machine-readable surface; `--verbose` switches to
//! human-oriented text. Both are pure projections of the run results.

use aegis_sweep::{Mode, RunReport, SweepRecord};
use serde_json::{json, Value};

/// Print a JSON value, pretty-printed, to stdout.
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{rendered}"),
        Err(_) => println!("{value}"),
    }
}

/// Print the fatal-error envelope.
pub fn print_error(message: &str) {
    println!("{}", json!({ "error": message }));
}

/// Render a sweep report: JSON by default, a per-record listing plus a
/// summary in verbose mode. `noun` is the capitalized record noun, e.g.
/// `"Images"`.
pub fn emit_run<T: SweepRecord>(report: &RunReport<T>, verbose: bool, noun: &str) {
    if !verbose {
        print_json(&report.to_json());
        return;
    }

    let outcome = report.outcome();
    let apply = report.mode().is_apply();

    if !outcome.deletions.is_empty() {
        let header = if apply {
            format!("Removed {}:", noun.to_lowercase())
        } else {
            format!("{noun} that would be removed:")
        };
        println!("\n{header}");
        for record in &outcome.deletions {
            let marker = if apply { "✓" } else { "-" };
            println!("  {marker} {}", record.label());
        }
    }
    if !outcome.failures.is_empty() {
        println!("\nFailed:");
        for failure in &outcome.failures {
            println!("  ✗ {} - {}", failure.record.label(), failure.error);
        }
    }

    println!("\nSummary:");
    println!("  {noun} scanned: {}", outcome.scanned);
    if apply {
        println!("  {noun} removed: {}", outcome.deleted());
        if outcome.failed() > 0 {
            println!("  {noun} failed: {}", outcome.failed());
        }
    } else {
        println!("  {noun} to remove: {}", outcome.deleted());
    }

    match report.mode() {
        Mode::Apply => println!("\nMode: APPLIED - records were actually removed"),
        Mode::DryRun => {
            println!("\nMode: DRY RUN - no changes were made");
            if outcome.deleted() > 0 {
                println!("Use --apply to actually perform the removal.");
            }
        }
    }
}

/// Print fixed-width label/value rows under a heading.
pub fn print_rows(title: &str, rows: &[(String, String)]) {
    println!("\n{title}:");
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in rows {
        println!("  {label:<width$}  {value}");
    }
}
