//! `aegisctl images` - stale image removal.

use crate::output;
use crate::session::Session;
use crate::{ImageCleanupArgs, ImageSelectArgs};
use aegis_core::config::DEFAULT_PAGE_SIZE;
use aegis_inventory::{CsvImageRemover, ImageBulkRemover, ImageFilter, ImagePageSource, InventoryClient};
use aegis_sweep::file::CsvSource;
use aegis_sweep::{run_sweep, Mode, PageMode, RunReport, SweepOptions};
use anyhow::Result;
use serde_json::json;

fn selection_filter(args: &ImageSelectArgs) -> ImageFilter {
    ImageFilter::stale(args.days)
        .with_registry(args.registry.clone())
        .with_scope(args.scope.clone())
}

const fn mode_for(apply: bool) -> Mode {
    if apply {
        Mode::Apply
    } else {
        Mode::DryRun
    }
}

/// `images cleanup`: API-driven or CSV-driven stale image removal.
pub async fn cleanup(session: &Session, args: &ImageCleanupArgs, verbose: bool) -> Result<()> {
    if let Some(path) = &args.file {
        let inventory = InventoryClient::new(session.api.clone());
        let mode = mode_for(args.selection.apply);
        let source = CsvSource::from_path(path)?;
        tracing::debug!(rows = source.len(), "loaded CSV export");
        let remover = CsvImageRemover::new(inventory);
        let options = match mode {
            Mode::Apply => SweepOptions::apply(DEFAULT_PAGE_SIZE, PageMode::Advance),
            Mode::DryRun => SweepOptions::dry_run(DEFAULT_PAGE_SIZE),
        }
        .with_batch_size(args.batch_size);

        let outcome = run_sweep(&source, &remover, |_| true, &options).await?;
        let report = RunReport::new(
            "images",
            mode,
            json!({ "batch_size": args.batch_size }),
            outcome,
        )
        .with_source(path.display().to_string());
        output::emit_run(&report, verbose, "Images");
        return Ok(());
    }

    delete(session, &args.selection, verbose).await
}

/// `images delete`: API-driven stale image removal.
pub async fn delete(session: &Session, args: &ImageSelectArgs, verbose: bool) -> Result<()> {
    let inventory = InventoryClient::new(session.api.clone());
    let mode = mode_for(args.apply);
    let filter = selection_filter(args);

    let source = ImagePageSource::new(inventory.clone(), filter.clone());
    let remover = ImageBulkRemover::new(inventory);
    // Deleting a whole page shifts the remainder onto page 1, so apply
    // runs hold the page index there.
    let options = match mode {
        Mode::Apply => SweepOptions::apply(DEFAULT_PAGE_SIZE, PageMode::HoldFirst),
        Mode::DryRun => SweepOptions::dry_run(DEFAULT_PAGE_SIZE),
    };

    let outcome = run_sweep(&source, &remover, |_| true, &options).await?;
    let report = RunReport::new("images", mode, filter.as_json(), outcome);
    output::emit_run(&report, verbose, "Images");
    Ok(())
}
