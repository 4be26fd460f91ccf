//! `aegisctl repos` - registry repository deletion.

use crate::output;
use crate::session::Session;
use crate::RepoDeleteArgs;
use aegis_registry::{RegistryClient, RepoFilter, RepoPageSource, RepoRemover, Repository, REPO_PAGE_SIZE};
use aegis_sweep::{run_sweep, Mode, PageMode, RunReport, SweepOptions};
use anyhow::Result;

/// `repos delete`: per-repository deletion with client-side selection.
pub async fn delete(session: &Session, args: &RepoDeleteArgs, verbose: bool) -> Result<()> {
    let registry = RegistryClient::new(session.api.clone());
    let mode = if args.apply { Mode::Apply } else { Mode::DryRun };
    let selected_registry = if args.host_images {
        Some("Host Images".to_string())
    } else {
        args.registry.clone()
    };
    let filter = RepoFilter {
        registry: selected_registry,
        empty_only: args.empty_only,
    };

    let source = RepoPageSource::new(registry.clone(), filter.registry.clone());
    let remover = RepoRemover::new(registry);
    // Selection is client-side, so not every fetched repository is deleted
    // and the page index advances normally even in apply mode.
    let options = match mode {
        Mode::Apply => SweepOptions::apply(REPO_PAGE_SIZE, PageMode::Advance).with_batch_size(1),
        Mode::DryRun => SweepOptions::dry_run(REPO_PAGE_SIZE),
    };

    let empty_only = args.empty_only;
    let outcome = run_sweep(
        &source,
        &remover,
        |repo: &Repository| !empty_only || repo.is_empty(),
        &options,
    )
    .await?;

    let report = RunReport::new("repositories", mode, filter.as_json(), outcome);
    output::emit_run(&report, verbose, "Repositories");
    Ok(())
}
