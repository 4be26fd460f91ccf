//! `aegisctl code-repos` - Supply Chain code repositories.

use crate::output;
use crate::session::Session;
use aegis_supplychain::SupplyChainClient;
use anyhow::Result;
use serde_json::json;

/// `code-repos list`: every code repository, most recently scanned first.
pub async fn list(session: &Session, verbose: bool) -> Result<()> {
    let client = SupplyChainClient::new(session.supply_chain_api()?);
    let repos = client.all_code_repositories().await?;

    if verbose {
        if repos.is_empty() {
            println!("No code repositories found");
        } else {
            let rows: Vec<(String, String)> = repos
                .iter()
                .map(|repo| (repo.name.clone(), repo.scm.clone()))
                .collect();
            output::print_rows("Code Repositories", &rows);
            println!("\nTotal: {}", repos.len());
        }
    } else {
        output::print_json(&json!({ "count": repos.len(), "repositories": repos }));
    }
    Ok(())
}

/// `code-repos count`: the total without fetching the listing.
pub async fn count(session: &Session, verbose: bool) -> Result<()> {
    let client = SupplyChainClient::new(session.supply_chain_api()?);
    let total = client.code_repo_count().await?;

    if verbose {
        println!("Total code repositories: {total}");
    } else {
        output::print_json(&json!({ "total_code_repositories": total }));
    }
    Ok(())
}
