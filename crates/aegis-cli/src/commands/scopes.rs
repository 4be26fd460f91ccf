//! `aegisctl scopes` - application scope listing.

use crate::output;
use crate::session::Session;
use aegis_scopes::ScopeClient;
use anyhow::Result;
use serde_json::json;

/// `scopes list`: every application scope, ordered by name.
pub async fn list(session: &Session, verbose: bool) -> Result<()> {
    let client = ScopeClient::new(session.api.clone());
    let scopes = client.all_scopes().await?;

    if verbose {
        if scopes.is_empty() {
            println!("No application scopes found");
        } else {
            let rows: Vec<(String, String)> = scopes
                .iter()
                .map(|scope| (scope.name.clone(), scope.description.clone()))
                .collect();
            output::print_rows("Application Scopes", &rows);
            println!("\nTotal: {}", scopes.len());
        }
    } else {
        output::print_json(&json!({ "count": scopes.len(), "scopes": scopes }));
    }
    Ok(())
}
