//! `aegisctl setup` - interactive credential setup.

use crate::output;
use crate::profile::{AuthMethod, ProfileRecord, ProfileStore};
use anyhow::{bail, Context, Result};
use serde_json::json;
use std::io::{BufRead, Write};

fn prompt(reader: &mut impl BufRead, label: &str, default: Option<&str>) -> Result<String> {
    match default {
        Some(default) => print!("{label} [{default}]: "),
        None => print!("{label}: "),
    }
    std::io::stdout().flush().context("Cannot flush stdout")?;

    let mut line = String::new();
    reader.read_line(&mut line).context("Cannot read input")?;
    let value = line.trim().to_string();
    if value.is_empty() {
        if let Some(default) = default {
            return Ok(default.to_string());
        }
    }
    Ok(value)
}

/// Interactive setup: collect a profile, persist it, and store the password
/// in the keyring.
pub fn run(store: &ProfileStore) -> Result<()> {
    let stdin = std::io::stdin();
    let mut reader = stdin.lock();
    collect(store, &mut reader)
}

fn collect(store: &ProfileStore, reader: &mut impl BufRead) -> Result<()> {
    let name = prompt(reader, "Profile name", Some("default"))?;
    let csp_endpoint = prompt(reader, "Console endpoint URL", None)?;
    if csp_endpoint.is_empty() {
        bail!("A console endpoint is required");
    }

    let method = prompt(reader, "Auth method (saas/onprem)", Some("saas"))?;
    let auth_method = match method.to_lowercase().as_str() {
        "saas" => AuthMethod::Saas,
        "onprem" => AuthMethod::Onprem,
        other => bail!("Unknown auth method `{other}`; expected saas or onprem"),
    };

    let auth_endpoint = if auth_method == AuthMethod::Saas {
        let value = prompt(reader, "Auth endpoint URL (empty for console)", None)?;
        (!value.is_empty()).then_some(value)
    } else {
        None
    };

    let identity_label = match auth_method {
        AuthMethod::Saas => "Account email",
        AuthMethod::Onprem => "Console user",
    };
    let identity = prompt(reader, identity_label, None)?;
    if identity.is_empty() {
        bail!("An account identity is required");
    }

    let password = prompt(reader, "Password", None)?;
    if password.is_empty() {
        bail!("A password is required");
    }

    let mut file = store.load()?;
    if file.default_profile.is_none() {
        file.default_profile = Some(name.clone());
    }
    file.profiles.insert(
        name.clone(),
        ProfileRecord {
            csp_endpoint,
            auth_endpoint,
            auth_method,
            identity,
            tls_verify: true,
        },
    );
    store.save(&file)?;
    store.store_password(&name, &password)?;

    output::print_json(&json!({ "status": "saved", "profile": name }));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn prompt_falls_back_to_the_default() {
        let mut input = Cursor::new("\n");
        assert_eq!(prompt(&mut input, "Profile name", Some("default")).unwrap(), "default");

        let mut input = Cursor::new("prod\n");
        assert_eq!(prompt(&mut input, "Profile name", Some("default")).unwrap(), "prod");
    }

    #[test]
    fn setup_rejects_an_unknown_auth_method() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("profiles.json"));
        let mut input = Cursor::new("prod\nhttps://console.example.com\nldap\n");
        assert!(collect(&store, &mut input).is_err());
    }
}
