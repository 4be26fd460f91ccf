//! `aegisctl profile` - profile management.

use crate::output;
use crate::profile::ProfileStore;
use anyhow::{bail, Result};
use serde_json::json;

/// `profile list`: profile names and the default marker.
pub fn list(store: &ProfileStore, verbose: bool) -> Result<()> {
    let file = store.load()?;

    if verbose {
        if file.profiles.is_empty() {
            println!("No profiles configured; run `aegisctl setup`");
            return Ok(());
        }
        println!("Profiles:");
        for name in file.profiles.keys() {
            let marker = if file.default_profile.as_deref() == Some(name) {
                " (default)"
            } else {
                ""
            };
            println!("  {name}{marker}");
        }
    } else {
        output::print_json(&json!({
            "default": file.default_profile,
            "profiles": file.profiles.keys().collect::<Vec<_>>(),
        }));
    }
    Ok(())
}

/// `profile info`: one profile's details, or all of them. Secrets are never
/// shown.
pub fn info(store: &ProfileStore, profile_name: Option<&str>, verbose: bool) -> Result<()> {
    let file = store.load()?;

    let selected: Vec<(&String, &crate::profile::ProfileRecord)> = match profile_name {
        Some(name) => match file.profiles.get_key_value(name) {
            Some(entry) => vec![entry],
            None => bail!("Profile `{name}` is not configured"),
        },
        None => file.profiles.iter().collect(),
    };

    if verbose {
        for (name, record) in &selected {
            output::print_rows(
                name,
                &[
                    ("Endpoint".to_string(), record.csp_endpoint.clone()),
                    (
                        "Auth endpoint".to_string(),
                        record.auth_endpoint.clone().unwrap_or_else(|| "-".into()),
                    ),
                    (
                        "Method".to_string(),
                        format!("{:?}", record.auth_method).to_lowercase(),
                    ),
                    ("Identity".to_string(), record.identity.clone()),
                    ("TLS verify".to_string(), record.tls_verify.to_string()),
                ],
            );
        }
    } else {
        let body: serde_json::Map<String, serde_json::Value> = selected
            .into_iter()
            .map(|(name, record)| (name.clone(), json!(record)))
            .collect();
        output::print_json(&serde_json::Value::Object(body));
    }
    Ok(())
}

/// `profile delete`: remove the record and its keyring secret.
pub fn delete(store: &ProfileStore, profile_name: &str) -> Result<()> {
    let mut file = store.load()?;
    if file.profiles.remove(profile_name).is_none() {
        bail!("Profile `{profile_name}` is not configured");
    }
    if file.default_profile.as_deref() == Some(profile_name) {
        file.default_profile = None;
    }
    store.save(&file)?;
    store.delete_password(profile_name)?;
    output::print_json(&json!({ "status": "deleted", "profile": profile_name }));
    Ok(())
}

/// `profile set-default`.
pub fn set_default(store: &ProfileStore, profile_name: &str) -> Result<()> {
    let mut file = store.load()?;
    if !file.profiles.contains_key(profile_name) {
        bail!("Profile `{profile_name}` is not configured");
    }
    file.default_profile = Some(profile_name.to_string());
    store.save(&file)?;
    output::print_json(&json!({ "status": "ok", "default": profile_name }));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{AuthMethod, ProfileFile, ProfileRecord};

    fn store_with_profiles() -> (tempfile::TempDir, ProfileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("profiles.json"));
        let mut file = ProfileFile::default();
        file.profiles.insert(
            "prod".to_string(),
            ProfileRecord {
                csp_endpoint: "https://prod.example.com".to_string(),
                auth_endpoint: None,
                auth_method: AuthMethod::Saas,
                identity: "ops@example.com".to_string(),
                tls_verify: true,
            },
        );
        store.save(&file).unwrap();
        (dir, store)
    }

    #[test]
    fn set_default_requires_an_existing_profile() {
        let (_dir, store) = store_with_profiles();
        assert!(set_default(&store, "ghost").is_err());
        set_default(&store, "prod").unwrap();
        assert_eq!(store.load().unwrap().default_profile.as_deref(), Some("prod"));
    }

    #[test]
    fn info_rejects_unknown_profiles() {
        let (_dir, store) = store_with_profiles();
        assert!(info(&store, Some("ghost"), false).is_err());
        assert!(info(&store, Some("prod"), false).is_ok());
        assert!(info(&store, None, false).is_ok());
    }
}
