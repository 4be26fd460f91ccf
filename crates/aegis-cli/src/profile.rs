//! Profile and credential storage.
//!
//! Connection profiles live in a JSON file under the user's configuration
//! directory; passwords never touch that file and are kept in the operating
//! system keyring instead, one entry per profile.

use aegis_core::{Error, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

const KEYRING_SERVICE: &str = "aegisctl";

const fn default_tls_verify() -> bool {
    true
}

/// Which sign-in flow a profile uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// SaaS email/password sign-in against the dedicated auth endpoint.
    Saas,
    /// On-prem console user/password login.
    Onprem,
}

/// One stored connection profile (no secret material).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Console base URL.
    pub csp_endpoint: String,
    /// Dedicated auth endpoint, SaaS only.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub auth_endpoint: Option<String>,
    /// Sign-in flow.
    pub auth_method: AuthMethod,
    /// Account email (SaaS) or console user (on-prem).
    pub identity: String,
    /// Whether to verify TLS certificates.
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,
}

/// The profiles file as persisted on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileFile {
    /// Profile used when `--profile` is not given.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default_profile: Option<String>,
    /// Profiles by name.
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileRecord>,
}

/// Loads and saves the profiles file and the per-profile keyring secrets.
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Open the store at the platform configuration directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] when no home directory can be found.
    pub fn open_default() -> Result<Self> {
        let dirs = directories_next::ProjectDirs::from("", "", "aegisctl").ok_or_else(|| {
            Error::ConfigError("Cannot determine a configuration directory".to_string())
        })?;
        Ok(Self::at(dirs.config_dir().join("profiles.json")))
    }

    /// Open the store at an explicit path.
    #[must_use]
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the underlying file.
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read the profiles file; a missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] on unreadable or malformed content.
    pub fn load(&self) -> Result<ProfileFile> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                Error::ConfigError(format!("Malformed profiles file {}: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ProfileFile::default()),
            Err(e) => Err(Error::ConfigError(format!(
                "Cannot read {}: {e}",
                self.path.display()
            ))),
        }
    }

    /// Persist the profiles file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] on any filesystem failure.
    pub fn save(&self, file: &ProfileFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::ConfigError(format!("Cannot create {}: {e}", parent.display()))
            })?;
        }
        let raw = serde_json::to_string_pretty(file)?;
        std::fs::write(&self.path, raw)
            .map_err(|e| Error::ConfigError(format!("Cannot write {}: {e}", self.path.display())))
    }

    /// Resolve the profile to use: the explicit request, then the stored
    /// default, then a sole configured profile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] when nothing is configured or the
    /// requested profile does not exist.
    pub fn resolve(&self, requested: Option<&str>) -> Result<(String, ProfileRecord)> {
        let file = self.load()?;
        let name = match requested {
            Some(name) => name.to_string(),
            None => match &file.default_profile {
                Some(name) => name.clone(),
                None if file.profiles.len() == 1 => {
                    file.profiles.keys().next().cloned().unwrap_or_default()
                }
                None => {
                    return Err(Error::ConfigError(
                        "No profile selected; run `aegisctl setup` or pass --profile".to_string(),
                    ))
                }
            },
        };
        let record = file.profiles.get(&name).cloned().ok_or_else(|| {
            Error::ConfigError(format!("Profile `{name}` is not configured"))
        })?;
        Ok((name, record))
    }

    /// Fetch a profile's password from the keyring.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CredentialStore`] when the entry is missing or the
    /// keyring is unavailable.
    pub fn password(&self, profile: &str) -> Result<SecretString> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, profile)
            .map_err(|e| Error::CredentialStore(e.to_string()))?;
        let password = entry.get_password().map_err(|e| {
            Error::CredentialStore(format!("No stored secret for profile `{profile}`: {e}"))
        })?;
        Ok(SecretString::from(password))
    }

    /// Store a profile's password in the keyring.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CredentialStore`] when the keyring rejects the write.
    pub fn store_password(&self, profile: &str, password: &str) -> Result<()> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, profile)
            .map_err(|e| Error::CredentialStore(e.to_string()))?;
        entry
            .set_password(password)
            .map_err(|e| Error::CredentialStore(e.to_string()))
    }

    /// Remove a profile's password from the keyring; a missing entry is fine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CredentialStore`] on keyring failures other than a
    /// missing entry.
    pub fn delete_password(&self, profile: &str) -> Result<()> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, profile)
            .map_err(|e| Error::CredentialStore(e.to_string()))?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(Error::CredentialStore(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(endpoint: &str) -> ProfileRecord {
        ProfileRecord {
            csp_endpoint: endpoint.to_string(),
            auth_endpoint: None,
            auth_method: AuthMethod::Saas,
            identity: "ops@example.com".to_string(),
            tls_verify: true,
        }
    }

    #[test]
    fn missing_file_loads_as_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("profiles.json"));
        let file = store.load().unwrap();
        assert!(file.profiles.is_empty());
        assert!(file.default_profile.is_none());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("nested/profiles.json"));

        let mut file = ProfileFile::default();
        file.profiles
            .insert("prod".to_string(), record("https://prod.example.com"));
        file.default_profile = Some("prod".to_string());
        store.save(&file).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.default_profile.as_deref(), Some("prod"));
        assert_eq!(
            loaded.profiles["prod"].csp_endpoint,
            "https://prod.example.com"
        );
    }

    #[test]
    fn resolve_prefers_the_explicit_request() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("profiles.json"));

        let mut file = ProfileFile::default();
        file.profiles
            .insert("prod".to_string(), record("https://prod.example.com"));
        file.profiles
            .insert("staging".to_string(), record("https://staging.example.com"));
        file.default_profile = Some("prod".to_string());
        store.save(&file).unwrap();

        let (name, rec) = store.resolve(Some("staging")).unwrap();
        assert_eq!(name, "staging");
        assert_eq!(rec.csp_endpoint, "https://staging.example.com");

        let (name, _) = store.resolve(None).unwrap();
        assert_eq!(name, "prod");
    }

    #[test]
    fn sole_profile_is_used_without_a_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("profiles.json"));

        let mut file = ProfileFile::default();
        file.profiles
            .insert("only".to_string(), record("https://only.example.com"));
        store.save(&file).unwrap();

        let (name, _) = store.resolve(None).unwrap();
        assert_eq!(name, "only");
    }

    #[test]
    fn unconfigured_store_refuses_to_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::at(dir.path().join("profiles.json"));
        let err = store.resolve(None).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));

        let err = store.resolve(Some("ghost")).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }
}
