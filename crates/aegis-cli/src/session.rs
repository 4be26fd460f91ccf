//! Building authenticated clients from a stored profile.

use crate::profile::{AuthMethod, ProfileStore};
use aegis_core::auth::{Authenticator, Credentials, TokenProvider};
use aegis_core::{ApiClient, PlatformConfig, Result};
use std::sync::Arc;

/// An authenticated connection to one platform tenant.
pub struct Session {
    /// The resolved connection configuration.
    pub config: PlatformConfig,
    /// Client for the console APIs.
    pub api: ApiClient,
}

impl Session {
    /// Resolve a profile, sign in, and build the console client.
    ///
    /// # Errors
    ///
    /// Configuration, credential-store, and authentication errors.
    pub async fn connect(requested_profile: Option<&str>) -> Result<Self> {
        let store = ProfileStore::open_default()?;
        Self::connect_with(&store, requested_profile).await
    }

    /// Like [`Session::connect`], with an explicit store (for tests).
    ///
    /// # Errors
    ///
    /// Configuration, credential-store, and authentication errors.
    pub async fn connect_with(store: &ProfileStore, requested: Option<&str>) -> Result<Self> {
        let (name, record) = store.resolve(requested)?;
        tracing::debug!(profile = %name, endpoint = %record.csp_endpoint, "connecting");
        let password = store.password(&name)?;

        let mut config =
            PlatformConfig::new(&record.csp_endpoint)?.with_tls_verify(record.tls_verify);
        if let Some(auth) = &record.auth_endpoint {
            config = config.with_auth_endpoint(auth.clone());
        }

        let credentials = match record.auth_method {
            AuthMethod::Saas => Credentials::SaasUserPass {
                email: record.identity,
                password,
            },
            AuthMethod::Onprem => Credentials::OnPremUserPass {
                user: record.identity,
                password,
            },
        };
        let provider: Arc<dyn TokenProvider> = Arc::new(Authenticator::new(&config, credentials)?);
        let api = ApiClient::connect(&config, provider).await?;
        Ok(Self { config, api })
    }

    /// Client for the Supply Chain service on its derived regional host,
    /// sharing this session's token.
    ///
    /// # Errors
    ///
    /// Endpoint-derivation and client-construction errors.
    pub fn supply_chain_api(&self) -> Result<ApiClient> {
        let base = aegis_supplychain::supply_chain_base_url(
            &self.config.csp_endpoint,
            self.config.auth_endpoint.as_deref(),
        )?;
        let config =
            PlatformConfig::new(base.as_str())?.with_tls_verify(self.config.tls_verify);
        self.api.sibling(&config)
    }
}
