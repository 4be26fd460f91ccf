//! Authentication flows and the token provider abstraction.
//!
//! Every API call carries a bearer token. Tokens are obtained through a
//! [`TokenProvider`], which the request executor also invokes to refresh the
//! token after an unauthorized response. The concrete [`Authenticator`]
//! supports the SaaS sign-in flow (dedicated auth endpoint) and the on-prem
//! console login flow.

use crate::{Error, PlatformConfig, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use url::Url;

/// Source of bearer tokens for the request executor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Obtain a fresh bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthenticationFailed`] when credentials are rejected
    /// or the auth endpoint is unreachable.
    async fn issue_token(&self) -> Result<SecretString>;
}

/// Credential material for one of the supported sign-in flows.
#[derive(Clone)]
pub enum Credentials {
    /// SaaS sign-in with email and password against the auth endpoint.
    SaasUserPass {
        /// Account email.
        email: String,
        /// Account password.
        password: SecretString,
    },
    /// On-prem login with user and password against the console itself.
    OnPremUserPass {
        /// Console user name.
        user: String,
        /// Console password.
        password: SecretString,
    },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SaasUserPass { email, .. } => f
                .debug_struct("SaasUserPass")
                .field("email", email)
                .finish_non_exhaustive(),
            Self::OnPremUserPass { user, .. } => f
                .debug_struct("OnPremUserPass")
                .field("user", user)
                .finish_non_exhaustive(),
        }
    }
}

/// Authenticator implementing the platform sign-in flows.
pub struct Authenticator {
    http: reqwest::Client,
    auth_endpoint: Url,
    credentials: Credentials,
}

impl Authenticator {
    /// Build an authenticator from a platform configuration and credentials.
    ///
    /// SaaS credentials sign in against the dedicated auth endpoint when one
    /// is configured; on-prem credentials always target the console.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &PlatformConfig, credentials: Credentials) -> Result<Self> {
        let endpoint = match credentials {
            Credentials::SaasUserPass { .. } => config.effective_auth_endpoint(),
            Credentials::OnPremUserPass { .. } => config.csp_endpoint.as_str(),
        };
        let auth_endpoint = Url::parse(endpoint)?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(!config.tls_verify)
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            auth_endpoint,
            credentials,
        })
    }

    fn signin_request(&self) -> Result<(Url, Value)> {
        match &self.credentials {
            Credentials::SaasUserPass { email, password } => {
                let url = self.auth_endpoint.join("v2/signin")?;
                let body = json!({
                    "email": email,
                    "password": password.expose_secret(),
                });
                Ok((url, body))
            }
            Credentials::OnPremUserPass { user, password } => {
                let url = self.auth_endpoint.join("api/v1/login")?;
                let body = json!({
                    "id": user,
                    "password": password.expose_secret(),
                });
                Ok((url, body))
            }
        }
    }
}

#[async_trait]
impl TokenProvider for Authenticator {
    async fn issue_token(&self) -> Result<SecretString> {
        let (url, body) = self.signin_request()?;
        tracing::debug!(url = %url, "authenticating");

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::AuthenticationFailed(e.to_string()))?;

        let status = response.status();
        let payload = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(Error::AuthenticationFailed(format!(
                "HTTP {}: {payload}",
                status.as_u16()
            )));
        }

        let value: Value = serde_json::from_str(&payload)
            .map_err(|e| Error::AuthenticationFailed(format!("Malformed auth response: {e}")))?;

        extract_token(&value)
            .map(SecretString::from)
            .ok_or_else(|| {
                Error::AuthenticationFailed("Auth response carried no token".to_string())
            })
    }
}

/// Pull the bearer token out of an auth response.
///
/// The SaaS endpoint returns `{"data": "<token>"}`, the on-prem console
/// returns `{"token": "<token>"}`, and some gateway deployments nest the
/// token as `{"data": {"token": "<token>"}}`.
#[must_use]
pub fn extract_token(value: &Value) -> Option<String> {
    match value.get("data") {
        Some(Value::String(token)) => return Some(token.clone()),
        Some(Value::Object(inner)) => {
            if let Some(Value::String(token)) = inner.get("token") {
                return Some(token.clone());
            }
        }
        _ => {}
    }
    match value.get("token") {
        Some(Value::String(token)) => Some(token.clone()),
        _ => None,
    }
}

/// Token provider backed by a fixed, pre-issued token.
///
/// Useful for tests and for deployments where tokens are provisioned out of
/// band; a refresh re-issues the same token.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    /// Wrap a pre-issued token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn issue_token(&self) -> Result<SecretString> {
        Ok(SecretString::from(self.token.clone()))
    }
}
