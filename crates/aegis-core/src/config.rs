//! Configuration structures for Aegis platform clients.
//!
//! This module provides the connection configuration shared by every client
//! crate: the CSP (console) endpoint, the optional dedicated authentication
//! endpoint, TLS verification, and the request timeout.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Default timeout for platform requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default page size for listing endpoints
pub const DEFAULT_PAGE_SIZE: u32 = 200;

const fn default_tls_verify() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Connection configuration for an Aegis platform client.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlatformConfig {
    /// CSP (console) base URL, e.g. `https://tenant.eu-1.cloud.example.com`
    #[validate(url)]
    pub csp_endpoint: String,

    /// Dedicated authentication endpoint; defaults to the CSP endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_endpoint: Option<String>,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl PlatformConfig {
    /// Create a new configuration for the given CSP endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(csp_endpoint: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            csp_endpoint: csp_endpoint.into(),
            auth_endpoint: None,
            tls_verify: default_tls_verify(),
            request_timeout_secs: default_request_timeout_secs(),
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Set the dedicated authentication endpoint.
    #[must_use]
    pub fn with_auth_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.auth_endpoint = Some(endpoint.into());
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Get the request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse and validate the CSP endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_csp_endpoint(&self) -> Result<Url, Error> {
        Url::parse(&self.csp_endpoint)
            .map_err(|e| Error::ConfigError(format!("Invalid CSP endpoint: {e}")))
    }

    /// Resolve the authentication endpoint, falling back to the CSP endpoint.
    #[must_use]
    pub fn effective_auth_endpoint(&self) -> &str {
        self.auth_endpoint.as_deref().unwrap_or(&self.csp_endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_config_new() {
        let config = PlatformConfig::new("https://tenant.eu-1.cloud.example.com").unwrap();
        assert!(config.tls_verify);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.auth_endpoint.is_none());
    }

    #[test]
    fn test_platform_config_invalid_url() {
        assert!(PlatformConfig::new("not-a-url").is_err());
    }

    #[test]
    fn test_platform_config_builder() {
        let config = PlatformConfig::new("https://tenant.cloud.example.com")
            .unwrap()
            .with_auth_endpoint("https://eu-1.api.auth.example.com")
            .with_tls_verify(false)
            .with_timeout(60);

        assert_eq!(
            config.auth_endpoint.as_deref(),
            Some("https://eu-1.api.auth.example.com")
        );
        assert!(!config.tls_verify);
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_effective_auth_endpoint_fallback() {
        let config = PlatformConfig::new("https://tenant.cloud.example.com").unwrap();
        assert_eq!(
            config.effective_auth_endpoint(),
            "https://tenant.cloud.example.com"
        );

        let config = config.with_auth_endpoint("https://auth.example.com");
        assert_eq!(config.effective_auth_endpoint(), "https://auth.example.com");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = PlatformConfig::new("https://tenant.cloud.example.com")
            .unwrap()
            .with_timeout(45);

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: PlatformConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.csp_endpoint, deserialized.csp_endpoint);
        assert_eq!(
            config.request_timeout_secs,
            deserialized.request_timeout_secs
        );
    }

    #[test]
    fn test_config_validation_timeout_range() {
        let mut config = PlatformConfig::new("https://tenant.cloud.example.com").unwrap();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 301;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 30;
        assert!(config.validate().is_ok());
    }
}
