//! The re-authenticating request executor.
//!
//! [`ApiClient`] wraps every HTTP call with uniform bearer-token injection.
//! On an unauthorized response it refreshes the token through its
//! [`TokenProvider`](crate::auth::TokenProvider) exactly once, retries the
//! original call exactly once, and returns a second unauthorized response to
//! the caller as-is. The cached token lives in a single mutex-guarded slot
//! shared by all clones of the client, so concurrent callers cannot race two
//! refreshes.

use crate::auth::TokenProvider;
use crate::{Error, PlatformConfig, Result};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use url::Url;

const USER_AGENT: &str = concat!("aegis-core/", env!("CARGO_PKG_VERSION"));

/// Re-authenticating HTTP executor shared by all Aegis client crates.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Arc<Mutex<SecretString>>,
    provider: Arc<dyn TokenProvider>,
}

impl ApiClient {
    /// Construct a client with a pre-issued token.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(
        config: &PlatformConfig,
        provider: Arc<dyn TokenProvider>,
        token: SecretString,
    ) -> Result<Self> {
        let mut base_url = config.parse_csp_endpoint()?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(!config.tls_verify)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            token: Arc::new(Mutex::new(token)),
            provider,
        })
    }

    /// Construct a client by issuing an initial token through the provider.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthenticationFailed`] when the initial sign-in is
    /// rejected, plus the construction errors of [`ApiClient::new`].
    pub async fn connect(config: &PlatformConfig, provider: Arc<dyn TokenProvider>) -> Result<Self> {
        let token = provider.issue_token().await?;
        Self::new(config, provider, token)
    }

    /// Build a client for another host that shares this client's token slot
    /// and provider, so a refresh on either keeps both current.
    ///
    /// # Errors
    ///
    /// Same construction errors as [`ApiClient::new`].
    pub fn sibling(&self, config: &PlatformConfig) -> Result<Self> {
        let mut sibling = Self::new(
            config,
            Arc::clone(&self.provider),
            SecretString::from(String::new()),
        )?;
        sibling.token = Arc::clone(&self.token);
        Ok(sibling)
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Execute a request with bearer injection and the single 401 retry.
    ///
    /// The `customize` closure is applied to the request builder on every
    /// attempt, so callers can attach headers or JSON bodies. The returned
    /// response may still carry a non-success status; status interpretation
    /// belongs to the caller.
    ///
    /// # Errors
    ///
    /// Returns transport errors, and authentication errors raised while
    /// refreshing the token.
    pub async fn execute<F>(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
        customize: F,
    ) -> Result<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let response = self
            .send_once(method.clone(), path, params, &customize)
            .await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::debug!(path, "token rejected; re-authenticating");
        self.refresh_token().await?;
        self.send_once(method, path, params, &customize).await
    }

    /// GET a JSON payload; any non-success status is a fatal error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedStatus`] for non-2xx responses and
    /// [`Error::ParseError`] when the body does not decode.
    pub async fn get_json<T>(&self, path: &str, params: &[(&'static str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .execute(Method::GET, path, params, |request| {
                request.header("Accept", "application/json")
            })
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::unexpected_status(status, body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::ParseError(format!("Failed to parse response for `{path}`: {e}")))
    }

    /// POST a JSON body and return the response status and body verbatim.
    ///
    /// Bulk-mutation endpoints interpret the status themselves (success class
    /// versus batch failure), so no status mapping happens here.
    ///
    /// # Errors
    ///
    /// Returns transport and token-refresh errors only.
    pub async fn post_status<B>(&self, path: &str, body: &B) -> Result<(StatusCode, String)>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .execute(Method::POST, path, &[], |request| request.json(body))
            .await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Ok((status, body))
    }

    /// DELETE a resource and return the response status and body verbatim.
    ///
    /// # Errors
    ///
    /// Returns transport and token-refresh errors only.
    pub async fn delete_status(&self, path: &str) -> Result<(StatusCode, String)> {
        let response = self
            .execute(Method::DELETE, path, &[], |request| request)
            .await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Ok((status, body))
    }

    async fn send_once<F>(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
        customize: &F,
    ) -> Result<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        let mut request = self.http.request(method, url);
        if !params.is_empty() {
            request = request.query(params);
        }
        request = customize(request);
        request = {
            let token = self.token.lock().await;
            request.bearer_auth(token.expose_secret())
        };

        request.send().await.map_err(Error::from)
    }

    async fn refresh_token(&self) -> Result<()> {
        let fresh = self.provider.issue_token().await?;
        *self.token.lock().await = fresh;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MockTokenProvider, StaticTokenProvider};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer) -> PlatformConfig {
        PlatformConfig::new(server.uri()).unwrap()
    }

    fn static_client(server: &MockServer, token: &str) -> ApiClient {
        ApiClient::new(
            &test_config(server),
            Arc::new(StaticTokenProvider::new(token)),
            SecretString::from(token.to_string()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn bearer_token_attached_to_every_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/repositories"))
            .and(header("authorization", "Bearer tok-0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = static_client(&server, "tok-0");
        let value: serde_json::Value = client.get_json("api/v2/repositories", &[]).await.unwrap();
        assert_eq!(value, json!({"result": []}));
    }

    #[tokio::test]
    async fn unauthorized_triggers_one_refresh_and_one_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/repositories"))
            .and(header("authorization", "Bearer tok-0"))
            .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v2/repositories"))
            .and(header("authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": [1]})))
            .expect(1)
            .mount(&server)
            .await;

        let mut provider = MockTokenProvider::new();
        provider
            .expect_issue_token()
            .times(1)
            .returning(|| Ok(SecretString::from("tok-1".to_string())));

        let client = ApiClient::new(
            &test_config(&server),
            Arc::new(provider),
            SecretString::from("tok-0".to_string()),
        )
        .unwrap();

        let value: serde_json::Value = client.get_json("api/v2/repositories", &[]).await.unwrap();
        assert_eq!(value, json!({"result": [1]}));
    }

    #[tokio::test]
    async fn second_unauthorized_is_returned_as_is() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/repositories"))
            .respond_with(ResponseTemplate::new(401).set_body_string("still expired"))
            .expect(2)
            .mount(&server)
            .await;

        let mut provider = MockTokenProvider::new();
        provider
            .expect_issue_token()
            .times(1)
            .returning(|| Ok(SecretString::from("tok-1".to_string())));

        let client = ApiClient::new(
            &test_config(&server),
            Arc::new(provider),
            SecretString::from("tok-0".to_string()),
        )
        .unwrap();

        let response = client
            .execute(Method::GET, "api/v2/repositories", &[], |r| r)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn successful_response_does_not_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let mut provider = MockTokenProvider::new();
        provider.expect_issue_token().times(0);

        let client = ApiClient::new(
            &test_config(&server),
            Arc::new(provider),
            SecretString::from("tok-0".to_string()),
        )
        .unwrap();

        let _: serde_json::Value = client.get_json("ping", &[]).await.unwrap();
    }

    #[tokio::test]
    async fn non_success_listing_status_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/repositories"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = static_client(&server, "tok-0");
        let err = client
            .get_json::<serde_json::Value>("api/v2/repositories", &[])
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::UnexpectedStatus {
                status: 500,
                body: "boom".to_string()
            }
        );
    }

    #[tokio::test]
    async fn post_status_returns_body_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/images/actions/delete"))
            .respond_with(ResponseTemplate::new(422).set_body_string("scope locked"))
            .mount(&server)
            .await;

        let client = static_client(&server, "tok-0");
        let (status, body) = client
            .post_status("api/v2/images/actions/delete", &json!({"ids": [1, 2]}))
            .await
            .unwrap();
        assert_eq!(status.as_u16(), 422);
        assert_eq!(body, "scope locked");
    }
}
