//! Shared HTTP plumbing for the Calculadora API.
//!
//! One `reqwest::Client` with a cookie jar carries the session across
//! calls; mutating requests echo the CSRF token cookie back as the
//! `X-CSRFToken` header. All error mapping happens here: transport
//! failures, non-2xx statuses (401 becomes an expired session), and
//! unexpected response shapes.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use calq_core::config::ClientConfig;
use calq_core::error::{CalqError, Result};

use crate::cookies::cookie_value;

const CSRF_COOKIE: &str = "csrftoken";
const CSRF_HEADER: &str = "X-CSRFToken";

/// HTTP client for the Calculadora API.
///
/// Cheap to clone; the underlying connection pool and cookie jar are shared.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    jar: Arc<Jar>,
    base_url: Url,
    verify_timeout: Duration,
}

impl ApiClient {
    /// Builds a client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|err| CalqError::config(format!("invalid base_url: {err}")))?;

        let jar = Arc::new(Jar::default());
        let http = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|err| CalqError::config(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            jar,
            base_url,
            verify_timeout: Duration::from_secs(config.verify_timeout_secs),
        })
    }

    /// The bound for the cached-profile verification request.
    pub fn verify_timeout(&self) -> Duration {
        self.verify_timeout
    }

    /// Resolves an API path against the configured base URL.
    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|err| CalqError::config(format!("invalid endpoint {path}: {err}")))
    }

    /// Reads the CSRF token out of the cookie jar, if the server set one.
    pub fn csrf_token(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base_url)?;
        let header = header.to_str().ok()?;
        cookie_value(header, CSRF_COOKIE)
    }

    /// Starts a request; mutating methods get the CSRF header attached.
    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        let mut builder = self.http.request(method.clone(), url);

        if method != Method::GET {
            if let Some(token) = self.csrf_token() {
                builder = builder.header(CSRF_HEADER, token);
            }
        }

        Ok(builder)
    }

    /// Sends a request, failing on non-2xx statuses.
    ///
    /// `fallback` is the user-facing message used when the server's error
    /// body carries no message of its own. `expired_on_401` controls whether
    /// a 401 means the session died (authenticated endpoints) or is an
    /// ordinary rejection carrying a message (login with bad credentials).
    async fn send_checked(
        &self,
        builder: RequestBuilder,
        fallback: &str,
        expired_on_401: bool,
    ) -> Result<reqwest::Response> {
        let response = builder.send().await.map_err(into_network_error)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "API request failed");
            return Err(map_http_error(status, &body, fallback, expired_on_401));
        }

        Ok(response)
    }

    /// Sends an authenticated request and deserializes a JSON body.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        fallback: &str,
    ) -> Result<T> {
        let response = self.send_checked(builder, fallback, true).await?;
        response.json().await.map_err(|err| {
            CalqError::malformed(format!("failed to parse response body: {err}"))
        })
    }

    /// Like [`execute`](Self::execute), for unauthenticated endpoints where
    /// a 401 carries a server message rather than meaning an expired session.
    pub(crate) async fn execute_public<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        fallback: &str,
    ) -> Result<T> {
        let response = self.send_checked(builder, fallback, false).await?;
        response.json().await.map_err(|err| {
            CalqError::malformed(format!("failed to parse response body: {err}"))
        })
    }

    /// Sends a request where only success matters; the body is discarded.
    pub(crate) async fn execute_discarding(
        &self,
        builder: RequestBuilder,
        fallback: &str,
    ) -> Result<()> {
        self.send_checked(builder, fallback, true).await?;
        Ok(())
    }
}

/// Error bodies are inconsistent across endpoints: `error` or `erro`, with
/// optional `details`/`detalhes`. Either key is accepted.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "erro")]
    error: Option<String>,
    #[serde(alias = "detalhes")]
    #[allow(dead_code)]
    details: Option<serde_json::Value>,
}

fn into_network_error(err: reqwest::Error) -> CalqError {
    if err.is_timeout() {
        CalqError::network("tempo de resposta esgotado")
    } else {
        CalqError::network(err.to_string())
    }
}

/// Maps a non-2xx response to a typed error.
///
/// On authenticated endpoints a 401 is an expired session, regardless of
/// body. Anything else keeps the status and whatever message the server
/// provided, falling back to the caller's generic text when the body has
/// none.
pub(crate) fn map_http_error(
    status: StatusCode,
    body: &str,
    fallback: &str,
    expired_on_401: bool,
) -> CalqError {
    if expired_on_401 && status == StatusCode::UNAUTHORIZED {
        return CalqError::SessionExpired;
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .unwrap_or_else(|| fallback.to_string());

    CalqError::http(status.as_u16(), message)
}
