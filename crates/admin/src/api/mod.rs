//! REST client for the betting backend.
//!
//! Every state change and every list shown by the panel goes through this
//! client. The backend wraps all payloads in a common envelope:
//!
//! ```json
//! { "response": { "payload": ... } }
//! ```
//!
//! # Authentication
//!
//! Requests carry `Authorization: Bearer <token>` once a client has been
//! derived with [`BackendClient::with_bearer`]. The token comes from the
//! administrator's sign-in and lives in the session cookie.

mod administrators;
mod bets;
mod draws;
mod logs;
mod types;

pub use types::*;

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

/// Errors that can occur when talking to the betting backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Missing, expired or insufficient credential.
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Message suitable for showing to the administrator, if the backend sent one.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

/// Response envelope shared by every backend endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: EnvelopeBody<T>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeBody<T> {
    payload: T,
}

/// Error body some endpoints send alongside a non-2xx status.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Betting backend client.
///
/// Cheap to clone. The bearer credential is per clone, so a client derived
/// for one administrator never leaks into another request.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
    bearer: Option<Arc<SecretString>>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: &Url) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: base_url.as_str().trim_end_matches('/').to_string(),
            }),
            bearer: None,
        })
    }

    /// Derive a client that authenticates every request with `token`.
    #[must_use]
    pub fn with_bearer(&self, token: SecretString) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            bearer: Some(Arc::new(token)),
        }
    }

    /// Whether this client carries a bearer credential.
    #[must_use]
    pub const fn has_bearer(&self) -> bool {
        self.bearer.is_some()
    }

    /// The configured backend base URL, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Whether the backend answers HTTP at all.
    pub async fn is_reachable(&self) -> bool {
        self.inner
            .client
            .get(self.url("/"))
            .send()
            .await
            .is_ok()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Execute a GET request and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.inner.client.get(self.url(path));
        let response = self.authorize(request).send().await?;
        self.handle_response(response).await
    }

    /// Execute a POST request and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.inner.client.post(self.url(path)).json(body);
        let response = self.authorize(request).send().await?;
        self.handle_response(response).await
    }

    /// Execute a POST request whose outcome is only its status.
    pub(crate) async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        let request = self.inner.client.post(self.url(path));
        let response = self.authorize(request).send().await?;
        self.handle_status(response).await
    }

    /// Execute a PATCH request whose outcome is only its status.
    pub(crate) async fn patch<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        let mut request = self.inner.client.patch(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = self.authorize(request).send().await?;
        self.handle_status(response).await
    }

    /// Execute a DELETE request.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.inner.client.delete(self.url(path));
        let response = self.authorize(request).send().await?;
        self.handle_status(response).await
    }

    /// Handle API response and unwrap the envelope payload.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status.is_success() {
            let envelope: Envelope<T> = response
                .json()
                .await
                .map_err(|e| ApiError::Parse(format!("Failed to parse response: {e}")))?;
            return Ok(envelope.response.payload);
        }

        Err(self.parse_error(response).await)
    }

    /// Succeed on any 2xx status, ignoring the body.
    async fn handle_status(&self, response: reqwest::Response) -> Result<(), ApiError> {
        if response.status().is_success() {
            return Ok(());
        }

        Err(self.parse_error(response).await)
    }

    /// Parse error response from the backend.
    async fn parse_error(&self, response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return ApiError::Unauthorized;
        }

        if status == 404 {
            return ApiError::NotFound(response.url().path().to_string());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.message)
            .unwrap_or(body);

        ApiError::Api { status, message }
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.inner.base_url)
            .field("bearer", &self.bearer.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Percent-encode a single path segment.
pub(crate) fn segment(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> BackendClient {
        BackendClient::new(&Url::parse("http://localhost:8000/").unwrap()).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(client().base_url(), "http://localhost:8000");
        assert_eq!(client().url("/bet"), "http://localhost:8000/bet");
    }

    #[test]
    fn test_with_bearer_does_not_touch_original() {
        let anonymous = client();
        let authed = anonymous.with_bearer(SecretString::from("tok"));
        assert!(!anonymous.has_bearer());
        assert!(authed.has_bearer());
    }

    #[test]
    fn test_debug_redacts_bearer() {
        let authed = client().with_bearer(SecretString::from("very-secret-token"));
        let debug_output = format!("{authed:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("very-secret-token"));
    }

    #[test]
    fn test_segment_encoding() {
        assert_eq!(segment("abc-123"), "abc-123");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn test_envelope_unwrap() {
        let envelope: Envelope<Vec<u8>> =
            serde_json::from_str(r#"{"response":{"payload":[1,2,3]}}"#).unwrap();
        assert_eq!(envelope.response.payload, vec![1, 2, 3]);
    }

    #[test]
    fn test_backend_message() {
        let err = ApiError::Api {
            status: 400,
            message: "token expirado".to_string(),
        };
        assert_eq!(err.backend_message(), Some("token expirado"));
        assert_eq!(ApiError::Unauthorized.backend_message(), None);
    }
}
