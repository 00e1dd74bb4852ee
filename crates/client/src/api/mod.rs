//! Marketplace backend REST client.
//!
//! [`ApiClient`] is the only code that talks HTTP. Every request is built by
//! [`ApiClient::request`], which attaches the session's bearer credential
//! when one is present. Resource operations live in the submodules as
//! `impl ApiClient` blocks.
//!
//! Operations return the decoded 2xx body or an [`ApiError`]. Nothing is
//! retried and no failure is swallowed; retry policy belongs to the caller.

mod auth;
mod content;
mod custom_requests;
mod orders;
mod products;
mod upload;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::SessionStore;

/// Backend REST API client.
///
/// Cheap to clone; clones share the HTTP connection pool and session.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    session: SessionStore,
}

/// FastAPI-style error body: `{"detail": "..."}` or `{"detail": [...]}`.
#[derive(serde::Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl ApiClient {
    /// Create a client for the configured backend, sharing `session`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BaseUrl` if the base URL cannot take a path, or
    /// `ApiError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        if config.api_url.cannot_be_a_base() {
            return Err(ApiError::BaseUrl(config.api_url.clone()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("atelier-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_url.clone(),
                session,
            }),
        })
    }

    /// The session whose credential this client attaches.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// The backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve a backend-relative resource path such as an upload's
    /// `/uploads/...` URL into an absolute URL.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BaseUrl` if the path cannot be joined.
    pub fn resolve(&self, resource: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(resource)
            .map_err(|_| ApiError::BaseUrl(self.inner.base_url.clone()))
    }

    /// Build the URL for `segments` below the base URL.
    ///
    /// Each segment is percent-encoded, so user-supplied keys and file
    /// names cannot escape their path position.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.inner.base_url.clone();
        // Checked in `new`: the base URL can always take a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Start a request. This is the single point where the credential is
    /// attached: as `Authorization: Bearer <token>` when present, not at all
    /// otherwise.
    async fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let builder = self.inner.http.request(method, self.endpoint(segments));
        self.inner
            .session
            .with_token(|token| match token {
                Some(token) => {
                    tracing::trace!("Attaching bearer credential");
                    builder.bearer_auth(token)
                }
                None => {
                    tracing::trace!("No credential present, sending unauthenticated");
                    builder
                }
            })
            .await
    }

    /// Send a prepared request and decode the 2xx body as `T`.
    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = error_detail(&body, status);
            tracing::debug!(%status, %message, "Backend rejected request");
            return Err(ApiError::from_status(status, message));
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

/// Pull a human-readable message out of an error response body.
fn error_detail(body: &[u8], status: reqwest::StatusCode) -> String {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(message),
        }) => message,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if body.is_empty() => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_owned(),
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}
