//! Authentication and health endpoints.

use atelier_core::{AdminProfile, HealthStatus, TokenResponse};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::instrument;

use super::ApiClient;
use crate::error::ApiError;

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// Exchange admin credentials for a bearer token.
    ///
    /// Does not store the token; see [`crate::AdminGate::login`] for the
    /// flow that does.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` for wrong credentials, or any
    /// other `ApiError` the request produces.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<TokenResponse, ApiError> {
        let body = LoginRequest {
            email,
            password: password.expose_secret(),
        };
        let request = self.request(Method::POST, &["api", "auth", "login"]).await;
        Self::send(request.json(&body)).await
    }

    /// The admin the current credential belongs to.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthenticated` if there is no credential or the
    /// backend rejects it.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<AdminProfile, ApiError> {
        let request = self.request(Method::GET, &["api", "auth", "me"]).await;
        Self::send(request).await
    }

    /// Backend liveness check. No credential needed.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the backend is unreachable or unhealthy.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let request = self.request(Method::GET, &["api", "health"]).await;
        Self::send(request).await
    }
}
