//! Admin gate: login, logout, and the check run before every admin view.

use atelier_core::{AdminProfile, Email};
use secrecy::SecretString;
use thiserror::Error;
use tracing::instrument;

use crate::api::ApiClient;
use crate::session::SessionError;

/// Outcome of [`AdminGate::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The stored credential is valid for this admin.
    Allow(AdminProfile),
    /// Show the login view.
    RedirectToLogin,
}

impl GateDecision {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }
}

/// Login failure.
///
/// Always the same message: callers never learn whether the email, the
/// password, or something else was wrong. The cause is logged at debug.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    #[error("Invalid email or password")]
    InvalidCredentials,
}

/// Guards admin views.
#[derive(Debug, Clone)]
pub struct AdminGate {
    api: ApiClient,
}

impl AdminGate {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Decide whether an admin view may be entered.
    ///
    /// Without a credential this redirects without contacting the backend.
    /// With one, the credential is validated against `/api/auth/me`; if
    /// that fails for any reason the credential is cleared and the caller
    /// redirected.
    #[instrument(skip(self))]
    pub async fn check(&self) -> GateDecision {
        let session = self.api.session();
        if !session.is_authenticated().await {
            tracing::debug!("No credential, redirecting to login");
            return GateDecision::RedirectToLogin;
        }

        match self.api.me().await {
            Ok(profile) => {
                tracing::debug!(admin_id = %profile.id, "Credential validated");
                GateDecision::Allow(profile)
            }
            Err(e) => {
                tracing::info!(error = %e, "Stored credential rejected, signing out");
                if let Err(e) = session.clear_credential().await {
                    tracing::warn!(error = %e, "Failed to clear stored credential");
                }
                GateDecision::RedirectToLogin
            }
        }
    }

    /// Log in and store the returned credential.
    ///
    /// # Errors
    ///
    /// Returns [`LoginError::InvalidCredentials`] on any failure. No
    /// credential is stored in that case.
    #[instrument(skip(self, email, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<(), LoginError> {
        let email = Email::parse(email).map_err(|e| {
            tracing::debug!(error = %e, "Login refused: malformed email");
            LoginError::InvalidCredentials
        })?;

        let token = self
            .api
            .login(email.as_str(), password)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "Login refused by backend");
                LoginError::InvalidCredentials
            })?;

        self.api
            .session()
            .set_credential(token.access_token)
            .await
            .map_err(|e: SessionError| {
                tracing::warn!(error = %e, "Login succeeded but credential could not be stored");
                LoginError::InvalidCredentials
            })?;

        tracing::info!(email = %email, "Logged in");
        Ok(())
    }

    /// Forget the credential. No network call is made.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the persisted copy could not be removed;
    /// the in-memory credential is gone either way.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.api.session().clear_credential().await?;
        tracing::info!("Logged out");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use url::Url;

    use super::*;
    use crate::config::ClientConfig;
    use crate::session::SessionStore;

    fn gate(session: SessionStore) -> AdminGate {
        let config = ClientConfig::new(Url::parse("http://127.0.0.1:9").unwrap());
        AdminGate::new(ApiClient::new(&config, session).unwrap())
    }

    #[tokio::test]
    async fn test_check_without_credential_redirects() {
        let decision = gate(SessionStore::in_memory()).check().await;
        assert_eq!(decision, GateDecision::RedirectToLogin);
        assert!(!decision.is_allowed());
    }

    #[tokio::test]
    async fn test_malformed_email_fails_generically() {
        let session = SessionStore::in_memory();
        let err = gate(session.clone())
            .login("not-an-email", &SecretString::from("pw"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid email or password");
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_logout_clears_credential() {
        let session = SessionStore::in_memory();
        session.set_credential("tok").await.unwrap();

        gate(session.clone()).logout().await.unwrap();

        assert!(!session.is_authenticated().await);
    }
}
