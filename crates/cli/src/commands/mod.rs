//! Subcommand implementations.
//!
//! Listings are written to the writer passed in (stdout in the binary);
//! status messages go through `tracing`.

pub mod auth;
pub mod content;
pub mod orders;
pub mod products;
pub mod requests;
pub mod upload;

use atelier_client::{
    AdminGate, ApiClient, ApiError, ConfigError, GateDecision, LoginError, SessionError,
};
use atelier_core::AdminProfile;
use thiserror::Error;

/// Errors that can end a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("{0}")]
    Login(#[from] LoginError),

    #[error("Session storage error: {0}")]
    Session(#[from] SessionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Admin command run without a valid credential.
    #[error("Not logged in. Run `atelier login` first.")]
    NotLoggedIn,

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
}

/// Run the admin gate before an admin command.
pub async fn require_admin(api: &ApiClient) -> Result<AdminProfile, CommandError> {
    match AdminGate::new(api.clone()).check().await {
        GateDecision::Allow(profile) => Ok(profile),
        GateDecision::RedirectToLogin => Err(CommandError::NotLoggedIn),
    }
}
