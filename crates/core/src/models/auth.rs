//! Authentication and health payloads.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::AdminId;

/// Successful login response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Bearer token to attach to later requests.
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
}

/// The admin account a bearer token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    pub id: AdminId,
    pub email: String,
    pub created_at: NaiveDateTime,
}

/// Backend liveness report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl HealthStatus {
    /// Whether the backend reported itself healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
