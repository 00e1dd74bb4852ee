//! Custom project requests.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::{CustomRequestId, CustomRequestStatus};
use crate::validation::{ValidationError, require};

use super::CustomerContact;

/// A custom project request as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRequest {
    pub id: CustomRequestId,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    pub project_title: String,
    pub project_scope: String,
    #[serde(default)]
    pub budget_range: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub additional_details: Option<String>,
    pub status: CustomRequestStatus,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// Body of `POST /api/custom-requests`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCustomRequest {
    #[serde(flatten)]
    pub contact: CustomerContact,
    pub project_title: String,
    pub project_scope: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_details: Option<String>,
}

impl NewCustomRequest {
    /// A request with only the required fields set.
    #[must_use]
    pub fn new(
        contact: CustomerContact,
        project_title: impl Into<String>,
        project_scope: impl Into<String>,
    ) -> Self {
        Self {
            contact,
            project_title: project_title.into(),
            project_scope: project_scope.into(),
            budget_range: None,
            timeline: None,
            additional_details: None,
        }
    }

    /// Check required fields.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] for the first blank
    /// required field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("customer_name", &self.contact.name)?;
        require("project_title", &self.project_title)?;
        require("project_scope", &self.project_scope)
    }
}

/// Body of `PUT /api/custom-requests/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CustomRequestUpdate {
    pub status: CustomRequestStatus,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn contact() -> CustomerContact {
        CustomerContact::parse("Grace", "grace@studio.io", Some("+44 20 7946 0000")).unwrap()
    }

    #[test]
    fn test_scope_is_required() {
        let request = NewCustomRequest::new(contact(), "Landing page", "");
        assert_eq!(
            request.validate(),
            Err(ValidationError::MissingField("project_scope"))
        );
    }

    #[test]
    fn test_body_omits_unset_optionals() {
        let mut request = NewCustomRequest::new(contact(), "Landing page", "One page, dark theme");
        request.budget_range = Some("$500-$1000".to_owned());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "customer_name": "Grace",
                "customer_email": "grace@studio.io",
                "customer_phone": "+44 20 7946 0000",
                "project_title": "Landing page",
                "project_scope": "One page, dark theme",
                "budget_range": "$500-$1000"
            })
        );
    }

    #[test]
    fn test_decode_backend_request() {
        let request: CustomRequest = serde_json::from_value(json!({
            "id": 4,
            "customer_name": "Grace",
            "customer_email": "grace@studio.io",
            "project_title": "Landing page",
            "project_scope": "One page",
            "status": "in_progress",
            "created_at": "2024-06-01T09:15:00",
            "updated_at": "2024-06-01T09:15:00"
        }))
        .unwrap();
        assert_eq!(request.status, CustomRequestStatus::InProgress);
        assert!(request.timeline.is_none());
    }
}
