//! Editable page content blocks, addressed by key (e.g. `home_hero`).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::PageContentId;
use crate::validation::{ValidationError, require};

/// How a content block's text should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Html,
    Json,
}

impl ContentType {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A page content block as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    pub id: PageContentId,
    pub page_key: String,
    pub content_type: ContentType,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Body of `POST /api/content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPageContent {
    pub page_key: String,
    pub content_type: ContentType,
    pub content: String,
}

impl NewPageContent {
    /// Check required fields.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] if the key is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("page_key", &self.page_key)
    }
}

/// Body of `PUT /api/content/{key}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageContentUpdate {
    pub content: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_wire_name() {
        assert_eq!(serde_json::to_string(&ContentType::Html).unwrap(), "\"html\"");
    }

    #[test]
    fn test_blank_key_rejected() {
        let body = NewPageContent {
            page_key: " ".to_owned(),
            content_type: ContentType::Text,
            content: "Hello".to_owned(),
        };
        assert_eq!(body.validate(), Err(ValidationError::MissingField("page_key")));
    }
}
