//! Input checks run before a request leaves the client.

use crate::types::{EmailError, PriceError};

/// Why a submission was refused locally.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty or whitespace.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A customization order was submitted without describing the changes.
    #[error("customization details are required for customization orders")]
    MissingCustomizationDetails,

    /// The customer email is malformed.
    #[error("invalid email: {0}")]
    Email(#[from] EmailError),

    /// The price is malformed or negative.
    #[error("invalid price: {0}")]
    Price(#[from] PriceError),

    /// A status the client does not recognize cannot be requested.
    #[error("cannot request an unrecognized status")]
    UnknownStatus,
}

/// Require `value` to contain something other than whitespace.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] naming `field`.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        assert!(require("title", "Logo pack").is_ok());
        assert_eq!(
            require("title", " \t"),
            Err(ValidationError::MissingField("title"))
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::MissingField("project_scope").to_string(),
            "project_scope is required"
        );
        assert_eq!(
            ValidationError::from(EmailError::Empty).to_string(),
            "invalid email: email cannot be empty"
        );
    }
}
