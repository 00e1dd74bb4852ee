//! Status machines for orders and custom requests.
//!
//! Each status enum carries its own transition table. Admin front ends offer
//! exactly the actions returned by `available_actions()`; anything else is
//! refused locally before a request is sent. The backend remains the final
//! arbiter of what a record's status actually is.

use core::fmt;

use serde::{Deserialize, Serialize};

/// An action that is not offered from the record's current status.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot {action} a record that is {from}")]
pub struct TransitionError {
    /// Status the record is currently in.
    pub from: &'static str,
    /// Action that was attempted.
    pub action: &'static str,
}

/// A status string the client does not recognize.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} status: {value}")]
pub struct UnknownStatus {
    /// Which machine the status was parsed for.
    pub kind: &'static str,
    /// The rejected value.
    pub value: String,
}

// =============================================================================
// Orders
// =============================================================================

/// How an order was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Buy a catalog product as-is.
    Purchase,
    /// Buy a catalog product with bespoke changes.
    Customization,
}

impl OrderType {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Customization => "customization",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order lifecycle status.
///
/// `pending → processing → completed`. `cancelled` exists on the backend but
/// is never offered as an admin action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
    /// Any status text this client does not recognize. Shown as-is, offers
    /// no actions, and is never sent.
    #[serde(other)]
    Unknown,
}

/// Admin actions on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderAction {
    /// Start work on a pending order.
    Process,
    /// Mark a processing order as done.
    Complete,
}

impl OrderStatus {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }

    /// No action is offered from a terminal status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Actions an admin may take from this status.
    #[must_use]
    pub const fn available_actions(&self) -> &'static [OrderAction] {
        match self {
            Self::Pending => &[OrderAction::Process],
            Self::Processing => &[OrderAction::Complete],
            Self::Completed | Self::Cancelled | Self::Unknown => &[],
        }
    }

    /// Status reached by applying `action`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] if the action is not offered from `self`.
    pub fn apply(self, action: OrderAction) -> Result<Self, TransitionError> {
        match (self, action) {
            (Self::Pending, OrderAction::Process) => Ok(Self::Processing),
            (Self::Processing, OrderAction::Complete) => Ok(Self::Completed),
            _ => Err(TransitionError {
                from: self.as_str(),
                action: action.as_str(),
            }),
        }
    }
}

impl OrderAction {
    /// Verb used in logs and error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Process => "process",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(UnknownStatus {
                kind: "order",
                value: s.to_owned(),
            }),
        }
    }
}

// =============================================================================
// Custom requests
// =============================================================================

/// Custom project request status.
///
/// `pending → in_progress → completed`, or `pending → rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CustomRequestStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Rejected,
    /// Any status text this client does not recognize.
    #[serde(other)]
    Unknown,
}

/// Admin actions on a custom request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestAction {
    /// Take on a pending request.
    Accept,
    /// Decline a pending request.
    Reject,
    /// Deliver an accepted request.
    Complete,
}

impl CustomRequestStatus {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
            Self::Unknown => "unknown",
        }
    }

    /// No action is offered from a terminal status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }

    /// Actions an admin may take from this status.
    #[must_use]
    pub const fn available_actions(&self) -> &'static [RequestAction] {
        match self {
            Self::Pending => &[RequestAction::Accept, RequestAction::Reject],
            Self::InProgress => &[RequestAction::Complete],
            Self::Completed | Self::Rejected | Self::Unknown => &[],
        }
    }

    /// Status reached by applying `action`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] if the action is not offered from `self`.
    pub fn apply(self, action: RequestAction) -> Result<Self, TransitionError> {
        match (self, action) {
            (Self::Pending, RequestAction::Accept) => Ok(Self::InProgress),
            (Self::Pending, RequestAction::Reject) => Ok(Self::Rejected),
            (Self::InProgress, RequestAction::Complete) => Ok(Self::Completed),
            _ => Err(TransitionError {
                from: self.as_str(),
                action: action.as_str(),
            }),
        }
    }
}

impl RequestAction {
    /// Verb used in logs and error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for CustomRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CustomRequestStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "rejected" => Ok(Self::Rejected),
            _ => Err(UnknownStatus {
                kind: "custom request",
                value: s.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_forward_path() {
        let status = OrderStatus::Pending
            .apply(OrderAction::Process)
            .and_then(|s| s.apply(OrderAction::Complete))
            .unwrap();
        assert_eq!(status, OrderStatus::Completed);
    }

    #[test]
    fn test_order_rejects_out_of_order_actions() {
        let err = OrderStatus::Pending.apply(OrderAction::Complete).unwrap_err();
        assert_eq!(err.to_string(), "cannot complete a record that is pending");
        assert!(OrderStatus::Completed.apply(OrderAction::Process).is_err());
        assert!(OrderStatus::Cancelled.apply(OrderAction::Process).is_err());
    }

    #[test]
    fn test_order_terminal_offers_nothing() {
        assert!(OrderStatus::Completed.available_actions().is_empty());
        assert!(OrderStatus::Cancelled.available_actions().is_empty());
        assert_eq!(OrderStatus::Pending.available_actions(), [OrderAction::Process]);
    }

    #[test]
    fn test_request_accept_and_reject() {
        assert_eq!(
            CustomRequestStatus::Pending.apply(RequestAction::Accept),
            Ok(CustomRequestStatus::InProgress)
        );
        assert_eq!(
            CustomRequestStatus::Pending.apply(RequestAction::Reject),
            Ok(CustomRequestStatus::Rejected)
        );
        assert_eq!(
            CustomRequestStatus::InProgress.apply(RequestAction::Complete),
            Ok(CustomRequestStatus::Completed)
        );
    }

    #[test]
    fn test_request_terminal_offers_nothing() {
        for status in [CustomRequestStatus::Rejected, CustomRequestStatus::Completed] {
            assert!(status.is_terminal());
            assert!(status.available_actions().is_empty());
            for action in [
                RequestAction::Accept,
                RequestAction::Reject,
                RequestAction::Complete,
            ] {
                assert!(status.apply(action).is_err());
            }
        }
    }

    #[test]
    fn test_in_progress_cannot_be_rejected() {
        assert!(
            CustomRequestStatus::InProgress
                .apply(RequestAction::Reject)
                .is_err()
        );
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&CustomRequestStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"processing\"").unwrap(),
            OrderStatus::Processing
        );
        assert_eq!(
            serde_json::to_string(&OrderType::Customization).unwrap(),
            "\"customization\""
        );
    }

    #[test]
    fn test_unrecognized_status_decodes_and_offers_nothing() {
        let statuses: Vec<OrderStatus> =
            serde_json::from_str(r#"["pending", "on_hold", "refunded"]"#).unwrap();
        assert_eq!(
            statuses,
            [OrderStatus::Pending, OrderStatus::Unknown, OrderStatus::Unknown]
        );
        assert!(OrderStatus::Unknown.available_actions().is_empty());
        assert!(OrderStatus::Unknown.apply(OrderAction::Process).is_err());
        assert!(!OrderStatus::Unknown.is_terminal());

        let request: CustomRequestStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(request, CustomRequestStatus::Unknown);
        assert!(request.available_actions().is_empty());
        assert!("unknown".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_from_str_matches_display() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("done".parse::<CustomRequestStatus>().is_err());
    }
}
