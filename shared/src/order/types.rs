//! Shared types for the order lifecycle

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Status
// ============================================================================

/// Order workflow state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Awaiting payment
    #[default]
    Pending,
    /// Paid, work in progress
    Active,
    /// Seller submitted work
    Delivered,
    /// Buyer asked for changes
    RevisionRequested,
    /// Buyer accepted (terminal)
    Completed,
    /// Cancelled by a party or by the payment gateway (terminal)
    Cancelled,
    /// Reserved for manual intervention; no transition leads here
    Disputed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Active => "active",
            OrderStatus::Delivered => "delivered",
            OrderStatus::RevisionRequested => "revision_requested",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Disputed => "disputed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// States counted in `seller.ongoing_orders`
    pub fn is_ongoing(&self) -> bool {
        matches!(
            self,
            OrderStatus::Active | OrderStatus::Delivered | OrderStatus::RevisionRequested
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "active" => Ok(OrderStatus::Active),
            "delivered" => Ok(OrderStatus::Delivered),
            "revision_requested" => Ok(OrderStatus::RevisionRequested),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            "disputed" => Ok(OrderStatus::Disputed),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// Payment sub-state, independent of the workflow status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Released,
    Refunded,
    Failed,
}

/// Why the gateway reported a non-payment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFailureReason {
    Failed,
    Expired,
}

// ============================================================================
// Actors
// ============================================================================

/// Identity driving a command
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Actor {
    User { id: String },
    PaymentGateway,
}

impl Actor {
    pub fn user(id: impl Into<String>) -> Self {
        Actor::User { id: id.into() }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Actor::User { id } => Some(id),
            Actor::PaymentGateway => None,
        }
    }

    pub fn is_gateway(&self) -> bool {
        matches!(self, Actor::PaymentGateway)
    }
}

/// Which side of an order a user sits on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    Buyer,
    Seller,
}

// ============================================================================
// Workflow records
// ============================================================================

/// Buyer answer to one of the gig's requirement questions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequirementAnswer {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub files: Vec<String>,
}

/// Work submitted by the seller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deliverable {
    pub message: String,
    #[serde(default)]
    pub files: Vec<String>,
    pub delivered_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RevisionRequest {
    pub requested_by: String,
    pub message: String,
    pub requested_at: i64,
}

/// Set only when the order is cancelled
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cancellation {
    pub reason: String,
    pub cancelled_by: Actor,
    pub cancelled_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Review {
    pub rating: u8,
    pub comment: String,
    pub created_at: i64,
}

// ============================================================================
// Command Response
// ============================================================================

/// Command response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// The command ID this responds to
    pub command_id: String,
    /// Whether the command succeeded
    pub success: bool,
    /// Order touched by the command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Error details if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CommandError>,
}

impl CommandResponse {
    pub fn success(command_id: String, order_id: Option<String>) -> Self {
        Self {
            command_id,
            success: true,
            order_id,
            error: None,
        }
    }

    pub fn error(command_id: String, error: CommandError) -> Self {
        Self {
            command_id,
            success: false,
            order_id: None,
            error: Some(error),
        }
    }

    pub fn duplicate(command_id: String) -> Self {
        Self {
            command_id,
            success: true,
            order_id: None,
            error: None,
        }
    }
}

/// Command error
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandError {
    pub code: CommandErrorCode,
    pub message: String,
}

impl CommandError {
    pub fn new(code: CommandErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Command error codes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandErrorCode {
    OrderNotFound,
    GigNotFound,
    GigNotListable,
    UserNotFound,
    InvalidPackage,
    SelfOrder,
    NotAuthorized,
    InvalidTransition,
    RevisionLimitReached,
    ReviewAlreadyLeft,
    InvalidRating,
    InvalidInput,
    OrderCodeExhausted,
    InternalError,
    // Storage errors (maps to ErrorCode 94xx)
    StorageFull,
    OutOfMemory,
    StorageCorrupted,
    SystemBusy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&OrderStatus::RevisionRequested).unwrap();
        assert_eq!(json, "\"revision_requested\"");
        assert_eq!(
            "revision_requested".parse::<OrderStatus>(),
            Ok(OrderStatus::RevisionRequested)
        );
    }

    #[test]
    fn test_ongoing_states() {
        assert!(!OrderStatus::Pending.is_ongoing());
        assert!(OrderStatus::Active.is_ongoing());
        assert!(OrderStatus::Delivered.is_ongoing());
        assert!(OrderStatus::RevisionRequested.is_ongoing());
        assert!(!OrderStatus::Completed.is_ongoing());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Disputed.is_terminal());
    }

    #[test]
    fn test_actor_tagging() {
        let json = serde_json::to_string(&Actor::user("u1")).unwrap();
        assert_eq!(json, r#"{"kind":"user","id":"u1"}"#);
        let json = serde_json::to_string(&Actor::PaymentGateway).unwrap();
        assert_eq!(json, r#"{"kind":"payment_gateway"}"#);
        assert_eq!(Actor::PaymentGateway.user_id(), None);
    }
}
