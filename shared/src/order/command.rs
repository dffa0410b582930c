//! Order commands - requests to move an order through its lifecycle

use super::types::{Actor, PaymentFailureReason, RequirementAnswer};
use crate::models::PackageType;
use serde::{Deserialize, Serialize};

/// Command envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCommand {
    /// Idempotency key. Gateway-originated commands reuse the gateway event id.
    pub command_id: String,
    pub actor: Actor,
    /// Client timestamp (Unix milliseconds)
    pub timestamp: i64,
    pub payload: OrderCommandPayload,
}

impl OrderCommand {
    pub fn new(actor: Actor, payload: OrderCommandPayload) -> Self {
        Self {
            command_id: uuid::Uuid::new_v4().to_string(),
            actor,
            timestamp: crate::util::now_millis(),
            payload,
        }
    }

    /// Use a caller-supplied idempotency key
    pub fn with_id(mut self, command_id: impl Into<String>) -> Self {
        self.command_id = command_id.into();
        self
    }

    /// Order targeted by the command (None for PlaceOrder)
    pub fn target_order(&self) -> Option<&str> {
        match &self.payload {
            OrderCommandPayload::PlaceOrder { .. } => None,
            OrderCommandPayload::AttachPaymentReference { order_id, .. }
            | OrderCommandPayload::ConfirmPayment { order_id, .. }
            | OrderCommandPayload::FailPayment { order_id, .. }
            | OrderCommandPayload::DeliverWork { order_id, .. }
            | OrderCommandPayload::AcceptDelivery { order_id }
            | OrderCommandPayload::RequestRevision { order_id, .. }
            | OrderCommandPayload::CancelOrder { order_id, .. }
            | OrderCommandPayload::LeaveReview { order_id, .. } => Some(order_id),
        }
    }
}

/// Command payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderCommandPayload {
    PlaceOrder {
        gig_id: i64,
        package_type: PackageType,
        #[serde(default)]
        requirements: Vec<RequirementAnswer>,
    },
    AttachPaymentReference {
        order_id: String,
        reference: String,
    },
    ConfirmPayment {
        order_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        payment_reference: Option<String>,
    },
    FailPayment {
        order_id: String,
        reason: PaymentFailureReason,
    },
    DeliverWork {
        order_id: String,
        message: String,
        #[serde(default)]
        files: Vec<String>,
    },
    AcceptDelivery {
        order_id: String,
    },
    RequestRevision {
        order_id: String,
        message: String,
    },
    CancelOrder {
        order_id: String,
        reason: String,
    },
    LeaveReview {
        order_id: String,
        rating: u8,
        #[serde(default)]
        comment: String,
    },
}
