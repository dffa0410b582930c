//! Order events - immutable facts recorded after command processing

use super::types::{Actor, Deliverable, OrderStatus, PaymentFailureReason, RequirementAnswer, RevisionRequest};
use crate::models::PackageType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order event - immutable audit record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderEvent {
    /// Event unique ID
    pub event_id: String,
    /// Global sequence number (for ordering and replay)
    pub sequence: u64,
    /// Order this event belongs to
    pub order_id: String,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// Client timestamp (Unix milliseconds), preserved from the command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_timestamp: Option<i64>,
    /// Who triggered this event
    pub actor: Actor,
    /// Command that triggered this event (for audit tracing)
    pub command_id: String,
    /// Event type
    pub event_type: OrderEventType,
    /// Event payload
    pub payload: EventPayload,
}

impl OrderEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence: u64,
        order_id: String,
        actor: Actor,
        command_id: String,
        client_timestamp: Option<i64>,
        timestamp: i64,
        event_type: OrderEventType,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            sequence,
            order_id,
            timestamp,
            client_timestamp,
            actor,
            command_id,
            event_type,
            payload,
        }
    }
}

/// Event type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventType {
    OrderPlaced,
    PaymentReferenceAttached,
    PaymentConfirmed,
    PaymentFailed,
    WorkDelivered,
    DeliveryAccepted,
    RevisionRequested,
    OrderCancelled,
    ReviewLeft,
}

impl std::fmt::Display for OrderEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderEventType::OrderPlaced => write!(f, "ORDER_PLACED"),
            OrderEventType::PaymentReferenceAttached => write!(f, "PAYMENT_REFERENCE_ATTACHED"),
            OrderEventType::PaymentConfirmed => write!(f, "PAYMENT_CONFIRMED"),
            OrderEventType::PaymentFailed => write!(f, "PAYMENT_FAILED"),
            OrderEventType::WorkDelivered => write!(f, "WORK_DELIVERED"),
            OrderEventType::DeliveryAccepted => write!(f, "DELIVERY_ACCEPTED"),
            OrderEventType::RevisionRequested => write!(f, "REVISION_REQUESTED"),
            OrderEventType::OrderCancelled => write!(f, "ORDER_CANCELLED"),
            OrderEventType::ReviewLeft => write!(f, "REVIEW_LEFT"),
        }
    }
}

/// Event payload variants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    /// Commercial terms are copied from the gig package at this moment
    OrderPlaced {
        order_code: String,
        buyer_id: String,
        seller_id: String,
        gig_id: i64,
        gig_title: String,
        package_type: PackageType,
        title: String,
        description: String,
        price: Decimal,
        service_fee: Decimal,
        total_amount: Decimal,
        delivery_time: u32,
        max_revisions: u32,
        expected_delivery: i64,
        #[serde(default)]
        requirements: Vec<RequirementAnswer>,
    },

    PaymentReferenceAttached {
        reference: String,
    },

    PaymentConfirmed {
        #[serde(skip_serializing_if = "Option::is_none")]
        payment_reference: Option<String>,
    },

    PaymentFailed {
        reason: PaymentFailureReason,
    },

    WorkDelivered {
        deliverable: Deliverable,
        /// Status the order left (active or revision_requested)
        from_status: OrderStatus,
    },

    DeliveryAccepted {
        completed_at: i64,
    },

    RevisionRequested {
        revision: RevisionRequest,
        revisions_used: u32,
    },

    OrderCancelled {
        reason: String,
        from_status: OrderStatus,
    },

    ReviewLeft {
        rating: u8,
        comment: String,
    },
}

impl EventPayload {
    /// Status the order is in after this event, when the event moves it
    pub fn target_status(&self) -> Option<OrderStatus> {
        match self {
            EventPayload::OrderPlaced { .. } => Some(OrderStatus::Pending),
            EventPayload::PaymentConfirmed { .. } => Some(OrderStatus::Active),
            EventPayload::PaymentFailed { .. } => Some(OrderStatus::Cancelled),
            EventPayload::WorkDelivered { .. } => Some(OrderStatus::Delivered),
            EventPayload::DeliveryAccepted { .. } => Some(OrderStatus::Completed),
            EventPayload::RevisionRequested { .. } => Some(OrderStatus::RevisionRequested),
            EventPayload::OrderCancelled { .. } => Some(OrderStatus::Cancelled),
            EventPayload::PaymentReferenceAttached { .. } | EventPayload::ReviewLeft { .. } => None,
        }
    }
}
