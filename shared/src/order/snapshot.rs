//! Order snapshot - current order state computed from its event stream

use super::types::{
    Cancellation, Deliverable, OrderStatus, PartyRole, PaymentStatus, RequirementAnswer, Review,
    RevisionRequest,
};
use crate::models::PackageType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order snapshot - computed from event stream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSnapshot {
    /// Order ID (assigned by server)
    pub order_id: String,
    /// Human-readable code, e.g. `FOLOYW3V28K2J9A`
    pub order_code: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub gig_id: i64,
    pub gig_title: String,

    // === Commercial terms copied at creation ===
    pub package_type: PackageType,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub service_fee: Decimal,
    pub total_amount: Decimal,
    /// Delivery time in days
    pub delivery_time: u32,
    pub expected_delivery: i64,
    pub max_revisions: u32,

    // === Workflow ===
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    /// Checkout session id, later the payment intent id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,
    #[serde(default)]
    pub requirements: Vec<RequirementAnswer>,
    #[serde(default)]
    pub deliverables: Vec<Deliverable>,
    #[serde(default)]
    pub revisions: Vec<RevisionRequest>,
    pub revisions_used: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_delivery: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation: Option<Cancellation>,
    #[serde(default)]
    pub review_left: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<Review>,

    /// Creation timestamp
    pub created_at: i64,
    /// Last update timestamp
    pub updated_at: i64,
    /// Sequence of the last applied event
    pub last_sequence: u64,
}

impl OrderSnapshot {
    /// Empty snapshot, filled in by the ORDER_PLACED applier
    pub fn new(order_id: String) -> Self {
        Self {
            order_id,
            order_code: String::new(),
            buyer_id: String::new(),
            seller_id: String::new(),
            gig_id: 0,
            gig_title: String::new(),
            package_type: PackageType::Basic,
            title: String::new(),
            description: String::new(),
            price: Decimal::ZERO,
            service_fee: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            delivery_time: 0,
            expected_delivery: 0,
            max_revisions: 0,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_reference: None,
            requirements: Vec::new(),
            deliverables: Vec::new(),
            revisions: Vec::new(),
            revisions_used: 0,
            actual_delivery: None,
            completed_at: None,
            cancellation: None,
            review_left: false,
            review: None,
            created_at: 0,
            updated_at: 0,
            last_sequence: 0,
        }
    }

    /// Role of `user_id` on this order, if any
    pub fn role_of(&self, user_id: &str) -> Option<PartyRole> {
        if self.buyer_id == user_id {
            Some(PartyRole::Buyer)
        } else if self.seller_id == user_id {
            Some(PartyRole::Seller)
        } else {
            None
        }
    }

    pub fn is_party(&self, user_id: &str) -> bool {
        self.role_of(user_id).is_some()
    }

    /// The party that did not perform an action
    pub fn counterparty_of(&self, user_id: &str) -> Option<&str> {
        match self.role_of(user_id)? {
            PartyRole::Buyer => Some(&self.seller_id),
            PartyRole::Seller => Some(&self.buyer_id),
        }
    }

    pub fn can_request_revision(&self) -> bool {
        self.revisions_used < self.max_revisions
    }
}
