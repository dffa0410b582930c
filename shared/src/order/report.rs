//! Payment reports derived from order snapshots
//!
//! Amounts are `Decimal` in the order currency. A buyer sees the amount
//! charged (`total_amount`), a seller the package price they earn.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::snapshot::OrderSnapshot;
use super::types::{OrderStatus, PartyRole, PaymentStatus};

/// One paid order in a user's payment history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentRecord {
    pub order_id: String,
    pub order_code: String,
    pub gig_id: i64,
    pub gig_title: String,
    /// Side of the order the viewer is on
    pub role: PartyRole,
    pub amount: Decimal,
    pub service_fee: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub created_at: i64,
}

impl PaymentRecord {
    /// `None` when `viewer` is not a party of the order
    pub fn for_viewer(order: &OrderSnapshot, viewer: &str) -> Option<Self> {
        let (role, amount) = if order.buyer_id == viewer {
            (PartyRole::Buyer, order.total_amount)
        } else if order.seller_id == viewer {
            (PartyRole::Seller, order.price)
        } else {
            return None;
        };
        Some(Self {
            order_id: order.order_id.clone(),
            order_code: order.order_code.clone(),
            gig_id: order.gig_id,
            gig_title: order.gig_title.clone(),
            role,
            amount,
            service_fee: order.service_fee,
            status: order.status,
            payment_status: order.payment_status,
            created_at: order.created_at,
        })
    }
}

/// Seller income over orders whose payment is held or released
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SellerEarnings {
    /// `released_earnings + pending_earnings`
    pub total_earnings: Decimal,
    /// Completed orders, payment released to the seller
    pub released_earnings: Decimal,
    /// Paid orders still in progress
    pub pending_earnings: Decimal,
    pub total_orders: u64,
}

/// Buyer outlay over orders whose payment is held or released
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BuyerSpending {
    pub total_spent: Decimal,
    pub total_orders: u64,
    /// Two decimals, zero without orders
    pub average_order_value: Decimal,
    /// Charged amounts returned on cancelled paid orders
    pub refunded_amount: Decimal,
}

/// Fee breakdown for a prospective order amount
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeeQuote {
    pub order_amount: Decimal,
    /// Platform fee charged to the buyer
    pub service_fee: Decimal,
    /// Estimated card processing cost on the charged amount
    pub processing_fee: Decimal,
    pub total_fees: Decimal,
    /// What the buyer is charged: `order_amount + service_fee`
    pub total_amount: Decimal,
    pub currency: String,
}
