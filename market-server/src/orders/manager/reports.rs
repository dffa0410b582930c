//! Payment reports over a user's orders
//!
//! Read-only aggregations over snapshots reached through the party index.
//! An order counts toward earnings and spending while its payment is held
//! (`paid`) or released; refunded orders only show up in history and in
//! `refunded_amount`.

use rust_decimal::prelude::*;
use shared::order::{
    BuyerSpending, OrderSnapshot, PartyRole, PaymentRecord, PaymentStatus, SellerEarnings,
};
use shared::response::PaginatedResponse;

use super::{ManagerResult, OrdersManager, was_paid};

impl OrdersManager {
    /// Paid orders on either side, newest first
    pub fn payment_history(
        &self,
        viewer: &str,
        page: u32,
        limit: u32,
    ) -> ManagerResult<PaginatedResponse<PaymentRecord>> {
        let mut orders: Vec<OrderSnapshot> = self
            .storage
            .get_orders_for_party(viewer, None)?
            .into_iter()
            .filter(was_paid)
            .collect();
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.order_id.cmp(&b.order_id))
        });
        let records = orders
            .iter()
            .filter_map(|o| PaymentRecord::for_viewer(o, viewer))
            .collect();
        Ok(PaginatedResponse::from_sorted(records, page, limit))
    }

    pub fn seller_earnings(&self, seller_id: &str) -> ManagerResult<SellerEarnings> {
        let orders = self
            .storage
            .get_orders_for_party(seller_id, Some(PartyRole::Seller))?;
        let mut earnings = SellerEarnings::default();
        for order in &orders {
            match order.payment_status {
                PaymentStatus::Released => earnings.released_earnings += order.price,
                PaymentStatus::Paid => earnings.pending_earnings += order.price,
                _ => continue,
            }
            earnings.total_orders += 1;
        }
        earnings.total_earnings = earnings.released_earnings + earnings.pending_earnings;
        Ok(earnings)
    }

    pub fn buyer_spending(&self, buyer_id: &str) -> ManagerResult<BuyerSpending> {
        let orders = self
            .storage
            .get_orders_for_party(buyer_id, Some(PartyRole::Buyer))?;
        let mut spending = BuyerSpending::default();
        for order in &orders {
            match order.payment_status {
                PaymentStatus::Paid | PaymentStatus::Released => {
                    spending.total_spent += order.total_amount;
                    spending.total_orders += 1;
                }
                PaymentStatus::Refunded => spending.refunded_amount += order.total_amount,
                _ => {}
            }
        }
        if spending.total_orders > 0 {
            spending.average_order_value = (spending.total_spent
                / Decimal::from(spending.total_orders))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        }
        Ok(spending)
    }
}
