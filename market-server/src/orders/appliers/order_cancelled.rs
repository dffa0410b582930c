//! OrderCancelled event applier
//!
//! Records reason, actor and time. A paid order is marked refunded.

use crate::orders::traits::EventApplier;
use shared::order::{
    Cancellation, EventPayload, OrderEvent, OrderSnapshot, OrderStatus, PaymentStatus,
};

/// OrderCancelled applier
pub struct OrderCancelledApplier;

impl EventApplier for OrderCancelledApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::OrderCancelled { reason, .. } = &event.payload {
            snapshot.status = OrderStatus::Cancelled;
            snapshot.cancellation = Some(Cancellation {
                reason: reason.clone(),
                cancelled_by: event.actor.clone(),
                cancelled_at: event.timestamp,
            });
            if snapshot.payment_status == PaymentStatus::Paid {
                snapshot.payment_status = PaymentStatus::Refunded;
            }

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::appliers::test_support::{event, snapshot_in};
    use shared::order::{Actor, OrderEventType};

    fn cancelled(from_status: OrderStatus) -> OrderEvent {
        event(
            4,
            OrderEventType::OrderCancelled,
            EventPayload::OrderCancelled {
                reason: "Out of scope".to_string(),
                from_status,
            },
        )
    }

    #[test]
    fn test_records_cancellation() {
        let mut snapshot = snapshot_in(OrderStatus::Active);
        snapshot.payment_status = PaymentStatus::Paid;
        OrderCancelledApplier.apply(&mut snapshot, &cancelled(OrderStatus::Active));

        assert_eq!(snapshot.status, OrderStatus::Cancelled);
        assert_eq!(snapshot.payment_status, PaymentStatus::Refunded);
        let cancellation = snapshot.cancellation.unwrap();
        assert_eq!(cancellation.reason, "Out of scope");
        assert_eq!(cancellation.cancelled_by, Actor::user("b1"));
    }

    #[test]
    fn test_unpaid_order_keeps_payment_status() {
        let mut snapshot = snapshot_in(OrderStatus::Pending);
        OrderCancelledApplier.apply(&mut snapshot, &cancelled(OrderStatus::Pending));
        assert_eq!(snapshot.payment_status, PaymentStatus::Pending);
    }
}
