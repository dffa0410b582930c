//! DeliveryAccepted event applier
//!
//! `delivered -> completed`; the payment is released to the seller.

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, OrderStatus, PaymentStatus};

/// DeliveryAccepted applier
pub struct DeliveryAcceptedApplier;

impl EventApplier for DeliveryAcceptedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::DeliveryAccepted { completed_at } = &event.payload {
            snapshot.status = OrderStatus::Completed;
            snapshot.completed_at = Some(*completed_at);
            if snapshot.payment_status == PaymentStatus::Paid {
                snapshot.payment_status = PaymentStatus::Released;
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
    use shared::order::OrderEventType;

    #[test]
    fn test_completes_and_releases_payment() {
        let mut snapshot = snapshot_in(OrderStatus::Delivered);
        snapshot.payment_status = PaymentStatus::Paid;
        let event = event(
            6,
            OrderEventType::DeliveryAccepted,
            EventPayload::DeliveryAccepted { completed_at: 777 },
        );
        DeliveryAcceptedApplier.apply(&mut snapshot, &event);

        assert_eq!(snapshot.status, OrderStatus::Completed);
        assert_eq!(snapshot.completed_at, Some(777));
        assert_eq!(snapshot.payment_status, PaymentStatus::Released);
    }
}
