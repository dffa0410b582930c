//! PaymentConfirmed event applier
//!
//! `pending -> active`, payment marked paid. A payment intent id replaces
//! the checkout session id as the reference when the gateway supplies one.

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, OrderStatus, PaymentStatus};

/// PaymentConfirmed applier
pub struct PaymentConfirmedApplier;

impl EventApplier for PaymentConfirmedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::PaymentConfirmed { payment_reference } = &event.payload {
            snapshot.status = OrderStatus::Active;
            snapshot.payment_status = PaymentStatus::Paid;
            if let Some(reference) = payment_reference {
                snapshot.payment_reference = Some(reference.clone());
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
    fn test_activates_order() {
        let mut snapshot = snapshot_in(OrderStatus::Pending);
        snapshot.payment_reference = Some("cs_1".to_string());

        let event = event(
            3,
            OrderEventType::PaymentConfirmed,
            EventPayload::PaymentConfirmed {
                payment_reference: None,
            },
        );
        PaymentConfirmedApplier.apply(&mut snapshot, &event);

        assert_eq!(snapshot.status, OrderStatus::Active);
        assert_eq!(snapshot.payment_status, PaymentStatus::Paid);
        assert_eq!(snapshot.payment_reference.as_deref(), Some("cs_1"));
        assert_eq!(snapshot.updated_at, event.timestamp);
    }

    #[test]
    fn test_wrong_event_type_is_noop() {
        let mut snapshot = snapshot_in(OrderStatus::Pending);
        let event = event(
            3,
            OrderEventType::ReviewLeft,
            EventPayload::ReviewLeft {
                rating: 5,
                comment: String::new(),
            },
        );
        PaymentConfirmedApplier.apply(&mut snapshot, &event);
        assert_eq!(snapshot.status, OrderStatus::Pending);
        assert_eq!(snapshot.last_sequence, 0);
    }
}
