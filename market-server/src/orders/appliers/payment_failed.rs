//! PaymentFailed event applier
//!
//! `pending -> cancelled` with the payment marked failed. The gateway is
//! recorded as the cancelling actor.

use crate::orders::traits::EventApplier;
use shared::order::{
    Cancellation, EventPayload, OrderEvent, OrderSnapshot, OrderStatus, PaymentFailureReason,
    PaymentStatus,
};

/// PaymentFailed applier
pub struct PaymentFailedApplier;

impl EventApplier for PaymentFailedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::PaymentFailed { reason } = &event.payload {
            let reason = match reason {
                PaymentFailureReason::Failed => "Payment failed",
                PaymentFailureReason::Expired => "Checkout session expired",
            };
            snapshot.status = OrderStatus::Cancelled;
            snapshot.payment_status = PaymentStatus::Failed;
            snapshot.cancellation = Some(Cancellation {
                reason: reason.to_string(),
                cancelled_by: event.actor.clone(),
                cancelled_at: event.timestamp,
            });

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
    fn test_failed_payment_cancels() {
        let mut snapshot = snapshot_in(OrderStatus::Pending);
        let event = event(
            2,
            OrderEventType::PaymentFailed,
            EventPayload::PaymentFailed {
                reason: PaymentFailureReason::Expired,
            },
        );
        PaymentFailedApplier.apply(&mut snapshot, &event);

        assert_eq!(snapshot.status, OrderStatus::Cancelled);
        assert_eq!(snapshot.payment_status, PaymentStatus::Failed);
        let cancellation = snapshot.cancellation.unwrap();
        assert_eq!(cancellation.reason, "Checkout session expired");
        assert_eq!(cancellation.cancelled_at, event.timestamp);
    }
}
