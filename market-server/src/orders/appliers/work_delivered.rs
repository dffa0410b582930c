//! WorkDelivered event applier
//!
//! Appends the deliverable and moves the order to `delivered`.
//! `actual_delivery` tracks the latest delivery.

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, OrderStatus};

/// WorkDelivered applier
pub struct WorkDeliveredApplier;

impl EventApplier for WorkDeliveredApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::WorkDelivered { deliverable, .. } = &event.payload {
            snapshot.deliverables.push(deliverable.clone());
            snapshot.actual_delivery = Some(deliverable.delivered_at);
            snapshot.status = OrderStatus::Delivered;

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::appliers::test_support::{event, snapshot_in};
    use shared::order::{Deliverable, OrderEventType};

    fn delivered(seq: u64, at: i64, from_status: OrderStatus) -> OrderEvent {
        event(
            seq,
            OrderEventType::WorkDelivered,
            EventPayload::WorkDelivered {
                deliverable: Deliverable {
                    message: format!("delivery {seq}"),
                    files: vec![],
                    delivered_at: at,
                },
                from_status,
            },
        )
    }

    #[test]
    fn test_deliverables_are_appended() {
        let mut snapshot = snapshot_in(OrderStatus::Active);
        WorkDeliveredApplier.apply(&mut snapshot, &delivered(2, 100, OrderStatus::Active));
        snapshot.status = OrderStatus::RevisionRequested;
        WorkDeliveredApplier.apply(
            &mut snapshot,
            &delivered(4, 200, OrderStatus::RevisionRequested),
        );

        assert_eq!(snapshot.status, OrderStatus::Delivered);
        assert_eq!(snapshot.deliverables.len(), 2);
        assert_eq!(snapshot.deliverables[0].message, "delivery 2");
        assert_eq!(snapshot.actual_delivery, Some(200));
        assert_eq!(snapshot.last_sequence, 4);
    }
}
