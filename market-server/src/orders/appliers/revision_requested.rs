//! RevisionRequested event applier

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, OrderStatus};

/// RevisionRequested applier
pub struct RevisionRequestedApplier;

impl EventApplier for RevisionRequestedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::RevisionRequested {
            revision,
            revisions_used,
        } = &event.payload
        {
            snapshot.revisions.push(revision.clone());
            snapshot.revisions_used = *revisions_used;
            snapshot.status = OrderStatus::RevisionRequested;

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::appliers::test_support::{event, snapshot_in};
    use shared::order::{OrderEventType, RevisionRequest};

    #[test]
    fn test_records_revision() {
        let mut snapshot = snapshot_in(OrderStatus::Delivered);
        snapshot.max_revisions = 2;
        let event = event(
            5,
            OrderEventType::RevisionRequested,
            EventPayload::RevisionRequested {
                revision: RevisionRequest {
                    requested_by: "b1".to_string(),
                    message: "Bigger font".to_string(),
                    requested_at: 10,
                },
                revisions_used: 1,
            },
        );
        RevisionRequestedApplier.apply(&mut snapshot, &event);

        assert_eq!(snapshot.status, OrderStatus::RevisionRequested);
        assert_eq!(snapshot.revisions_used, 1);
        assert_eq!(snapshot.revisions.len(), 1);
        assert!(snapshot.can_request_revision());
    }
}
