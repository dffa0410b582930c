//! PaymentReferenceAttached event applier

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot};

/// PaymentReferenceAttached applier
pub struct PaymentReferenceAttachedApplier;

impl EventApplier for PaymentReferenceAttachedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::PaymentReferenceAttached { reference } = &event.payload {
            snapshot.payment_reference = Some(reference.clone());

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
        }
    }
}
