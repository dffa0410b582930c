//! ReviewLeft event applier
//!
//! Sets the review linkage on a completed order; the status is unchanged.

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, Review};

/// ReviewLeft applier
pub struct ReviewLeftApplier;

impl EventApplier for ReviewLeftApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::ReviewLeft { rating, comment } = &event.payload {
            snapshot.review_left = true;
            snapshot.review = Some(Review {
                rating: *rating,
                comment: comment.clone(),
                created_at: event.timestamp,
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
    use shared::order::{OrderEventType, OrderStatus};

    #[test]
    fn test_review_linkage() {
        let mut snapshot = snapshot_in(OrderStatus::Completed);
        let event = event(
            8,
            OrderEventType::ReviewLeft,
            EventPayload::ReviewLeft {
                rating: 4,
                comment: "Solid".to_string(),
            },
        );
        ReviewLeftApplier.apply(&mut snapshot, &event);

        assert!(snapshot.review_left);
        assert_eq!(snapshot.review.as_ref().map(|r| r.rating), Some(4));
        assert_eq!(snapshot.status, OrderStatus::Completed);
    }
}
