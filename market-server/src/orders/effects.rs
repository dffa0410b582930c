//! Side effects of committed order events
//!
//! Every transition maps to a fixed list of effects. Counter effects are
//! written inside the command's transaction; notifications and broadcasts
//! run after commit.
//!
//! | Event | Counters | Notification |
//! |-------|----------|--------------|
//! | `ORDER_PLACED` | - | seller: order placed |
//! | `PAYMENT_CONFIRMED` | gig orders +1, seller ongoing +1 | seller: payment received |
//! | `PAYMENT_FAILED` | - | - |
//! | `WORK_DELIVERED` | - | buyer: delivered |
//! | `REVISION_REQUESTED` | - | seller: revision requested |
//! | `DELIVERY_ACCEPTED` | seller ongoing -1, completed +1 | seller: completed |
//! | `ORDER_CANCELLED` | seller ongoing -1 (if it was ongoing) | counterparty: cancelled |
//! | `REVIEW_LEFT` | gig and seller rating | seller: review received |

use shared::notification::Notification;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum TransitionEffect {
    IncrementGigOrders { gig_id: i64 },
    AdjustSellerOngoing { seller_id: String, delta: i64 },
    IncrementSellerCompleted { seller_id: String },
    RecordGigReview { gig_id: i64, rating: u8 },
    RecordSellerReview { seller_id: String, rating: u8 },
    Notify(Notification),
    Broadcast(OrderEvent),
}

impl TransitionEffect {
    /// Counter effects join the command transaction
    pub fn is_transactional(&self) -> bool {
        !matches!(
            self,
            TransitionEffect::Notify(_) | TransitionEffect::Broadcast(_)
        )
    }
}

/// Effects of `event`, given the snapshot right after it was applied
pub fn transition_effects(after: &OrderSnapshot, event: &OrderEvent) -> Vec<TransitionEffect> {
    let order_id = after.order_id.clone();
    let seller_id = after.seller_id.clone();
    let mut effects = Vec::new();

    match &event.payload {
        EventPayload::OrderPlaced { gig_title, .. } => {
            effects.push(TransitionEffect::Notify(Notification::OrderPlaced {
                seller_id,
                order_id,
                gig_title: gig_title.clone(),
            }));
        }
        EventPayload::PaymentConfirmed { .. } => {
            effects.push(TransitionEffect::IncrementGigOrders {
                gig_id: after.gig_id,
            });
            effects.push(TransitionEffect::AdjustSellerOngoing {
                seller_id: seller_id.clone(),
                delta: 1,
            });
            effects.push(TransitionEffect::Notify(Notification::PaymentReceived {
                seller_id,
                order_id,
            }));
        }
        EventPayload::WorkDelivered { .. } => {
            effects.push(TransitionEffect::Notify(Notification::OrderDelivered {
                buyer_id: after.buyer_id.clone(),
                order_id,
            }));
        }
        EventPayload::RevisionRequested { .. } => {
            effects.push(TransitionEffect::Notify(Notification::RevisionRequested {
                seller_id,
                order_id,
            }));
        }
        EventPayload::DeliveryAccepted { .. } => {
            effects.push(TransitionEffect::AdjustSellerOngoing {
                seller_id: seller_id.clone(),
                delta: -1,
            });
            effects.push(TransitionEffect::IncrementSellerCompleted {
                seller_id: seller_id.clone(),
            });
            effects.push(TransitionEffect::Notify(Notification::OrderCompleted {
                seller_id,
                order_id,
            }));
        }
        EventPayload::OrderCancelled {
            reason,
            from_status,
        } => {
            if from_status.is_ongoing() {
                effects.push(TransitionEffect::AdjustSellerOngoing {
                    seller_id,
                    delta: -1,
                });
            }
            let recipient = event
                .actor
                .user_id()
                .and_then(|actor| after.counterparty_of(actor));
            if let Some(recipient) = recipient {
                effects.push(TransitionEffect::Notify(Notification::OrderCancelled {
                    recipient_id: recipient.to_string(),
                    order_id,
                    reason: reason.clone(),
                }));
            }
        }
        EventPayload::ReviewLeft { rating, .. } => {
            effects.push(TransitionEffect::RecordGigReview {
                gig_id: after.gig_id,
                rating: *rating,
            });
            effects.push(TransitionEffect::RecordSellerReview {
                seller_id: seller_id.clone(),
                rating: *rating,
            });
            effects.push(TransitionEffect::Notify(Notification::ReviewReceived {
                seller_id,
                order_id,
                rating: *rating,
            }));
        }
        EventPayload::PaymentReferenceAttached { .. } | EventPayload::PaymentFailed { .. } => {}
    }

    effects.push(TransitionEffect::Broadcast(event.clone()));
    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::appliers::test_support::{event, snapshot_in};
    use shared::order::{
        Actor, OrderEventType, OrderStatus, PaymentFailureReason,
    };

    fn cancelled_by(actor: Actor, from_status: OrderStatus) -> OrderEvent {
        let mut event = event(
            4,
            OrderEventType::OrderCancelled,
            EventPayload::OrderCancelled {
                reason: "No longer needed".to_string(),
                from_status,
            },
        );
        event.actor = actor;
        event
    }

    #[test]
    fn test_payment_confirmed_bumps_counters() {
        let mut after = snapshot_in(OrderStatus::Active);
        after.gig_id = 9;
        let event = event(
            2,
            OrderEventType::PaymentConfirmed,
            EventPayload::PaymentConfirmed {
                payment_reference: None,
            },
        );
        let effects = transition_effects(&after, &event);

        assert_eq!(
            effects[..2],
            [
                TransitionEffect::IncrementGigOrders { gig_id: 9 },
                TransitionEffect::AdjustSellerOngoing {
                    seller_id: "s1".to_string(),
                    delta: 1
                },
            ]
        );
        assert!(matches!(
            &effects[2],
            TransitionEffect::Notify(Notification::PaymentReceived { seller_id, .. }) if seller_id == "s1"
        ));
        assert!(matches!(effects.last(), Some(TransitionEffect::Broadcast(_))));
    }

    #[test]
    fn test_cancel_from_pending_leaves_counters() {
        let after = snapshot_in(OrderStatus::Cancelled);
        let effects = transition_effects(&after, &cancelled_by(Actor::user("b1"), OrderStatus::Pending));
        assert!(effects.iter().all(|e| !e.is_transactional()));
    }

    #[test]
    fn test_cancel_from_ongoing_notifies_counterparty() {
        let after = snapshot_in(OrderStatus::Cancelled);
        let effects = transition_effects(
            &after,
            &cancelled_by(Actor::user("s1"), OrderStatus::Delivered),
        );

        assert_eq!(
            effects[0],
            TransitionEffect::AdjustSellerOngoing {
                seller_id: "s1".to_string(),
                delta: -1
            }
        );
        let recipient = effects.iter().find_map(|e| match e {
            TransitionEffect::Notify(n) => Some(n.recipient().to_string()),
            _ => None,
        });
        assert_eq!(recipient.as_deref(), Some("b1"));
    }

    #[test]
    fn test_payment_failure_only_broadcasts() {
        let after = snapshot_in(OrderStatus::Cancelled);
        let event = event(
            2,
            OrderEventType::PaymentFailed,
            EventPayload::PaymentFailed {
                reason: PaymentFailureReason::Failed,
            },
        );
        let effects = transition_effects(&after, &event);
        assert_eq!(effects, vec![TransitionEffect::Broadcast(event)]);
    }

    #[test]
    fn test_review_updates_both_aggregates() {
        let mut after = snapshot_in(OrderStatus::Completed);
        after.gig_id = 3;
        let event = event(
            9,
            OrderEventType::ReviewLeft,
            EventPayload::ReviewLeft {
                rating: 5,
                comment: String::new(),
            },
        );
        let effects = transition_effects(&after, &event);
        assert!(effects.contains(&TransitionEffect::RecordGigReview { gig_id: 3, rating: 5 }));
        assert!(effects.contains(&TransitionEffect::RecordSellerReview {
            seller_id: "s1".to_string(),
            rating: 5
        }));
    }
}
