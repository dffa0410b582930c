//! Event applier implementations
//!
//! Each applier implements the `EventApplier` trait and handles
//! one specific event type. Appliers are PURE functions.

use enum_dispatch::enum_dispatch;

use shared::order::{EventPayload, OrderEvent, OrderSnapshot};

mod delivery_accepted;
mod order_cancelled;
mod order_placed;
mod payment_confirmed;
mod payment_failed;
mod payment_reference_attached;
mod review_left;
mod revision_requested;
mod work_delivered;

pub use delivery_accepted::DeliveryAcceptedApplier;
pub use order_cancelled::OrderCancelledApplier;
pub use order_placed::OrderPlacedApplier;
pub use payment_confirmed::PaymentConfirmedApplier;
pub use payment_failed::PaymentFailedApplier;
pub use payment_reference_attached::PaymentReferenceAttachedApplier;
pub use review_left::ReviewLeftApplier;
pub use revision_requested::RevisionRequestedApplier;
pub use work_delivered::WorkDeliveredApplier;

/// Folds one event into a snapshot. Appliers never fail and never read
/// anything but the event.
///
/// Declared beside [`EventAction`] so the generated dispatch impl sees
/// every applier type.
#[enum_dispatch]
pub trait EventApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent);
}

/// EventAction enum - dispatches to concrete applier implementations
///
/// Uses enum_dispatch for zero-cost static dispatch.
#[enum_dispatch(EventApplier)]
pub enum EventAction {
    OrderPlaced(OrderPlacedApplier),
    PaymentReferenceAttached(PaymentReferenceAttachedApplier),
    PaymentConfirmed(PaymentConfirmedApplier),
    PaymentFailed(PaymentFailedApplier),
    WorkDelivered(WorkDeliveredApplier),
    DeliveryAccepted(DeliveryAcceptedApplier),
    RevisionRequested(RevisionRequestedApplier),
    OrderCancelled(OrderCancelledApplier),
    ReviewLeft(ReviewLeftApplier),
}

/// Convert OrderEvent reference to EventAction
///
/// This is the ONLY place with a match on EventPayload.
impl From<&OrderEvent> for EventAction {
    fn from(event: &OrderEvent) -> Self {
        match &event.payload {
            EventPayload::OrderPlaced { .. } => EventAction::OrderPlaced(OrderPlacedApplier),
            EventPayload::PaymentReferenceAttached { .. } => {
                EventAction::PaymentReferenceAttached(PaymentReferenceAttachedApplier)
            }
            EventPayload::PaymentConfirmed { .. } => {
                EventAction::PaymentConfirmed(PaymentConfirmedApplier)
            }
            EventPayload::PaymentFailed { .. } => EventAction::PaymentFailed(PaymentFailedApplier),
            EventPayload::WorkDelivered { .. } => EventAction::WorkDelivered(WorkDeliveredApplier),
            EventPayload::DeliveryAccepted { .. } => {
                EventAction::DeliveryAccepted(DeliveryAcceptedApplier)
            }
            EventPayload::RevisionRequested { .. } => {
                EventAction::RevisionRequested(RevisionRequestedApplier)
            }
            EventPayload::OrderCancelled { .. } => {
                EventAction::OrderCancelled(OrderCancelledApplier)
            }
            EventPayload::ReviewLeft { .. } => EventAction::ReviewLeft(ReviewLeftApplier),
        }
    }
}

/// Fold a stream of events into a fresh snapshot
pub fn replay(order_id: &str, events: &[OrderEvent]) -> OrderSnapshot {
    let mut snapshot = OrderSnapshot::new(order_id.to_string());
    for event in events {
        let applier: EventAction = event.into();
        applier.apply(&mut snapshot, event);
    }
    snapshot
}
