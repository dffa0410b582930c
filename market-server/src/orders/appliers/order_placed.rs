//! OrderPlaced event applier
//!
//! Initializes the snapshot with parties, copied package terms and pricing.

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, OrderStatus, PaymentStatus};

/// OrderPlaced applier
pub struct OrderPlacedApplier;

impl EventApplier for OrderPlacedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::OrderPlaced {
            order_code,
            buyer_id,
            seller_id,
            gig_id,
            gig_title,
            package_type,
            title,
            description,
            price,
            service_fee,
            total_amount,
            delivery_time,
            max_revisions,
            expected_delivery,
            requirements,
        } = &event.payload
        {
            snapshot.order_id = event.order_id.clone();
            snapshot.order_code = order_code.clone();
            snapshot.buyer_id = buyer_id.clone();
            snapshot.seller_id = seller_id.clone();
            snapshot.gig_id = *gig_id;
            snapshot.gig_title = gig_title.clone();
            snapshot.package_type = *package_type;
            snapshot.title = title.clone();
            snapshot.description = description.clone();
            snapshot.price = *price;
            snapshot.service_fee = *service_fee;
            snapshot.total_amount = *total_amount;
            snapshot.delivery_time = *delivery_time;
            snapshot.max_revisions = *max_revisions;
            snapshot.expected_delivery = *expected_delivery;
            snapshot.requirements = requirements.clone();
            snapshot.status = OrderStatus::Pending;
            snapshot.payment_status = PaymentStatus::Pending;
            snapshot.created_at = event.timestamp;

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
        }
    }
}
