//! ConfirmPayment command handler
//!
//! `pending -> active` on a successful gateway payment. Replays and
//! out-of-order deliveries find the order no longer pending and produce no
//! events, so the counters move exactly once.

use async_trait::async_trait;
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};

/// ConfirmPayment action
#[derive(Debug, Clone)]
pub struct ConfirmPaymentAction {
    pub order_id: String,
    pub payment_reference: Option<String>,
}

#[async_trait]
impl CommandHandler for ConfirmPaymentAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        // 1. Only the gateway confirms payments
        metadata.require_gateway()?;

        // 2. Load snapshot
        let snapshot = ctx.load_snapshot(&self.order_id)?;

        // 3. Silent no-op unless still awaiting payment
        if snapshot.status != OrderStatus::Pending {
            tracing::debug!(
                order_id = %self.order_id,
                status = %snapshot.status,
                "Payment confirmation ignored, order not pending"
            );
            return Ok(vec![]);
        }

        // 4. Allocate sequence number
        let seq = ctx.next_sequence();

        // 5. Create event
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.actor.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            ctx.now(),
            OrderEventType::PaymentConfirmed,
            EventPayload::PaymentConfirmed {
                payment_reference: self.payment_reference.clone(),
            },
        );

        Ok(vec![event])
    }
}
