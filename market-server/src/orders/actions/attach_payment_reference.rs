//! AttachPaymentReference command handler
//!
//! Records the checkout session id on a pending order so later webhooks
//! can be matched by reference. Gateway only; a no-op once the order left
//! `pending`.

use async_trait::async_trait;
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use crate::utils::validation::{MAX_URL_LEN, validate_order_text};

/// AttachPaymentReference action
#[derive(Debug, Clone)]
pub struct AttachPaymentReferenceAction {
    pub order_id: String,
    pub reference: String,
}

#[async_trait]
impl CommandHandler for AttachPaymentReferenceAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        metadata.require_gateway()?;
        validate_order_text(&self.reference, "payment reference", MAX_URL_LEN)?;

        let snapshot = ctx.load_snapshot(&self.order_id)?;
        if snapshot.status != OrderStatus::Pending {
            return Ok(vec![]);
        }

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.actor.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            ctx.now(),
            OrderEventType::PaymentReferenceAttached,
            EventPayload::PaymentReferenceAttached {
                reference: self.reference.clone(),
            },
        );

        Ok(vec![event])
    }
}
