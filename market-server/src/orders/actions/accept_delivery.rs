//! AcceptDelivery command handler
//!
//! Buyer accepts the delivered work: `delivered -> completed`.

use async_trait::async_trait;
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};

/// AcceptDelivery action
#[derive(Debug, Clone)]
pub struct AcceptDeliveryAction {
    pub order_id: String,
}

#[async_trait]
impl CommandHandler for AcceptDeliveryAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let user_id = metadata.require_user()?;
        let snapshot = ctx.load_snapshot(&self.order_id)?;

        if snapshot.buyer_id != user_id {
            return Err(OrderError::NotAuthorized(
                "only the buyer can accept a delivery".to_string(),
            ));
        }

        if snapshot.status != OrderStatus::Delivered {
            return Err(OrderError::InvalidTransition {
                from: snapshot.status,
                action: "accept",
            });
        }

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.actor.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            ctx.now(),
            OrderEventType::DeliveryAccepted,
            EventPayload::DeliveryAccepted {
                completed_at: ctx.now(),
            },
        );

        Ok(vec![event])
    }
}
