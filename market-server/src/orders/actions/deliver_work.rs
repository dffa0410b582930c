//! DeliverWork command handler
//!
//! Seller submits work: `active -> delivered` or, after a revision request,
//! `revision_requested -> delivered`.

use async_trait::async_trait;
use shared::order::{Deliverable, EventPayload, OrderEvent, OrderEventType, OrderStatus};

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use crate::utils::validation::{MAX_MESSAGE_LEN, validate_order_files, validate_order_text};

/// DeliverWork action
#[derive(Debug, Clone)]
pub struct DeliverWorkAction {
    pub order_id: String,
    pub message: String,
    pub files: Vec<String>,
}

#[async_trait]
impl CommandHandler for DeliverWorkAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        // 1. Validate input
        let user_id = metadata.require_user()?;
        validate_order_text(&self.message, "message", MAX_MESSAGE_LEN)?;
        validate_order_files(&self.files)?;

        // 2. Load existing snapshot
        let snapshot = ctx.load_snapshot(&self.order_id)?;

        // 3. Only the seller delivers
        if snapshot.seller_id != user_id {
            return Err(OrderError::NotAuthorized(
                "only the seller can deliver this order".to_string(),
            ));
        }

        // 4. Validate order status
        match snapshot.status {
            OrderStatus::Active | OrderStatus::RevisionRequested => {}
            from => {
                return Err(OrderError::InvalidTransition {
                    from,
                    action: "deliver",
                });
            }
        }

        // 5. Allocate sequence number
        let seq = ctx.next_sequence();

        // 6. Create event
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.actor.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            ctx.now(),
            OrderEventType::WorkDelivered,
            EventPayload::WorkDelivered {
                deliverable: Deliverable {
                    message: self.message.clone(),
                    files: self.files.clone(),
                    delivered_at: ctx.now(),
                },
                from_status: snapshot.status,
            },
        );

        Ok(vec![event])
    }
}
