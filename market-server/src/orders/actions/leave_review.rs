//! LeaveReview command handler
//!
//! The buyer rates a completed order once. This is the only command that
//! touches a terminal order; the status does not change.

use async_trait::async_trait;
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use crate::utils::validation::{MAX_REVIEW_LEN, validate_order_optional_text};

/// LeaveReview action
#[derive(Debug, Clone)]
pub struct LeaveReviewAction {
    pub order_id: String,
    pub rating: u8,
    pub comment: String,
}

#[async_trait]
impl CommandHandler for LeaveReviewAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let user_id = metadata.require_user()?;
        if !(1..=5).contains(&self.rating) {
            return Err(OrderError::InvalidRating(self.rating));
        }
        validate_order_optional_text(&self.comment, "comment", MAX_REVIEW_LEN)?;

        let snapshot = ctx.load_snapshot(&self.order_id)?;
        if snapshot.buyer_id != user_id {
            return Err(OrderError::NotAuthorized(
                "only the buyer can review this order".to_string(),
            ));
        }
        if snapshot.status != OrderStatus::Completed {
            return Err(OrderError::InvalidTransition {
                from: snapshot.status,
                action: "review",
            });
        }
        if snapshot.review_left {
            return Err(OrderError::ReviewAlreadyLeft(self.order_id.clone()));
        }

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.actor.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            ctx.now(),
            OrderEventType::ReviewLeft,
            EventPayload::ReviewLeft {
                rating: self.rating,
                comment: self.comment.trim().to_string(),
            },
        );

        Ok(vec![event])
    }
}
