//! RequestRevision command handler
//!
//! Buyer rejects a delivery: `delivered -> revision_requested`, allowed
//! while `revisions_used < max_revisions`.

use async_trait::async_trait;
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus, RevisionRequest};

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use crate::utils::validation::{MAX_MESSAGE_LEN, validate_order_text};

/// RequestRevision action
#[derive(Debug, Clone)]
pub struct RequestRevisionAction {
    pub order_id: String,
    pub message: String,
}

#[async_trait]
impl CommandHandler for RequestRevisionAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        // 1. Validate input
        let user_id = metadata.require_user()?.to_string();
        validate_order_text(&self.message, "message", MAX_MESSAGE_LEN)?;

        // 2. Load existing snapshot
        let snapshot = ctx.load_snapshot(&self.order_id)?;

        // 3. Only the buyer asks for changes
        if snapshot.buyer_id != user_id {
            return Err(OrderError::NotAuthorized(
                "only the buyer can request a revision".to_string(),
            ));
        }

        // 4. Validate order status
        if snapshot.status != OrderStatus::Delivered {
            return Err(OrderError::InvalidTransition {
                from: snapshot.status,
                action: "request a revision on",
            });
        }

        // 5. Revision allowance
        if !snapshot.can_request_revision() {
            return Err(OrderError::RevisionLimitReached {
                max: snapshot.max_revisions,
            });
        }

        // 6. Allocate sequence number
        let seq = ctx.next_sequence();

        // 7. Create event
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.actor.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            ctx.now(),
            OrderEventType::RevisionRequested,
            EventPayload::RevisionRequested {
                revision: RevisionRequest {
                    requested_by: user_id,
                    message: self.message.clone(),
                    requested_at: ctx.now(),
                },
                revisions_used: snapshot.revisions_used + 1,
            },
        );

        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::actions::test_support::{Stores, order_in, user_meta};

    fn revise() -> RequestRevisionAction {
        RequestRevisionAction {
            order_id: "order-1".to_string(),
            message: "Please use a darker blue".to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_revision_allowed() {
        let stores = Stores::new();
        stores.seed_order(&order_in("order-1", OrderStatus::Delivered));

        let txn = stores.orders.begin_write().unwrap();
        let mut ctx = stores.context(&txn);
        let events = revise().execute(&mut ctx, &user_meta("b1")).await.unwrap();
        if let EventPayload::RevisionRequested {
            revision,
            revisions_used,
        } = &events[0].payload
        {
            assert_eq!(*revisions_used, 1);
            assert_eq!(revision.requested_by, "b1");
        } else {
            panic!("Expected RevisionRequested payload");
        }
    }

    #[tokio::test]
    async fn test_revision_at_cap_rejected() {
        let stores = Stores::new();
        let mut order = order_in("order-1", OrderStatus::Delivered);
        order.revisions_used = 1;
        stores.seed_order(&order);

        let txn = stores.orders.begin_write().unwrap();
        let mut ctx = stores.context(&txn);
        let result = revise().execute(&mut ctx, &user_meta("b1")).await;
        assert!(matches!(
            result,
            Err(OrderError::RevisionLimitReached { max: 1 })
        ));
    }

    #[tokio::test]
    async fn test_zero_revision_package() {
        let stores = Stores::new();
        let mut order = order_in("order-1", OrderStatus::Delivered);
        order.max_revisions = 0;
        stores.seed_order(&order);

        let txn = stores.orders.begin_write().unwrap();
        let mut ctx = stores.context(&txn);
        assert!(revise().execute(&mut ctx, &user_meta("b1")).await.is_err());
    }

    #[tokio::test]
    async fn test_revision_requires_delivered_state() {
        let stores = Stores::new();
        stores.seed_order(&order_in("order-1", OrderStatus::Active));

        let txn = stores.orders.begin_write().unwrap();
        let mut ctx = stores.context(&txn);
        let result = revise().execute(&mut ctx, &user_meta("b1")).await;
        assert!(matches!(result, Err(OrderError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn test_seller_cannot_request_revision() {
        let stores = Stores::new();
        stores.seed_order(&order_in("order-1", OrderStatus::Delivered));

        let txn = stores.orders.begin_write().unwrap();
        let mut ctx = stores.context(&txn);
        let result = revise().execute(&mut ctx, &user_meta("s1")).await;
        assert!(matches!(result, Err(OrderError::NotAuthorized(_))));
    }
}
