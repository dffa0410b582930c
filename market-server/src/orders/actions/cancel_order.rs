//! CancelOrder command handler
//!
//! Either party cancels a non-terminal order. The status the order left is
//! recorded on the event so the seller's ongoing counter can be corrected.

use async_trait::async_trait;
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use crate::utils::validation::{MAX_MESSAGE_LEN, validate_order_text};

/// CancelOrder action
#[derive(Debug, Clone)]
pub struct CancelOrderAction {
    pub order_id: String,
    pub reason: String,
}

#[async_trait]
impl CommandHandler for CancelOrderAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let user_id = metadata.require_user()?;
        validate_order_text(&self.reason, "reason", MAX_MESSAGE_LEN)?;

        let snapshot = ctx.load_snapshot(&self.order_id)?;
        if !snapshot.is_party(user_id) {
            return Err(OrderError::NotAuthorized(
                "only the buyer or the seller can cancel this order".to_string(),
            ));
        }

        match snapshot.status {
            OrderStatus::Pending
            | OrderStatus::Active
            | OrderStatus::Delivered
            | OrderStatus::RevisionRequested => {}
            from @ (OrderStatus::Completed | OrderStatus::Cancelled | OrderStatus::Disputed) => {
                return Err(OrderError::InvalidTransition {
                    from,
                    action: "cancel",
                });
            }
        }

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.actor.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            ctx.now(),
            OrderEventType::OrderCancelled,
            EventPayload::OrderCancelled {
                reason: self.reason.trim().to_string(),
                from_status: snapshot.status,
            },
        );

        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::actions::test_support::{Stores, gateway_meta, order_in, user_meta};

    fn cancel() -> CancelOrderAction {
        CancelOrderAction {
            order_id: "order-1".to_string(),
            reason: "No longer needed".to_string(),
        }
    }

    #[tokio::test]
    async fn test_either_party_cancels_pre_terminal_orders() {
        let stores = Stores::new();
        for status in [
            OrderStatus::Pending,
            OrderStatus::Active,
            OrderStatus::Delivered,
            OrderStatus::RevisionRequested,
        ] {
            for actor in ["b1", "s1"] {
                stores.seed_order(&order_in("order-1", status));
                let txn = stores.orders.begin_write().unwrap();
                let mut ctx = stores.context(&txn);
                let events = cancel().execute(&mut ctx, &user_meta(actor)).await.unwrap();
                assert!(matches!(
                    &events[0].payload,
                    EventPayload::OrderCancelled { from_status, .. } if *from_status == status
                ));
            }
        }
    }

    #[tokio::test]
    async fn test_terminal_orders_cannot_be_cancelled() {
        let stores = Stores::new();
        for status in [OrderStatus::Completed, OrderStatus::Cancelled] {
            stores.seed_order(&order_in("order-1", status));
            let txn = stores.orders.begin_write().unwrap();
            let mut ctx = stores.context(&txn);
            let result = cancel().execute(&mut ctx, &user_meta("b1")).await;
            assert!(matches!(result, Err(OrderError::InvalidTransition { .. })));
        }
    }

    #[tokio::test]
    async fn test_outsiders_cannot_cancel() {
        let stores = Stores::new();
        stores.seed_order(&order_in("order-1", OrderStatus::Active));

        let txn = stores.orders.begin_write().unwrap();
        let mut ctx = stores.context(&txn);
        assert!(matches!(
            cancel().execute(&mut ctx, &user_meta("mallory")).await,
            Err(OrderError::NotAuthorized(_))
        ));
        assert!(matches!(
            cancel().execute(&mut ctx, &gateway_meta()).await,
            Err(OrderError::NotAuthorized(_))
        ));
    }
}
