//! FailPayment command handler
//!
//! `pending -> cancelled` when the gateway reports a failed payment or an
//! expired checkout session. No-op once the order left `pending`.

use async_trait::async_trait;
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus, PaymentFailureReason};

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};

/// FailPayment action
#[derive(Debug, Clone)]
pub struct FailPaymentAction {
    pub order_id: String,
    pub reason: PaymentFailureReason,
}

#[async_trait]
impl CommandHandler for FailPaymentAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        metadata.require_gateway()?;

        let snapshot = ctx.load_snapshot(&self.order_id)?;
        if snapshot.status != OrderStatus::Pending {
            tracing::debug!(
                order_id = %self.order_id,
                status = %snapshot.status,
                "Payment failure ignored, order not pending"
            );
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
            OrderEventType::PaymentFailed,
            EventPayload::PaymentFailed {
                reason: self.reason,
            },
        );

        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::actions::test_support::{Stores, gateway_meta, order_in, user_meta};

    fn fail(reason: PaymentFailureReason) -> FailPaymentAction {
        FailPaymentAction {
            order_id: "order-1".to_string(),
            reason,
        }
    }

    #[tokio::test]
    async fn test_expired_session_cancels_pending_order() {
        let stores = Stores::new();
        stores.seed_order(&order_in("order-1", OrderStatus::Pending));

        let txn = stores.orders.begin_write().unwrap();
        let mut ctx = stores.context(&txn);
        let events = fail(PaymentFailureReason::Expired)
            .execute(&mut ctx, &gateway_meta())
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].payload,
            EventPayload::PaymentFailed {
                reason: PaymentFailureReason::Expired
            }
        );
    }

    #[tokio::test]
    async fn test_failure_after_confirmation_is_noop() {
        let stores = Stores::new();
        stores.seed_order(&order_in("order-1", OrderStatus::Active));

        let txn = stores.orders.begin_write().unwrap();
        let mut ctx = stores.context(&txn);
        let events = fail(PaymentFailureReason::Failed)
            .execute(&mut ctx, &gateway_meta())
            .await
            .unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_seller_cannot_fail_payment() {
        let stores = Stores::new();
        stores.seed_order(&order_in("order-1", OrderStatus::Pending));

        let txn = stores.orders.begin_write().unwrap();
        let mut ctx = stores.context(&txn);
        let result = fail(PaymentFailureReason::Failed).execute(&mut ctx, &user_meta("s1")).await;
        assert!(matches!(result, Err(OrderError::NotAuthorized(_))));
    }
}
