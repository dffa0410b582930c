//! Command action implementations
//!
//! Each action implements the `CommandHandler` trait and handles
//! one specific command type. Guards are evaluated against the order as
//! read inside the write transaction.

use async_trait::async_trait;

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{OrderCommand, OrderCommandPayload, OrderEvent};

mod accept_delivery;
mod attach_payment_reference;
mod cancel_order;
mod confirm_payment;
mod deliver_work;
mod fail_payment;
mod leave_review;
mod place_order;
mod request_revision;

pub use accept_delivery::AcceptDeliveryAction;
pub use attach_payment_reference::AttachPaymentReferenceAction;
pub use cancel_order::CancelOrderAction;
pub use confirm_payment::ConfirmPaymentAction;
pub use deliver_work::DeliverWorkAction;
pub use fail_payment::FailPaymentAction;
pub use leave_review::LeaveReviewAction;
pub use place_order::PlaceOrderAction;
pub use request_revision::RequestRevisionAction;

/// CommandAction enum - dispatches to concrete action implementations
pub enum CommandAction {
    PlaceOrder(PlaceOrderAction),
    AttachPaymentReference(AttachPaymentReferenceAction),
    ConfirmPayment(ConfirmPaymentAction),
    FailPayment(FailPaymentAction),
    DeliverWork(DeliverWorkAction),
    AcceptDelivery(AcceptDeliveryAction),
    RequestRevision(RequestRevisionAction),
    CancelOrder(CancelOrderAction),
    LeaveReview(LeaveReviewAction),
}

/// Manual implementation of CommandHandler for CommandAction
#[async_trait]
impl CommandHandler for CommandAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        match self {
            CommandAction::PlaceOrder(action) => action.execute(ctx, metadata).await,
            CommandAction::AttachPaymentReference(action) => action.execute(ctx, metadata).await,
            CommandAction::ConfirmPayment(action) => action.execute(ctx, metadata).await,
            CommandAction::FailPayment(action) => action.execute(ctx, metadata).await,
            CommandAction::DeliverWork(action) => action.execute(ctx, metadata).await,
            CommandAction::AcceptDelivery(action) => action.execute(ctx, metadata).await,
            CommandAction::RequestRevision(action) => action.execute(ctx, metadata).await,
            CommandAction::CancelOrder(action) => action.execute(ctx, metadata).await,
            CommandAction::LeaveReview(action) => action.execute(ctx, metadata).await,
        }
    }
}

/// Convert OrderCommand to CommandAction
///
/// This is the ONLY place with a match on OrderCommandPayload.
impl From<&OrderCommand> for CommandAction {
    fn from(cmd: &OrderCommand) -> Self {
        match &cmd.payload {
            OrderCommandPayload::PlaceOrder {
                gig_id,
                package_type,
                requirements,
            } => CommandAction::PlaceOrder(PlaceOrderAction {
                gig_id: *gig_id,
                package_type: *package_type,
                requirements: requirements.clone(),
            }),
            OrderCommandPayload::AttachPaymentReference {
                order_id,
                reference,
            } => CommandAction::AttachPaymentReference(AttachPaymentReferenceAction {
                order_id: order_id.clone(),
                reference: reference.clone(),
            }),
            OrderCommandPayload::ConfirmPayment {
                order_id,
                payment_reference,
            } => CommandAction::ConfirmPayment(ConfirmPaymentAction {
                order_id: order_id.clone(),
                payment_reference: payment_reference.clone(),
            }),
            OrderCommandPayload::FailPayment { order_id, reason } => {
                CommandAction::FailPayment(FailPaymentAction {
                    order_id: order_id.clone(),
                    reason: *reason,
                })
            }
            OrderCommandPayload::DeliverWork {
                order_id,
                message,
                files,
            } => CommandAction::DeliverWork(DeliverWorkAction {
                order_id: order_id.clone(),
                message: message.clone(),
                files: files.clone(),
            }),
            OrderCommandPayload::AcceptDelivery { order_id } => {
                CommandAction::AcceptDelivery(AcceptDeliveryAction {
                    order_id: order_id.clone(),
                })
            }
            OrderCommandPayload::RequestRevision { order_id, message } => {
                CommandAction::RequestRevision(RequestRevisionAction {
                    order_id: order_id.clone(),
                    message: message.clone(),
                })
            }
            OrderCommandPayload::CancelOrder { order_id, reason } => {
                CommandAction::CancelOrder(CancelOrderAction {
                    order_id: order_id.clone(),
                    reason: reason.clone(),
                })
            }
            OrderCommandPayload::LeaveReview {
                order_id,
                rating,
                comment,
            } => CommandAction::LeaveReview(LeaveReviewAction {
                order_id: order_id.clone(),
                rating: *rating,
                comment: comment.clone(),
            }),
        }
    }
}
