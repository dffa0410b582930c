//! Notification kinds emitted by the order pipeline
//!
//! Each variant carries only what its kind needs; [`Notification::render`]
//! flattens it into the wire-level [`NotificationRequest`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RelatedModel {
    Order,
    Gig,
    Review,
    Message,
}

/// Flat notification record handed to the emitter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationRequest {
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub related_id: String,
    pub related_model: RelatedModel,
    pub action_url: String,
    pub priority: Priority,
}

/// One constructor per notification kind
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    OrderPlaced {
        seller_id: String,
        order_id: String,
        gig_title: String,
    },
    PaymentReceived {
        seller_id: String,
        order_id: String,
    },
    OrderDelivered {
        buyer_id: String,
        order_id: String,
    },
    RevisionRequested {
        seller_id: String,
        order_id: String,
    },
    OrderCompleted {
        seller_id: String,
        order_id: String,
    },
    OrderCancelled {
        recipient_id: String,
        order_id: String,
        reason: String,
    },
    ReviewReceived {
        seller_id: String,
        order_id: String,
        rating: u8,
    },
}

impl Notification {
    /// Recipient user id
    pub fn recipient(&self) -> &str {
        match self {
            Notification::OrderPlaced { seller_id, .. }
            | Notification::PaymentReceived { seller_id, .. }
            | Notification::RevisionRequested { seller_id, .. }
            | Notification::OrderCompleted { seller_id, .. }
            | Notification::ReviewReceived { seller_id, .. } => seller_id,
            Notification::OrderDelivered { buyer_id, .. } => buyer_id,
            Notification::OrderCancelled { recipient_id, .. } => recipient_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Notification::OrderPlaced { .. } => "order_placed",
            Notification::PaymentReceived { .. } => "payment_received",
            Notification::OrderDelivered { .. } => "order_delivered",
            Notification::RevisionRequested { .. } => "revision_requested",
            Notification::OrderCompleted { .. } => "order_completed",
            Notification::OrderCancelled { .. } => "order_cancelled",
            Notification::ReviewReceived { .. } => "review_received",
        }
    }

    pub fn render(&self) -> NotificationRequest {
        let (order_id, title, message, priority) = match self {
            Notification::OrderPlaced {
                order_id,
                gig_title,
                ..
            } => (
                order_id,
                "New Order Received".to_string(),
                format!("You received a new order for \"{gig_title}\""),
                Priority::High,
            ),
            Notification::PaymentReceived { order_id, .. } => (
                order_id,
                "Order Payment Confirmed".to_string(),
                "Payment has been confirmed for your order. You can start working now!"
                    .to_string(),
                Priority::High,
            ),
            Notification::OrderDelivered { order_id, .. } => (
                order_id,
                "Order Delivered".to_string(),
                "Your order has been delivered. Please review and accept.".to_string(),
                Priority::High,
            ),
            Notification::RevisionRequested { order_id, .. } => (
                order_id,
                "Revision Requested".to_string(),
                "The buyer has requested a revision for your order.".to_string(),
                Priority::High,
            ),
            Notification::OrderCompleted { order_id, .. } => (
                order_id,
                "Order Completed".to_string(),
                "Your order has been accepted and completed!".to_string(),
                Priority::Medium,
            ),
            Notification::OrderCancelled {
                order_id, reason, ..
            } => (
                order_id,
                "Order Cancelled".to_string(),
                format!("Order has been cancelled. Reason: {reason}"),
                Priority::High,
            ),
            Notification::ReviewReceived {
                order_id, rating, ..
            } => (
                order_id,
                "New Review Received".to_string(),
                format!("You received a {rating}-star review"),
                Priority::Medium,
            ),
        };

        let related_model = match self {
            Notification::ReviewReceived { .. } => RelatedModel::Review,
            _ => RelatedModel::Order,
        };

        NotificationRequest {
            user_id: self.recipient().to_string(),
            title,
            message,
            kind: self.kind().to_string(),
            related_id: order_id.clone(),
            related_model,
            action_url: format!("/orders/{order_id}"),
            priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_order_placed() {
        let n = Notification::OrderPlaced {
            seller_id: "s1".to_string(),
            order_id: "o1".to_string(),
            gig_title: "Logo design".to_string(),
        };
        let req = n.render();
        assert_eq!(req.user_id, "s1");
        assert_eq!(req.kind, "order_placed");
        assert_eq!(req.message, "You received a new order for \"Logo design\"");
        assert_eq!(req.action_url, "/orders/o1");
        assert_eq!(req.related_model, RelatedModel::Order);
    }

    #[test]
    fn test_render_cancel_and_review() {
        let n = Notification::OrderCancelled {
            recipient_id: "b1".to_string(),
            order_id: "o1".to_string(),
            reason: "changed my mind".to_string(),
        };
        assert_eq!(
            n.render().message,
            "Order has been cancelled. Reason: changed my mind"
        );

        let n = Notification::ReviewReceived {
            seller_id: "s1".to_string(),
            order_id: "o1".to_string(),
            rating: 4,
        };
        let req = n.render();
        assert_eq!(req.message, "You received a 4-star review");
        assert_eq!(req.related_model, RelatedModel::Review);
    }

    #[test]
    fn test_request_serializes_kind_as_type() {
        let req = Notification::PaymentReceived {
            seller_id: "s1".to_string(),
            order_id: "o1".to_string(),
        }
        .render();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["type"], "payment_received");
        assert_eq!(json["priority"], "high");
    }
}
