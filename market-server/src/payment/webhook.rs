//! Stripe webhook: signature verification and event mapping

use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use shared::order::{Actor, OrderCommand, OrderCommandPayload, PaymentFailureReason};

use super::PaymentError;
use crate::orders::{ManagerResult, OrdersManager};

/// Maximum age of a signed webhook, in seconds
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Verify the `Stripe-Signature` header (HMAC-SHA256 over `t.payload`)
pub fn verify_webhook_signature(
    payload: &[u8],
    sig_header: &str,
    secret: &str,
) -> Result<(), PaymentError> {
    verify_webhook_signature_at(payload, sig_header, secret, chrono::Utc::now().timestamp())
}

/// Same as [`verify_webhook_signature`] against a caller-supplied clock
pub fn verify_webhook_signature_at(
    payload: &[u8],
    sig_header: &str,
    secret: &str,
    now_secs: i64,
) -> Result<(), PaymentError> {
    let mut timestamp = "";
    let mut signatures = Vec::new();
    for part in sig_header.split(',') {
        let part = part.trim();
        if let Some(t) = part.strip_prefix("t=") {
            timestamp = t;
        } else if let Some(v) = part.strip_prefix("v1=") {
            signatures.push(v);
        }
    }
    if timestamp.is_empty() || signatures.is_empty() {
        return Err(PaymentError::Signature("invalid Stripe-Signature header"));
    }

    let ts: i64 = timestamp
        .parse()
        .map_err(|_| PaymentError::Signature("invalid timestamp"))?;
    if (now_secs - ts).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(PaymentError::Signature("webhook timestamp outside tolerance"));
    }

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|_| PaymentError::Signature("HMAC key error"))?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);

    // Several v1 entries appear while a secret is being rolled
    let matched = signatures.into_iter().any(|sig| {
        hex::decode(sig).is_ok_and(|bytes| mac.clone().verify_slice(&bytes).is_ok())
    });
    if !matched {
        return Err(PaymentError::Signature("webhook signature mismatch"));
    }
    Ok(())
}

/// What a gateway event means for its order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Succeeded,
    Failed,
    Expired,
}

impl PaymentOutcome {
    /// None for event types the marketplace ignores
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "checkout.session.completed" | "payment_intent.succeeded" => Some(Self::Succeeded),
            "payment_intent.payment_failed" => Some(Self::Failed),
            "checkout.session.expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

/// A payment-relevant webhook event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayEvent {
    /// Gateway event id, reused as the command idempotency key
    pub event_id: String,
    pub event_type: String,
    pub outcome: PaymentOutcome,
    /// `data.object.metadata.order_id`
    pub order_id: Option<String>,
    /// `data.object.id` (checkout session or payment intent)
    pub object_id: Option<String>,
    /// `data.object.payment_intent` on checkout sessions
    pub payment_intent: Option<String>,
}

impl GatewayEvent {
    /// Parse a verified payload; `Ok(None)` for ignored event types
    pub fn parse(payload: &[u8]) -> Result<Option<Self>, PaymentError> {
        let event: Value = serde_json::from_slice(payload)?;
        let event_type = event["type"].as_str().unwrap_or_default();
        let Some(outcome) = PaymentOutcome::from_event_type(event_type) else {
            tracing::debug!(event_type, "Unhandled webhook event type");
            return Ok(None);
        };
        let Some(event_id) = event["id"].as_str() else {
            return Err(PaymentError::Gateway("webhook event missing id".to_string()));
        };

        let object = &event["data"]["object"];
        let text = |v: &Value| v.as_str().filter(|s| !s.is_empty()).map(str::to_string);
        Ok(Some(Self {
            event_id: event_id.to_string(),
            event_type: event_type.to_string(),
            outcome,
            order_id: text(&object["metadata"]["order_id"]),
            object_id: text(&object["id"]),
            payment_intent: text(&object["payment_intent"]),
        }))
    }

    /// Reference recorded on a confirmed order
    pub fn payment_reference(&self) -> Option<&str> {
        self.payment_intent.as_deref().or(self.object_id.as_deref())
    }

    /// Order id from metadata, else through the payment-reference index
    pub fn resolve_order_id(&self, manager: &OrdersManager) -> ManagerResult<Option<String>> {
        if let Some(order_id) = &self.order_id {
            return Ok(Some(order_id.clone()));
        }
        for reference in [self.object_id.as_deref(), self.payment_intent.as_deref()]
            .into_iter()
            .flatten()
        {
            if let Some(order_id) = manager.find_order_by_payment_reference(reference)? {
                return Ok(Some(order_id));
            }
        }
        Ok(None)
    }

    /// Gateway command for the resolved order, keyed by the event id
    pub fn into_command(self, order_id: String) -> OrderCommand {
        let payload = match self.outcome {
            PaymentOutcome::Succeeded => OrderCommandPayload::ConfirmPayment {
                payment_reference: self.payment_reference().map(str::to_string),
                order_id,
            },
            PaymentOutcome::Failed => OrderCommandPayload::FailPayment {
                order_id,
                reason: PaymentFailureReason::Failed,
            },
            PaymentOutcome::Expired => OrderCommandPayload::FailPayment {
                order_id,
                reason: PaymentFailureReason::Expired,
            },
        };
        OrderCommand::new(Actor::PaymentGateway, payload).with_id(self.event_id)
    }
}
