//! Stripe Checkout via REST API (no SDK dependency)

use async_trait::async_trait;
use shared::order::OrderSnapshot;

use super::{CheckoutSession, CheckoutUrls, PaymentError, PaymentGateway};
use crate::orders::money::to_minor_units;

pub const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

#[derive(Debug, Clone)]
pub struct StripeGateway {
    client: reqwest::Client,
    secret_key: String,
    currency: String,
    api_base: String,
}

impl StripeGateway {
    pub fn new(secret_key: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key: secret_key.into(),
            currency: currency.into(),
            api_base: STRIPE_API_BASE.to_string(),
        }
    }

    /// Point at a different API host (stripe-mock, proxies)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_checkout(
        &self,
        order: &OrderSnapshot,
        urls: &CheckoutUrls,
    ) -> Result<CheckoutSession, PaymentError> {
        let form = checkout_form(order, urls, &self.currency);
        let resp: serde_json::Value = self
            .client
            .post(format!("{}/checkout/sessions", self.api_base))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&form)
            .send()
            .await?
            .json()
            .await?;

        match (resp["id"].as_str(), resp["url"].as_str()) {
            (Some(id), Some(url)) => Ok(CheckoutSession {
                session_id: id.to_string(),
                url: url.to_string(),
            }),
            _ => Err(PaymentError::Gateway(format!(
                "create_checkout failed: {}",
                resp["error"]["message"].as_str().unwrap_or("unexpected response")
            ))),
        }
    }
}

/// Form body for `POST /checkout/sessions`: package price and service fee
/// as two line items, amounts in minor units
fn checkout_form(order: &OrderSnapshot, urls: &CheckoutUrls, currency: &str) -> Vec<(String, String)> {
    let mut form: Vec<(String, String)> = vec![
        ("mode".into(), "payment".into()),
        (
            "success_url".into(),
            format!(
                "{}?order_id={}&session_id={{CHECKOUT_SESSION_ID}}",
                urls.success_url, order.order_id
            ),
        ),
        (
            "cancel_url".into(),
            format!("{}?order_id={}", urls.cancel_url, order.order_id),
        ),
        ("client_reference_id".into(), order.order_id.clone()),
        ("metadata[order_id]".into(), order.order_id.clone()),
        ("metadata[order_code]".into(), order.order_code.clone()),
        (
            "payment_intent_data[metadata][order_id]".into(),
            order.order_id.clone(),
        ),
    ];

    let items = [
        (
            format!("{} ({})", order.gig_title, order.package_type.as_str()),
            order.price,
        ),
        ("Service fee".to_string(), order.service_fee),
    ];
    for (i, (name, amount)) in items.into_iter().enumerate() {
        let prefix = format!("line_items[{i}]");
        form.push((format!("{prefix}[price_data][currency]"), currency.to_string()));
        form.push((format!("{prefix}[price_data][product_data][name]"), name));
        form.push((
            format!("{prefix}[price_data][unit_amount]"),
            to_minor_units(amount).to_string(),
        ));
        form.push((format!("{prefix}[quantity]"), "1".into()));
    }
    form
}
