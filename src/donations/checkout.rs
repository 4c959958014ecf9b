//! Hosted checkout sessions (Stripe Checkout)
//!
//! One form-encoded POST per donation; the browser is then redirected to the
//! processor's hosted page. Nothing is persisted and no retry is attempted.

use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use super::types::{CheckoutSession, DonationRequest};
use crate::error::PortalError;

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ProcessorError,
}

#[derive(Debug, Deserialize)]
struct ProcessorError {
    message: Option<String>,
}

#[derive(Clone)]
pub struct CheckoutClient {
    api_base: String,
    secret_key: String,
    site_url: String,
    http_client: Client,
}

impl CheckoutClient {
    pub fn new(api_base: &str, secret_key: &str, site_url: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
            site_url: site_url.trim_end_matches('/').to_string(),
            http_client: Client::new(),
        }
    }

    /// Form parameters for a one-time or monthly checkout session
    pub fn session_params(&self, request: &DonationRequest, amount_cents: i64) -> Vec<(String, String)> {
        let mode = if request.is_recurring { "subscription" } else { "payment" };
        let mut params = vec![
            ("mode".to_string(), mode.to_string()),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            ("line_items[0][price_data][currency]".to_string(), "usd".to_string()),
            (
                "line_items[0][price_data][unit_amount]".to_string(),
                amount_cents.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                request.product_name(),
            ),
            (
                "success_url".to_string(),
                format!("{}/donate?success=true", self.site_url),
            ),
            (
                "cancel_url".to_string(),
                format!("{}/donate?canceled=true", self.site_url),
            ),
            (
                "metadata[donation_type]".to_string(),
                request.donation_type.clone(),
            ),
        ];

        if request.is_recurring {
            params.push((
                "line_items[0][price_data][recurring][interval]".to_string(),
                "month".to_string(),
            ));
        } else {
            params.push(("submit_type".to_string(), "donate".to_string()));
        }

        params
    }

    pub async fn create_session(&self, request: &DonationRequest) -> Result<CheckoutSession, PortalError> {
        let amount_cents = request.validate()?;
        if self.secret_key.is_empty() {
            return Err(PortalError::PaymentError(
                "Payment processor is not configured".to_string(),
            ));
        }

        let params = self.session_params(request, amount_cents);
        let response = self
            .http_client
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .ok()
                .and_then(|e| e.error.message)
                .unwrap_or_else(|| format!("processor returned {}", status));
            warn!("Checkout session creation failed: {}", message);
            return Err(PortalError::PaymentError(message));
        }

        let session: SessionResponse = response.json().await.map_err(|e| {
            PortalError::PaymentError(format!("Unexpected processor response: {}", e))
        })?;

        info!(
            "Created {} checkout session {} for {} cents ({})",
            if request.is_recurring { "subscription" } else { "one-time" },
            session.id,
            amount_cents,
            request.donation_type
        );

        Ok(CheckoutSession {
            session_id: session.id,
            url: session.url,
        })
    }
}
