//! Donation requests and return-page outcomes

use serde::{Deserialize, Serialize};

use crate::error::PortalError;

pub const PRESET_AMOUNTS: [u32; 5] = [25, 50, 100, 250, 500];
pub const MIN_DONATION: f64 = 1.0;
pub const MAX_DONATION: f64 = 100_000.0;

pub const DONATION_TYPES: &[&str] = &[
    "general",
    "fun_grant",
    "financial_aid",
    "self_care",
    "regional_conflict",
];

/// Body of `POST /api/create-checkout-session`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequest {
    pub amount: f64,
    #[serde(default = "default_donation_type")]
    pub donation_type: String,
    #[serde(default)]
    pub is_recurring: bool,
}

fn default_donation_type() -> String {
    "general".to_string()
}

impl DonationRequest {
    /// Check the amount and fund, returning the amount in cents
    pub fn validate(&self) -> Result<i64, PortalError> {
        if !self.amount.is_finite() || self.amount < MIN_DONATION || self.amount > MAX_DONATION {
            return Err(PortalError::ValidationError(format!(
                "Donation amount must be between ${} and ${}",
                MIN_DONATION, MAX_DONATION
            )));
        }

        if !DONATION_TYPES.contains(&self.donation_type.as_str()) {
            return Err(PortalError::ValidationError(format!(
                "Unknown donation type: {}",
                self.donation_type
            )));
        }

        Ok((self.amount * 100.0).round() as i64)
    }

    pub fn product_name(&self) -> String {
        let fund = match self.donation_type.as_str() {
            "fun_grant" => "Fun Grant Fund",
            "financial_aid" => "Scholarship Fund",
            "self_care" => "Self-Care Fund",
            "regional_conflict" => "Regional Conflict Relief Fund",
            _ => "General Fund",
        };
        if self.is_recurring {
            format!("Monthly Donation - {}", fund)
        } else {
            format!("Donation - {}", fund)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub session_id: String,
    pub url: Option<String>,
}

/// Query flags set on the return redirect from hosted checkout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReturnQuery {
    pub success: Option<bool>,
    pub canceled: Option<bool>,
}

/// The banner shown after the processor redirects back. Not verified server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationOutcome {
    Succeeded,
    Canceled,
    Unknown,
}

impl DonationOutcome {
    pub fn from_query(query: &ReturnQuery) -> Self {
        match (query.success, query.canceled) {
            (Some(true), _) => DonationOutcome::Succeeded,
            (_, Some(true)) => DonationOutcome::Canceled,
            _ => DonationOutcome::Unknown,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            DonationOutcome::Succeeded => "Thank you! Your donation was received.",
            DonationOutcome::Canceled => "Your donation was canceled. No payment was taken.",
            DonationOutcome::Unknown => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: f64) -> DonationRequest {
        DonationRequest {
            amount,
            donation_type: "general".to_string(),
            is_recurring: false,
        }
    }

    #[test]
    fn test_amount_bounds() {
        assert_eq!(request(25.0).validate().unwrap(), 2500);
        assert_eq!(request(12.5).validate().unwrap(), 1250);
        assert!(request(0.5).validate().is_err());
        assert!(request(f64::NAN).validate().is_err());
        assert!(request(100_000.01).validate().is_err());
    }

    #[test]
    fn test_unknown_fund_rejected() {
        let mut req = request(50.0);
        req.donation_type = "yachts".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_wire_format() {
        let req: DonationRequest =
            serde_json::from_str(r#"{"amount": 50, "donationType": "self_care", "isRecurring": true}"#)
                .unwrap();
        assert!(req.is_recurring);
        assert_eq!(req.product_name(), "Monthly Donation - Self-Care Fund");
    }

    #[test]
    fn test_return_flags() {
        let ok = ReturnQuery { success: Some(true), canceled: None };
        let cancel = ReturnQuery { success: None, canceled: Some(true) };
        assert_eq!(DonationOutcome::from_query(&ok), DonationOutcome::Succeeded);
        assert_eq!(DonationOutcome::from_query(&cancel), DonationOutcome::Canceled);
        assert_eq!(DonationOutcome::from_query(&ReturnQuery::default()), DonationOutcome::Unknown);
    }
}
