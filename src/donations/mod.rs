//! Donation flow: amount validation and hosted checkout sessions

pub mod checkout;
pub mod types;

pub use checkout::CheckoutClient;
pub use types::{CheckoutSession, DonationOutcome, DonationRequest, ReturnQuery, PRESET_AMOUNTS};
