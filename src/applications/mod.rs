//! Grant applications
//!
//! Public intake for the four grant programs and the staff review workflow.

pub mod intake;
pub mod review;
pub mod types;
pub mod validation;

pub use intake::{IntakeService, NewApplication};
pub use review::{ApplicationDetail, ApplicationFilter, ReviewManager};
pub use types::*;
pub use validation::ApplicationForm;
