//! Board meetings, uploaded minutes, minutes votes and attendance

pub mod attendees;
pub mod manager;
pub mod types;

pub use manager::MeetingManager;
pub use types::*;
