//! Volunteer portal: profiles, opportunities with RSVPs, and announcements
//!
//! Every mutation follows fetch, check, write. Capacity and "already
//! registered" checks are plain reads before the write, so two volunteers
//! racing for the last spot can both succeed.

pub mod announcements;
pub mod opportunities;
pub mod profiles;
pub mod types;

pub use opportunities::VolunteerManager;
pub use types::*;
