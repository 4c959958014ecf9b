use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::VolunteerAnnouncement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum RsvpStatus {
    Confirmed,
    Cancelled,
    Attended,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOpportunity {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    pub event_date: DateTime<Utc>,
    pub total_spots: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAnnouncement {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub skills: Option<String>,
}

/// An announcement as one volunteer sees it
#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementView {
    #[serde(flatten)]
    pub announcement: VolunteerAnnouncement,
    pub is_read: bool,
}
