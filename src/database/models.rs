use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use crate::applications::types::{ApplicationStatus, ApplicationType, ApplicationVoteChoice};
use crate::auth::roles::Role;
use crate::meetings::types::{AttendanceStatus, MinutesVoteChoice};
use crate::volunteers::types::RsvpStatus;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub password_salt: String,
    pub full_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Application {
    pub id: i64,
    pub application_type: ApplicationType,
    pub status: ApplicationStatus,
    pub applicant_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub child_name: Option<String>,
    pub child_age: Option<i64>,
    pub relationship: Option<String>,
    pub loss_description: Option<String>,
    pub activity_description: Option<String>,
    pub school_name: Option<String>,
    pub essay: Option<String>,
    pub transcript_url: Option<String>,
    pub recommendation_url: Option<String>,
    pub self_care_plan: Option<String>,
    pub region: Option<String>,
    pub conflict_description: Option<String>,
    pub requested_amount: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ApplicationVote {
    pub id: i64,
    pub application_id: i64,
    pub staff_id: i64,
    pub staff_name: String,
    pub vote: ApplicationVoteChoice,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ApplicationNote {
    pub id: i64,
    pub application_id: i64,
    pub staff_id: i64,
    pub staff_name: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

/// Archive record of an approved application
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Grant {
    pub id: i64,
    pub application_id: i64,
    pub recipient_name: String,
    pub application_type: ApplicationType,
    pub approved_amount: i64,
    pub decision_date: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Meeting {
    pub id: i64,
    pub title: String,
    pub meeting_date: DateTime<Utc>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MeetingMinutes {
    pub id: i64,
    pub meeting_id: i64,
    pub title: String,
    pub file_url: String,
    pub uploaded_by: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MinutesVote {
    pub id: i64,
    pub minutes_id: i64,
    pub board_member_id: i64,
    pub board_member_name: String,
    pub vote: MinutesVoteChoice,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MeetingAttendee {
    pub id: i64,
    pub meeting_id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub rsvp_status: AttendanceStatus,
    pub responded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VolunteerProfile {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub phone: Option<String>,
    pub skills: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VolunteerOpportunity {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub event_date: DateTime<Utc>,
    pub total_spots: i64,
    pub filled_spots: i64,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

impl VolunteerOpportunity {
    pub fn spots_remaining(&self) -> i64 {
        (self.total_spots - self.filled_spots).max(0)
    }

    pub fn is_full(&self) -> bool {
        self.filled_spots >= self.total_spots
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VolunteerRsvp {
    pub id: i64,
    pub opportunity_id: i64,
    pub profile_id: i64,
    pub status: RsvpStatus,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VolunteerAnnouncement {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub created_by: i64,
    pub read_by: Json<Vec<i64>>,
    pub created_at: DateTime<Utc>,
}

impl VolunteerAnnouncement {
    pub fn is_read_by(&self, profile_id: i64) -> bool {
        self.read_by.contains(&profile_id)
    }
}
