use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{Meeting, MeetingAttendee, MeetingMinutes, MinutesVote};
use crate::voting::{VoteChoice, VoteTally};

/// A board member's vote on a minutes document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum MinutesVoteChoice {
    Approve,
    Deny,
    Discuss,
}

impl VoteChoice for MinutesVoteChoice {
    fn all() -> &'static [Self] {
        &[
            MinutesVoteChoice::Approve,
            MinutesVoteChoice::Deny,
            MinutesVoteChoice::Discuss,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            MinutesVoteChoice::Approve => "approve",
            MinutesVoteChoice::Deny => "deny",
            MinutesVoteChoice::Discuss => "discuss",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Attending,
    NotAttending,
    Maybe,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMeeting {
    pub title: String,
    pub meeting_date: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MinutesDetail {
    pub minutes: MeetingMinutes,
    pub votes: Vec<MinutesVote>,
    pub tally: VoteTally,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingDetail {
    pub meeting: Meeting,
    pub minutes: Vec<MinutesDetail>,
    pub attendees: Vec<MeetingAttendee>,
}
