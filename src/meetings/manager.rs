//! Meetings and minutes
//!
//! Each meeting may carry several uploaded minutes documents; each document is
//! voted on independently and its tally is computed from the fetched vote rows.

use chrono::Utc;
use tracing::info;

use super::types::{MeetingDetail, MinutesDetail, MinutesVoteChoice, NewMeeting};
use crate::database::models::{Meeting, MeetingMinutes, MinutesVote};
use crate::database::Database;
use crate::error::PortalError;
use crate::storage::{ObjectStore, MINUTES_BUCKET};
use crate::voting::{self, VoteChoice, VoteTally};

#[derive(Clone)]
pub struct MeetingManager {
    pub(super) database: Database,
    store: ObjectStore,
}

impl MeetingManager {
    pub fn new(database: Database, store: ObjectStore) -> Self {
        Self { database, store }
    }

    pub async fn create_meeting(&self, meeting: &NewMeeting, created_by: i64) -> Result<Meeting, PortalError> {
        let title = meeting.title.trim();
        if title.len() < 3 {
            return Err(PortalError::ValidationError(
                "Meeting title must be at least 3 characters".to_string(),
            ));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO meetings (title, meeting_date, location, description, created_by, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(title)
        .bind(meeting.meeting_date)
        .bind(&meeting.location)
        .bind(&meeting.description)
        .bind(created_by)
        .bind(Utc::now())
        .execute(self.database.pool())
        .await
        .map_err(|e| PortalError::DatabaseError(format!("Failed to create meeting: {}", e)))?;

        let id = result.last_insert_rowid();
        info!("Board member {} scheduled meeting {} ({})", created_by, id, title);
        self.get_meeting(id).await
    }

    /// All meetings ordered by date, earliest first
    pub async fn list_meetings(&self) -> Result<Vec<Meeting>, PortalError> {
        let meetings = sqlx::query_as::<_, Meeting>("SELECT * FROM meetings ORDER BY meeting_date ASC, id ASC")
            .fetch_all(self.database.pool())
            .await?;
        Ok(meetings)
    }

    pub async fn get_meeting(&self, id: i64) -> Result<Meeting, PortalError> {
        sqlx::query_as::<_, Meeting>("SELECT * FROM meetings WHERE id = ?")
            .bind(id)
            .fetch_optional(self.database.pool())
            .await?
            .ok_or_else(|| PortalError::NotFound(format!("Meeting {} not found", id)))
    }

    pub async fn meeting_detail(&self, id: i64) -> Result<MeetingDetail, PortalError> {
        let meeting = self.get_meeting(id).await?;
        let mut minutes = Vec::new();
        for doc in self.list_minutes(id).await? {
            let votes = self.minutes_votes(doc.id).await?;
            let tally = Self::tally(&votes);
            minutes.push(MinutesDetail {
                minutes: doc,
                votes,
                tally,
            });
        }
        let attendees = self.attendees(id).await?;

        Ok(MeetingDetail {
            meeting,
            minutes,
            attendees,
        })
    }

    /// Store a minutes document and attach it to the meeting
    pub async fn upload_minutes(
        &self,
        meeting_id: i64,
        title: &str,
        file_name: &str,
        bytes: &[u8],
        uploaded_by: i64,
    ) -> Result<MeetingMinutes, PortalError> {
        self.get_meeting(meeting_id).await?;
        let title = title.trim();
        if title.is_empty() {
            return Err(PortalError::ValidationError(
                "Minutes title cannot be empty".to_string(),
            ));
        }

        let stored = self.store.put(MINUTES_BUCKET, file_name, bytes).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO meeting_minutes (meeting_id, title, file_url, uploaded_by, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(meeting_id)
        .bind(title)
        .bind(&stored.url)
        .bind(uploaded_by)
        .bind(Utc::now())
        .execute(self.database.pool())
        .await
        .map_err(|e| PortalError::DatabaseError(format!("Failed to save minutes: {}", e)))?;

        info!("Uploaded minutes {} for meeting {}", stored.key, meeting_id);
        self.get_minutes(result.last_insert_rowid()).await
    }

    pub async fn list_minutes(&self, meeting_id: i64) -> Result<Vec<MeetingMinutes>, PortalError> {
        let minutes = sqlx::query_as::<_, MeetingMinutes>(
            "SELECT * FROM meeting_minutes WHERE meeting_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(meeting_id)
        .fetch_all(self.database.pool())
        .await?;
        Ok(minutes)
    }

    pub async fn get_minutes(&self, id: i64) -> Result<MeetingMinutes, PortalError> {
        sqlx::query_as::<_, MeetingMinutes>("SELECT * FROM meeting_minutes WHERE id = ?")
            .bind(id)
            .fetch_optional(self.database.pool())
            .await?
            .ok_or_else(|| PortalError::NotFound(format!("Minutes {} not found", id)))
    }

    /// Record or replace a board member's vote on one minutes document
    pub async fn cast_minutes_vote(
        &self,
        minutes_id: i64,
        board_member_id: i64,
        vote: MinutesVoteChoice,
        comment: Option<&str>,
    ) -> Result<(), PortalError> {
        self.get_minutes(minutes_id).await?;

        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO meeting_minute_votes (minutes_id, board_member_id, vote, comment, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (minutes_id, board_member_id) DO UPDATE SET
                vote = excluded.vote,
                comment = excluded.comment,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(minutes_id)
        .bind(board_member_id)
        .bind(vote)
        .bind(comment.map(str::trim).filter(|c| !c.is_empty()))
        .bind(now)
        .bind(now)
        .execute(self.database.pool())
        .await
        .map_err(|e| PortalError::DatabaseError(format!("Failed to record minutes vote: {}", e)))?;

        info!(
            "Board member {} voted {} on minutes {}",
            board_member_id,
            vote.as_str(),
            minutes_id
        );
        Ok(())
    }

    pub async fn minutes_votes(&self, minutes_id: i64) -> Result<Vec<MinutesVote>, PortalError> {
        let votes = sqlx::query_as::<_, MinutesVote>(
            r#"
            SELECT v.id, v.minutes_id, v.board_member_id, u.full_name AS board_member_name,
                   v.vote, v.comment, v.created_at, v.updated_at
            FROM meeting_minute_votes v
            JOIN users u ON u.id = v.board_member_id
            WHERE v.minutes_id = ?
            ORDER BY v.updated_at ASC, v.id ASC
            "#,
        )
        .bind(minutes_id)
        .fetch_all(self.database.pool())
        .await?;
        Ok(votes)
    }

    /// Votes grouped by choice for one minutes document
    pub fn tally(votes: &[MinutesVote]) -> VoteTally {
        voting::tally(votes.iter().map(|v| v.vote))
    }
}
