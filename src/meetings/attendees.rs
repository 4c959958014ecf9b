//! Meeting attendance RSVPs, one row per (meeting, user)

use chrono::Utc;
use tracing::info;

use super::manager::MeetingManager;
use super::types::AttendanceStatus;
use crate::database::models::MeetingAttendee;
use crate::error::PortalError;

impl MeetingManager {
    pub async fn rsvp(
        &self,
        meeting_id: i64,
        user_id: i64,
        status: AttendanceStatus,
    ) -> Result<(), PortalError> {
        self.get_meeting(meeting_id).await?;

        sqlx::query(
            r#"
            INSERT INTO meeting_attendees (meeting_id, user_id, rsvp_status, responded_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (meeting_id, user_id) DO UPDATE SET
                rsvp_status = excluded.rsvp_status,
                responded_at = excluded.responded_at
            "#,
        )
        .bind(meeting_id)
        .bind(user_id)
        .bind(status)
        .bind(Utc::now())
        .execute(self.database.pool())
        .await
        .map_err(|e| PortalError::DatabaseError(format!("Failed to record attendance: {}", e)))?;

        info!("User {} responded {:?} to meeting {}", user_id, status, meeting_id);
        Ok(())
    }

    pub async fn attendees(&self, meeting_id: i64) -> Result<Vec<MeetingAttendee>, PortalError> {
        let attendees = sqlx::query_as::<_, MeetingAttendee>(
            r#"
            SELECT a.id, a.meeting_id, a.user_id, u.full_name, a.rsvp_status, a.responded_at
            FROM meeting_attendees a
            JOIN users u ON u.id = a.user_id
            WHERE a.meeting_id = ?
            ORDER BY u.full_name ASC
            "#,
        )
        .bind(meeting_id)
        .fetch_all(self.database.pool())
        .await?;
        Ok(attendees)
    }
}
