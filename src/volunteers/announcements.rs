//! Announcements with per-volunteer read receipts
//!
//! `read_by` is a JSON array of profile ids. Marking read fetches the row,
//! appends the id only when it is missing, and writes the array back.

use chrono::Utc;
use sqlx::types::Json;
use tracing::{debug, info};

use super::opportunities::VolunteerManager;
use super::types::{AnnouncementView, NewAnnouncement};
use crate::database::models::VolunteerAnnouncement;
use crate::error::PortalError;

impl VolunteerManager {
    pub async fn create_announcement(
        &self,
        announcement: &NewAnnouncement,
        created_by: i64,
    ) -> Result<VolunteerAnnouncement, PortalError> {
        let title = announcement.title.trim();
        let body = announcement.body.trim();
        if title.is_empty() || body.is_empty() {
            return Err(PortalError::ValidationError(
                "Announcements need a title and a body".to_string(),
            ));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO volunteer_announcements (title, body, created_by, read_by, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(title)
        .bind(body)
        .bind(created_by)
        .bind(Json(Vec::<i64>::new()))
        .bind(Utc::now())
        .execute(self.database.pool())
        .await
        .map_err(|e| PortalError::DatabaseError(format!("Failed to create announcement: {}", e)))?;

        info!("Posted volunteer announcement {}", result.last_insert_rowid());
        self.get_announcement(result.last_insert_rowid()).await
    }

    pub async fn get_announcement(&self, id: i64) -> Result<VolunteerAnnouncement, PortalError> {
        sqlx::query_as::<_, VolunteerAnnouncement>("SELECT * FROM volunteer_announcements WHERE id = ?")
            .bind(id)
            .fetch_optional(self.database.pool())
            .await?
            .ok_or_else(|| PortalError::NotFound(format!("Announcement {} not found", id)))
    }

    /// Newest first, each flagged read or unread for `profile_id`
    pub async fn list_announcements(&self, profile_id: i64) -> Result<Vec<AnnouncementView>, PortalError> {
        let rows = sqlx::query_as::<_, VolunteerAnnouncement>(
            "SELECT * FROM volunteer_announcements ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(self.database.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|announcement| AnnouncementView {
                is_read: announcement.is_read_by(profile_id),
                announcement,
            })
            .collect())
    }

    pub async fn mark_read(&self, announcement_id: i64, profile_id: i64) -> Result<VolunteerAnnouncement, PortalError> {
        let announcement = self.get_announcement(announcement_id).await?;
        if announcement.is_read_by(profile_id) {
            debug!("Profile {} already read announcement {}", profile_id, announcement_id);
            return Ok(announcement);
        }

        let mut read_by = announcement.read_by.0;
        read_by.push(profile_id);

        sqlx::query("UPDATE volunteer_announcements SET read_by = ? WHERE id = ?")
            .bind(Json(read_by))
            .bind(announcement_id)
            .execute(self.database.pool())
            .await?;

        self.get_announcement(announcement_id).await
    }

    pub async fn unread_count(&self, profile_id: i64) -> Result<usize, PortalError> {
        let views = self.list_announcements(profile_id).await?;
        Ok(views.iter().filter(|v| !v.is_read).count())
    }
}
