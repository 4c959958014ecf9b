//! Volunteer opportunities and RSVPs

use chrono::Utc;
use tracing::info;

use super::types::{NewOpportunity, RsvpStatus};
use crate::database::models::{VolunteerOpportunity, VolunteerRsvp};
use crate::database::Database;
use crate::error::PortalError;

#[derive(Clone)]
pub struct VolunteerManager {
    pub(super) database: Database,
}

impl VolunteerManager {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub async fn create_opportunity(
        &self,
        opportunity: &NewOpportunity,
        created_by: i64,
    ) -> Result<VolunteerOpportunity, PortalError> {
        let title = opportunity.title.trim();
        if title.len() < 3 {
            return Err(PortalError::ValidationError(
                "Opportunity title must be at least 3 characters".to_string(),
            ));
        }
        if opportunity.total_spots < 1 {
            return Err(PortalError::ValidationError(
                "An opportunity needs at least one spot".to_string(),
            ));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO volunteer_opportunities
            (title, description, location, event_date, total_spots, filled_spots, created_by, created_at)
            VALUES (?, ?, ?, ?, ?, 0, ?, ?)
            "#,
        )
        .bind(title)
        .bind(opportunity.description.trim())
        .bind(&opportunity.location)
        .bind(opportunity.event_date)
        .bind(opportunity.total_spots)
        .bind(created_by)
        .bind(Utc::now())
        .execute(self.database.pool())
        .await
        .map_err(|e| PortalError::DatabaseError(format!("Failed to create opportunity: {}", e)))?;

        let id = result.last_insert_rowid();
        info!("Created volunteer opportunity {} ({} spots)", id, opportunity.total_spots);
        self.get_opportunity(id).await
    }

    /// Opportunities ordered by event date, soonest first
    pub async fn list_opportunities(&self) -> Result<Vec<VolunteerOpportunity>, PortalError> {
        let rows = sqlx::query_as::<_, VolunteerOpportunity>(
            "SELECT * FROM volunteer_opportunities ORDER BY event_date ASC, id ASC",
        )
        .fetch_all(self.database.pool())
        .await?;
        Ok(rows)
    }

    pub async fn get_opportunity(&self, id: i64) -> Result<VolunteerOpportunity, PortalError> {
        sqlx::query_as::<_, VolunteerOpportunity>("SELECT * FROM volunteer_opportunities WHERE id = ?")
            .bind(id)
            .fetch_optional(self.database.pool())
            .await?
            .ok_or_else(|| PortalError::NotFound(format!("Opportunity {} not found", id)))
    }

    pub async fn get_rsvp(&self, id: i64) -> Result<VolunteerRsvp, PortalError> {
        sqlx::query_as::<_, VolunteerRsvp>("SELECT * FROM volunteer_rsvps WHERE id = ?")
            .bind(id)
            .fetch_optional(self.database.pool())
            .await?
            .ok_or_else(|| PortalError::NotFound(format!("RSVP {} not found", id)))
    }

    /// Sign a volunteer up for an opportunity.
    ///
    /// Capacity and duplicate checks are reads before the write; they are not
    /// atomic with it.
    pub async fn rsvp(&self, opportunity_id: i64, profile_id: i64) -> Result<VolunteerRsvp, PortalError> {
        let opportunity = self.get_opportunity(opportunity_id).await?;
        if opportunity.is_full() {
            return Err(PortalError::Conflict(format!(
                "Opportunity {} is full",
                opportunity_id
            )));
        }

        let existing = sqlx::query_as::<_, VolunteerRsvp>(
            r#"
            SELECT * FROM volunteer_rsvps
            WHERE opportunity_id = ? AND profile_id = ?
            ORDER BY id DESC LIMIT 1
            "#,
        )
        .bind(opportunity_id)
        .bind(profile_id)
        .fetch_optional(self.database.pool())
        .await?;

        let rsvp_id = match existing {
            Some(rsvp) if rsvp.status != RsvpStatus::Cancelled => {
                return Err(PortalError::Conflict(
                    "You are already registered for this opportunity".to_string(),
                ));
            }
            Some(rsvp) => {
                sqlx::query("UPDATE volunteer_rsvps SET status = ?, cancelled_at = NULL WHERE id = ?")
                    .bind(RsvpStatus::Confirmed)
                    .bind(rsvp.id)
                    .execute(self.database.pool())
                    .await?;
                rsvp.id
            }
            None => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO volunteer_rsvps (opportunity_id, profile_id, status, created_at)
                    VALUES (?, ?, ?, ?)
                    "#,
                )
                .bind(opportunity_id)
                .bind(profile_id)
                .bind(RsvpStatus::Confirmed)
                .bind(Utc::now())
                .execute(self.database.pool())
                .await
                .map_err(|e| PortalError::DatabaseError(format!("Failed to save RSVP: {}", e)))?;
                result.last_insert_rowid()
            }
        };

        sqlx::query("UPDATE volunteer_opportunities SET filled_spots = filled_spots + 1 WHERE id = ?")
            .bind(opportunity_id)
            .execute(self.database.pool())
            .await?;

        info!("Profile {} RSVPed to opportunity {}", profile_id, opportunity_id);
        self.get_rsvp(rsvp_id).await
    }

    /// Cancel the caller's RSVP, stamping the cancellation time.
    ///
    /// `filled_spots` is decremented but never below zero. Cancelling twice is a no-op.
    pub async fn cancel_rsvp(&self, rsvp_id: i64, profile_id: i64) -> Result<VolunteerRsvp, PortalError> {
        let rsvp = self.get_rsvp(rsvp_id).await?;
        if rsvp.profile_id != profile_id {
            return Err(PortalError::Forbidden(
                "You can only cancel your own RSVP".to_string(),
            ));
        }

        match rsvp.status {
            RsvpStatus::Cancelled => return Ok(rsvp),
            RsvpStatus::Attended => {
                return Err(PortalError::Conflict(
                    "Attendance has already been recorded for this RSVP".to_string(),
                ));
            }
            RsvpStatus::Confirmed => {}
        }

        sqlx::query("UPDATE volunteer_rsvps SET status = ?, cancelled_at = ? WHERE id = ?")
            .bind(RsvpStatus::Cancelled)
            .bind(Utc::now())
            .bind(rsvp_id)
            .execute(self.database.pool())
            .await?;

        sqlx::query(
            "UPDATE volunteer_opportunities SET filled_spots = MAX(filled_spots - 1, 0) WHERE id = ?",
        )
        .bind(rsvp.opportunity_id)
        .execute(self.database.pool())
        .await?;

        info!("Profile {} cancelled RSVP {}", profile_id, rsvp_id);
        self.get_rsvp(rsvp_id).await
    }

    /// Staff check-in after the event
    pub async fn mark_attended(&self, rsvp_id: i64) -> Result<VolunteerRsvp, PortalError> {
        let rsvp = self.get_rsvp(rsvp_id).await?;
        if rsvp.status != RsvpStatus::Confirmed {
            return Err(PortalError::Conflict(format!(
                "Only confirmed RSVPs can be marked attended (RSVP {} is {:?})",
                rsvp_id, rsvp.status
            )));
        }

        sqlx::query("UPDATE volunteer_rsvps SET status = ? WHERE id = ?")
            .bind(RsvpStatus::Attended)
            .bind(rsvp_id)
            .execute(self.database.pool())
            .await?;

        self.get_rsvp(rsvp_id).await
    }

    pub async fn my_rsvps(&self, profile_id: i64) -> Result<Vec<VolunteerRsvp>, PortalError> {
        let rows = sqlx::query_as::<_, VolunteerRsvp>(
            "SELECT * FROM volunteer_rsvps WHERE profile_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(profile_id)
        .fetch_all(self.database.pool())
        .await?;
        Ok(rows)
    }

    pub async fn opportunity_rsvps(&self, opportunity_id: i64) -> Result<Vec<VolunteerRsvp>, PortalError> {
        let rows = sqlx::query_as::<_, VolunteerRsvp>(
            "SELECT * FROM volunteer_rsvps WHERE opportunity_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(opportunity_id)
        .fetch_all(self.database.pool())
        .await?;
        Ok(rows)
    }
}
