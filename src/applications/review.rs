//! Staff review dashboard
//!
//! Listing and filtering, per-application detail (fields, votes, notes),
//! vote upserts keyed by (application, staff member), notes and manual status
//! transitions. Vote tallies are computed in memory over the fetched rows and
//! never change an application's status on their own.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite};
use std::collections::BTreeMap;
use tracing::info;

use super::types::{ApplicationStatus, ApplicationType, ApplicationVoteChoice};
use crate::database::models::{Application, ApplicationNote, ApplicationVote, Grant};
use crate::database::Database;
use crate::error::PortalError;
use crate::realtime::{ApplicationEvent, ChangeFeed};
use crate::voting::{self, VoteChoice, VoteTally};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    pub application_type: Option<ApplicationType>,
}

/// Everything the detail view shows, one field per tab
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationDetail {
    pub application: Application,
    pub votes: Vec<ApplicationVote>,
    pub tally: VoteTally,
    pub notes: Vec<ApplicationNote>,
}

#[derive(Clone)]
pub struct ReviewManager {
    database: Database,
    feed: ChangeFeed,
}

impl ReviewManager {
    pub fn new(database: Database, feed: ChangeFeed) -> Self {
        Self { database, feed }
    }

    /// All applications, newest first, optionally narrowed by status and program
    pub async fn list(&self, filter: &ApplicationFilter) -> Result<Vec<Application>, PortalError> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM applications WHERE 1 = 1");
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        if let Some(kind) = filter.application_type {
            query.push(" AND application_type = ").push_bind(kind);
        }
        query.push(" ORDER BY created_at DESC, id DESC");

        let rows = query
            .build_query_as::<Application>()
            .fetch_all(self.database.pool())
            .await
            .map_err(|e| PortalError::DatabaseError(format!("Failed to list applications: {}", e)))?;

        Ok(rows)
    }

    /// Number of applications in each status; every status is present
    pub async fn status_counts(&self) -> Result<BTreeMap<String, i64>, PortalError> {
        let rows: Vec<(ApplicationStatus, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM applications GROUP BY status")
                .fetch_all(self.database.pool())
                .await?;

        let mut counts: BTreeMap<String, i64> = ApplicationStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        for (status, count) in rows {
            counts.insert(status.as_str().to_string(), count);
        }
        Ok(counts)
    }

    pub async fn get(&self, id: i64) -> Result<Application, PortalError> {
        sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = ?")
            .bind(id)
            .fetch_optional(self.database.pool())
            .await?
            .ok_or_else(|| PortalError::NotFound(format!("Application {} not found", id)))
    }

    pub async fn detail(&self, id: i64) -> Result<ApplicationDetail, PortalError> {
        let application = self.get(id).await?;
        let votes = self.votes(id).await?;
        let notes = self.notes(id).await?;
        let tally = Self::tally(&votes);

        Ok(ApplicationDetail {
            application,
            votes,
            tally,
            notes,
        })
    }

    pub async fn votes(&self, application_id: i64) -> Result<Vec<ApplicationVote>, PortalError> {
        let votes = sqlx::query_as::<_, ApplicationVote>(
            r#"
            SELECT v.id, v.application_id, v.staff_id, u.full_name AS staff_name,
                   v.vote, v.comment, v.created_at, v.updated_at
            FROM application_votes v
            JOIN users u ON u.id = v.staff_id
            WHERE v.application_id = ?
            ORDER BY v.updated_at ASC, v.id ASC
            "#,
        )
        .bind(application_id)
        .fetch_all(self.database.pool())
        .await?;

        Ok(votes)
    }

    pub fn tally(votes: &[ApplicationVote]) -> VoteTally {
        voting::tally(votes.iter().map(|v| v.vote))
    }

    /// Record or replace this staff member's vote. Allowed in any status.
    pub async fn cast_vote(
        &self,
        application_id: i64,
        staff_id: i64,
        vote: ApplicationVoteChoice,
        comment: Option<&str>,
    ) -> Result<(), PortalError> {
        self.get(application_id).await?;

        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO application_votes (application_id, staff_id, vote, comment, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (application_id, staff_id) DO UPDATE SET
                vote = excluded.vote,
                comment = excluded.comment,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(application_id)
        .bind(staff_id)
        .bind(vote)
        .bind(comment.map(str::trim).filter(|c| !c.is_empty()))
        .bind(now)
        .bind(now)
        .execute(self.database.pool())
        .await
        .map_err(|e| PortalError::DatabaseError(format!("Failed to record vote: {}", e)))?;

        info!(
            "Staff {} voted {} on application {}",
            staff_id,
            vote.as_str(),
            application_id
        );
        Ok(())
    }

    pub async fn notes(&self, application_id: i64) -> Result<Vec<ApplicationNote>, PortalError> {
        let notes = sqlx::query_as::<_, ApplicationNote>(
            r#"
            SELECT n.id, n.application_id, n.staff_id, u.full_name AS staff_name,
                   n.note, n.created_at
            FROM application_notes n
            JOIN users u ON u.id = n.staff_id
            WHERE n.application_id = ?
            ORDER BY n.created_at DESC, n.id DESC
            "#,
        )
        .bind(application_id)
        .fetch_all(self.database.pool())
        .await?;

        Ok(notes)
    }

    pub async fn add_note(
        &self,
        application_id: i64,
        staff_id: i64,
        note: &str,
    ) -> Result<i64, PortalError> {
        let note = note.trim();
        if note.is_empty() {
            return Err(PortalError::ValidationError("Note cannot be empty".to_string()));
        }
        self.get(application_id).await?;

        let result = sqlx::query(
            "INSERT INTO application_notes (application_id, staff_id, note, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(application_id)
        .bind(staff_id)
        .bind(note)
        .bind(Utc::now())
        .execute(self.database.pool())
        .await
        .map_err(|e| PortalError::DatabaseError(format!("Failed to add note: {}", e)))?;

        Ok(result.last_insert_rowid())
    }

    /// Manually move an application to `next`.
    ///
    /// Approving also archives a grant record; `approved_amount` defaults to the
    /// requested amount.
    pub async fn update_status(
        &self,
        id: i64,
        next: ApplicationStatus,
        decided_by: i64,
        approved_amount: Option<i64>,
        notes: Option<&str>,
    ) -> Result<Application, PortalError> {
        let current = self.get(id).await?;
        if !current.status.can_transition_to(next) {
            return Err(PortalError::Conflict(format!(
                "Cannot move application {} from {} to {}",
                id, current.status, next
            )));
        }

        let amount = approved_amount.unwrap_or(current.requested_amount);
        if next == ApplicationStatus::Approved && amount <= 0 {
            return Err(PortalError::ValidationError(
                "Approved amount must be positive".to_string(),
            ));
        }

        let now = Utc::now();
        let mut tx = self.database.pool().begin().await?;

        let updated = sqlx::query(
            "UPDATE applications SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
        )
        .bind(next)
        .bind(now)
        .bind(id)
        .bind(current.status)
        .execute(&mut *tx)
        .await?;

        // Another reviewer moved it after our read
        if updated.rows_affected() == 0 {
            return Err(PortalError::Conflict(format!(
                "Application {} is no longer {}",
                id, current.status
            )));
        }

        if next == ApplicationStatus::Approved {
            sqlx::query(
                r#"
                INSERT INTO grants (application_id, recipient_name, application_type, approved_amount, decision_date, notes)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(id)
            .bind(&current.applicant_name)
            .bind(current.application_type)
            .bind(amount)
            .bind(now)
            .bind(notes)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            "Staff {} moved application {} from {} to {}",
            decided_by, id, current.status, next
        );
        self.feed.publish(ApplicationEvent::Updated { id, status: next });
        self.get(id).await
    }

    pub async fn grants(&self) -> Result<Vec<Grant>, PortalError> {
        let grants = sqlx::query_as::<_, Grant>(
            "SELECT * FROM grants ORDER BY decision_date DESC, id DESC",
        )
        .fetch_all(self.database.pool())
        .await?;
        Ok(grants)
    }
}
