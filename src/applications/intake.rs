//! Public application intake
//!
//! Validates a posted form against its program's rules and inserts exactly one
//! `applications` row in the `pending` status.

use chrono::Utc;
use tracing::{info, warn};

use super::types::{ApplicationStatus, ApplicationType};
use super::validation::{self, ApplicationForm, Field};
use crate::database::Database;
use crate::error::PortalError;
use crate::realtime::{ApplicationEvent, ChangeFeed};

/// Fixed insert shape; fields outside the chosen program are always `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub application_type: ApplicationType,
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
}

impl NewApplication {
    pub fn from_form(kind: ApplicationType, form: &ApplicationForm) -> Self {
        let text = |field: Field, value: &Option<String>| -> Option<String> {
            if validation::uses_field(kind, field) {
                value
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            } else {
                None
            }
        };
        let number = |field: Field, value: Option<i64>| -> Option<i64> {
            value.filter(|_| validation::uses_field(kind, field))
        };

        Self {
            application_type: kind,
            applicant_name: text(Field::ApplicantName, &form.applicant_name).unwrap_or_default(),
            email: text(Field::Email, &form.email)
                .map(|e| e.to_lowercase())
                .unwrap_or_default(),
            phone: text(Field::Phone, &form.phone).unwrap_or_default(),
            address: text(Field::Address, &form.address).unwrap_or_default(),
            child_name: text(Field::ChildName, &form.child_name),
            child_age: number(Field::ChildAge, form.child_age),
            relationship: text(Field::Relationship, &form.relationship),
            loss_description: text(Field::LossDescription, &form.loss_description),
            activity_description: text(Field::ActivityDescription, &form.activity_description),
            school_name: text(Field::SchoolName, &form.school_name),
            essay: text(Field::Essay, &form.essay),
            transcript_url: text(Field::TranscriptUrl, &form.transcript_url),
            recommendation_url: text(Field::RecommendationUrl, &form.recommendation_url),
            self_care_plan: text(Field::SelfCarePlan, &form.self_care_plan),
            region: text(Field::Region, &form.region),
            conflict_description: text(Field::ConflictDescription, &form.conflict_description),
            requested_amount: number(Field::RequestedAmount, form.requested_amount).unwrap_or(0),
        }
    }
}

#[derive(Clone)]
pub struct IntakeService {
    database: Database,
    feed: ChangeFeed,
}

impl IntakeService {
    pub fn new(database: Database, feed: ChangeFeed) -> Self {
        Self { database, feed }
    }

    /// Validate and insert one application. Returns the new row id.
    ///
    /// No idempotency key is taken: submitting the same form twice creates two rows.
    pub async fn submit(&self, form: &ApplicationForm) -> Result<i64, PortalError> {
        let kind = validation::validate(form).map_err(|errors| {
            warn!("Rejected application form with {} invalid field(s)", errors.len());
            PortalError::InvalidForm(errors)
        })?;

        let application = NewApplication::from_form(kind, form);
        let id = self.insert(&application).await?;

        info!("Received {} application {}", kind, id);
        self.feed.publish(ApplicationEvent::Inserted { id });
        Ok(id)
    }

    async fn insert(&self, app: &NewApplication) -> Result<i64, PortalError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO applications
            (application_type, status, applicant_name, email, phone, address,
             child_name, child_age, relationship, loss_description, activity_description,
             school_name, essay, transcript_url, recommendation_url, self_care_plan,
             region, conflict_description, requested_amount, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(app.application_type)
        .bind(ApplicationStatus::Pending)
        .bind(&app.applicant_name)
        .bind(&app.email)
        .bind(&app.phone)
        .bind(&app.address)
        .bind(&app.child_name)
        .bind(app.child_age)
        .bind(&app.relationship)
        .bind(&app.loss_description)
        .bind(&app.activity_description)
        .bind(&app.school_name)
        .bind(&app.essay)
        .bind(&app.transcript_url)
        .bind(&app.recommendation_url)
        .bind(&app.self_care_plan)
        .bind(&app.region)
        .bind(&app.conflict_description)
        .bind(app.requested_amount)
        .bind(now)
        .bind(now)
        .execute(self.database.pool())
        .await
        .map_err(|e| PortalError::DatabaseError(format!("Failed to submit application: {}", e)))?;

        Ok(result.last_insert_rowid())
    }
}
