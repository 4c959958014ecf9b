//! Volunteer profiles, one per volunteer account

use tracing::info;

use super::opportunities::VolunteerManager;
use super::types::ProfileUpdate;
use crate::database::models::VolunteerProfile;
use crate::error::PortalError;

impl VolunteerManager {
    pub async fn get_profile_by_user(&self, user_id: i64) -> Result<VolunteerProfile, PortalError> {
        sqlx::query_as::<_, VolunteerProfile>("SELECT * FROM volunteer_profiles WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(self.database.pool())
            .await?
            .ok_or_else(|| PortalError::NotFound(format!("No volunteer profile for user {}", user_id)))
    }

    pub async fn update_profile(
        &self,
        profile_id: i64,
        update: &ProfileUpdate,
    ) -> Result<VolunteerProfile, PortalError> {
        if let Some(name) = &update.full_name {
            if name.trim().len() < 2 {
                return Err(PortalError::ValidationError(
                    "Full name must be at least 2 characters".to_string(),
                ));
            }
        }

        sqlx::query(
            r#"
            UPDATE volunteer_profiles SET
                full_name = COALESCE(?, full_name),
                phone = COALESCE(?, phone),
                skills = COALESCE(?, skills)
            WHERE id = ?
            "#,
        )
        .bind(update.full_name.as_deref().map(str::trim))
        .bind(update.phone.as_deref().map(str::trim))
        .bind(update.skills.as_deref().map(str::trim))
        .bind(profile_id)
        .execute(self.database.pool())
        .await?;

        info!("Updated volunteer profile {}", profile_id);
        sqlx::query_as::<_, VolunteerProfile>("SELECT * FROM volunteer_profiles WHERE id = ?")
            .bind(profile_id)
            .fetch_optional(self.database.pool())
            .await?
            .ok_or_else(|| PortalError::NotFound(format!("Profile {} not found", profile_id)))
    }
}
