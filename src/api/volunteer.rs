//! Volunteer portal endpoints, plus the staff-side opportunity and
//! announcement management.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;

use super::{AppState, AuthUser, JsonBody};
use crate::auth::Dashboard;
use crate::database::models::{
    VolunteerAnnouncement, VolunteerOpportunity, VolunteerProfile, VolunteerRsvp,
};
use crate::error::PortalError;
use crate::volunteers::{NewAnnouncement, NewOpportunity, ProfileUpdate};

/// Resolve the caller's volunteer profile, gating on the volunteer dashboard
async fn current_profile(auth: &AuthUser, state: &AppState) -> Result<VolunteerProfile, PortalError> {
    let user = auth.require(Dashboard::Volunteer)?;
    state.volunteers.get_profile_by_user(user.id).await
}

pub async fn my_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<VolunteerProfile>, PortalError> {
    Ok(Json(current_profile(&auth, &state).await?))
}

pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(update): JsonBody<ProfileUpdate>,
) -> Result<Json<VolunteerProfile>, PortalError> {
    let profile = current_profile(&auth, &state).await?;
    Ok(Json(state.volunteers.update_profile(profile.id, &update).await?))
}

pub async fn list_opportunities(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<VolunteerOpportunity>>, PortalError> {
    auth.require(Dashboard::Volunteer)?;
    Ok(Json(state.volunteers.list_opportunities().await?))
}

pub async fn rsvp(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(opportunity_id): Path<i64>,
) -> Result<(StatusCode, Json<VolunteerRsvp>), PortalError> {
    let profile = current_profile(&auth, &state).await?;
    let rsvp = state.volunteers.rsvp(opportunity_id, profile.id).await?;
    Ok((StatusCode::CREATED, Json(rsvp)))
}

pub async fn my_rsvps(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<VolunteerRsvp>>, PortalError> {
    let profile = current_profile(&auth, &state).await?;
    Ok(Json(state.volunteers.my_rsvps(profile.id).await?))
}

pub async fn cancel_rsvp(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(rsvp_id): Path<i64>,
) -> Result<Json<VolunteerRsvp>, PortalError> {
    let profile = current_profile(&auth, &state).await?;
    Ok(Json(state.volunteers.cancel_rsvp(rsvp_id, profile.id).await?))
}

pub async fn announcements(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Value>, PortalError> {
    let profile = current_profile(&auth, &state).await?;
    let announcements = state.volunteers.list_announcements(profile.id).await?;
    let unread = state.volunteers.unread_count(profile.id).await?;
    Ok(Json(serde_json::json!({
        "announcements": announcements,
        "unread_count": unread,
    })))
}

pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(announcement_id): Path<i64>,
) -> Result<Json<VolunteerAnnouncement>, PortalError> {
    let profile = current_profile(&auth, &state).await?;
    Ok(Json(state.volunteers.mark_read(announcement_id, profile.id).await?))
}

pub async fn create_opportunity(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<NewOpportunity>,
) -> Result<(StatusCode, Json<VolunteerOpportunity>), PortalError> {
    let user = auth.require(Dashboard::VolunteerAdmin)?;
    let opportunity = state.volunteers.create_opportunity(&request, user.id).await?;
    Ok((StatusCode::CREATED, Json(opportunity)))
}

pub async fn opportunity_rsvps(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(opportunity_id): Path<i64>,
) -> Result<Json<Vec<VolunteerRsvp>>, PortalError> {
    auth.require(Dashboard::VolunteerAdmin)?;
    state.volunteers.get_opportunity(opportunity_id).await?;
    Ok(Json(state.volunteers.opportunity_rsvps(opportunity_id).await?))
}

pub async fn mark_attended(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(rsvp_id): Path<i64>,
) -> Result<Json<VolunteerRsvp>, PortalError> {
    auth.require(Dashboard::VolunteerAdmin)?;
    Ok(Json(state.volunteers.mark_attended(rsvp_id).await?))
}

pub async fn create_announcement(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<NewAnnouncement>,
) -> Result<(StatusCode, Json<VolunteerAnnouncement>), PortalError> {
    let user = auth.require(Dashboard::VolunteerAdmin)?;
    let announcement = state.volunteers.create_announcement(&request, user.id).await?;
    Ok((StatusCode::CREATED, Json(announcement)))
}
