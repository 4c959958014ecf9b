//! Board dashboard: meetings, minutes and minutes voting

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::{AppState, AuthUser, JsonBody};
use crate::auth::Dashboard;
use crate::database::models::{Meeting, MeetingMinutes};
use crate::error::PortalError;
use crate::meetings::{AttendanceStatus, MeetingDetail, MinutesDetail, MinutesVoteChoice, NewMeeting};
use crate::storage::UploadRequest;

#[derive(Debug, Deserialize)]
pub struct MinutesUpload {
    pub title: String,
    #[serde(flatten)]
    pub file: UploadRequest,
}

#[derive(Debug, Deserialize)]
pub struct AttendanceRequest {
    pub status: AttendanceStatus,
}

#[derive(Debug, Deserialize)]
pub struct MinutesVoteRequest {
    pub vote: MinutesVoteChoice,
    #[serde(default)]
    pub comment: Option<String>,
}

pub async fn list_meetings(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Meeting>>, PortalError> {
    auth.require(Dashboard::Board)?;
    Ok(Json(state.meetings.list_meetings().await?))
}

pub async fn create_meeting(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<NewMeeting>,
) -> Result<(StatusCode, Json<Meeting>), PortalError> {
    let user = auth.require(Dashboard::Board)?;
    let meeting = state.meetings.create_meeting(&request, user.id).await?;
    Ok((StatusCode::CREATED, Json(meeting)))
}

pub async fn meeting_detail(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MeetingDetail>, PortalError> {
    auth.require(Dashboard::Board)?;
    Ok(Json(state.meetings.meeting_detail(id).await?))
}

pub async fn upload_minutes(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(meeting_id): Path<i64>,
    JsonBody(upload): JsonBody<MinutesUpload>,
) -> Result<(StatusCode, Json<MeetingMinutes>), PortalError> {
    let user = auth.require(Dashboard::Board)?;
    let bytes = upload.file.decode()?;
    let minutes = state
        .meetings
        .upload_minutes(meeting_id, &upload.title, &upload.file.file_name, &bytes, user.id)
        .await?;
    Ok((StatusCode::CREATED, Json(minutes)))
}

pub async fn rsvp(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(meeting_id): Path<i64>,
    JsonBody(request): JsonBody<AttendanceRequest>,
) -> Result<Json<Value>, PortalError> {
    let user = auth.require(Dashboard::Board)?;
    state.meetings.rsvp(meeting_id, user.id, request.status).await?;
    Ok(Json(serde_json::json!({
        "meeting_id": meeting_id,
        "status": request.status,
    })))
}

/// Records the vote and returns the document's refreshed tally
pub async fn cast_minutes_vote(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(minutes_id): Path<i64>,
    JsonBody(request): JsonBody<MinutesVoteRequest>,
) -> Result<Json<MinutesDetail>, PortalError> {
    let user = auth.require(Dashboard::Board)?;
    state
        .meetings
        .cast_minutes_vote(minutes_id, user.id, request.vote, request.comment.as_deref())
        .await?;

    let minutes = state.meetings.get_minutes(minutes_id).await?;
    let votes = state.meetings.minutes_votes(minutes_id).await?;
    let tally = crate::meetings::MeetingManager::tally(&votes);
    Ok(Json(MinutesDetail { minutes, votes, tally }))
}
