//! Staff review dashboard endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::convert::Infallible;
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};

use super::{AppState, AuthUser, JsonBody};
use crate::applications::{
    ApplicationDetail, ApplicationFilter, ApplicationStatus, ApplicationVoteChoice,
};
use crate::auth::Dashboard;
use crate::database::models::{Application, Grant};
use crate::error::PortalError;

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub vote: ApplicationVoteChoice,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: ApplicationStatus,
    #[serde(default)]
    pub approved_amount: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

pub async fn list_applications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<ApplicationFilter>,
) -> Result<Json<Vec<Application>>, PortalError> {
    auth.require(Dashboard::Staff)?;
    let applications = state.review.list(&filter).await?;
    Ok(Json(applications))
}

pub async fn status_counts(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, i64>>, PortalError> {
    auth.require(Dashboard::Staff)?;
    Ok(Json(state.review.status_counts().await?))
}

/// Server-sent events: one `applications` event per row change, so the
/// dashboard can refetch its list.
pub async fn application_stream(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, PortalError> {
    auth.require(Dashboard::Staff)?;

    let events = BroadcastStream::new(state.feed.subscribe()).filter_map(|message| {
        let event = match message {
            Ok(change) => Event::default().event("applications").json_data(&change).ok()?,
            // Lagged receivers missed rows; a refetch covers them anyway.
            Err(_) => Event::default().event("applications").data("resync"),
        };
        Some(Ok::<Event, Infallible>(event))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

pub async fn application_detail(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApplicationDetail>, PortalError> {
    auth.require(Dashboard::Staff)?;
    Ok(Json(state.review.detail(id).await?))
}

pub async fn cast_vote(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<VoteRequest>,
) -> Result<Json<ApplicationDetail>, PortalError> {
    let user = auth.require(Dashboard::Staff)?;
    state
        .review
        .cast_vote(id, user.id, request.vote, request.comment.as_deref())
        .await?;
    Ok(Json(state.review.detail(id).await?))
}

pub async fn add_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<NoteRequest>,
) -> Result<(StatusCode, Json<Value>), PortalError> {
    let user = auth.require(Dashboard::Staff)?;
    let note_id = state.review.add_note(id, user.id, &request.note).await?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": note_id }))))
}

pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<StatusRequest>,
) -> Result<Json<Application>, PortalError> {
    let user = auth.require(Dashboard::Staff)?;
    let application = state
        .review
        .update_status(
            id,
            request.status,
            user.id,
            request.approved_amount,
            request.notes.as_deref(),
        )
        .await?;
    Ok(Json(application))
}

pub async fn list_grants(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Grant>>, PortalError> {
    auth.require(Dashboard::Staff)?;
    Ok(Json(state.review.grants().await?))
}
