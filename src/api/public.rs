//! Public pages: programs, application intake, uploads and donations

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::Value;

use super::{AppState, JsonBody};
use crate::applications::validation;
use crate::applications::{ApplicationForm, ApplicationStatus, ApplicationType};
use crate::donations::{CheckoutSession, DonationOutcome, DonationRequest, ReturnQuery, PRESET_AMOUNTS};
use crate::error::PortalError;
use crate::storage::{StoredObject, UploadRequest, SCHOLARSHIP_BUCKET};

pub async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "foundation-portal",
        "timestamp": chrono::Utc::now()
    }))
}

#[derive(Debug, Serialize)]
pub struct Program {
    pub application_type: ApplicationType,
    pub name: &'static str,
    pub description: &'static str,
    pub min_amount: i64,
    pub max_amount: i64,
}

pub async fn programs() -> Json<Vec<Program>> {
    let programs = ApplicationType::ALL
        .iter()
        .map(|kind| {
            let (min_amount, max_amount) = validation::amount_range(*kind);
            Program {
                application_type: *kind,
                name: kind.display_name(),
                description: kind.description(),
                min_amount,
                max_amount,
            }
        })
        .collect();
    Json(programs)
}

pub async fn submit_application(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<ApplicationForm>,
) -> Result<(StatusCode, Json<Value>), PortalError> {
    let id = state.intake.submit(&form).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "id": id,
            "status": ApplicationStatus::Pending,
            "message": "Thank you. Your application has been received and is pending review."
        })),
    ))
}

pub async fn upload_scholarship_document(
    State(state): State<AppState>,
    JsonBody(upload): JsonBody<UploadRequest>,
) -> Result<(StatusCode, Json<StoredObject>), PortalError> {
    let bytes = upload.decode()?;
    let stored = state
        .store
        .put(SCHOLARSHIP_BUCKET, &upload.file_name, &bytes)
        .await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn serve_object(
    State(state): State<AppState>,
    Path((bucket, key)): Path<(String, String)>,
) -> Result<Response, PortalError> {
    let bytes = state.store.get(&bucket, &key).await?;
    let content_type = match key.rsplit('.').next() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    };
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

pub async fn donation_presets() -> Json<Value> {
    Json(serde_json::json!({
        "presets": PRESET_AMOUNTS,
        "min": crate::donations::types::MIN_DONATION,
        "max": crate::donations::types::MAX_DONATION,
        "donation_types": crate::donations::types::DONATION_TYPES,
    }))
}

pub async fn create_checkout_session(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<DonationRequest>,
) -> Result<Json<CheckoutSession>, PortalError> {
    let session = state.checkout.create_session(&request).await?;
    Ok(Json(session))
}

pub async fn donation_return(Query(query): Query<ReturnQuery>) -> Json<Value> {
    let outcome = DonationOutcome::from_query(&query);
    Json(serde_json::json!({
        "outcome": outcome,
        "message": outcome.message(),
    }))
}
