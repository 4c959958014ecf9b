//! Bearer-token extraction, role gates and JSON bodies

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{header, request::Parts},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};

use super::AppState;
use crate::auth::{Dashboard, SessionUser};
use crate::error::PortalError;

#[derive(Debug, Deserialize)]
struct TokenQuery {
    access_token: Option<String>,
}

/// The signed-in caller. Rejects with 401 when no valid session is presented.
#[derive(Debug, Clone)]
pub struct AuthUser(pub SessionUser);

impl AuthUser {
    /// 403 unless the caller's role opens `dashboard`
    pub fn require(&self, dashboard: Dashboard) -> Result<&SessionUser, PortalError> {
        if self.0.role.can_access(dashboard) {
            Ok(&self.0)
        } else {
            Err(PortalError::Forbidden(format!(
                "{} accounts cannot use the {}",
                self.0.role,
                dashboard.name()
            )))
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let from_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim().to_string());

    // EventSource cannot send headers, so the stream endpoint takes ?access_token=
    from_header.or_else(|| {
        Query::<TokenQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.access_token)
    })
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = PortalError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| PortalError::AuthError("Please sign in".to_string()))?;
        let user = state.auth.session(&token).await?;
        Ok(AuthUser(user))
    }
}

/// `Json<T>` whose rejection is a `PortalError`, so malformed bodies get the JSON error shape.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = PortalError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}
