//! Sensitive-access session endpoints
//!
//! - `POST /api/access/sessions` - request an elevated-access grant
//! - `POST /api/access/sessions/:token/revoke` - admin-only early revocation

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{caller_profile, fail, ApiResponse, AppState};
use crate::access::level::AccessLevel;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// `sensitive` or `full_pii`
    pub level: String,
    pub justification: String,
}

#[derive(Debug, Serialize)]
pub struct SessionGrantResponse {
    pub token: Uuid,
    /// ISO-8601 expiry instant
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct RevokeResponse {
    pub token: Uuid,
    pub revoked_at: Option<DateTime<Utc>>,
}

pub fn create_access_router() -> Router<AppState> {
    Router::new()
        .route("/api/access/sessions", post(create_session))
        .route("/api/access/sessions/:token/revoke", post(revoke_session))
}

async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<ApiResponse<SessionGrantResponse>>, (StatusCode, String)> {
    let profile = caller_profile(&state, &headers).await?;

    let level: AccessLevel = request.level.parse().map_err(fail)?;
    let grant = state
        .sessions
        .create_session(profile.user_id, level, &request.justification)
        .await
        .map_err(fail)?;

    Ok(ApiResponse::ok(SessionGrantResponse {
        token: grant.token,
        expires_at: grant.expires_at,
    }))
}

async fn revoke_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(token): Path<Uuid>,
) -> Result<Json<ApiResponse<RevokeResponse>>, (StatusCode, String)> {
    let profile = caller_profile(&state, &headers).await?;

    let session = state.sessions.revoke(&profile, token).await.map_err(fail)?;
    Ok(ApiResponse::ok(RevokeResponse {
        token: session.token,
        revoked_at: session.revoked_at,
    }))
}
