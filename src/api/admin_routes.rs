//! Administrative endpoints
//!
//! - `PUT /api/profiles/:id/role` - change a profile's role
//! - `DELETE /api/users/:id` - remove a user's profile
//! - `GET /api/admin/export` - full data export (audited)
//! - `POST /api/admin/import/drivers` - upsert driver records
//! - `POST /api/admin/audit/purge` - audit retention cleanup
//!
//! All of these require the admin role; the services enforce it.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use axum::routing::{delete, get, post, put};
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{caller_profile, fail, request_origin, ApiResponse, AppState};
use crate::access::level::Role;
use crate::admin::{ExportBundle, ImportSummary};
use crate::models::{DriverRecord, Profile};

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    /// `operator`, `inspector`, `supervisor`, or `admin`
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct ImportDriversRequest {
    pub drivers: Vec<DriverRecord>,
}

#[derive(Debug, Deserialize)]
pub struct PurgeAuditRequest {
    /// Entries strictly older than this instant are deleted
    pub older_than: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PurgeAuditResponse {
    pub purged: u64,
}

pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/api/profiles/:id/role", put(update_role))
        .route("/api/users/:id", delete(delete_user))
        .route("/api/admin/export", get(export_data))
        .route("/api/admin/import/drivers", post(import_drivers))
        .route("/api/admin/audit/purge", post(purge_audit))
}

async fn update_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(profile_id): Path<Uuid>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<ApiResponse<Profile>>, (StatusCode, String)> {
    let actor = caller_profile(&state, &headers).await?;

    let role: Role = request.role.parse().map_err(fail)?;
    let updated = state
        .registry
        .update_role(&actor, profile_id, role)
        .await
        .map_err(fail)?;
    Ok(ApiResponse::ok(updated))
}

async fn delete_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(profile_id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, String)> {
    let actor = caller_profile(&state, &headers).await?;

    state
        .registry
        .delete_user(&actor, profile_id)
        .await
        .map_err(fail)?;
    Ok(ApiResponse::ok(()))
}

async fn export_data(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<ExportBundle>>, (StatusCode, String)> {
    let actor = caller_profile(&state, &headers).await?;
    let origin = request_origin(&headers);

    let bundle = state
        .admin
        .export_data(&actor, &origin)
        .await
        .map_err(fail)?;
    Ok(ApiResponse::ok(bundle))
}

async fn import_drivers(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ImportDriversRequest>,
) -> Result<Json<ApiResponse<ImportSummary>>, (StatusCode, String)> {
    let actor = caller_profile(&state, &headers).await?;

    let summary = state
        .admin
        .import_drivers(&actor, request.drivers)
        .await
        .map_err(fail)?;
    Ok(ApiResponse::ok(summary))
}

async fn purge_audit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<PurgeAuditRequest>,
) -> Result<Json<ApiResponse<PurgeAuditResponse>>, (StatusCode, String)> {
    let actor = caller_profile(&state, &headers).await?;

    let purged = state
        .admin
        .purge_audit_older_than(&actor, request.older_than)
        .await
        .map_err(fail)?;
    Ok(ApiResponse::ok(PurgeAuditResponse { purged }))
}
