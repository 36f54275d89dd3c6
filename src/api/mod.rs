//! REST API module for the access-control core
//!
//! HTTP endpoints over the session manager, masking policy, audit log, and
//! role registry. Caller identity arrives as `x-user-id`/`x-user-email`
//! headers injected by the fronting identity provider; elevated access is
//! carried in `x-access-token`.

pub mod access_routes;
pub mod admin_routes;
pub mod audit_routes;
pub mod driver_routes;

use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::access::{AuditLog, MaskingPolicy, RoleRegistry, SessionManager};
use crate::admin::AdminService;
use crate::error::AccessError;
use crate::models::Profile;
use crate::store::SharedStore;

// ============================================================================
// Application state
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub registry: RoleRegistry,
    pub sessions: SessionManager,
    pub masking: MaskingPolicy,
    pub audit: AuditLog,
    pub admin: AdminService,
}

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        Self {
            registry: RoleRegistry::new(store.clone()),
            sessions: SessionManager::new(store.clone()),
            masking: MaskingPolicy::new(store.clone()),
            audit: AuditLog::new(store.clone()),
            admin: AdminService::new(store),
        }
    }
}

// ============================================================================
// Response envelope and error mapping
// ============================================================================

#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

pub(crate) fn status_for(error: &AccessError) -> StatusCode {
    match error {
        AccessError::Validation { .. } => StatusCode::BAD_REQUEST,
        AccessError::PermissionDenied { .. } => StatusCode::FORBIDDEN,
        AccessError::NotFound { .. } => StatusCode::NOT_FOUND,
        AccessError::BackingStore { .. } => StatusCode::BAD_GATEWAY,
        AccessError::AuditWriteFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn fail(error: AccessError) -> (StatusCode, String) {
    (status_for(&error), error.to_string())
}

// ============================================================================
// Caller identity
// ============================================================================

/// Resolve the calling profile from the identity headers, provisioning it
/// on first sign-in.
pub(crate) async fn caller_profile(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Profile, (StatusCode, String)> {
    let user_id = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "missing or malformed x-user-id header".to_string(),
        ))?;
    let email = headers
        .get("x-user-email")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown@local")
        .to_string();

    state
        .registry
        .get_or_create_profile(user_id, &email)
        .await
        .map_err(fail)
}

/// Elevated-access token, when the caller presents one
pub(crate) fn access_token(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get("x-access-token")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
}

/// Caller network origin for audit entries
pub(crate) fn request_origin(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.split(',').next().unwrap_or(s).trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .merge(access_routes::create_access_router())
        .merge(driver_routes::create_driver_router())
        .merge(audit_routes::create_audit_router())
        .merge(admin_routes::create_admin_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

async fn health_check() -> Json<ApiResponse<String>> {
    ApiResponse::ok("OK".to_string())
}
