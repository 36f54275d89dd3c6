//! Audit log endpoints
//!
//! - `GET /api/audit` - newest-first paginated audit entries for the
//!   security dashboard; supervisors and admins only

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::{caller_profile, fail, ApiResponse, AppState};
use crate::access::audit_log::DEFAULT_PAGE_SIZE;
use crate::models::{AuditFilter, AuditLogEntry, Page};

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub user_id: Option<Uuid>,
    /// Disclosed field class, e.g. `national_id`
    pub field: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

pub fn create_audit_router() -> Router<AppState> {
    Router::new().route("/api/audit", get(query_audit))
}

async fn query_audit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AuditQuery>,
) -> Result<Json<ApiResponse<Page<AuditLogEntry>>>, (StatusCode, String)> {
    let profile = caller_profile(&state, &headers).await?;

    let filter = AuditFilter {
        user_id: query.user_id,
        field_accessed: query.field,
        from: query.from,
        to: query.to,
    };
    let page = state
        .audit
        .query(&profile, &filter, query.page, query.limit)
        .await
        .map_err(fail)?;
    Ok(ApiResponse::ok(page))
}
