//! Driver data endpoints
//!
//! - `GET /api/drivers/basic` - non-sensitive listing for unprivileged
//!   contexts (distinct query, sensitive columns never transit)
//! - `GET /api/drivers/secure` - masked listing, every record masked at
//!   the caller's effective tier
//! - `GET /api/drivers/:id/secure` - masked view per the field masking
//!   policy; discloses more under an active elevated-access session

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use uuid::Uuid;

use super::{access_token, caller_profile, fail, request_origin, ApiResponse, AppState};
use crate::models::{BasicDriverInfo, MaskedDriverView};

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/api/drivers/basic", get(list_drivers_basic))
        .route("/api/drivers/secure", get(list_drivers_secure))
        .route("/api/drivers/:id/secure", get(get_driver_secure))
}

async fn list_drivers_basic(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<BasicDriverInfo>>>, (StatusCode, String)> {
    // Any authenticated caller may see the non-sensitive listing.
    let _profile = caller_profile(&state, &headers).await?;

    let listing = state.masking.list_drivers_basic().await.map_err(fail)?;
    Ok(ApiResponse::ok(listing))
}

async fn list_drivers_secure(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<MaskedDriverView>>>, (StatusCode, String)> {
    let profile = caller_profile(&state, &headers).await?;
    let token = access_token(&headers);
    let origin = request_origin(&headers);

    let views = state
        .masking
        .resolve_driver_listing(&profile, token, &origin)
        .await
        .map_err(fail)?;
    Ok(ApiResponse::ok(views))
}

async fn get_driver_secure(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(driver_id): Path<Uuid>,
) -> Result<Json<ApiResponse<MaskedDriverView>>, (StatusCode, String)> {
    let profile = caller_profile(&state, &headers).await?;
    let token = access_token(&headers);
    let origin = request_origin(&headers);

    let view = state
        .masking
        .resolve_driver_view(&profile, token, driver_id, &origin)
        .await
        .map_err(fail)?;
    Ok(ApiResponse::ok(view))
}
