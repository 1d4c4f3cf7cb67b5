use axum::{extract::State, http::StatusCode, Json};

use crate::core::error::Result;
use crate::core::extractor::ActionJson;
use crate::features::map::dtos::{CreateMapMarkerDto, CreateMarkerResult, MapMarkerResponseDto};
use crate::features::map::handlers::MapState;
use crate::features::map::services::MapMarkerService;
use crate::shared::types::{ActionResult, ApiResponse, Meta};

/// List saved markers
///
/// Dated markers first (newest event first), undated markers after them.
/// Served from a cache that is dropped on every successful save.
#[utoipa::path(
    get,
    path = "/api/map/markers",
    responses(
        (status = 200, description = "All saved markers", body = ApiResponse<Vec<MapMarkerResponseDto>>),
        (status = 500, description = "Failed to load map markers")
    ),
    tag = "map"
)]
pub async fn list_markers(
    State(state): State<MapState>,
) -> Result<Json<ApiResponse<Vec<MapMarkerResponseDto>>>> {
    let markers = state.marker_service.list_all().await?;
    let total = markers.len() as i64;
    let data: Vec<MapMarkerResponseDto> = markers.iter().cloned().map(Into::into).collect();

    Ok(Json(ApiResponse::success(
        Some(data),
        None,
        Some(Meta { total }),
    )))
}

/// Save a new location
///
/// `lat` and `lng` may be numbers or numeric strings. Failures keep the
/// action envelope so the form can show `error`.
#[utoipa::path(
    post,
    path = "/api/map/markers",
    request_body = CreateMapMarkerDto,
    responses(
        (status = 201, description = "Marker saved", body = ActionResult<MapMarkerResponseDto>),
        (status = 400, description = "Missing or invalid fields", body = ActionResult<MapMarkerResponseDto>),
        (status = 500, description = "Failed to save location", body = ActionResult<MapMarkerResponseDto>)
    ),
    tag = "map"
)]
pub async fn create_marker(
    State(state): State<MapState>,
    ActionJson(dto): ActionJson<CreateMapMarkerDto>,
) -> (StatusCode, Json<CreateMarkerResult>) {
    match state.marker_service.create_marker(dto).await {
        Ok(marker) => (StatusCode::CREATED, Json(ActionResult::ok(marker.into()))),
        Err(e) => (
            e.status_code(),
            Json(MapMarkerService::failure_result(&e)),
        ),
    }
}
