use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::map::dtos::{SearchQueryParams, SearchResponseDto};
use crate::features::map::handlers::MapState;
use crate::shared::constants::EMPTY_SEARCH_MESSAGE;
use crate::shared::types::ApiResponse;

/// Search places by keyword
///
/// Biased to the configured city without restricting to it. Keywords under
/// two characters return an empty list without a lookup.
#[utoipa::path(
    get,
    path = "/api/map/search",
    params(SearchQueryParams),
    responses(
        (status = 200, description = "Matching places", body = ApiResponse<SearchResponseDto>),
        (status = 502, description = "Geocoding provider failed")
    ),
    tag = "map"
)]
pub async fn search_places(
    State(state): State<MapState>,
    Query(params): Query<SearchQueryParams>,
) -> Result<Json<ApiResponse<SearchResponseDto>>> {
    let keywords = params.keywords.trim();

    if keywords.chars().count() < state.min_query_chars {
        return Ok(Json(ApiResponse::success(
            Some(SearchResponseDto {
                results: Vec::new(),
                empty_message: None,
            }),
            None,
            None,
        )));
    }

    let results = state.place_search.search(keywords).await?;
    let empty_message = results
        .is_empty()
        .then(|| EMPTY_SEARCH_MESSAGE.to_string());

    Ok(Json(ApiResponse::success(
        Some(SearchResponseDto {
            results,
            empty_message,
        }),
        None,
        None,
    )))
}
