use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::map::handlers::{self, MapState};
use crate::features::map::services::{MapMarkerService, PlaceSearch};

/// Create routes for the map feature
///
/// Note: This feature is public (no authentication required)
pub fn routes(
    marker_service: Arc<MapMarkerService>,
    place_search: Arc<dyn PlaceSearch>,
    min_query_chars: usize,
) -> Router {
    let state = MapState {
        marker_service,
        place_search,
        min_query_chars,
    };

    Router::new()
        .route(
            "/api/map/markers",
            get(handlers::list_markers).post(handlers::create_marker),
        )
        .route("/api/map/search", get(handlers::search_places))
        .with_state(state)
}
