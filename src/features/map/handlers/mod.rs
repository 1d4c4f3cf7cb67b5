use std::sync::Arc;

use crate::features::map::services::{MapMarkerService, PlaceSearch};

mod map_marker_handler;
mod search_handler;

pub use map_marker_handler::*;
pub use search_handler::*;

/// State for map handlers
#[derive(Clone)]
pub struct MapState {
    pub marker_service: Arc<MapMarkerService>,
    pub place_search: Arc<dyn PlaceSearch>,
    /// Trimmed keywords shorter than this are answered without a lookup
    pub min_query_chars: usize,
}
