mod map_marker_service;
mod marker_store;
mod place_search;

pub use map_marker_service::MapMarkerService;
pub use marker_store::{MarkerStore, PgMarkerStore};
pub use place_search::{AmapPlaceSearch, PlaceSearch, SearchError};
