mod coordinate;
mod map_marker;
mod search_result;

pub use coordinate::Coordinate;
pub use map_marker::{MapMarker, NewMapMarker};
pub use search_result::SearchResult;
