//! AMap integration
//!
//! REST place search client and the SDK's process-wide security config.

mod place_search_client;
pub mod security;

pub use place_search_client::{AmapError, AmapPlaceSearchClient, AmapPoi, PlaceTextResponse};
