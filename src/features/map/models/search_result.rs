use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::map::models::Coordinate;

/// A place returned by the geocoding provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchResult {
    /// Provider POI id
    pub id: String,
    pub name: String,
    pub address: String,
    pub location: Coordinate,
    /// Administrative division code
    pub adcode: String,
    pub cityname: String,
}
