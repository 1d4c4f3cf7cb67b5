use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::validation::LNG_LAT_REGEX;

/// A point on the map (GCJ-02 datum, as used by AMap)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting NaN and infinities
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        (lat.is_finite() && lng.is_finite()).then_some(Self { lat, lng })
    }

    /// Parse an AMap `location` string such as `"117.200983,39.084158"`
    pub fn parse_lng_lat(raw: &str) -> Option<Self> {
        let caps = LNG_LAT_REGEX.captures(raw)?;
        let lng = caps[1].parse::<f64>().ok()?;
        let lat = caps[2].parse::<f64>().ok()?;
        Self::new(lat, lng)
    }
}
