use chrono::NaiveDateTime;
use sqlx::FromRow;

use crate::features::map::models::Coordinate;

/// Database model for a saved map marker (`map_markers` table)
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MapMarker {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub description: Option<String>,
    pub event_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl MapMarker {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// Validated insert payload; `id` and `created_at` come from the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewMapMarker {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub address: Option<String>,
    pub description: Option<String>,
}
