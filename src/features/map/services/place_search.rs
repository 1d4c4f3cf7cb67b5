use async_trait::async_trait;
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::map::models::{Coordinate, SearchResult};
use crate::modules::amap::{AmapError, AmapPlaceSearchClient, AmapPoi};

#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    #[error("Place search unavailable: {0}")]
    Unavailable(String),

    #[error("Place search failed: {0}")]
    Provider(String),
}

impl From<AmapError> for SearchError {
    fn from(e: AmapError) -> Self {
        match e {
            AmapError::Request(_) | AmapError::Status(_) => SearchError::Unavailable(e.to_string()),
            AmapError::Parse(_) | AmapError::Rejected { .. } => SearchError::Provider(e.to_string()),
        }
    }
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        AppError::ExternalServiceError(e.to_string())
    }
}

/// Geocoding port used by search
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>, SearchError>;
}

/// `PlaceSearch` backed by the AMap web service
pub struct AmapPlaceSearch {
    client: Arc<AmapPlaceSearchClient>,
}

impl AmapPlaceSearch {
    pub fn new(client: Arc<AmapPlaceSearchClient>) -> Self {
        Self { client }
    }

    /// POIs without a usable location are dropped
    fn to_search_result(poi: AmapPoi) -> Option<SearchResult> {
        let location = Coordinate::parse_lng_lat(&poi.location)?;
        Some(SearchResult {
            id: poi.id,
            name: poi.name,
            address: poi.address,
            location,
            adcode: poi.adcode,
            cityname: poi.cityname,
        })
    }
}

#[async_trait]
impl PlaceSearch for AmapPlaceSearch {
    async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>, SearchError> {
        let response = self.client.place_text(keyword).await?;
        let total = response.pois.len();

        let results: Vec<SearchResult> = response
            .pois
            .into_iter()
            .filter_map(Self::to_search_result)
            .collect();

        if results.len() < total {
            tracing::debug!(
                "Dropped {} POIs without a location for {:?}",
                total - results.len(),
                keyword
            );
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poi(location: &str) -> AmapPoi {
        AmapPoi {
            id: "B0FFG".to_string(),
            name: "天津站".to_string(),
            address: "新纬路1号".to_string(),
            location: location.to_string(),
            adcode: "120102".to_string(),
            cityname: "天津市".to_string(),
        }
    }

    #[test]
    fn test_poi_maps_to_search_result() {
        let result = AmapPlaceSearch::to_search_result(poi("117.210813,39.136235")).unwrap();
        assert_eq!(result.location, Coordinate { lat: 39.136235, lng: 117.210813 });
        assert_eq!(result.adcode, "120102");
    }

    #[test]
    fn test_poi_without_location_is_dropped() {
        assert!(AmapPlaceSearch::to_search_result(poi("")).is_none());
    }

    #[test]
    fn test_amap_errors_classify() {
        assert!(matches!(
            SearchError::from(AmapError::Status(503)),
            SearchError::Unavailable(_)
        ));
        assert!(matches!(
            SearchError::from(AmapError::Rejected {
                info: "INVALID_USER_KEY".to_string(),
                infocode: "10001".to_string()
            }),
            SearchError::Provider(_)
        ));
    }
}
