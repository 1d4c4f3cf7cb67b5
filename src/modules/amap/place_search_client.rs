//! AMap web service client for keyword place search (`/v3/place/text`)

use serde::{Deserialize, Deserializer};
use tracing::{debug, error, warn};

use crate::core::config::AmapConfig;

/// Place search response envelope
#[derive(Debug, Deserialize)]
pub struct PlaceTextResponse {
    /// "1" on success, "0" on failure
    pub status: String,
    pub info: String,
    #[serde(default)]
    pub infocode: String,
    #[serde(default)]
    pub pois: Vec<AmapPoi>,
}

impl PlaceTextResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "1"
    }
}

/// One POI as AMap returns it; empty text fields arrive as `[]`
#[derive(Debug, Deserialize)]
pub struct AmapPoi {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub address: String,
    /// "lng,lat"
    #[serde(default, deserialize_with = "text_or_empty")]
    pub location: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub adcode: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub cityname: String,
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrList {
        Text(String),
        List(Vec<String>),
    }

    Ok(match TextOrList::deserialize(deserializer)? {
        TextOrList::Text(s) => s,
        TextOrList::List(items) => items.join(""),
    })
}

#[derive(Debug, thiserror::Error)]
pub enum AmapError {
    #[error("AMap request failed: {0}")]
    Request(String),

    #[error("AMap returned HTTP {0}")]
    Status(u16),

    #[error("Failed to parse AMap response: {0}")]
    Parse(String),

    #[error("AMap rejected the request: {info} ({infocode})")]
    Rejected { info: String, infocode: String },
}

/// Client for the AMap REST place search
pub struct AmapPlaceSearchClient {
    client: reqwest::Client,
    base_url: String,
    key: String,
    city: String,
    city_limit: bool,
    page_size: u32,
}

impl AmapPlaceSearchClient {
    pub fn new(config: &AmapConfig) -> Result<Self, AmapError> {
        let client = reqwest::Client::builder()
            .user_agent("VibeTJ/1.0 (map-lab)")
            .build()
            .map_err(|e| AmapError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            key: config.web_service_key.clone(),
            city: config.search_city.clone(),
            city_limit: config.search_city_limit,
            page_size: config.search_page_size,
        })
    }

    fn place_text_url(&self, keywords: &str) -> String {
        format!(
            "{}/v3/place/text?keywords={}&city={}&citylimit={}&offset={}&page=1&extensions=base&output=json&key={}",
            self.base_url,
            urlencoding::encode(keywords),
            urlencoding::encode(&self.city),
            self.city_limit,
            self.page_size,
            urlencoding::encode(&self.key)
        )
    }

    /// Keyword search biased to the configured city
    pub async fn place_text(&self, keywords: &str) -> Result<PlaceTextResponse, AmapError> {
        let url = self.place_text_url(keywords);
        debug!("AMap place search: {:?} (city={})", keywords, self.city);

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!("AMap request failed: {:?}", e);
            AmapError::Request(e.to_string())
        })?;

        if !response.status().is_success() {
            warn!("AMap returned status: {}", response.status());
            return Err(AmapError::Status(response.status().as_u16()));
        }

        let body: PlaceTextResponse = response.json().await.map_err(|e| {
            error!("Failed to parse AMap response: {:?}", e);
            AmapError::Parse(e.to_string())
        })?;

        if !body.is_ok() {
            warn!("AMap rejected search: {} ({})", body.info, body.infocode);
            return Err(AmapError::Rejected {
                info: body.info,
                infocode: body.infocode,
            });
        }

        Ok(body)
    }
}
