use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::map::models::SearchResult;

/// Query params for place search
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct SearchQueryParams {
    /// Free-text keywords; fewer than two characters returns nothing
    #[serde(default)]
    pub keywords: String,
}

/// Place search response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponseDto {
    pub results: Vec<SearchResult>,
    /// Set when the search ran but matched nothing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}
