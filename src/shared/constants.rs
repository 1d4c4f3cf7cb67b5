use crate::features::map::models::Coordinate;

// =============================================================================
// MAP VIEW
// =============================================================================

/// Tianjin city center, the default viewport
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    lat: 39.084158,
    lng: 117.200983,
};

pub const DEFAULT_ZOOM: f64 = 13.0;

/// Zoom level used when the camera focuses a selected marker
pub const FOCUS_ZOOM: f64 = 16.0;

pub const DEFAULT_MAP_STYLE: &str = "amap://styles/dark";

pub const MAP_CONTAINER_ID: &str = "map-container";

// =============================================================================
// SDK
// =============================================================================

pub const AMAP_SDK_VERSION: &str = "2.0";

pub const AMAP_SDK_PLUGINS: [&str; 3] = ["AMap.Scale", "AMap.ToolBar", "AMap.PlaceSearch"];

// =============================================================================
// SEARCH
// =============================================================================

pub const DEFAULT_SEARCH_CITY: &str = "天津";

pub const SEARCH_DEBOUNCE_MS: u64 = 500;

/// Queries shorter than this (after trimming) never reach the provider
pub const MIN_QUERY_CHARS: usize = 2;

pub const EMPTY_SEARCH_MESSAGE: &str = "No matching places found. Try another keyword.";

// =============================================================================
// PERSISTENCE
// =============================================================================

/// Page-level cache lifetime for the marker list (1 hour)
pub const MARKER_LIST_TTL_SECS: u64 = 3600;

pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields: name, lat, lng";

pub const SAVE_FAILED_MESSAGE: &str = "Failed to save location";

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load map markers";

// =============================================================================
// SIDEBAR
// =============================================================================

pub const EMPTY_LIST_MESSAGE: &str = "No locations added yet.";

pub const EMPTY_LIST_HINT: &str = "Click on the map to add one.";

/// `created_at` label in the location list, e.g. `Nov 27`
pub const LIST_DATE_FORMAT: &str = "%b %-d";
