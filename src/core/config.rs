use std::env;
use std::time::Duration;

use crate::features::map::models::Coordinate;
use crate::shared::constants::{
    DEFAULT_CENTER, DEFAULT_MAP_STYLE, DEFAULT_SEARCH_CITY, DEFAULT_ZOOM, MARKER_LIST_TTL_SECS,
    MIN_QUERY_CHARS, SEARCH_DEBOUNCE_MS,
};
use crate::shared::validation::MAP_STYLE_REGEX;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub swagger: SwaggerConfig,
    pub amap: AmapConfig,
    pub map_view: MapViewConfig,
    pub search: SearchConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// AMap credentials and place-search defaults
#[derive(Debug, Clone)]
pub struct AmapConfig {
    /// Key used by the JS SDK loader
    pub key: String,
    /// Security code injected into the SDK's global security config
    pub security_code: String,
    /// Key for the REST web service (place search)
    pub web_service_key: String,
    pub api_base_url: String,
    /// City the place search is biased towards
    pub search_city: String,
    /// Restrict results to `search_city` when true
    pub search_city_limit: bool,
    pub search_page_size: u32,
}

/// Initial viewport for the map view
#[derive(Debug, Clone)]
pub struct MapViewConfig {
    pub center: Coordinate,
    pub zoom: f64,
    pub style: String,
    pub view_mode: String,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub debounce: Duration,
    pub min_query_chars: usize,
    /// Drop responses of superseded requests instead of applying them
    pub discard_stale_responses: bool,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub marker_list_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            amap: AmapConfig::from_env()?,
            map_view: MapViewConfig::from_env()?,
            search: SearchConfig::from_env()?,
            cache: CacheConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        Ok(Self {
            url,
            max_connections: parse_env("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?,
            min_connections: parse_env("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?,
            acquire_timeout_secs: parse_env(
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parse_env("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?,
            max_lifetime_secs: parse_env("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "VibeTJ Map API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for the VibeTJ map lab".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl AmapConfig {
    const DEFAULT_API_BASE_URL: &'static str = "https://restapi.amap.com";
    const DEFAULT_SEARCH_PAGE_SIZE: u32 = 10;

    pub fn from_env() -> Result<Self, String> {
        // Missing keys leave the map unavailable at runtime, they do not stop the server
        let key = env::var("AMAP_KEY").unwrap_or_default();
        let security_code = env::var("AMAP_SECURITY_CODE").unwrap_or_default();
        let web_service_key = env::var("AMAP_WEB_SERVICE_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| key.clone());

        let api_base_url = env::var("AMAP_API_BASE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let search_city =
            env::var("AMAP_SEARCH_CITY").unwrap_or_else(|_| DEFAULT_SEARCH_CITY.to_string());

        let search_city_limit = parse_env("AMAP_SEARCH_CITY_LIMIT", false)?;
        let search_page_size = parse_env("AMAP_SEARCH_PAGE_SIZE", Self::DEFAULT_SEARCH_PAGE_SIZE)?;

        Ok(Self {
            key,
            security_code,
            web_service_key,
            api_base_url,
            search_city,
            search_city_limit,
            search_page_size,
        })
    }
}

impl MapViewConfig {
    pub fn from_env() -> Result<Self, String> {
        let lng = parse_env("MAP_CENTER_LNG", DEFAULT_CENTER.lng)?;
        let lat = parse_env("MAP_CENTER_LAT", DEFAULT_CENTER.lat)?;
        let center = Coordinate::new(lat, lng)
            .ok_or_else(|| "MAP_CENTER_LAT/MAP_CENTER_LNG must be finite".to_string())?;

        let zoom = parse_env("MAP_ZOOM", DEFAULT_ZOOM)?;

        let style = env::var("MAP_STYLE").unwrap_or_else(|_| DEFAULT_MAP_STYLE.to_string());
        if !MAP_STYLE_REGEX.is_match(&style) {
            return Err(format!(
                "MAP_STYLE must look like amap://styles/<name>, got '{}'",
                style
            ));
        }

        let view_mode = env::var("MAP_VIEW_MODE").unwrap_or_else(|_| "3D".to_string());
        if view_mode != "2D" && view_mode != "3D" {
            return Err("MAP_VIEW_MODE must be 2D or 3D".to_string());
        }

        Ok(Self {
            center,
            zoom,
            style,
            view_mode,
        })
    }
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            style: DEFAULT_MAP_STYLE.to_string(),
            view_mode: "3D".to_string(),
        }
    }
}

impl SearchConfig {
    pub fn from_env() -> Result<Self, String> {
        let debounce_ms = parse_env("SEARCH_DEBOUNCE_MS", SEARCH_DEBOUNCE_MS)?;
        let min_query_chars = parse_env("SEARCH_MIN_QUERY_CHARS", MIN_QUERY_CHARS)?;
        let discard_stale_responses = parse_env("SEARCH_DISCARD_STALE", true)?;

        Ok(Self {
            debounce: Duration::from_millis(debounce_ms),
            min_query_chars,
            discard_stale_responses,
        })
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(SEARCH_DEBOUNCE_MS),
            min_query_chars: MIN_QUERY_CHARS,
            discard_stale_responses: true,
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Result<Self, String> {
        let ttl_secs = parse_env("MARKER_LIST_TTL_SECS", MARKER_LIST_TTL_SECS)?;
        Ok(Self {
            marker_list_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

/// Read `name` from the environment, falling back to `default` when unset
fn parse_env<T>(name: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid value", name)),
        _ => Ok(default),
    }
}
