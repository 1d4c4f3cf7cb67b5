use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for AMap style identifiers
    /// - Valid: "amap://styles/dark", "amap://styles/whitesmoke", "amap://styles/0a1b2c3d4e5f"
    /// - Invalid: "dark", "amap://dark", "amap://styles/", "http://styles/dark"
    pub static ref MAP_STYLE_REGEX: Regex = Regex::new(r"^amap://styles/[A-Za-z0-9_]+$").unwrap();

    /// Regex for AMap `location` strings ("lng,lat")
    pub static ref LNG_LAT_REGEX: Regex =
        Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*$").unwrap();
}
