//! Interactive map of saved locations.
//!
//! Saved markers live in Postgres and are drawn on an AMap viewport. Users
//! click the map or search a place to get a pending point, then save it
//! through a small form.
//!
//! ## Layout
//!
//! - `models`, `dtos`, `services`, `handlers`: persistence and the HTTP API
//! - `client`: the page runtime (engine binding, overlay sync, search box,
//!   selection session)
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/map/markers` | List saved markers (cached) |
//! | POST | `/api/map/markers` | Save a location |
//! | GET | `/api/map/search?keywords=` | Search places near the default city |

pub mod client;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{AmapPlaceSearch, MapMarkerService, PgMarkerStore};
