//! Contract of the external mapping SDK.
//!
//! The SDK is loaded at runtime, so it is modelled as capabilities rather
//! than concrete types: a loader yields a constructor, the constructor
//! yields a viewport engine. Anything satisfying these traits can stand in
//! for the real SDK.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::features::map::client::style::MarkerAppearance;
use crate::features::map::models::Coordinate;

/// Options fixed at instantiation; changing any of them needs a new engine
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub center: Coordinate,
    pub zoom: f64,
    pub style: String,
    pub view_mode: ViewMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    TwoD,
    ThreeD,
}

impl ViewMode {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "2D" => ViewMode::TwoD,
            _ => ViewMode::ThreeD,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::TwoD => "2D",
            ViewMode::ThreeD => "3D",
        }
    }
}

/// What the loader needs to fetch the SDK
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub key: String,
    pub security_js_code: Option<String>,
    pub version: String,
    pub plugins: Vec<String>,
}

/// Engine-side identity of a marker overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(pub u64);

/// Handle returned by `MapEngine::on`, needed to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// A marker object as handed to the engine
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerOverlay {
    pub id: OverlayId,
    pub position: Coordinate,
    pub appearance: MarkerAppearance,
    /// Saved marker this overlay draws, `None` for the pending marker
    pub marker_id: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    /// The map canvas itself
    Map,
    Overlay(OverlayId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapEventKind {
    Click,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    Click { lnglat: Coordinate },
}

pub type EventHandler = Arc<dyn Fn(&MapEvent) + Send + Sync>;

/// A live viewport instance
pub trait MapEngine: Send {
    fn add(&mut self, overlays: Vec<MarkerOverlay>);
    fn remove(&mut self, overlays: &[OverlayId]);
    fn set_center(&mut self, center: Coordinate);
    fn set_zoom(&mut self, zoom: f64);
    fn set_zoom_and_center(&mut self, zoom: f64, center: Coordinate);
    fn on(&mut self, target: EventTarget, kind: MapEventKind, handler: EventHandler) -> ListenerId;
    fn off(&mut self, listener: ListenerId);
    /// Release the viewport and everything attached to it
    fn destroy(&mut self);
}

/// The loaded SDK namespace
pub trait EngineConstructor: Send + Sync {
    fn create_map(
        &self,
        container_id: &str,
        options: &MapOptions,
    ) -> Result<Box<dyn MapEngine>, EngineError>;
}

#[async_trait]
pub trait SdkLoader: Send + Sync {
    async fn load(&self, request: &LoadRequest) -> Result<Arc<dyn EngineConstructor>, EngineError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Failed to load map SDK: {0}")]
    SdkLoad(String),

    #[error("Failed to create map instance: {0}")]
    Instantiation(String),
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay#{}", self.0)
    }
}
