//! Test doubles shared by the map tests

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime, Utc};
use fake::faker::address::en::StreetName;
use fake::faker::company::en::CompanyName;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use std::cmp::Ordering as CmpOrdering;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::core::error::{AppError, Result};
use crate::features::map::client::binding::SdkSettings;
use crate::features::map::client::engine::{
    EngineConstructor, EngineError, EventHandler, EventTarget, ListenerId, LoadRequest, MapEngine,
    MapEvent, MapEventKind, MapOptions, MarkerOverlay, OverlayId, SdkLoader, ViewMode,
};
use crate::features::map::client::style::MarkerStyle;
use crate::features::map::models::{Coordinate, MapMarker, NewMapMarker, SearchResult};
use crate::features::map::services::{MarkerStore, PlaceSearch, SearchError};
use crate::shared::constants::{
    AMAP_SDK_PLUGINS, AMAP_SDK_VERSION, DEFAULT_CENTER, DEFAULT_MAP_STYLE, DEFAULT_ZOOM,
};

// =============================================================================
// FIXTURES
// =============================================================================

pub fn test_map_options() -> MapOptions {
    MapOptions {
        center: DEFAULT_CENTER,
        zoom: DEFAULT_ZOOM,
        style: DEFAULT_MAP_STYLE.to_string(),
        view_mode: ViewMode::ThreeD,
    }
}

pub fn test_sdk_settings() -> SdkSettings {
    SdkSettings {
        key: "test-amap-key".to_string(),
        security_code: "test-security-code".to_string(),
        version: AMAP_SDK_VERSION.to_string(),
        plugins: AMAP_SDK_PLUGINS.iter().map(|p| p.to_string()).collect(),
    }
}

/// A saved marker somewhere in central Tianjin
pub fn marker_fixture(id: i32, event_date: Option<NaiveDateTime>) -> MapMarker {
    let base = NaiveDate::from_ymd_opt(2025, 11, 1)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .unwrap();

    MapMarker {
        id,
        name: CompanyName().fake(),
        address: Some(StreetName().fake()),
        lat: (39.05..39.15).fake(),
        lng: (117.15..117.25).fake(),
        description: Some(Sentence(3..8).fake()),
        event_date,
        created_at: base + ChronoDuration::hours(id as i64),
    }
}

pub fn search_result_fixture(name: &str, lat: f64, lng: f64) -> SearchResult {
    SearchResult {
        id: format!("B0{}", (100_000u32..999_999u32).fake::<u32>()),
        name: name.to_string(),
        address: StreetName().fake(),
        location: Coordinate { lat, lng },
        adcode: "120101".to_string(),
        cityname: "天津市".to_string(),
    }
}

// =============================================================================
// MAP ENGINE
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Add(usize),
    Remove(usize),
    SetCenter(Coordinate),
    SetZoom(f64),
    SetZoomAndCenter(f64, Coordinate),
    On(EventTarget),
    Off,
}

#[derive(Default)]
struct EngineLog {
    overlays: BTreeMap<OverlayId, MarkerOverlay>,
    listeners: HashMap<ListenerId, (EventTarget, EventHandler)>,
    next_listener: u64,
    calls: Vec<EngineCall>,
    destroy_count: usize,
}

/// Engine that records what was done to it
pub struct FakeEngine {
    log: Arc<Mutex<EngineLog>>,
}

impl MapEngine for FakeEngine {
    fn add(&mut self, overlays: Vec<MarkerOverlay>) {
        let mut log = self.log.lock().unwrap();
        log.calls.push(EngineCall::Add(overlays.len()));
        for overlay in overlays {
            log.overlays.insert(overlay.id, overlay);
        }
    }

    fn remove(&mut self, overlays: &[OverlayId]) {
        let mut log = self.log.lock().unwrap();
        log.calls.push(EngineCall::Remove(overlays.len()));
        for id in overlays {
            log.overlays.remove(id);
        }
    }

    fn set_center(&mut self, center: Coordinate) {
        self.log.lock().unwrap().calls.push(EngineCall::SetCenter(center));
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.log.lock().unwrap().calls.push(EngineCall::SetZoom(zoom));
    }

    fn set_zoom_and_center(&mut self, zoom: f64, center: Coordinate) {
        self.log
            .lock()
            .unwrap()
            .calls
            .push(EngineCall::SetZoomAndCenter(zoom, center));
    }

    fn on(&mut self, target: EventTarget, _kind: MapEventKind, handler: EventHandler) -> ListenerId {
        let mut log = self.log.lock().unwrap();
        log.next_listener += 1;
        let id = ListenerId(log.next_listener);
        log.listeners.insert(id, (target, handler));
        log.calls.push(EngineCall::On(target));
        id
    }

    fn off(&mut self, listener: ListenerId) {
        let mut log = self.log.lock().unwrap();
        log.listeners.remove(&listener);
        log.calls.push(EngineCall::Off);
    }

    fn destroy(&mut self) {
        self.log.lock().unwrap().destroy_count += 1;
    }
}

/// Test-side view of a `FakeEngine` that outlives it
#[derive(Clone)]
pub struct FakeEngineHandle {
    log: Arc<Mutex<EngineLog>>,
}

impl FakeEngineHandle {
    pub fn overlays(&self) -> Vec<MarkerOverlay> {
        self.log.lock().unwrap().overlays.values().cloned().collect()
    }

    pub fn overlay_count(&self) -> usize {
        self.log.lock().unwrap().overlays.len()
    }

    pub fn overlays_with_style(&self, style: MarkerStyle) -> Vec<MarkerOverlay> {
        self.overlays()
            .into_iter()
            .filter(|o| o.appearance.style == style)
            .collect()
    }

    pub fn listener_count(&self) -> usize {
        self.log.lock().unwrap().listeners.len()
    }

    pub fn map_listener_count(&self) -> usize {
        self.log
            .lock()
            .unwrap()
            .listeners
            .values()
            .filter(|(target, _)| *target == EventTarget::Map)
            .count()
    }

    pub fn call_count(&self) -> usize {
        self.log.lock().unwrap().calls.len()
    }

    /// Camera calls as `(zoom, center)`
    pub fn camera_moves(&self) -> Vec<(Option<f64>, Option<Coordinate>)> {
        self.log
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter_map(|call| match call {
                EngineCall::SetCenter(c) => Some((None, Some(*c))),
                EngineCall::SetZoom(z) => Some((Some(*z), None)),
                EngineCall::SetZoomAndCenter(z, c) => Some((Some(*z), Some(*c))),
                _ => None,
            })
            .collect()
    }

    pub fn destroy_count(&self) -> usize {
        self.log.lock().unwrap().destroy_count
    }

    pub fn click_overlay(&self, overlay: OverlayId, lnglat: Coordinate) {
        self.fire(EventTarget::Overlay(overlay), MapEvent::Click { lnglat });
    }

    pub fn click_map(&self, lnglat: Coordinate) {
        self.fire(EventTarget::Map, MapEvent::Click { lnglat });
    }

    fn fire(&self, target: EventTarget, event: MapEvent) {
        // Handlers run outside the lock, as the SDK would call them
        let handlers: Vec<EventHandler> = self
            .log
            .lock()
            .unwrap()
            .listeners
            .values()
            .filter(|(t, _)| *t == target)
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in handlers {
            handler(&event);
        }
    }
}

struct FakeConstructor {
    fail_create: Option<String>,
    created: Mutex<Vec<(String, MapOptions)>>,
    engines: Mutex<Vec<FakeEngineHandle>>,
}

impl EngineConstructor for FakeConstructor {
    fn create_map(
        &self,
        container_id: &str,
        options: &MapOptions,
    ) -> std::result::Result<Box<dyn MapEngine>, EngineError> {
        if let Some(ref message) = self.fail_create {
            return Err(EngineError::Instantiation(message.clone()));
        }

        let log = Arc::new(Mutex::new(EngineLog::default()));
        self.created
            .lock()
            .unwrap()
            .push((container_id.to_string(), options.clone()));
        self.engines.lock().unwrap().push(FakeEngineHandle {
            log: Arc::clone(&log),
        });
        Ok(Box::new(FakeEngine { log }))
    }
}

/// SDK loader handing out `FakeEngine`s
pub struct FakeSdkLoader {
    fail_load: Option<String>,
    load_calls: AtomicUsize,
    requests: Mutex<Vec<LoadRequest>>,
    constructor: Arc<FakeConstructor>,
}

impl FakeSdkLoader {
    pub fn new() -> Self {
        Self::build(None, None)
    }

    pub fn failing_load(message: &str) -> Self {
        Self::build(Some(message.to_string()), None)
    }

    pub fn failing_create(message: &str) -> Self {
        Self::build(None, Some(message.to_string()))
    }

    fn build(fail_load: Option<String>, fail_create: Option<String>) -> Self {
        Self {
            fail_load,
            load_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            constructor: Arc::new(FakeConstructor {
                fail_create,
                created: Mutex::new(Vec::new()),
                engines: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<LoadRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn created_maps(&self) -> Vec<(String, MapOptions)> {
        self.constructor.created.lock().unwrap().clone()
    }

    pub fn engines(&self) -> Vec<FakeEngineHandle> {
        self.constructor.engines.lock().unwrap().clone()
    }

    pub fn last_engine(&self) -> Option<FakeEngineHandle> {
        self.constructor.engines.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl SdkLoader for FakeSdkLoader {
    async fn load(
        &self,
        request: &LoadRequest,
    ) -> std::result::Result<Arc<dyn EngineConstructor>, EngineError> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        match self.fail_load {
            Some(ref message) => Err(EngineError::SdkLoad(message.clone())),
            None => Ok(Arc::clone(&self.constructor) as Arc<dyn EngineConstructor>),
        }
    }
}

// =============================================================================
// MARKER STORE
// =============================================================================

/// `MarkerStore` over a vector, with switchable failures
#[derive(Default)]
pub struct InMemoryMarkerStore {
    markers: Mutex<Vec<MapMarker>>,
    list_calls: AtomicUsize,
    insert_calls: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryMarkerStore {
    pub fn with_markers(markers: Vec<MapMarker>) -> Self {
        Self {
            markers: Mutex::new(markers),
            ..Default::default()
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl MarkerStore for InMemoryMarkerStore {
    async fn list_all(&self) -> Result<Vec<MapMarker>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut markers = self.markers.lock().unwrap().clone();
        markers.sort_by(|a, b| {
            let by_event = match (a.event_date, b.event_date) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => CmpOrdering::Less,
                (None, Some(_)) => CmpOrdering::Greater,
                (None, None) => CmpOrdering::Equal,
            };
            by_event
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(markers)
    }

    async fn insert(&self, marker: NewMapMarker) -> Result<MapMarker> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut markers = self.markers.lock().unwrap();
        let id = markers.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        let saved = MapMarker {
            id,
            name: marker.name,
            address: marker.address,
            lat: marker.lat,
            lng: marker.lng,
            description: marker.description,
            event_date: None,
            created_at: Utc::now().naive_utc(),
        };
        markers.push(saved.clone());
        Ok(saved)
    }
}

// =============================================================================
// PLACE SEARCH
// =============================================================================

/// Canned geocoder; unknown keywords yield one result named after the keyword
#[derive(Default)]
pub struct StubPlaceSearch {
    results: HashMap<String, Vec<SearchResult>>,
    delays: HashMap<String, Duration>,
    failures: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
    completed: Mutex<Vec<String>>,
}

impl StubPlaceSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, keyword: &str, results: Vec<SearchResult>) -> Self {
        self.results.insert(keyword.to_string(), results);
        self
    }

    pub fn with_delay(mut self, keyword: &str, delay: Duration) -> Self {
        self.delays.insert(keyword.to_string(), delay);
        self
    }

    pub fn failing(mut self, keyword: &str, message: &str) -> Self {
        self.failures.insert(keyword.to_string(), message.to_string());
        self
    }

    /// Keywords in the order requests started
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Keywords in the order requests finished
    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlaceSearch for StubPlaceSearch {
    async fn search(&self, keyword: &str) -> std::result::Result<Vec<SearchResult>, SearchError> {
        self.calls.lock().unwrap().push(keyword.to_string());

        if let Some(delay) = self.delays.get(keyword) {
            tokio::time::sleep(*delay).await;
        }
        self.completed.lock().unwrap().push(keyword.to_string());

        if let Some(message) = self.failures.get(keyword) {
            return Err(SearchError::Provider(message.clone()));
        }

        Ok(self
            .results
            .get(keyword)
            .cloned()
            .unwrap_or_else(|| vec![search_result_fixture(keyword, 39.084158, 117.200983)]))
    }
}
