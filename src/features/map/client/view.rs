use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{error, info, warn};

use crate::core::config::{Config, SearchConfig};
use crate::core::error::Result;
use crate::features::map::client::binding::{
    EngineStatus, MapEngineBinding, OptionChange, SdkSettings,
};
use crate::features::map::client::engine::{MapOptions, SdkLoader};
use crate::features::map::client::search::SearchCoordinator;
use crate::features::map::client::session::{MapSessionController, SessionEvent};
use crate::features::map::client::sidebar::SidebarModel;
use crate::features::map::client::sync::{MarkerSyncEngine, ReconcileOutcome};
use crate::features::map::dtos::{CreateMapMarkerDto, CreateMarkerResult};
use crate::features::map::models::{Coordinate, MapMarker};
use crate::features::map::services::{MapMarkerService, PlaceSearch};
use crate::shared::constants::MAP_CONTAINER_ID;

/// How a map page is instantiated
#[derive(Debug, Clone)]
pub struct MapViewSettings {
    pub container_id: String,
    pub options: MapOptions,
    pub sdk: SdkSettings,
    pub search: SearchConfig,
}

impl MapViewSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            container_id: MAP_CONTAINER_ID.to_string(),
            options: MapOptions::from_config(&config.map_view),
            sdk: SdkSettings::from_config(&config.amap),
            search: config.search.clone(),
        }
    }
}

/// Fields the user fills in; the coordinate comes from the pending point
#[derive(Debug, Clone, Default)]
pub struct SaveLocationForm {
    pub name: String,
    pub address: Option<String>,
    pub description: Option<String>,
}

/// One open map page: marker list, session, engine, search box.
///
/// Engine handlers and the search box post `SessionEvent`s; `process_events`
/// applies them and runs a single reconcile pass.
pub struct MapView {
    gateway: Arc<MapMarkerService>,
    loader: Arc<dyn SdkLoader>,
    settings: MapViewSettings,
    markers: Arc<Vec<MapMarker>>,
    session: MapSessionController,
    binding: MapEngineBinding,
    sync: MarkerSyncEngine,
    search: SearchCoordinator,
    events: UnboundedReceiver<SessionEvent>,
    form_error: Option<String>,
}

impl MapView {
    /// Load the marker list and mount the map.
    ///
    /// A list failure aborts the page. An engine failure does not; the
    /// page stays usable and `engine_status` carries the error.
    pub async fn open(
        gateway: Arc<MapMarkerService>,
        loader: Arc<dyn SdkLoader>,
        places: Arc<dyn PlaceSearch>,
        settings: MapViewSettings,
    ) -> Result<Self> {
        let markers = gateway.list_all().await?;

        let (tx, rx) = mpsc::unbounded_channel();
        let binding = MapEngineBinding::new(
            settings.container_id.clone(),
            settings.options.clone(),
            settings.sdk.clone(),
        );

        let mut view = Self {
            gateway,
            loader,
            markers,
            session: MapSessionController::new(),
            binding,
            sync: MarkerSyncEngine::new(tx.clone()),
            search: SearchCoordinator::new(places, tx, settings.search.clone()),
            settings,
            events: rx,
            form_error: None,
        };

        view.mount().await;
        Ok(view)
    }

    async fn mount(&mut self) -> EngineStatus {
        let status = self.binding.mount(self.loader.as_ref()).await;
        match &status.error {
            Some(e) => warn!("Map unavailable, showing fallback: {}", e),
            None => {
                self.render();
            }
        }
        status
    }

    fn render(&mut self) -> ReconcileOutcome {
        self.sync.reconcile(
            &mut self.binding,
            &self.markers,
            self.session.selected_id(),
            self.session.temp_location(),
            self.session.force_focus_temp(),
        )
    }

    /// Apply queued events, then reconcile once. Returns how many were applied.
    pub fn process_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            if matches!(
                event,
                SessionEvent::CanvasClicked(_) | SessionEvent::SearchSelected(_)
            ) {
                self.form_error = None;
            }
            if matches!(event, SessionEvent::SearchSelected(_)) {
                self.sync.request_temp_focus();
            }
            self.session.apply(event);
            applied += 1;
        }

        if applied > 0 {
            self.render();
        }
        applied
    }

    /// Click on a location list entry
    pub fn select_marker(&mut self, id: i32) {
        self.session.select_marker(id);
        self.render();
    }

    /// Save the pending point with the form fields.
    ///
    /// On success the list is fetched again and the save form closes. On
    /// failure the pending point stays and the error is kept for the form.
    pub async fn save_location(&mut self, form: SaveLocationForm) -> CreateMarkerResult {
        let location = self.session.temp_location();
        let dto = CreateMapMarkerDto {
            name: Some(form.name),
            lat: location.map(|c| c.lat.into()),
            lng: location.map(|c| c.lng.into()),
            address: form.address,
            description: form.description,
        };

        let result = self.gateway.create(dto).await;

        if result.success {
            match self.gateway.list_all().await {
                Ok(markers) => self.markers = markers,
                Err(e) => error!("Saved, but failed to reload markers: {}", e),
            }
            self.form_error = None;
            self.session.clear_temp();
            self.render();
        } else {
            self.form_error = result.error.clone();
        }

        result
    }

    /// Close the save form and drop the pending point
    pub fn cancel_save(&mut self) {
        self.form_error = None;
        self.session.clear_temp();
        self.render();
    }

    /// Move the camera without recreating the engine
    pub fn set_view(&mut self, center: Option<Coordinate>, zoom: Option<f64>) -> bool {
        self.binding.set_view(center, zoom)
    }

    /// Apply new instantiation options, remounting when they differ
    pub async fn reconfigure(
        &mut self,
        container_id: &str,
        options: MapOptions,
    ) -> OptionChange {
        if self.binding.container_id() == container_id && self.binding.options() == &options {
            return OptionChange::Unchanged;
        }

        self.sync.detach(&mut self.binding);
        let change = self.binding.reconfigure(container_id, &options);

        info!("Remounting map in '{}'", container_id);
        self.settings.container_id = container_id.to_string();
        self.settings.options = options;
        self.binding = MapEngineBinding::new(
            self.settings.container_id.clone(),
            self.settings.options.clone(),
            self.settings.sdk.clone(),
        );
        self.mount().await;

        change
    }

    pub fn engine_status(&self) -> EngineStatus {
        self.binding.status()
    }

    pub fn search(&mut self) -> &mut SearchCoordinator {
        &mut self.search
    }

    pub fn session(&self) -> &MapSessionController {
        &self.session
    }

    pub fn markers(&self) -> &[MapMarker] {
        &self.markers
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    pub fn sidebar(&self) -> SidebarModel {
        SidebarModel::build(&self.markers, &self.session, self.form_error())
    }
}

impl Drop for MapView {
    fn drop(&mut self) {
        // Overlays and listeners go before the binding destroys the engine
        self.sync.detach(&mut self.binding);
    }
}
