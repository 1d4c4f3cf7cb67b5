use tracing::{debug, error, info};

use crate::core::config::{AmapConfig, MapViewConfig};
use crate::features::map::client::engine::{
    EngineError, LoadRequest, MapEngine, MapOptions, SdkLoader, ViewMode,
};
use crate::features::map::models::Coordinate;
use crate::modules::amap::security;
use crate::shared::constants::{AMAP_SDK_PLUGINS, AMAP_SDK_VERSION};

/// Lifecycle of one mount.
///
/// `Uninitialized → Loading → Ready | Failed`, and any state ends in
/// `Destroyed` on unmount. Nothing leaves `Destroyed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    Uninitialized,
    Loading,
    Ready,
    Failed,
    Destroyed,
}

/// What consumers see of the binding
#[derive(Debug, Clone, PartialEq)]
pub struct EngineStatus {
    pub state: BindingState,
    pub ready: bool,
    pub error: Option<EngineError>,
}

/// Outcome of handing new instantiation options to a live binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionChange {
    Unchanged,
    /// The engine was torn down; mount a fresh binding with the new options
    Remount,
}

/// SDK credentials and load parameters
#[derive(Debug, Clone)]
pub struct SdkSettings {
    pub key: String,
    pub security_code: String,
    pub version: String,
    pub plugins: Vec<String>,
}

impl SdkSettings {
    pub fn from_config(config: &AmapConfig) -> Self {
        Self {
            key: config.key.clone(),
            security_code: config.security_code.clone(),
            version: AMAP_SDK_VERSION.to_string(),
            plugins: AMAP_SDK_PLUGINS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl MapOptions {
    pub fn from_config(config: &MapViewConfig) -> Self {
        Self {
            center: config.center,
            zoom: config.zoom,
            style: config.style.clone(),
            view_mode: ViewMode::parse(&config.view_mode),
        }
    }
}

/// Owns the viewport engine for exactly one mount.
///
/// The engine is created at most once and destroyed at most once; dropping
/// the binding unmounts it.
pub struct MapEngineBinding {
    container_id: String,
    /// Options the engine was created with; camera moves never touch these
    options: MapOptions,
    camera: (Coordinate, f64),
    sdk: SdkSettings,
    state: BindingState,
    engine: Option<Box<dyn MapEngine>>,
    error: Option<EngineError>,
}

impl MapEngineBinding {
    pub fn new(container_id: impl Into<String>, options: MapOptions, sdk: SdkSettings) -> Self {
        Self {
            container_id: container_id.into(),
            camera: (options.center, options.zoom),
            options,
            sdk,
            state: BindingState::Uninitialized,
            engine: None,
            error: None,
        }
    }

    /// Load the SDK and create the engine.
    ///
    /// Failures are recorded in the returned status, never returned as
    /// errors. Calling this again on the same binding does nothing.
    pub async fn mount(&mut self, loader: &dyn SdkLoader) -> EngineStatus {
        if self.state != BindingState::Uninitialized {
            debug!(
                "[AMap] Mount skipped for '{}', binding is {:?}",
                self.container_id, self.state
            );
            return self.status();
        }

        self.state = BindingState::Loading;

        match self.initialize(loader).await {
            Ok(engine) => {
                self.engine = Some(engine);
                self.state = BindingState::Ready;
                info!("[AMap] Map instance created in '{}'", self.container_id);
            }
            Err(e) => {
                error!("[AMap] Initialization failed: {}", e);
                self.error = Some(e);
                self.state = BindingState::Failed;
            }
        }

        self.status()
    }

    async fn initialize(&self, loader: &dyn SdkLoader) -> Result<Box<dyn MapEngine>, EngineError> {
        // The security code must be in place before the SDK loads
        security::inject_security_config(&self.sdk.security_code);

        let request = LoadRequest {
            key: self.sdk.key.clone(),
            security_js_code: security::security_config().map(|c| c.security_js_code.clone()),
            version: self.sdk.version.clone(),
            plugins: self.sdk.plugins.clone(),
        };

        let constructor = loader.load(&request).await?;
        info!("[AMap] API {} loaded successfully", request.version);

        constructor.create_map(&self.container_id, &self.options)
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            state: self.state,
            ready: self.state == BindingState::Ready,
            error: self.error.clone(),
        }
    }

    pub fn state(&self) -> BindingState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == BindingState::Ready
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    /// Current center and zoom, including soft view changes
    pub fn camera(&self) -> (Coordinate, f64) {
        self.camera
    }

    /// The live engine, only while `Ready`
    pub fn engine_mut(&mut self) -> Option<&mut (dyn MapEngine + 'static)> {
        if self.state != BindingState::Ready {
            return None;
        }
        self.engine.as_deref_mut()
    }

    /// Move the camera of the existing engine. Returns false when not ready.
    pub fn set_view(&mut self, center: Option<Coordinate>, zoom: Option<f64>) -> bool {
        let Some(engine) = self.engine_mut() else {
            return false;
        };

        match (center, zoom) {
            (Some(center), Some(zoom)) => engine.set_zoom_and_center(zoom, center),
            (Some(center), None) => engine.set_center(center),
            (None, Some(zoom)) => engine.set_zoom(zoom),
            (None, None) => return true,
        }

        if let Some(center) = center {
            self.camera.0 = center;
        }
        if let Some(zoom) = zoom {
            self.camera.1 = zoom;
        }
        true
    }

    /// Compare instantiation options; any difference tears the engine down.
    pub fn reconfigure(&mut self, container_id: &str, options: &MapOptions) -> OptionChange {
        if self.container_id == container_id && &self.options == options {
            return OptionChange::Unchanged;
        }

        info!(
            "[AMap] Instantiation options changed for '{}', remount required",
            self.container_id
        );
        self.unmount();
        OptionChange::Remount
    }

    /// Destroy the engine if one exists. Safe to call any number of times.
    pub fn unmount(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            info!("[AMap] Destroying map instance in '{}'", self.container_id);
            engine.destroy();
        }
        self.state = BindingState::Destroyed;
    }
}

impl Drop for MapEngineBinding {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{test_map_options, test_sdk_settings, FakeSdkLoader};

    fn binding() -> MapEngineBinding {
        MapEngineBinding::new("map-container", test_map_options(), test_sdk_settings())
    }

    #[tokio::test]
    async fn test_mount_reaches_ready() {
        let loader = FakeSdkLoader::new();
        let mut binding = binding();

        let status = binding.mount(&loader).await;

        assert!(status.ready);
        assert_eq!(status.state, BindingState::Ready);
        assert_eq!(status.error, None);
        assert_eq!(loader.load_calls(), 1);

        let created = loader.created_maps();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].0, "map-container");
        assert_eq!(created[0].1, test_map_options());
    }

    #[tokio::test]
    async fn test_load_request_carries_version_plugins_and_security_code() {
        let loader = FakeSdkLoader::new();
        let mut binding = binding();
        binding.mount(&loader).await;

        let request = loader.last_request().expect("load request recorded");
        assert_eq!(request.version, "2.0");
        assert!(request.plugins.iter().any(|p| p == "AMap.PlaceSearch"));
        assert!(request.security_js_code.is_some());
    }

    #[tokio::test]
    async fn test_second_mount_is_a_no_op() {
        let loader = FakeSdkLoader::new();
        let mut binding = binding();

        binding.mount(&loader).await;
        let status = binding.mount(&loader).await;

        assert!(status.ready);
        assert_eq!(loader.load_calls(), 1);
        assert_eq!(loader.created_maps().len(), 1);
    }

    #[tokio::test]
    async fn test_sdk_load_failure_is_reported_not_raised() {
        let loader = FakeSdkLoader::failing_load("network down");
        let mut binding = binding();

        let status = binding.mount(&loader).await;

        assert!(!status.ready);
        assert_eq!(status.state, BindingState::Failed);
        assert!(matches!(status.error, Some(EngineError::SdkLoad(_))));
        assert!(binding.engine_mut().is_none());
    }

    #[tokio::test]
    async fn test_instantiation_failure_is_reported() {
        let loader = FakeSdkLoader::failing_create("container missing");
        let mut binding = binding();

        let status = binding.mount(&loader).await;

        assert_eq!(status.state, BindingState::Failed);
        assert!(matches!(status.error, Some(EngineError::Instantiation(_))));
        binding.unmount();
        assert_eq!(binding.state(), BindingState::Destroyed);
    }

    #[tokio::test]
    async fn test_unmount_destroys_exactly_once() {
        let loader = FakeSdkLoader::new();
        let mut binding = binding();
        binding.mount(&loader).await;
        let engine = loader.last_engine().unwrap();

        binding.unmount();
        binding.unmount();
        drop(binding);

        assert_eq!(engine.destroy_count(), 1);
    }

    #[tokio::test]
    async fn test_drop_destroys_engine() {
        let loader = FakeSdkLoader::new();
        {
            let mut binding = binding();
            binding.mount(&loader).await;
        }
        assert_eq!(loader.last_engine().unwrap().destroy_count(), 1);
    }

    #[tokio::test]
    async fn test_rapid_mount_unmount_cycles() {
        let loader = FakeSdkLoader::new();

        for _ in 0..5 {
            let mut binding = binding();
            binding.mount(&loader).await;
            binding.unmount();
        }

        let engines = loader.engines();
        assert_eq!(engines.len(), 5);
        assert!(engines.iter().all(|e| e.destroy_count() == 1));
    }

    #[tokio::test]
    async fn test_unmount_before_mount_is_terminal() {
        let loader = FakeSdkLoader::new();
        let mut binding = binding();

        binding.unmount();
        let status = binding.mount(&loader).await;

        assert_eq!(status.state, BindingState::Destroyed);
        assert_eq!(loader.load_calls(), 0);
    }

    #[tokio::test]
    async fn test_soft_view_change_applies_in_place() {
        let loader = FakeSdkLoader::new();
        let mut binding = binding();
        binding.mount(&loader).await;
        let engine = loader.last_engine().unwrap();

        let target = Coordinate::new(39.13, 117.21).unwrap();
        assert!(binding.set_view(Some(target), Some(15.0)));

        assert_eq!(engine.camera_moves(), vec![(Some(15.0), Some(target))]);
        assert_eq!(loader.created_maps().len(), 1);
        assert_eq!(binding.camera(), (target, 15.0));
        assert_eq!(binding.options(), &test_map_options());
    }

    #[tokio::test]
    async fn test_soft_view_change_before_ready_is_refused() {
        let mut binding = binding();
        assert!(!binding.set_view(None, Some(15.0)));
    }

    #[tokio::test]
    async fn test_hard_change_requires_remount() {
        let loader = FakeSdkLoader::new();
        let mut binding = binding();
        binding.mount(&loader).await;
        let engine = loader.last_engine().unwrap();

        assert_eq!(
            binding.reconfigure("map-container", &test_map_options()),
            OptionChange::Unchanged
        );
        assert_eq!(engine.destroy_count(), 0);

        let mut options = test_map_options();
        options.style = "amap://styles/whitesmoke".to_string();
        assert_eq!(
            binding.reconfigure("map-container", &options),
            OptionChange::Remount
        );
        assert_eq!(engine.destroy_count(), 1);
        assert_eq!(binding.state(), BindingState::Destroyed);
    }

    #[tokio::test]
    async fn test_camera_move_does_not_count_as_option_change() {
        let loader = FakeSdkLoader::new();
        let mut binding = binding();
        binding.mount(&loader).await;
        let engine = loader.last_engine().unwrap();

        let target = Coordinate::new(39.13, 117.21).unwrap();
        assert!(binding.set_view(Some(target), Some(15.0)));

        assert_eq!(
            binding.reconfigure("map-container", &test_map_options()),
            OptionChange::Unchanged
        );
        assert_eq!(engine.destroy_count(), 0);

        let mut moved = test_map_options();
        moved.center = target;
        moved.zoom = 15.0;
        assert_eq!(
            binding.reconfigure("map-container", &moved),
            OptionChange::Remount
        );
        assert_eq!(engine.destroy_count(), 1);
    }
}
