use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, trace, warn};

use crate::features::map::client::binding::MapEngineBinding;
use crate::features::map::client::engine::{
    EventHandler, EventTarget, ListenerId, MapEngine, MapEvent, MapEventKind, MarkerOverlay,
    OverlayId,
};
use crate::features::map::client::session::SessionEvent;
use crate::features::map::client::style::MarkerStyle;
use crate::features::map::models::{Coordinate, MapMarker};
use crate::shared::constants::FOCUS_ZOOM;

/// Result of one reconcile pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Engine not ready; nothing was touched
    Deferred,
    Applied(ReconcileReport),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileReport {
    pub markers_rebuilt: bool,
    pub temp_changed: bool,
    pub camera_moved: bool,
}

struct TrackedOverlay {
    overlay: OverlayId,
    listener: Option<ListenerId>,
}

/// Inputs of the last applied list pass
struct RenderedList {
    markers: Vec<MapMarker>,
    selected_id: Option<i32>,
}

/// Keeps the engine's overlays in line with the marker list, the selection
/// and the pending coordinate.
///
/// Persisted-list overlays are rebuilt as one batch whenever the list or
/// selection changes. The pending overlay is tracked on its own so list
/// rebuilds never touch it.
pub struct MarkerSyncEngine {
    events: UnboundedSender<SessionEvent>,
    next_overlay: u64,
    list_overlays: Vec<TrackedOverlay>,
    rendered_list: Option<RenderedList>,
    temp_overlay: Option<TrackedOverlay>,
    rendered_temp: Option<Coordinate>,
    /// One-shot pan to the pending point, set per search pick
    focus_requested: bool,
    canvas_listener: Option<ListenerId>,
}

impl MarkerSyncEngine {
    pub fn new(events: UnboundedSender<SessionEvent>) -> Self {
        Self {
            events,
            next_overlay: 1,
            list_overlays: Vec::new(),
            rendered_list: None,
            temp_overlay: None,
            rendered_temp: None,
            focus_requested: false,
            canvas_listener: None,
        }
    }

    /// Pan to the pending point on the next applied pass, even if it has not moved
    pub fn request_temp_focus(&mut self) {
        self.focus_requested = true;
    }

    pub fn reconcile(
        &mut self,
        binding: &mut MapEngineBinding,
        markers: &[MapMarker],
        selected_id: Option<i32>,
        temp: Option<Coordinate>,
        focus_temp: bool,
    ) -> ReconcileOutcome {
        let Some(engine) = binding.engine_mut() else {
            trace!("Reconcile deferred, engine not ready");
            return ReconcileOutcome::Deferred;
        };

        let mut report = ReconcileReport::default();
        self.ensure_canvas_listener(engine);

        if self.list_changed(markers, selected_id) {
            report.camera_moved |= self.rebuild_markers(engine, markers, selected_id);
            report.markers_rebuilt = true;
        }

        if self.rendered_temp != temp {
            report.camera_moved |= self.replace_temp(engine, temp, focus_temp);
            report.temp_changed = true;
        } else if let (true, Some(position)) = (self.focus_requested, temp) {
            engine.set_center(position);
            report.camera_moved = true;
        }
        self.focus_requested = false;

        ReconcileOutcome::Applied(report)
    }

    /// Unregister every listener and remove every overlay this engine created.
    ///
    /// Tracking is reset either way, so the next ready engine gets a full pass.
    pub fn detach(&mut self, binding: &mut MapEngineBinding) {
        if let Some(engine) = binding.engine_mut() {
            let mut overlays = Vec::with_capacity(self.live_overlay_count());
            for tracked in self.list_overlays.iter().chain(self.temp_overlay.iter()) {
                if let Some(listener) = tracked.listener {
                    engine.off(listener);
                }
                overlays.push(tracked.overlay);
            }
            if !overlays.is_empty() {
                engine.remove(&overlays);
            }
            if let Some(listener) = self.canvas_listener {
                engine.off(listener);
            }
            debug!("Detached {} overlays from engine", overlays.len());
        }

        self.list_overlays.clear();
        self.rendered_list = None;
        self.temp_overlay = None;
        self.rendered_temp = None;
        self.focus_requested = false;
        self.canvas_listener = None;
    }

    pub fn live_overlay_count(&self) -> usize {
        self.list_overlays.len() + usize::from(self.temp_overlay.is_some())
    }

    fn list_changed(&self, markers: &[MapMarker], selected_id: Option<i32>) -> bool {
        match &self.rendered_list {
            Some(rendered) => rendered.selected_id != selected_id || rendered.markers != markers,
            None => true,
        }
    }

    fn allocate_overlay_id(&mut self) -> OverlayId {
        let id = OverlayId(self.next_overlay);
        self.next_overlay += 1;
        id
    }

    fn ensure_canvas_listener(&mut self, engine: &mut dyn MapEngine) {
        if self.canvas_listener.is_some() {
            return;
        }

        let events = self.events.clone();
        let handler: EventHandler = Arc::new(move |event: &MapEvent| {
            let MapEvent::Click { lnglat } = *event;
            if events.send(SessionEvent::CanvasClicked(lnglat)).is_err() {
                trace!("Canvas click dropped, session closed");
            }
        });

        self.canvas_listener = Some(engine.on(EventTarget::Map, MapEventKind::Click, handler));
    }

    /// Replace every list overlay. Returns whether the camera moved.
    fn rebuild_markers(
        &mut self,
        engine: &mut dyn MapEngine,
        markers: &[MapMarker],
        selected_id: Option<i32>,
    ) -> bool {
        let stale = std::mem::take(&mut self.list_overlays);
        for tracked in &stale {
            if let Some(listener) = tracked.listener {
                engine.off(listener);
            }
        }
        if !stale.is_empty() {
            let ids: Vec<OverlayId> = stale.iter().map(|t| t.overlay).collect();
            engine.remove(&ids);
        }

        let mut batch = Vec::with_capacity(markers.len());
        let mut focus = None;
        for marker in markers {
            let Some(position) = Coordinate::new(marker.lat, marker.lng) else {
                warn!("Marker {} has a non-finite position, not drawn", marker.id);
                continue;
            };

            let style = if selected_id == Some(marker.id) {
                focus = Some(position);
                MarkerStyle::Selected
            } else {
                MarkerStyle::Default
            };

            batch.push(MarkerOverlay {
                id: self.allocate_overlay_id(),
                position,
                appearance: style.appearance(),
                marker_id: Some(marker.id),
            });
        }

        let ids: Vec<(OverlayId, i32)> = batch
            .iter()
            .filter_map(|o| o.marker_id.map(|marker_id| (o.id, marker_id)))
            .collect();
        engine.add(batch);

        for (overlay, marker_id) in ids {
            let events = self.events.clone();
            let handler: EventHandler = Arc::new(move |_: &MapEvent| {
                if events.send(SessionEvent::MarkerSelected(marker_id)).is_err() {
                    trace!("Marker click dropped, session closed");
                }
            });
            let listener = engine.on(EventTarget::Overlay(overlay), MapEventKind::Click, handler);
            self.list_overlays.push(TrackedOverlay {
                overlay,
                listener: Some(listener),
            });
        }

        debug!(
            "Rendered {} markers (removed {})",
            self.list_overlays.len(),
            stale.len()
        );

        self.rendered_list = Some(RenderedList {
            markers: markers.to_vec(),
            selected_id,
        });

        match (selected_id, focus) {
            (_, Some(position)) => {
                engine.set_zoom_and_center(FOCUS_ZOOM, position);
                true
            }
            (Some(id), None) => {
                debug!("Selected marker {} is not in the list, camera unchanged", id);
                false
            }
            (None, None) => false,
        }
    }

    /// Swap the pending overlay. Returns whether the camera moved.
    fn replace_temp(
        &mut self,
        engine: &mut dyn MapEngine,
        temp: Option<Coordinate>,
        focus_temp: bool,
    ) -> bool {
        if let Some(old) = self.temp_overlay.take() {
            engine.remove(&[old.overlay]);
        }
        self.rendered_temp = temp;

        let Some(position) = temp else {
            return false;
        };

        let overlay = self.allocate_overlay_id();
        engine.add(vec![MarkerOverlay {
            id: overlay,
            position,
            appearance: MarkerStyle::Pending.appearance(),
            marker_id: None,
        }]);
        self.temp_overlay = Some(TrackedOverlay {
            overlay,
            listener: None,
        });

        if focus_temp {
            engine.set_center(position);
        }
        focus_temp
    }
}
