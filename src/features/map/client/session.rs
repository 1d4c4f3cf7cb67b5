use tracing::debug;

use crate::features::map::models::Coordinate;

/// What the user currently has picked on the map.
///
/// A saved marker and a pending coordinate are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    None,
    ExistingMarker(i32),
    PendingCoordinate(Coordinate),
}

/// Interaction reported by the engine or the search box
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    MarkerSelected(i32),
    CanvasClicked(Coordinate),
    SearchSelected(Coordinate),
    ClearTemp,
}

/// Transient UI state of one map page
#[derive(Debug, Default)]
pub struct MapSessionController {
    selection: SelectionState,
    force_focus_temp: bool,
}

impl MapSessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_marker(&mut self, id: i32) {
        debug!("Marker {} selected", id);
        self.selection = SelectionState::ExistingMarker(id);
        self.force_focus_temp = false;
    }

    /// Canvas click: pending point without moving the camera
    pub fn click_canvas(&mut self, coordinate: Coordinate) {
        self.selection = SelectionState::PendingCoordinate(coordinate);
        self.force_focus_temp = false;
    }

    /// Search pick: pending point and the camera follows it
    pub fn search_select(&mut self, coordinate: Coordinate) {
        self.selection = SelectionState::PendingCoordinate(coordinate);
        self.force_focus_temp = true;
    }

    /// Drop a pending point; a saved-marker selection is kept
    pub fn clear_temp(&mut self) {
        if matches!(self.selection, SelectionState::PendingCoordinate(_)) {
            self.selection = SelectionState::None;
        }
        self.force_focus_temp = false;
    }

    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::MarkerSelected(id) => self.select_marker(id),
            SessionEvent::CanvasClicked(coordinate) => self.click_canvas(coordinate),
            SessionEvent::SearchSelected(coordinate) => self.search_select(coordinate),
            SessionEvent::ClearTemp => self.clear_temp(),
        }
    }

    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    pub fn selected_id(&self) -> Option<i32> {
        match self.selection {
            SelectionState::ExistingMarker(id) => Some(id),
            _ => None,
        }
    }

    pub fn temp_location(&self) -> Option<Coordinate> {
        match self.selection {
            SelectionState::PendingCoordinate(coordinate) => Some(coordinate),
            _ => None,
        }
    }

    pub fn force_focus_temp(&self) -> bool {
        self.force_focus_temp
    }

    /// The save form is open while a pending point exists
    pub fn is_saving(&self) -> bool {
        self.temp_location().is_some()
    }
}
