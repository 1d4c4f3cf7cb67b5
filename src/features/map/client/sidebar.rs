use crate::features::map::client::session::MapSessionController;
use crate::features::map::models::{Coordinate, MapMarker};
use crate::shared::constants::{EMPTY_LIST_HINT, EMPTY_LIST_MESSAGE, LIST_DATE_FORMAT};

/// What the sidebar shows below its header
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarMode {
    /// Search box and the location list
    Browsing,
    /// Save form for the pending coordinate
    Saving {
        location: Coordinate,
        form_error: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SidebarItem {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub description: Option<String>,
    pub date_label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SidebarModel {
    pub mode: SidebarMode,
    /// Header badge, e.g. `3 LOCATIONS`
    pub count_label: String,
    pub items: Vec<SidebarItem>,
    /// Message and hint shown when there are no markers
    pub empty: Option<(&'static str, &'static str)>,
}

impl SidebarModel {
    pub fn build(
        markers: &[MapMarker],
        session: &MapSessionController,
        form_error: Option<&str>,
    ) -> Self {
        let mode = match session.temp_location() {
            Some(location) => SidebarMode::Saving {
                location,
                form_error: form_error.map(str::to_string),
            },
            None => SidebarMode::Browsing,
        };

        let selected_id = session.selected_id();
        let items = markers
            .iter()
            .map(|marker| SidebarItem {
                id: marker.id,
                name: marker.name.clone(),
                address: marker.address.clone(),
                description: marker.description.clone(),
                date_label: marker.created_at.format(LIST_DATE_FORMAT).to_string(),
                selected: selected_id == Some(marker.id),
            })
            .collect();

        Self {
            mode,
            count_label: format!("{} LOCATIONS", markers.len()),
            items,
            empty: markers
                .is_empty()
                .then_some((EMPTY_LIST_MESSAGE, EMPTY_LIST_HINT)),
        }
    }
}
