//! Map page runtime
//!
//! Everything between the marker list and the pixels: the engine binding,
//! the overlay reconciler, the search box and the page session.

pub mod binding;
pub mod engine;
pub mod search;
pub mod session;
pub mod sidebar;
pub mod style;
pub mod sync;
pub mod view;

pub use binding::{BindingState, EngineStatus, MapEngineBinding, OptionChange, SdkSettings};
pub use engine::{EngineError, MapEngine, MapOptions, SdkLoader, ViewMode};
pub use search::{SearchCoordinator, SearchSnapshot};
pub use session::{MapSessionController, SelectionState, SessionEvent};
pub use sidebar::{SidebarItem, SidebarMode, SidebarModel};
pub use style::MarkerStyle;
pub use sync::{MarkerSyncEngine, ReconcileOutcome, ReconcileReport};
pub use view::{MapView, MapViewSettings, SaveLocationForm};
