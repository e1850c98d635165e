//! Search controller and headless presentation model for the location finder.
//!
//! User actions arrive as [`Command`]s; the [`SearchController`] applies them
//! to a single [`AppState`] and returns [`Effect`]s for the host to carry out
//! (alerts, the fire-once geolocation request, the deferred panel hide).
//! [`runtime::Session`] is a tokio-based host that executes those effects.

pub mod alert;
pub mod command;
pub mod controller;
pub mod geolocation;
pub mod render;
pub mod runtime;
pub mod state;
pub mod view;

pub use alert::Alert;
pub use command::{Command, Effect, Key};
pub use controller::{SearchController, SearchSettings};
pub use geolocation::{FixedGeolocator, GeolocationError, Geolocator, UnavailableGeolocator};
pub use render::{RecordingRenderer, Renderer};
pub use runtime::Session;
pub use state::{AppState, Controls};
pub use view::{MapView, Marker, MarkerLayer, Popup, ResultCard, ResultRow, ResultTable, SidePanel};
