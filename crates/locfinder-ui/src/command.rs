use std::time::Duration;

use locfinder_core::{BaseLayer, Location, QueryPoint};

use crate::alert::Alert;
use crate::geolocation::GeolocationError;

/// A key pressed while the postal code input has focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other(String),
}

/// Every user action and async completion the controller understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// The one-time dataset load finished.
    DatasetLoaded(Result<Vec<Location>, String>),
    SetInput(String),
    KeyPress(Key),
    SubmitPostalCode,
    UseCurrentLocation,
    GeolocationResolved {
        generation: u64,
        result: Result<QueryPoint, GeolocationError>,
    },
    /// "View on map" on the n-th result card (0-based).
    ViewOnMap(usize),
    ClosePanel,
    PanelHideElapsed {
        generation: u64,
    },
    Clear,
    SelectBaseLayer(BaseLayer),
}

/// Work the host must carry out on the controller's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Alert(Alert),
    /// Ask for the device position once; answer with
    /// [`Command::GeolocationResolved`] carrying the same generation.
    RequestGeolocation { generation: u64 },
    /// After `after`, send [`Command::PanelHideElapsed`] with this generation.
    SchedulePanelHide { generation: u64, after: Duration },
}
