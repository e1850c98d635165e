/// A user-visible, non-fatal notice. Every failed interaction ends in one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// Search submitted with a blank postal code.
    EmptyInput,
    PostalCodeNotFound(String),
    /// The origin resolved but nothing lies within the search radius.
    NoNearbyLocations,
    /// The host has no way to obtain a position.
    GeolocationUnavailable,
    /// A position request was made but failed or was denied.
    GeolocationFailed,
    DatasetLoadFailed(String),
    /// A search ran before the dataset finished loading.
    DatasetPending,
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alert::EmptyInput => write!(f, "Please enter a postal code."),
            Alert::PostalCodeNotFound(code) => write!(f, "Postal code {code} not found."),
            Alert::NoNearbyLocations => write!(f, "No nearby locations found."),
            Alert::GeolocationUnavailable => {
                write!(f, "Geolocation is not available on this device.")
            }
            Alert::GeolocationFailed => write!(
                f,
                "Could not get your location. Make sure geolocation is enabled."
            ),
            Alert::DatasetLoadFailed(reason) => write!(f, "Could not load locations: {reason}"),
            Alert::DatasetPending => {
                write!(f, "Locations are still loading. Try again in a moment.")
            }
        }
    }
}
