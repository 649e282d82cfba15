//! Home location, persisted under `userLocation`.

use serde::{Deserialize, Serialize};

use super::{PanelError, ValidationError};
use crate::storage::{self, SharedStore, LOCATION_KEY};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
}

/// Quick picks offered by the configuration page
pub const PRESETS: [(&str, f64, f64); 4] = [
    ("Lima", -12.0464, -77.0428),
    ("Bogotá", 4.7110, -74.0721),
    ("Ciudad de México", 19.4326, -99.1332),
    ("Madrid", 40.4168, -3.7038),
];

pub struct LocationPanel {
    store: SharedStore,
    location: Option<UserLocation>,
}

impl LocationPanel {
    /// Load the saved location. Missing, unreadable or corrupt values leave
    /// it unset.
    pub fn load(store: SharedStore) -> Self {
        let location = match storage::load_json::<UserLocation>(store.as_ref(), LOCATION_KEY) {
            Ok(location) => location,
            Err(e) => {
                tracing::warn!("Ignoring saved location: {}", e);
                None
            }
        };
        Self { store, location }
    }

    pub fn location(&self) -> Option<&UserLocation> {
        self.location.as_ref()
    }

    /// Validate, store and adopt a new location. A blank name falls back to
    /// the coordinates.
    pub fn save(&mut self, latitude: f64, longitude: f64, name: &str) -> Result<(), PanelError> {
        let in_range = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !in_range {
            return Err(ValidationError::InvalidCoordinates.into());
        }

        let name = match name.trim() {
            "" => format!("{:.4}, {:.4}", latitude, longitude),
            n => n.to_string(),
        };
        let location = UserLocation {
            latitude,
            longitude,
            name,
        };
        storage::save_json(self.store.as_ref(), LOCATION_KEY, &location)?;
        tracing::info!("Location set to {}", location.name);
        self.location = Some(location);
        Ok(())
    }
}
