//! Wire types for the Google Maps Platform endpoints the oracle calls.

use geoquest_core::PlaceComponents;
use serde::Deserialize;

/// Street View Image Metadata response.
#[derive(Debug, Deserialize)]
pub(crate) struct MetadataResponse {
    pub status: String,
    #[serde(default)]
    pub location: Option<LatLng>,
    #[serde(default)]
    pub pano_id: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Reverse-geocoding response.
#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResult {
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

const CITY_TYPES: [&str; 3] = ["locality", "postal_town", "administrative_area_level_2"];

impl GeocodeResponse {
    /// Picks city / state / country out of the results.
    ///
    /// Results are ordered most-specific first, so the first component of each
    /// type wins. City prefers `locality`, then `postal_town`, then
    /// `administrative_area_level_2`.
    pub(crate) fn place_components(&self) -> PlaceComponents {
        let find = |kind: &str| -> Option<String> {
            self.results
                .iter()
                .flat_map(|r| &r.address_components)
                .find(|c| c.types.iter().any(|t| t == kind))
                .map(|c| c.long_name.trim().to_string())
        };

        PlaceComponents {
            city: CITY_TYPES.iter().find_map(|kind| find(kind)).unwrap_or_default(),
            state: find("administrative_area_level_1").unwrap_or_default(),
            country: find("country").unwrap_or_default(),
        }
    }
}
