use std::future::Future;

use geoquest_core::{Coordinates, Location, LocationError, PlaceComponents};

use crate::error::OracleError;

/// A panorama found near a queried point.
#[derive(Debug, Clone, PartialEq)]
pub struct Panorama {
    pub pano_id: Option<String>,
    /// Position the provider snapped to, not the point that was queried.
    pub coordinates: Coordinates,
    pub description: String,
    /// Structured place fields when the provider has them; lets the resolver
    /// skip description parsing.
    pub components: Option<PlaceComponents>,
}

impl Panorama {
    /// # Errors
    ///
    /// Returns [`LocationError`] when the coordinates are out of range or the
    /// place has no country component.
    pub fn into_location(self) -> Result<Location, LocationError> {
        match self.components {
            Some(components) => Location::from_components(self.coordinates, components),
            None => Location::from_description(self.coordinates, &self.description),
        }
    }
}

/// "Is there ground-level imagery near this point?"
///
/// `Ok(None)` means nothing within `radius_meters`. Errors are classified by
/// [`OracleError::is_transient`].
pub trait ImageryOracle: Send + Sync {
    fn lookup(
        &self,
        point: Coordinates,
        radius_meters: u32,
    ) -> impl Future<Output = Result<Option<Panorama>, OracleError>> + Send;
}

impl<T: ImageryOracle> ImageryOracle for std::sync::Arc<T> {
    fn lookup(
        &self,
        point: Coordinates,
        radius_meters: u32,
    ) -> impl Future<Output = Result<Option<Panorama>, OracleError>> + Send {
        (**self).lookup(point, radius_meters)
    }
}
