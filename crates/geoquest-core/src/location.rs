//! Ground truth for one round.
//!
//! Imagery providers describe a panorama as a comma-separated string ordered
//! most-specific first ("City, State/Region, Country"). That ordering is a
//! contract with the upstream provider; [`PlaceComponents::parse`] is the only
//! place that relies on it. Providers that return structured fields build
//! [`PlaceComponents`] directly and skip parsing.

use serde::Serialize;

use crate::error::LocationError;

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// # Errors
    ///
    /// Returns [`LocationError::OutOfRange`] when `lat` is outside `[-90, 90]`
    /// or `lng` is outside `[-180, 180]` (NaN included).
    pub fn new(lat: f64, lng: f64) -> Result<Self, LocationError> {
        let coords = Self { lat, lng };
        if coords.is_valid() {
            Ok(coords)
        } else {
            Err(LocationError::OutOfRange { lat, lng })
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// City / state / country split of a place description. Missing components
/// are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlaceComponents {
    pub city: String,
    pub state: String,
    pub country: String,
}

impl PlaceComponents {
    /// Splits `description` on commas and assigns from the end backward:
    /// last → country, second-to-last → state, third-to-last → city.
    ///
    /// Short descriptions leave the leading components empty rather than
    /// failing; anything before the third-to-last component is ignored.
    #[must_use]
    pub fn parse(description: &str) -> Self {
        let parts: Vec<&str> = description.split(',').map(str::trim).collect();
        let from_end = |offset: usize| -> String {
            parts
                .len()
                .checked_sub(offset + 1)
                .map(|idx| parts[idx].to_string())
                .unwrap_or_default()
        };
        Self {
            city: from_end(2),
            state: from_end(1),
            country: from_end(0),
        }
    }

    /// Joins the non-empty components, most-specific first.
    #[must_use]
    pub fn to_description(&self) -> String {
        [&self.city, &self.state, &self.country]
            .into_iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The `{city, country}` pair handed to the AI guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuideContext {
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    coordinates: Coordinates,
    description: String,
    components: PlaceComponents,
}

impl Location {
    /// Builds a location from a provider's free-text description.
    ///
    /// # Errors
    ///
    /// - [`LocationError::OutOfRange`] for invalid coordinates.
    /// - [`LocationError::MissingCountry`] when the description is blank or its
    ///   last component is empty.
    pub fn from_description(
        coordinates: Coordinates,
        description: &str,
    ) -> Result<Self, LocationError> {
        let components = PlaceComponents::parse(description);
        Self::build(coordinates, description.trim().to_string(), components)
    }

    /// Builds a location from structured components; the description is
    /// derived from them.
    ///
    /// # Errors
    ///
    /// Same as [`Location::from_description`].
    pub fn from_components(
        coordinates: Coordinates,
        components: PlaceComponents,
    ) -> Result<Self, LocationError> {
        let description = components.to_description();
        Self::build(coordinates, description, components)
    }

    fn build(
        coordinates: Coordinates,
        description: String,
        components: PlaceComponents,
    ) -> Result<Self, LocationError> {
        if !coordinates.is_valid() {
            return Err(LocationError::OutOfRange {
                lat: coordinates.lat,
                lng: coordinates.lng,
            });
        }
        if components.country.trim().is_empty() {
            return Err(LocationError::MissingCountry(description));
        }
        Ok(Self {
            coordinates,
            description,
            components,
        })
    }

    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn components(&self) -> &PlaceComponents {
        &self.components
    }

    /// First and last description components, `"Unknown"` when blank.
    #[must_use]
    pub fn guide_context(&self) -> GuideContext {
        let first = self
            .description
            .split(',')
            .map(str::trim)
            .next()
            .filter(|p| !p.is_empty());
        let last = self
            .description
            .rsplit(',')
            .map(str::trim)
            .next()
            .filter(|p| !p.is_empty());
        GuideContext {
            city: first.unwrap_or(UNKNOWN).to_string(),
            country: last.unwrap_or(UNKNOWN).to_string(),
        }
    }

    /// Street View deep link for the panorama position.
    #[must_use]
    pub fn street_view_url(&self) -> String {
        format!(
            "https://www.google.com/maps/@?api=1&map_action=pano&viewpoint={:.6},{:.6}",
            self.coordinates.lat, self.coordinates.lng
        )
    }
}
