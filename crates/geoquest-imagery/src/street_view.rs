//! Google Street View imagery oracle.
//!
//! A lookup is two calls: the Street View Image Metadata endpoint finds the
//! nearest outdoor panorama within the radius, then the Geocoding API
//! reverse-geocodes the panorama's snapped position into city / state /
//! country. Both endpoints report outcome in a top-level `"status"` field.

use std::time::Duration;

use geoquest_core::Coordinates;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::OracleError;
use crate::oracle::{ImageryOracle, Panorama};
use crate::types::{GeocodeResponse, MetadataResponse};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/";
const METADATA_PATH: &str = "maps/api/streetview/metadata";
const GEOCODE_PATH: &str = "maps/api/geocode/json";

/// Client for the Street View metadata and Geocoding APIs.
///
/// Use [`StreetViewClient::new`] for production or
/// [`StreetViewClient::with_base_url`] to point at a mock server in tests.
pub struct StreetViewClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

/// Outcome of a status-bearing Maps API response.
enum StatusOutcome {
    Found,
    Empty,
}

impl StreetViewClient {
    /// Creates a new client pointed at the production Maps API.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, OracleError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`OracleError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("geoquest/0.1 (imagery-sampler)")
            .build()?;

        // Exactly one trailing slash so `Url::join` appends the endpoint path.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| OracleError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Finds the nearest outdoor panorama within `radius_meters` of `point`.
    ///
    /// Returns the panorama id and its snapped position, or `None` when the
    /// API reports `ZERO_RESULTS` / `NOT_FOUND`.
    ///
    /// # Errors
    ///
    /// - [`OracleError::Denied`] / [`OracleError::Transient`] for error statuses.
    /// - [`OracleError::Http`] on network failure or non-2xx HTTP status.
    /// - [`OracleError::Deserialize`] if the body does not match the expected shape.
    pub async fn nearest_panorama(
        &self,
        point: Coordinates,
        radius_meters: u32,
    ) -> Result<Option<(Option<String>, Coordinates)>, OracleError> {
        let url = self.build_url(
            METADATA_PATH,
            &[
                ("location", &format_point(point)),
                ("radius", &radius_meters.to_string()),
                ("source", "outdoor"),
            ],
        )?;
        let body: MetadataResponse = self.request_json(&url, "streetview metadata").await?;

        match classify_status(&body.status, body.error_message.as_deref())? {
            StatusOutcome::Empty => Ok(None),
            StatusOutcome::Found => {
                let Some(position) = body.location else {
                    tracing::debug!("metadata OK without a location; treating as not found");
                    return Ok(None);
                };
                Ok(Some((
                    body.pano_id,
                    Coordinates {
                        lat: position.lat,
                        lng: position.lng,
                    },
                )))
            }
        }
    }

    /// Reverse-geocodes `point` into a [`GeocodeResponse`]; `None` on `ZERO_RESULTS`.
    ///
    /// # Errors
    ///
    /// Same as [`StreetViewClient::nearest_panorama`].
    async fn reverse_geocode(
        &self,
        point: Coordinates,
    ) -> Result<Option<GeocodeResponse>, OracleError> {
        let url = self.build_url(GEOCODE_PATH, &[("latlng", &format_point(point))])?;
        let body: GeocodeResponse = self.request_json(&url, "reverse geocode").await?;
        match classify_status(&body.status, body.error_message.as_deref())? {
            StatusOutcome::Empty => Ok(None),
            StatusOutcome::Found => Ok(Some(body)),
        }
    }

    /// Builds the request URL with the API key and percent-encoded parameters.
    fn build_url(&self, path: &str, extra: &[(&str, &str)]) -> Result<Url, OracleError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| OracleError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the body.
    async fn request_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<T, OracleError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| OracleError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

impl ImageryOracle for StreetViewClient {
    async fn lookup(
        &self,
        point: Coordinates,
        radius_meters: u32,
    ) -> Result<Option<Panorama>, OracleError> {
        let Some((pano_id, snapped)) = self.nearest_panorama(point, radius_meters).await? else {
            return Ok(None);
        };
        let Some(geocode) = self.reverse_geocode(snapped).await? else {
            tracing::debug!(lat = snapped.lat, lng = snapped.lng, "panorama has no address");
            return Ok(None);
        };

        let components = geocode.place_components();
        if components.country.is_empty() {
            tracing::debug!(lat = snapped.lat, lng = snapped.lng, "panorama outside any country");
            return Ok(None);
        }

        Ok(Some(Panorama {
            pano_id,
            coordinates: snapped,
            description: components.to_description(),
            components: Some(components),
        }))
    }
}

fn format_point(point: Coordinates) -> String {
    format!("{:.6},{:.6}", point.lat, point.lng)
}

/// Maps a Maps Platform `"status"` onto found / empty / error.
fn classify_status(status: &str, message: Option<&str>) -> Result<StatusOutcome, OracleError> {
    let message = message.unwrap_or_default().to_owned();
    match status {
        "OK" => Ok(StatusOutcome::Found),
        "ZERO_RESULTS" | "NOT_FOUND" => Ok(StatusOutcome::Empty),
        "OVER_QUERY_LIMIT" | "UNKNOWN_ERROR" => Err(OracleError::Transient {
            status: status.to_owned(),
            message,
        }),
        _ => Err(OracleError::Denied {
            status: status.to_owned(),
            message,
        }),
    }
}
