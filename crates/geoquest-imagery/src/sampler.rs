//! Bounded random sampling of playable locations.
//!
//! Each attempt draws a uniform point in the region's bounding box and asks
//! the oracle for imagery within the configured radius. A region gets at most
//! `max_attempts` draws; if it yields nothing the sampler falls back to the
//! global box with a fresh budget and reports the fallback to the caller.
//!
//! Outcomes per attempt:
//!
//! | Oracle answer | Effect |
//! |---|---|
//! | panorama accepted | return it |
//! | panorama rejected by the region policy | count as rejected, redraw |
//! | nothing within radius | count as not found, redraw |
//! | transient error | count as transient, back off, redraw |
//! | fatal error | abort with [`SamplerError::OracleUnreachable`] |
//!
//! A run of `max_consecutive_transient` transient errors is treated as an
//! outage: the sampler stops with [`SamplerError::OracleUnreachable`] and
//! skips the global fallback.
//!
//! Dropping the returned future abandons the loop; no task is left behind.

use geoquest_core::{AppConfig, Location, Region};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::SamplerError;
use crate::oracle::{ImageryOracle, Panorama};
use crate::retry::backoff_delay;

const US_COUNTRY_NAMES: [&str; 4] = ["united states", "united states of america", "usa", "us"];

#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Draws per region before giving up on it (must be ≥ 1).
    pub max_attempts: u32,
    pub radius_meters: u32,
    /// Base delay after a transient oracle failure; 0 disables back-off.
    pub backoff_base_ms: u64,
    /// Transient errors in a row before the oracle counts as down.
    pub max_consecutive_transient: u32,
    /// Fixed RNG seed for reproducible draws; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            max_attempts: 50,
            radius_meters: 100_000,
            backoff_base_ms: 250,
            max_consecutive_transient: 5,
            seed: None,
        }
    }
}

impl SamplerConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_attempts: config.sampler_max_attempts,
            radius_meters: config.sampler_radius_meters,
            backoff_base_ms: config.sampler_backoff_base_ms,
            max_consecutive_transient: config.sampler_max_consecutive_transient,
            seed: None,
        }
    }
}

/// A sampled location and how it was obtained.
#[derive(Debug, Clone)]
pub struct Sample {
    pub location: Location,
    pub pano_id: Option<String>,
    /// Region the location was actually drawn from (global after a fallback).
    pub sampled_region: Region,
    /// Total oracle calls across the requested region and any fallback.
    pub attempts: u32,
}

impl Sample {
    #[must_use]
    pub fn fell_back(&self, requested: Region) -> bool {
        self.sampled_region != requested
    }
}

#[derive(Debug, Default)]
struct AttemptTally {
    not_found: u32,
    transient: u32,
    rejected: u32,
}

pub struct Sampler<O> {
    oracle: O,
    config: SamplerConfig,
}

impl<O: ImageryOracle> Sampler<O> {
    pub fn new(oracle: O, config: SamplerConfig) -> Self {
        Self { oracle, config }
    }

    #[must_use]
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Samples a location for `region`.
    ///
    /// # Errors
    ///
    /// See [`Sampler::sample_with_report`].
    pub async fn sample(&self, region: Region) -> Result<Location, SamplerError> {
        self.sample_with_report(region).await.map(|s| s.location)
    }

    /// Samples a location for `region`, falling back to the global box when
    /// the region exhausts its attempts.
    ///
    /// # Errors
    ///
    /// - [`SamplerError::OracleUnreachable`] as soon as the oracle reports a
    ///   non-transient failure, or after `max_consecutive_transient`
    ///   transient failures in a row.
    /// - [`SamplerError::ImageryUnavailable`] when both the region and the
    ///   global fallback exhaust their attempts.
    pub async fn sample_with_report(&self, region: Region) -> Result<Sample, SamplerError> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let budget = self.config.max_attempts.max(1);

        if let Some((panorama, location, attempts)) =
            self.sample_within(region, budget, &mut rng).await?
        {
            return Ok(Sample {
                location,
                pano_id: panorama.pano_id,
                sampled_region: region,
                attempts,
            });
        }

        if region == Region::Global {
            return Err(SamplerError::ImageryUnavailable {
                region,
                attempts: budget,
            });
        }

        tracing::warn!(
            region = %region,
            attempts = budget,
            "no imagery found in requested region; falling back to global"
        );
        match self.sample_within(Region::Global, budget, &mut rng).await? {
            Some((panorama, location, attempts)) => Ok(Sample {
                location,
                pano_id: panorama.pano_id,
                sampled_region: Region::Global,
                attempts: budget + attempts,
            }),
            None => Err(SamplerError::ImageryUnavailable {
                region,
                attempts: budget,
            }),
        }
    }

    async fn sample_within(
        &self,
        region: Region,
        budget: u32,
        rng: &mut StdRng,
    ) -> Result<Option<(Panorama, Location, u32)>, SamplerError> {
        let bounds = region.bounds();
        let mut tally = AttemptTally::default();
        let mut consecutive_transient = 0u32;

        for attempt in 1..=budget {
            let point = bounds.interpolate(rng.random::<f64>(), rng.random::<f64>());
            match self.oracle.lookup(point, self.config.radius_meters).await {
                Ok(Some(panorama)) => {
                    consecutive_transient = 0;
                    match accept(region, &panorama) {
                        Ok(location) => {
                            tracing::debug!(
                                attempt,
                                region = %region,
                                description = location.description(),
                                "panorama found"
                            );
                            return Ok(Some((panorama, location, attempt)));
                        }
                        Err(reason) => {
                            tally.rejected += 1;
                            tracing::debug!(attempt, region = %region, reason, "panorama rejected");
                        }
                    }
                }
                Ok(None) => {
                    consecutive_transient = 0;
                    tally.not_found += 1;
                    tracing::debug!(
                        attempt,
                        region = %region,
                        lat = point.lat,
                        lng = point.lng,
                        "no imagery within radius"
                    );
                }
                Err(err) if err.is_transient() => {
                    consecutive_transient += 1;
                    tally.transient += 1;
                    if consecutive_transient >= self.config.max_consecutive_transient.max(1) {
                        tracing::error!(
                            attempt,
                            region = %region,
                            consecutive = consecutive_transient,
                            error = %err,
                            "imagery oracle outage; giving up"
                        );
                        return Err(SamplerError::OracleUnreachable(err));
                    }
                    let delay = backoff_delay(consecutive_transient, self.config.backoff_base_ms);
                    tracing::warn!(
                        attempt,
                        region = %region,
                        consecutive = consecutive_transient,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "transient imagery oracle error; drawing again after back-off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    tracing::error!(attempt, region = %region, error = %err, "imagery oracle unreachable");
                    return Err(SamplerError::OracleUnreachable(err));
                }
            }
        }

        tracing::warn!(
            region = %region,
            attempts = budget,
            not_found = tally.not_found,
            transient = tally.transient,
            rejected = tally.rejected,
            "imagery attempts exhausted"
        );
        Ok(None)
    }
}

/// Turns an oracle answer into a [`Location`] and applies the containment
/// policy: country-scoped tiers must land in the United States, state tiers
/// additionally in the named state. Continental and global tiers accept any
/// place.
fn accept(region: Region, panorama: &Panorama) -> Result<Location, &'static str> {
    let location = panorama
        .clone()
        .into_location()
        .map_err(|_| "description lacks a country or coordinates are invalid")?;

    let components = location.components();
    match region {
        Region::UnitedStates if !is_us_country(&components.country) => {
            Err("outside the United States")
        }
        Region::State(_) if !is_us_country(&components.country) => {
            Err("outside the United States")
        }
        Region::State(state) if !components.state.trim().eq_ignore_ascii_case(state.name()) => {
            Err("outside the requested state")
        }
        _ => Ok(location),
    }
}

fn is_us_country(country: &str) -> bool {
    let country = country.trim().to_lowercase();
    US_COUNTRY_NAMES.contains(&country.as_str())
}

#[cfg(test)]
mod tests {
    use geoquest_core::{Coordinates, PlaceComponents};

    use super::*;

    fn panorama(description: &str) -> Panorama {
        Panorama {
            pano_id: None,
            coordinates: Coordinates {
                lat: 30.27,
                lng: -97.74,
            },
            description: description.to_owned(),
            components: None,
        }
    }

    #[test]
    fn us_tier_rejects_foreign_panoramas() {
        assert!(accept(Region::UnitedStates, &panorama("Tijuana, Baja California, Mexico")).is_err());
        assert!(accept(Region::UnitedStates, &panorama("Austin, Texas, United States")).is_ok());
        assert!(accept(Region::UnitedStates, &panorama("Austin, TX, USA")).is_ok());
    }

    #[test]
    fn state_tier_requires_matching_state() {
        let texas: Region = "Texas".parse().unwrap();
        assert!(accept(texas, &panorama("Austin, Texas, United States")).is_ok());
        assert_eq!(
            accept(texas, &panorama("Shreveport, Louisiana, United States")).unwrap_err(),
            "outside the requested state"
        );
    }

    #[test]
    fn continental_tiers_accept_anything_with_a_country() {
        assert!(accept(Region::NorthAmerica, &panorama("Tijuana, Baja California, Mexico")).is_ok());
        assert!(accept(Region::Europe, &panorama("Casablanca, Morocco")).is_ok());
    }

    #[test]
    fn panoramas_without_country_are_rejected() {
        assert!(accept(Region::Global, &panorama("")).is_err());
    }

    #[test]
    fn structured_components_take_precedence() {
        let mut p = panorama("ignored");
        p.components = Some(PlaceComponents {
            city: "Austin".to_owned(),
            state: "Texas".to_owned(),
            country: "United States".to_owned(),
        });
        let location = accept("texas".parse().unwrap(), &p).unwrap();
        assert_eq!(location.description(), "Austin, Texas, United States");
    }
}
