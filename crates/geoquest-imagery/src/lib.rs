//! Imagery lookup and location sampling for GeoQuest.
//!
//! [`Sampler`] draws random points inside a region's bounding box and asks an
//! [`ImageryOracle`] whether ground-level imagery exists nearby. Attempts are
//! capped; a region that yields nothing falls back to the global box. The
//! production oracle is [`StreetViewClient`], which combines the Street View
//! metadata endpoint with reverse geocoding.

pub mod error;
pub mod oracle;
pub mod sampler;
pub mod street_view;

mod retry;
mod types;

pub use error::{OracleError, SamplerError};
pub use oracle::{ImageryOracle, Panorama};
pub use sampler::{Sample, Sampler, SamplerConfig};
pub use street_view::StreetViewClient;
