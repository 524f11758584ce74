//! Core game model for GeoQuest.
//!
//! Region tiers and their sampling bounds, the round's ground-truth
//! [`Location`], the guess resolver / scoring engine and the round state
//! machine. Nothing in this crate performs I/O; the imagery oracle, the AI
//! guide and the score store live in sibling crates.

pub mod app_config;
pub mod config;
pub mod error;
pub mod location;
pub mod region;
pub mod round;
pub mod scoring;

pub use app_config::{AppConfig, StoreConfig, SupabaseConfig};
pub use config::{load_app_config, load_app_config_from_env, load_store_config};
pub use error::{ConfigError, LocationError, RegionError, RoundError};
pub use location::{Coordinates, GuideContext, Location, PlaceComponents};
pub use region::{BoundingBox, Region, Tier, UsState};
pub use round::{Game, Phase, Round, RoundResult, RoundState, SubmissionKind, Submitted};
pub use scoring::{resolve, resolve_components, ComponentMatches, Verdict, STARTING_TURNS};
