//! Region tiers selectable before a round.
//!
//! A [`Region`] fixes both where the sampler may draw points and how the
//! scoring engine weights a win. Identifiers are the ones the player types:
//! `global`, `europe`, `north-america`, `south-america`, `US`, or a US state
//! name such as `New Mexico`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegionError;
use crate::location::Coordinates;

/// Latitude/longitude rectangle a sampler draws points from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lat_range: (f64, f64),
    pub lng_range: (f64, f64),
}

impl BoundingBox {
    #[must_use]
    pub const fn new(lat_range: (f64, f64), lng_range: (f64, f64)) -> Self {
        Self {
            lat_range,
            lng_range,
        }
    }

    /// Maps a pair of unit fractions in `[0, 1)` onto a point inside the box.
    #[must_use]
    pub fn interpolate(&self, lat_fraction: f64, lng_fraction: f64) -> Coordinates {
        let (lat_min, lat_max) = self.lat_range;
        let (lng_min, lng_max) = self.lng_range;
        Coordinates {
            lat: lat_min + lat_fraction * (lat_max - lat_min),
            lng: lng_min + lng_fraction * (lng_max - lng_min),
        }
    }

    #[must_use]
    pub fn contains(&self, point: Coordinates) -> bool {
        (self.lat_range.0..=self.lat_range.1).contains(&point.lat)
            && (self.lng_range.0..=self.lng_range.1).contains(&point.lng)
    }
}

const GLOBAL_BOUNDS: BoundingBox = BoundingBox::new((-40.0, 60.0), (-180.0, 180.0));
const EUROPE_BOUNDS: BoundingBox = BoundingBox::new((36.0, 60.0), (-10.0, 30.0));
const NORTH_AMERICA_BOUNDS: BoundingBox = BoundingBox::new((25.0, 49.0), (-125.0, -70.0));
const SOUTH_AMERICA_BOUNDS: BoundingBox = BoundingBox::new((-35.0, 10.0), (-75.0, -45.0));

struct StateEntry {
    name: &'static str,
    bounds: BoundingBox,
}

const fn state(name: &'static str, lat: (f64, f64), lng: (f64, f64)) -> StateEntry {
    StateEntry {
        name,
        bounds: BoundingBox::new(lat, lng),
    }
}

const US_STATES: [StateEntry; 50] = [
    state("Alabama", (30.2, 35.0), (-88.5, -84.9)),
    state("Alaska", (51.2, 71.4), (-179.1, -129.9)),
    state("Arizona", (31.3, 37.0), (-114.8, -109.0)),
    state("Arkansas", (33.0, 36.5), (-94.6, -89.6)),
    state("California", (32.5, 42.0), (-124.4, -114.1)),
    state("Colorado", (37.0, 41.0), (-109.0, -102.0)),
    state("Connecticut", (41.0, 42.1), (-73.7, -71.8)),
    state("Delaware", (38.4, 39.8), (-75.8, -75.0)),
    state("Florida", (24.4, 31.0), (-87.6, -80.0)),
    state("Georgia", (30.3, 35.0), (-85.6, -80.8)),
    state("Hawaii", (18.9, 22.2), (-160.2, -154.8)),
    state("Idaho", (42.0, 49.0), (-117.2, -111.0)),
    state("Illinois", (36.9, 42.5), (-91.5, -87.5)),
    state("Indiana", (37.8, 41.8), (-88.1, -84.8)),
    state("Iowa", (40.4, 43.5), (-96.6, -90.1)),
    state("Kansas", (37.0, 40.0), (-102.0, -94.6)),
    state("Kentucky", (36.5, 39.1), (-89.5, -82.0)),
    state("Louisiana", (28.9, 33.0), (-94.0, -88.8)),
    state("Maine", (43.1, 47.5), (-71.1, -66.9)),
    state("Maryland", (37.9, 39.7), (-79.5, -75.0)),
    state("Massachusetts", (41.2, 42.9), (-73.5, -69.9)),
    state("Michigan", (41.7, 48.3), (-90.4, -82.4)),
    state("Minnesota", (43.5, 49.4), (-97.2, -89.5)),
    state("Mississippi", (30.2, 35.0), (-91.7, -88.1)),
    state("Missouri", (36.0, 40.6), (-95.8, -89.1)),
    state("Montana", (44.4, 49.0), (-116.1, -104.0)),
    state("Nebraska", (40.0, 43.0), (-104.0, -95.3)),
    state("Nevada", (35.0, 42.0), (-120.0, -114.0)),
    state("New Hampshire", (42.7, 45.3), (-72.6, -70.6)),
    state("New Jersey", (38.9, 41.4), (-75.6, -73.9)),
    state("New Mexico", (31.3, 37.0), (-109.0, -103.0)),
    state("New York", (40.5, 45.0), (-79.8, -71.8)),
    state("North Carolina", (33.8, 36.6), (-84.3, -75.4)),
    state("North Dakota", (45.9, 49.0), (-104.0, -96.6)),
    state("Ohio", (38.4, 42.3), (-84.8, -80.5)),
    state("Oklahoma", (33.6, 37.0), (-103.0, -94.4)),
    state("Oregon", (42.0, 46.3), (-124.6, -116.5)),
    state("Pennsylvania", (39.7, 42.3), (-80.5, -74.7)),
    state("Rhode Island", (41.1, 42.0), (-71.9, -71.1)),
    state("South Carolina", (32.0, 35.2), (-83.4, -78.5)),
    state("South Dakota", (42.5, 46.0), (-104.1, -96.4)),
    state("Tennessee", (35.0, 36.7), (-90.3, -81.6)),
    state("Texas", (25.8, 36.5), (-106.6, -93.5)),
    state("Utah", (37.0, 42.0), (-114.0, -109.0)),
    state("Vermont", (42.7, 45.0), (-73.4, -71.5)),
    state("Virginia", (36.5, 39.5), (-83.7, -75.2)),
    state("Washington", (45.5, 49.0), (-124.8, -116.9)),
    state("West Virginia", (37.2, 40.6), (-82.6, -77.7)),
    state("Wisconsin", (42.5, 47.1), (-92.9, -86.8)),
    state("Wyoming", (41.0, 45.0), (-111.1, -104.0)),
];

/// One of the fifty US states, usable as a sub-national region tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UsState(u8);

impl UsState {
    /// Looks a state up by name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        US_STATES
            .iter()
            .position(|entry| entry.name.eq_ignore_ascii_case(name))
            .and_then(|idx| u8::try_from(idx).ok())
            .map(UsState)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        US_STATES[usize::from(self.0)].name
    }

    #[must_use]
    pub fn bounds(self) -> BoundingBox {
        US_STATES[usize::from(self.0)].bounds
    }

    pub fn all() -> impl Iterator<Item = UsState> {
        (0..US_STATES.len()).filter_map(|idx| u8::try_from(idx).ok().map(UsState))
    }
}

/// Difficulty tier; drives the base points of a win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Global,
    /// The four broad multi-country tiers, `US` included.
    Broad,
    SubNational,
}

impl Tier {
    #[must_use]
    pub const fn base_points(self) -> u32 {
        match self {
            Tier::Global => 1000,
            Tier::Broad => 500,
            Tier::SubNational => 250,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Global => write!(f, "global"),
            Tier::Broad => write!(f, "broad"),
            Tier::SubNational => write!(f, "sub-national"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Region {
    #[default]
    Global,
    Europe,
    NorthAmerica,
    SouthAmerica,
    UnitedStates,
    State(UsState),
}

impl Region {
    const BROAD: [Region; 5] = [
        Region::Global,
        Region::Europe,
        Region::NorthAmerica,
        Region::SouthAmerica,
        Region::UnitedStates,
    ];

    /// Every selectable region: the five broad tiers followed by the states.
    pub fn all() -> impl Iterator<Item = Region> {
        Self::BROAD
            .into_iter()
            .chain(UsState::all().map(Region::State))
    }

    /// The identifier players select the region by.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Region::Global => "global",
            Region::Europe => "europe",
            Region::NorthAmerica => "north-america",
            Region::SouthAmerica => "south-america",
            Region::UnitedStates => "US",
            Region::State(state) => state.name(),
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Region::Global => "Global",
            Region::Europe => "Europe",
            Region::NorthAmerica => "N. America",
            Region::SouthAmerica => "S. America",
            Region::UnitedStates => "United States",
            Region::State(state) => state.name(),
        }
    }

    #[must_use]
    pub fn tier(self) -> Tier {
        match self {
            Region::Global => Tier::Global,
            Region::Europe
            | Region::NorthAmerica
            | Region::SouthAmerica
            | Region::UnitedStates => Tier::Broad,
            Region::State(_) => Tier::SubNational,
        }
    }

    /// Box the sampler draws from. `US` shares the North America box.
    #[must_use]
    pub fn bounds(self) -> BoundingBox {
        match self {
            Region::Global => GLOBAL_BOUNDS,
            Region::Europe => EUROPE_BOUNDS,
            Region::NorthAmerica | Region::UnitedStates => NORTH_AMERICA_BOUNDS,
            Region::SouthAmerica => SOUTH_AMERICA_BOUNDS,
            Region::State(state) => state.bounds(),
        }
    }

    /// `true` for the `US` tier and every state tier: rounds already scoped to
    /// the United States.
    #[must_use]
    pub fn is_us_scoped(self) -> bool {
        matches!(self, Region::UnitedStates | Region::State(_))
    }

    #[must_use]
    pub fn greeting(self) -> String {
        match self {
            Region::State(state) => {
                format!("Welcome to {}! Can you find which city we're in?", state.name())
            }
            _ => "Hello Explorer! Ask me anything about this location to narrow down your guess."
                .to_string(),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Region {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(region) = Self::BROAD
            .into_iter()
            .find(|r| r.id().eq_ignore_ascii_case(trimmed))
        {
            return Ok(region);
        }
        UsState::from_name(trimmed)
            .map(Region::State)
            .ok_or_else(|| RegionError::Unknown(s.to_string()))
    }
}

impl TryFrom<String> for Region {
    type Error = RegionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.id().to_string()
    }
}
