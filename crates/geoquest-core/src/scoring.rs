//! Guess resolution and point awards.
//!
//! [`resolve`] is a pure function of the location description, the player's
//! guess, the turns left and the region. Each of city / state / country is
//! matched independently with an asymmetric substring test:
//!
//! - the guess contains the whole component, or
//! - the component contains the guess and the guess is longer than
//!   [`MIN_PARTIAL_GUESS_CHARS`] characters.
//!
//! A win pays `base × turn multiplier × completeness`, rounded to the nearest
//! integer.

use serde::Serialize;

use crate::location::PlaceComponents;
use crate::region::{Region, Tier};

/// Turns a round starts with. [`TURN_MULTIPLIERS`] has one entry per turn.
pub const STARTING_TURNS: u8 = 3;

/// Payout factor by turns already consumed (first guess pays full value).
pub const TURN_MULTIPLIERS: [f64; STARTING_TURNS as usize] = [1.0, 0.5, 0.25];

/// Multiplier for any turn index past the end of [`TURN_MULTIPLIERS`].
const LATE_TURN_MULTIPLIER: f64 = 0.25;

/// A guess must be longer than this to match as a fragment of a component.
pub const MIN_PARTIAL_GUESS_CHARS: usize = 3;

/// Per-component match flags, before the US country-only exception.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComponentMatches {
    pub city: bool,
    pub state: bool,
    pub country: bool,
}

impl ComponentMatches {
    #[must_use]
    pub fn count(self) -> u8 {
        u8::from(self.city) + u8::from(self.state) + u8::from(self.country)
    }

    fn is_country_only(self) -> bool {
        self.country && !self.city && !self.state
    }
}

/// Result of resolving one guess.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verdict {
    /// Raw per-component results.
    pub matches: ComponentMatches,
    /// Matched components after the US country-only exception (0–3).
    pub match_count: u8,
    pub win: bool,
    /// Points awarded; `None` unless `win`.
    pub points: Option<u32>,
}

/// Resolves `guess` against a comma-separated `description`.
///
/// Malformed descriptions never fail: components that are absent are empty
/// and simply never match.
#[must_use]
pub fn resolve(description: &str, guess: &str, turns_remaining: u8, region: Region) -> Verdict {
    resolve_components(
        &PlaceComponents::parse(description),
        guess,
        turns_remaining,
        region,
    )
}

/// Resolves `guess` against already-split components.
#[must_use]
pub fn resolve_components(
    components: &PlaceComponents,
    guess: &str,
    turns_remaining: u8,
    region: Region,
) -> Verdict {
    let guess = guess.trim().to_lowercase();
    let matches = ComponentMatches {
        city: matches_normalized(&components.city.trim().to_lowercase(), &guess),
        state: matches_normalized(&components.state.trim().to_lowercase(), &guess),
        country: matches_normalized(&components.country.trim().to_lowercase(), &guess),
    };

    let mut match_count = matches.count();
    // "United States" in a round already scoped to the US discovers nothing.
    if region.is_us_scoped() && match_count == 1 && matches.is_country_only() {
        match_count = 0;
    }

    let win = match_count > 0;
    let points = win.then(|| award_points(region.tier(), turns_remaining, match_count));

    Verdict {
        matches,
        match_count,
        win,
        points,
    }
}

/// Case-insensitive component match test.
#[must_use]
pub fn component_matches(component: &str, guess: &str) -> bool {
    matches_normalized(
        &component.trim().to_lowercase(),
        &guess.trim().to_lowercase(),
    )
}

fn matches_normalized(component: &str, guess: &str) -> bool {
    if component.is_empty() {
        return false;
    }
    guess.contains(component)
        || (component.contains(guess) && guess.chars().count() > MIN_PARTIAL_GUESS_CHARS)
}

/// Decay factor indexed by turns consumed (`STARTING_TURNS - turns_remaining`).
#[must_use]
pub fn turn_multiplier(turns_remaining: u8) -> f64 {
    STARTING_TURNS
        .checked_sub(turns_remaining)
        .and_then(|idx| TURN_MULTIPLIERS.get(usize::from(idx)))
        .copied()
        .unwrap_or(LATE_TURN_MULTIPLIER)
}

#[must_use]
pub fn completeness_multiplier(match_count: u8) -> f64 {
    match match_count {
        0 => 0.0,
        1 => 0.3,
        2 => 0.6,
        _ => 1.0,
    }
}

#[must_use]
pub fn award_points(tier: Tier, turns_remaining: u8, match_count: u8) -> u32 {
    let raw = f64::from(tier.base_points())
        * turn_multiplier(turns_remaining)
        * completeness_multiplier(match_count);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let points = raw.round() as u32;
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(id: &str) -> Region {
        id.parse().expect("known region")
    }

    #[test]
    fn exact_guess_matches_component() {
        assert!(component_matches("Paris", "paris"));
        assert!(component_matches("  Paris ", "PARIS  "));
    }

    #[test]
    fn guess_containing_component_always_matches() {
        assert!(component_matches("New York", "New York City"));
        assert!(component_matches("USA", "usa"));
        // short components still match when fully contained
        assert!(component_matches("UK", "london uk"));
    }

    #[test]
    fn fragment_guess_needs_more_than_three_chars() {
        assert!(!component_matches("Paris", "par"));
        assert!(!component_matches("Paris", "pa"));
        assert!(component_matches("Paris", "pari"));
        assert!(component_matches("New York", "york"));
    }

    #[test]
    fn fragment_floor_counts_characters_not_bytes() {
        // four characters, more than four bytes
        assert!(component_matches("Île-de-France", "île-"));
        assert!(!component_matches("Île-de-France", "île"));
    }

    #[test]
    fn empty_component_never_matches() {
        assert!(!component_matches("", "anything"));
        assert!(!component_matches("   ", ""));
    }

    #[test]
    fn empty_guess_never_matches() {
        let verdict = resolve("Paris, Île-de-France, France", "   ", 3, Region::Global);
        assert_eq!(verdict.match_count, 0);
        assert!(!verdict.win);
    }

    #[test]
    fn first_guess_city_only_in_global_scores_300() {
        let verdict = resolve("Paris, Île-de-France, France", "paris", 3, Region::Global);
        assert_eq!(
            verdict.matches,
            ComponentMatches {
                city: true,
                state: false,
                country: false
            }
        );
        assert_eq!(verdict.match_count, 1);
        assert!(verdict.win);
        assert_eq!(verdict.points, Some(300));
    }

    #[test]
    fn full_match_on_second_guess_in_europe_scores_250() {
        let verdict = resolve(
            "Paris, Île-de-France, France",
            "Paris Île-de-France France",
            2,
            Region::Europe,
        );
        assert_eq!(verdict.match_count, 3);
        assert_eq!(verdict.points, Some(250));
    }

    #[test]
    fn two_components_pay_sixty_percent() {
        let verdict = resolve("Lyon, Auvergne-Rhône-Alpes, France", "lyon, france", 3, Region::Global);
        assert_eq!(verdict.match_count, 2);
        assert_eq!(verdict.points, Some(600));
    }

    #[test]
    fn country_only_guess_in_us_round_is_discarded() {
        let verdict = resolve("Austin, Texas, USA", "usa", 3, Region::UnitedStates);
        assert!(verdict.matches.country);
        assert_eq!(verdict.match_count, 0);
        assert!(!verdict.win);
        assert_eq!(verdict.points, None);
    }

    #[test]
    fn country_only_guess_in_state_round_is_discarded() {
        let verdict = resolve("Austin, Texas, United States", "United States", 3, region("Texas"));
        assert_eq!(verdict.match_count, 0);
        assert!(!verdict.win);
    }

    #[test]
    fn country_only_guess_counts_outside_us_rounds() {
        let verdict = resolve("Austin, Texas, USA", "usa", 3, Region::NorthAmerica);
        assert_eq!(verdict.match_count, 1);
        assert_eq!(verdict.points, Some(150));
    }

    #[test]
    fn state_plus_country_in_us_round_is_kept() {
        let verdict = resolve("Austin, Texas, USA", "texas usa", 3, Region::UnitedStates);
        assert_eq!(verdict.match_count, 2);
        assert_eq!(verdict.points, Some(300));
    }

    #[test]
    fn city_guess_in_state_round_uses_sub_national_base() {
        let verdict = resolve("Austin, Texas, USA", "Austin", 3, region("Texas"));
        assert_eq!(verdict.points, Some(75));
    }

    #[test]
    fn late_guess_rounds_half_up() {
        // 250 × 0.5 × 0.3 = 37.5
        let verdict = resolve("Austin, Texas, USA", "austin", 2, region("Texas"));
        assert_eq!(verdict.points, Some(38));
    }

    #[test]
    fn last_turn_pays_quarter() {
        let verdict = resolve("Paris, Île-de-France, France", "paris", 1, Region::Global);
        assert_eq!(verdict.points, Some(75));
    }

    #[test]
    fn turn_multiplier_defaults_outside_table() {
        assert!((turn_multiplier(3) - 1.0).abs() < f64::EPSILON);
        assert!((turn_multiplier(2) - 0.5).abs() < f64::EPSILON);
        assert!((turn_multiplier(1) - 0.25).abs() < f64::EPSILON);
        assert!((turn_multiplier(0) - 0.25).abs() < f64::EPSILON);
        assert!((turn_multiplier(7) - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_description_still_scores_present_components() {
        let verdict = resolve("France", "france", 3, Region::Global);
        assert_eq!(verdict.match_count, 1);
        assert_eq!(verdict.points, Some(300));

        let nothing = resolve("", "france", 3, Region::Global);
        assert!(!nothing.win);
    }

    #[test]
    fn resolve_components_bypasses_parsing() {
        let components = PlaceComponents {
            city: "Córdoba".to_string(),
            state: String::new(),
            country: "Argentina".to_string(),
        };
        let verdict = resolve_components(&components, "córdoba argentina", 3, Region::SouthAmerica);
        assert_eq!(verdict.match_count, 2);
        assert_eq!(verdict.points, Some(300));
    }

    #[test]
    fn resolve_is_deterministic() {
        let a = resolve("Kyoto, Kyoto Prefecture, Japan", "kyoto", 2, Region::Global);
        let b = resolve("Kyoto, Kyoto Prefecture, Japan", "kyoto", 2, Region::Global);
        assert_eq!(a, b);
        // "kyoto" matches both city and the prefecture name as a fragment
        assert_eq!(a.match_count, 2);
        assert_eq!(a.points, Some(300));
    }
}
