//! Round state machine.
//!
//! A [`Game`] moves `Start → Playing → Result` and back to `Start` on
//! [`Game::play_again`]. It only changes on the two documented triggers:
//! starting a round and submitting a question or guess. Scoring is delegated
//! to [`crate::scoring::resolve_components`]; the caller is responsible for
//! fetching guide answers and persisting finished rounds.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::RoundError;
use crate::location::Location;
use crate::region::Region;
use crate::scoring::{resolve_components, Verdict, STARTING_TURNS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Start,
    Playing,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundResult {
    Unresolved,
    Win,
    Loss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    Question,
    Guess,
}

impl FromStr for SubmissionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "question" => Ok(SubmissionKind::Question),
            "guess" => Ok(SubmissionKind::Guess),
            other => Err(format!("unknown submission kind: {other}")),
        }
    }
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionKind::Question => write!(f, "question"),
            SubmissionKind::Guess => write!(f, "guess"),
        }
    }
}

/// What a submission did to the round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Submitted {
    Guess(Verdict),
    Question(RoundState),
}

/// Mutable per-round counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundState {
    pub turns_remaining: u8,
    pub score: u32,
    pub result: RoundResult,
}

impl Default for RoundState {
    fn default() -> Self {
        Self {
            turns_remaining: STARTING_TURNS,
            score: 0,
            result: RoundResult::Unresolved,
        }
    }
}

impl RoundState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.result != RoundResult::Unresolved
    }

    fn consume_turn(&mut self) {
        self.turns_remaining = self.turns_remaining.saturating_sub(1);
        if self.turns_remaining == 0 {
            self.result = RoundResult::Loss;
            self.score = 0;
        }
    }
}

/// One round: the region, its ground truth, and the counters.
#[derive(Debug, Clone)]
pub struct Round {
    region: Region,
    location: Location,
    state: RoundState,
}

impl Round {
    #[must_use]
    pub fn new(region: Region, location: Location) -> Self {
        Self {
            region,
            location,
            state: RoundState::default(),
        }
    }

    #[must_use]
    pub fn region(&self) -> Region {
        self.region
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    #[must_use]
    pub fn state(&self) -> RoundState {
        self.state
    }
}

#[derive(Debug, Clone)]
pub struct Game {
    phase: Phase,
    round: Option<Round>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Phase::Start,
            round: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Starts a fresh round, abandoning any round in play. Turns reset to
    /// [`STARTING_TURNS`] and score to 0.
    pub fn start_round(&mut self, region: Region, location: Location) -> &Round {
        self.phase = Phase::Playing;
        self.round.insert(Round::new(region, location))
    }

    /// Checks that `text` may be submitted now, without consuming a turn.
    ///
    /// # Errors
    ///
    /// - [`RoundError::NotPlaying`] outside the `Playing` phase.
    /// - [`RoundError::EmptySubmission`] for blank input.
    pub fn check_submission(&self, text: &str) -> Result<&Round, RoundError> {
        let round = self.playing_round()?;
        if text.trim().is_empty() {
            return Err(RoundError::EmptySubmission);
        }
        Ok(round)
    }

    /// Resolves a guess. Every guess costs one turn; points are computed
    /// from the turns remaining before it. A win ends the round with those
    /// points, a miss on the last turn ends it as a loss.
    ///
    /// # Errors
    ///
    /// Same as [`Game::check_submission`].
    pub fn submit_guess(&mut self, guess: &str) -> Result<Verdict, RoundError> {
        self.check_submission(guess)?;
        let round = self.round.as_mut().ok_or(RoundError::NotPlaying)?;

        let verdict = resolve_components(
            round.location.components(),
            guess,
            round.state.turns_remaining,
            round.region,
        );
        match verdict.points {
            Some(points) if verdict.win => {
                round.state.score = points;
                round.state.result = RoundResult::Win;
                round.state.turns_remaining = round.state.turns_remaining.saturating_sub(1);
            }
            _ => round.state.consume_turn(),
        }

        if round.state.is_terminal() {
            self.phase = Phase::Result;
        }
        Ok(verdict)
    }

    /// Records an answered question: one turn, regardless of the answer.
    ///
    /// # Errors
    ///
    /// Same as [`Game::check_submission`].
    pub fn record_question(&mut self, question: &str) -> Result<RoundState, RoundError> {
        self.check_submission(question)?;
        let round = self.round.as_mut().ok_or(RoundError::NotPlaying)?;
        round.state.consume_turn();
        let state = round.state;
        if state.is_terminal() {
            self.phase = Phase::Result;
        }
        Ok(state)
    }

    /// Applies one submission of either kind. Questions must already have
    /// been answered by the guide.
    ///
    /// # Errors
    ///
    /// Same as [`Game::check_submission`].
    pub fn submit(&mut self, kind: SubmissionKind, text: &str) -> Result<Submitted, RoundError> {
        match kind {
            SubmissionKind::Guess => self.submit_guess(text).map(Submitted::Guess),
            SubmissionKind::Question => self.record_question(text).map(Submitted::Question),
        }
    }

    /// Leaves the result screen for region selection.
    ///
    /// # Errors
    ///
    /// Returns [`RoundError::RoundInProgress`] while a round is still in play.
    pub fn play_again(&mut self) -> Result<(), RoundError> {
        if self.phase == Phase::Playing {
            return Err(RoundError::RoundInProgress);
        }
        self.phase = Phase::Start;
        self.round = None;
        Ok(())
    }

    fn playing_round(&self) -> Result<&Round, RoundError> {
        match (&self.phase, &self.round) {
            (Phase::Playing, Some(round)) => Ok(round),
            _ => Err(RoundError::NotPlaying),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Coordinates;

    fn paris() -> Location {
        Location::from_description(
            Coordinates::new(48.8566, 2.3522).unwrap(),
            "Paris, Île-de-France, France",
        )
        .unwrap()
    }

    fn playing(region: Region) -> Game {
        let mut game = Game::new();
        game.start_round(region, paris());
        game
    }

    #[test]
    fn new_game_waits_in_start_phase() {
        let game = Game::new();
        assert_eq!(game.phase(), Phase::Start);
        assert!(game.round().is_none());
    }

    #[test]
    fn start_round_resets_counters() {
        let game = playing(Region::Global);
        assert_eq!(game.phase(), Phase::Playing);
        let state = game.round().unwrap().state();
        assert_eq!(state.turns_remaining, 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.result, RoundResult::Unresolved);
    }

    #[test]
    fn winning_first_guess_ends_round() {
        let mut game = playing(Region::Global);
        let verdict = game.submit_guess("paris").unwrap();
        assert_eq!(verdict.points, Some(300));
        assert_eq!(game.phase(), Phase::Result);
        let state = game.round().unwrap().state();
        assert_eq!(state.result, RoundResult::Win);
        assert_eq!(state.score, 300);
        assert_eq!(state.turns_remaining, 2);
    }

    #[test]
    fn question_then_guess_pays_second_turn_rate() {
        let mut game = playing(Region::Europe);
        let state = game.record_question("Is it cold here?").unwrap();
        assert_eq!(state.turns_remaining, 2);
        let verdict = game.submit_guess("Paris, Île-de-France, France").unwrap();
        assert_eq!(verdict.points, Some(250));
    }

    #[test]
    fn three_misses_lose_the_round_exactly_on_the_third() {
        let mut game = playing(Region::Global);
        game.submit_guess("tokyo").unwrap();
        assert_eq!(game.phase(), Phase::Playing);
        game.submit_guess("lima").unwrap();
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.round().unwrap().state().turns_remaining, 1);
        game.submit_guess("oslo").unwrap();
        assert_eq!(game.phase(), Phase::Result);
        let state = game.round().unwrap().state();
        assert_eq!(state.result, RoundResult::Loss);
        assert_eq!(state.score, 0);
        assert_eq!(state.turns_remaining, 0);
    }

    #[test]
    fn questions_alone_exhaust_the_round() {
        let mut game = playing(Region::Global);
        for _ in 0..3 {
            game.record_question("hint").unwrap();
        }
        assert_eq!(game.round().unwrap().state().result, RoundResult::Loss);
        assert_eq!(
            game.record_question("again"),
            Err(RoundError::NotPlaying)
        );
    }

    #[test]
    fn blank_submission_keeps_the_turn() {
        let mut game = playing(Region::Global);
        assert_eq!(game.submit_guess("  "), Err(RoundError::EmptySubmission));
        assert_eq!(game.record_question(""), Err(RoundError::EmptySubmission));
        assert_eq!(game.round().unwrap().state().turns_remaining, 3);
    }

    #[test]
    fn submissions_after_result_are_rejected() {
        let mut game = playing(Region::Global);
        game.submit_guess("france").unwrap();
        assert_eq!(game.submit_guess("paris"), Err(RoundError::NotPlaying));
    }

    #[test]
    fn submissions_before_start_are_rejected() {
        let mut game = Game::new();
        assert_eq!(game.submit_guess("paris"), Err(RoundError::NotPlaying));
    }

    #[test]
    fn play_again_only_after_result() {
        let mut game = playing(Region::Global);
        assert_eq!(game.play_again(), Err(RoundError::RoundInProgress));
        game.submit_guess("paris").unwrap();
        game.play_again().unwrap();
        assert_eq!(game.phase(), Phase::Start);
        assert!(game.round().is_none());
    }

    #[test]
    fn us_country_only_guess_costs_a_turn() {
        let mut game = Game::new();
        let austin = Location::from_description(
            Coordinates::new(30.27, -97.74).unwrap(),
            "Austin, Texas, USA",
        )
        .unwrap();
        game.start_round(Region::UnitedStates, austin);
        let verdict = game.submit_guess("usa").unwrap();
        assert!(!verdict.win);
        let state = game.round().unwrap().state();
        assert_eq!(state.turns_remaining, 2);
        assert_eq!(state.score, 0);
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn winning_last_guess_is_still_a_win() {
        let mut game = playing(Region::Global);
        game.submit_guess("tokyo").unwrap();
        game.submit_guess("lima").unwrap();
        let verdict = game.submit_guess("paris").unwrap();
        assert_eq!(verdict.points, Some(75));
        let state = game.round().unwrap().state();
        assert_eq!(state.result, RoundResult::Win);
        assert_eq!(state.score, 75);
        assert_eq!(state.turns_remaining, 0);
    }

    #[test]
    fn submit_dispatches_on_kind() {
        let mut game = playing(Region::Global);
        let asked = game
            .submit(SubmissionKind::Question, "Is it in Europe?")
            .unwrap();
        assert!(matches!(asked, Submitted::Question(state) if state.turns_remaining == 2));

        let guessed = game.submit(SubmissionKind::Guess, "paris").unwrap();
        let Submitted::Guess(verdict) = guessed else {
            panic!("expected a guess verdict");
        };
        assert_eq!(verdict.points, Some(150));
        assert_eq!(game.phase(), Phase::Result);
        assert_eq!(
            game.submit(SubmissionKind::Guess, "paris"),
            Err(RoundError::NotPlaying)
        );
    }

    #[test]
    fn submission_kind_parses() {
        assert_eq!("Guess".parse::<SubmissionKind>().unwrap(), SubmissionKind::Guess);
        assert_eq!(
            "question".parse::<SubmissionKind>().unwrap(),
            SubmissionKind::Question
        );
        assert!("shout".parse::<SubmissionKind>().is_err());
    }
}
