//! Interactive rounds on stdin/stdout.
//!
//! Each round samples a location, then reads one submission per line until
//! the round is won or the turns run out. Questions go to the guide and
//! consume a turn once answered; everything else is scored as a guess.

use std::io::Write;
use std::sync::Arc;

use geoquest_core::{
    AppConfig, Game, Phase, Region, Round, RoundError, RoundResult, RoundState, SubmissionKind,
    Submitted,
};
use geoquest_guide::{GeminiClient, Guide, HINT_QUESTION};
use geoquest_imagery::{Sampler, SamplerConfig, StreetViewClient};
use geoquest_store::{Session, StoreError, SupabaseClient, DEFAULT_PERSONAL_BEST_LIMIT};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

/// Credentials from the command line. `sign_up` holds the username when
/// the account should be created first.
#[derive(Debug)]
pub(crate) struct Account {
    pub email: String,
    pub password: String,
    pub sign_up: Option<String>,
}

/// One line of player input.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Input {
    Ask(String),
    Hint,
    Guess(String),
    Quit,
    Empty,
}

pub(crate) fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    if let Some(question) = line.strip_prefix('?') {
        return Input::Ask(question.trim().to_string());
    }
    let lower = line.to_lowercase();
    if lower == "hint" {
        return Input::Hint;
    }
    if lower == "quit" || lower == "exit" {
        return Input::Quit;
    }
    if line.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("ask ")) {
        return Input::Ask(line[4..].trim().to_string());
    }
    Input::Guess(line.to_string())
}

pub(crate) async fn run_play(
    config: &AppConfig,
    region: Region,
    account: Option<Account>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let oracle = Arc::new(StreetViewClient::new(
        &config.maps_api_key,
        config.request_timeout_secs,
    )?);
    let guide = Guide::new(GeminiClient::new(
        &config.gemini_api_key,
        &config.gemini_model,
        config.request_timeout_secs,
    )?);
    let account = connect(config, account).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut game = Game::new();
    let mut round_number: u64 = 0;

    loop {
        let sampler_config = SamplerConfig {
            seed: seed.map(|s| s.wrapping_add(round_number)),
            ..SamplerConfig::from_app_config(config)
        };
        let sampler = Sampler::new(Arc::clone(&oracle), sampler_config);

        println!("Searching for a location in {}...", region.label());
        let sample = tokio::select! {
            result = sampler.sample_with_report(region) => result?,
            _ = tokio::signal::ctrl_c() => {
                println!("Cancelled.");
                return Ok(());
            }
        };
        if sample.fell_back(region) {
            println!(
                "No imagery turned up in {}; this one could be anywhere in the world.",
                region.label()
            );
        }

        let round = game.start_round(region, sample.location);
        tracing::info!(
            region = %region,
            attempts = sample.attempts,
            pano_id = sample.pano_id.as_deref().unwrap_or("-"),
            "round started"
        );
        println!();
        println!("{}", region.greeting());
        println!("Panorama: {}", round.location().street_view_url());
        println!("Type a guess, '?<question>' or 'ask <question>' for the guide, 'hint' for a clue.");

        let Some(state) = play_round(&mut game, &guide, &mut lines).await? else {
            return Ok(());
        };
        let description = game
            .round()
            .map(|r| r.location().description().to_string())
            .unwrap_or_default();
        announce(state, &description);
        tracing::info!(result = ?state.result, score = state.score, "round finished");

        if let Some((store, session)) = &account {
            persist(store, session, state.score, &description).await;
        }

        prompt("Play again? [y/N] ")?;
        let again = lines.next_line().await?.unwrap_or_default();
        if !again.trim().eq_ignore_ascii_case("y") {
            return Ok(());
        }
        game.play_again()?;
        round_number += 1;
    }
}

/// Returns the final round state, or `None` if the player quit or input
/// ended mid-round.
async fn play_round<R>(
    game: &mut Game,
    guide: &Guide,
    lines: &mut Lines<R>,
) -> anyhow::Result<Option<RoundState>>
where
    R: AsyncBufRead + Unpin,
{
    while game.phase() == Phase::Playing {
        let turns = game.round().map_or(0, |r| r.state().turns_remaining);
        prompt(&format!("[{turns} turns left] > "))?;
        let Some(line) = lines.next_line().await? else {
            return Ok(None);
        };

        match parse_input(&line) {
            Input::Empty => {}
            Input::Quit => return Ok(None),
            Input::Hint => ask_guide(game, guide, HINT_QUESTION).await?,
            Input::Ask(question) => ask_guide(game, guide, &question).await?,
            Input::Guess(guess) => {
                let submitted = game.submit(SubmissionKind::Guess, &guess)?;
                if matches!(submitted, Submitted::Guess(verdict) if !verdict.win)
                    && game.phase() == Phase::Playing
                {
                    println!("Not quite. Keep exploring!");
                }
            }
        }
    }
    Ok(game.round().map(Round::state))
}

async fn ask_guide(game: &mut Game, guide: &Guide, question: &str) -> Result<(), RoundError> {
    let context = match game.check_submission(question) {
        Ok(round) => round.location().guide_context(),
        Err(RoundError::EmptySubmission) => {
            println!("Ask something after the '?'.");
            return Ok(());
        }
        Err(err) => return Err(err),
    };
    let answer = guide.ask(question, &context).await;
    println!("Guide: {answer}");
    game.submit(SubmissionKind::Question, question)?;
    Ok(())
}

fn announce(state: RoundState, description: &str) {
    println!();
    match state.result {
        RoundResult::Win => println!("Correct! It was {description}. You scored {} points.", state.score),
        RoundResult::Loss | RoundResult::Unresolved => {
            println!("Out of turns. The location was {description}.");
        }
    }
}

async fn connect(
    config: &AppConfig,
    account: Option<Account>,
) -> Option<(SupabaseClient, Session)> {
    let account = account?;
    let Some(supabase) = config.supabase.as_ref() else {
        tracing::warn!("SUPABASE_URL is not set; scores will not be saved");
        return None;
    };
    let store =
        match SupabaseClient::new(&supabase.url, &supabase.anon_key, config.request_timeout_secs) {
            Ok(store) => store,
            Err(err) => {
                tracing::warn!(error = %err, "store client unavailable; scores will not be saved");
                return None;
            }
        };
    let result = match &account.sign_up {
        Some(username) => {
            store
                .sign_up(&account.email, &account.password, username)
                .await
        }
        None => store.sign_in(&account.email, &account.password).await,
    };
    match result {
        Ok(session) => {
            println!("Signed in as {}.", session.username);
            Some((store, session))
        }
        Err(StoreError::ConfirmationRequired(email)) => {
            println!(
                "Check {email} for a confirmation link, then sign in. Playing without saving scores."
            );
            None
        }
        Err(err) => {
            tracing::warn!(error = %err, "sign-in failed; scores will not be saved");
            println!("Sign-in failed ({err}); playing without saving scores.");
            None
        }
    }
}

/// Failures here are logged and never end the session.
async fn persist(store: &SupabaseClient, session: &Session, score: u32, description: &str) {
    match store.save_score(session, score, description).await {
        Ok(outcome) if outcome.high_score_raised => println!("New high score: {score}!"),
        Ok(_) => {}
        Err(err) => {
            tracing::warn!(user_id = %session.user_id, error = %err, "failed to save score");
            return;
        }
    }

    match store
        .personal_best(session, DEFAULT_PERSONAL_BEST_LIMIT)
        .await
    {
        Ok(games) if !games.is_empty() => {
            println!("Your best rounds:");
            for game in games {
                println!(
                    "  {:>5}  {}",
                    game.score,
                    game.location_name.as_deref().unwrap_or("unknown location")
                );
            }
        }
        Ok(_) => {}
        Err(err) => tracing::warn!(error = %err, "failed to load personal bests"),
    }
}

fn prompt(text: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{text}")?;
    stdout.flush()
}
