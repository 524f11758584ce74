//! Read-only commands: region listing, offline scoring and the leaderboard.

use anyhow::Context;
use geoquest_core::{resolve, PlaceComponents, Region, StoreConfig, Verdict};
use geoquest_store::SupabaseClient;

pub(crate) fn run_regions() {
    println!("{:<16} {:<16} {:<12} {:>6}", "ID", "LABEL", "TIER", "BASE");
    for region in Region::all() {
        println!(
            "{:<16} {:<16} {:<12} {:>6}",
            region.id(),
            region.label(),
            region.tier().to_string(),
            region.tier().base_points()
        );
    }
}

pub(crate) fn run_resolve(region: Region, turns: u8, description: &str, guess: &str) {
    let components = PlaceComponents::parse(description);
    println!("city:    {}", display_component(&components.city));
    println!("state:   {}", display_component(&components.state));
    println!("country: {}", display_component(&components.country));
    println!();
    println!("{}", describe_verdict(&resolve(description, guess, turns, region)));
}

pub(crate) async fn run_leaderboard(config: &StoreConfig, limit: u32) -> anyhow::Result<()> {
    let supabase = config
        .supabase
        .as_ref()
        .context("SUPABASE_URL and SUPABASE_ANON_KEY must be set to read the leaderboard")?;
    let store = SupabaseClient::new(&supabase.url, &supabase.anon_key, config.request_timeout_secs)?;

    let leaders = store.leaderboard(limit).await?;
    if leaders.is_empty() {
        println!("No scores yet.");
        return Ok(());
    }
    for (rank, profile) in leaders.iter().enumerate() {
        println!(
            "{:>2}. {:<24} {:>6}",
            rank + 1,
            profile.display_name(),
            profile.high_score()
        );
    }
    Ok(())
}

pub(crate) fn describe_verdict(verdict: &Verdict) -> String {
    match verdict.points {
        Some(points) if verdict.win => format!(
            "match: {}/3 components, {points} points",
            verdict.match_count
        ),
        _ => format!("no match ({} components)", verdict.match_count),
    }
}

fn display_component(component: &str) -> &str {
    if component.is_empty() {
        "(missing)"
    } else {
        component
    }
}
