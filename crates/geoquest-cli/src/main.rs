mod play;
mod report;

use clap::{Parser, Subcommand};
use geoquest_core::{Region, STARTING_TURNS};
use geoquest_store::DEFAULT_LEADERBOARD_LIMIT;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "geoquest")]
#[command(about = "GeoQuest: guess where a street-level panorama was taken")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List selectable regions with their tier and base points
    Regions,
    /// Score one guess against a place description, offline
    Resolve {
        /// Region the round was played in (e.g. global, europe, US, Texas)
        #[arg(long, default_value = "global")]
        region: Region,
        /// Turns remaining when the guess is made
        #[arg(long, default_value_t = STARTING_TURNS)]
        turns: u8,
        /// Comma-separated description, e.g. "Paris, Île-de-France, France"
        description: String,
        guess: String,
    },
    /// Play interactive rounds in the terminal
    Play {
        #[arg(long, default_value = "global")]
        region: Region,
        /// Sign in to record scores
        #[arg(long, env = "GEOQUEST_EMAIL", requires = "password")]
        email: Option<String>,
        #[arg(long, env = "GEOQUEST_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Create the account before playing
        #[arg(long, requires_all = ["email", "username"])]
        sign_up: bool,
        /// Name shown on the leaderboard for a new account
        #[arg(long, requires = "sign_up")]
        username: Option<String>,
        /// Seed the location sampler for reproducible draws
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show the top high scores
    Leaderboard {
        #[arg(long, default_value_t = DEFAULT_LEADERBOARD_LIMIT)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Regions => {
            init_tracing("warn")?;
            report::run_regions();
        }
        Commands::Resolve {
            region,
            turns,
            description,
            guess,
        } => {
            init_tracing("warn")?;
            report::run_resolve(region, turns, &description, &guess);
        }
        Commands::Play {
            region,
            email,
            password,
            sign_up,
            username,
            seed,
        } => {
            let config = geoquest_core::load_app_config()?;
            init_tracing(&config.log_level)?;
            let account = email.zip(password).map(|(email, password)| play::Account {
                email,
                password,
                sign_up: username.filter(|_| sign_up),
            });
            play::run_play(&config, region, account, seed).await?;
        }
        Commands::Leaderboard { limit } => {
            let config = geoquest_core::load_store_config()?;
            init_tracing(&config.log_level)?;
            report::run_leaderboard(&config, limit).await?;
        }
    }

    Ok(())
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
