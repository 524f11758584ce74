//! Score persistence and leaderboards over the Supabase REST API.

pub mod client;
pub mod error;
pub mod types;

pub use client::{SupabaseClient, DEFAULT_LEADERBOARD_LIMIT, DEFAULT_PERSONAL_BEST_LIMIT};
pub use error::StoreError;
pub use types::{GameRow, ProfileRow, SaveOutcome, Session};
