//! Row and wire types for the `games` / `profiles` tables and the auth API.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A signed-in player.
#[derive(Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub access_token: String,
    pub username: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("access_token", &"[redacted]")
            .field("username", &self.username)
            .finish()
    }
}

/// A row from the `profiles` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRow {
    pub id: Uuid,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub high_score: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProfileRow {
    /// Stored high score; a null column counts as zero.
    #[must_use]
    pub fn high_score(&self) -> i64 {
        self.high_score.unwrap_or(0)
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or("anonymous")
    }
}

/// A row from the `games` table.
#[derive(Debug, Clone, Deserialize)]
pub struct GameRow {
    pub user_id: Uuid,
    pub score: i64,
    #[serde(default)]
    pub location_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewGame<'a> {
    pub user_id: Uuid,
    pub score: i64,
    pub location_name: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProfileUpsert<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub high_score: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PasswordGrant<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Result of [`crate::SupabaseClient::save_score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    /// `false` when the `games` insert failed.
    pub game_recorded: bool,
    /// `true` when the profile was created or its high score raised.
    pub high_score_raised: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct SignUpRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub data: SignUpMetadata<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SignUpMetadata<'a> {
    pub username: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub user: AuthUser,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl TokenResponse {
    /// Username from user metadata, else the email, else the user id.
    pub(crate) fn into_session(self) -> Session {
        let username = self
            .user
            .user_metadata
            .get("username")
            .and_then(serde_json::Value::as_str)
            .filter(|name| !name.trim().is_empty())
            .map(str::to_owned)
            .or(self.user.email)
            .unwrap_or_else(|| self.user.id.to_string());
        Session {
            user_id: self.user.id,
            access_token: self.access_token,
            username,
        }
    }
}

/// Error bodies from GoTrue and PostgREST use different keys.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub(crate) fn summary(raw: &str) -> String {
        let parsed = serde_json::from_str::<ErrorBody>(raw).unwrap_or_default();
        parsed
            .error_description
            .or(parsed.msg)
            .or(parsed.message)
            .or(parsed.error)
            .unwrap_or_else(|| raw.trim().to_owned())
    }
}
