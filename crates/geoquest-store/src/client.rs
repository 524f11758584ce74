//! HTTP client for the Supabase auth (GoTrue) and REST (PostgREST) APIs.
//!
//! Every request carries the project's anon key in the `apikey` header.
//! Reads and writes made on behalf of a player authenticate with that
//! player's access token; public reads use the anon key as bearer.

use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::types::{
    ErrorBody, GameRow, NewGame, PasswordGrant, ProfileRow, ProfileUpsert, SaveOutcome, Session,
    SignUpMetadata, SignUpRequest, TokenResponse,
};

pub const DEFAULT_LEADERBOARD_LIMIT: u32 = 5;
pub const DEFAULT_PERSONAL_BEST_LIMIT: u32 = 3;

/// Client for one Supabase project.
pub struct SupabaseClient {
    client: Client,
    anon_key: String,
    base_url: Url,
}

impl SupabaseClient {
    /// Creates a client for the project at `project_url`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`StoreError::InvalidBaseUrl`] if
    /// `project_url` does not parse.
    pub fn new(project_url: &str, anon_key: &str, timeout_secs: u64) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("geoquest/0.1 (store)")
            .build()?;

        let normalised = format!("{}/", project_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| StoreError::InvalidBaseUrl {
            url: project_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            anon_key: anon_key.to_owned(),
            base_url,
        })
    }

    /// Signs in with email and password.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Auth`] when the credentials are rejected (HTTP 400/401).
    /// - [`StoreError::Api`] for any other non-2xx status.
    /// - [`StoreError::Http`] / [`StoreError::Deserialize`] on transport or
    ///   decoding failure.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, StoreError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .client
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&PasswordGrant { email, password })
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 400 || status.as_u16() == 401 {
            let body = response.text().await?;
            return Err(StoreError::Auth(ErrorBody::summary(&body)));
        }
        let token: TokenResponse = Self::read_json(response, "sign_in").await?;
        let session = token.into_session();
        tracing::info!(user_id = %session.user_id, "signed in");
        Ok(session)
    }

    /// Creates an account with `username` stored in the user metadata.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Auth`] when the signup is rejected (HTTP 400/422,
    ///   e.g. the email is already registered).
    /// - [`StoreError::ConfirmationRequired`] when the project only confirms
    ///   accounts by email, so no session is issued yet.
    /// - [`StoreError::Api`] for any other non-2xx status.
    /// - [`StoreError::Http`] / [`StoreError::Deserialize`] on transport or
    ///   decoding failure.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<Session, StoreError> {
        let url = self.endpoint("auth/v1/signup")?;
        let body = SignUpRequest {
            email,
            password,
            data: SignUpMetadata { username },
        };

        let response = self
            .client
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if matches!(status.as_u16(), 400 | 422) {
            let body = response.text().await?;
            return Err(StoreError::Auth(ErrorBody::summary(&body)));
        }
        let reply: serde_json::Value = Self::read_json(response, "sign_up").await?;
        if reply
            .get("access_token")
            .and_then(serde_json::Value::as_str)
            .is_none()
        {
            return Err(StoreError::ConfirmationRequired(email.to_owned()));
        }
        let token: TokenResponse =
            serde_json::from_value(reply).map_err(|e| StoreError::Deserialize {
                context: "sign_up".to_owned(),
                source: e,
            })?;
        let session = token.into_session();
        tracing::info!(user_id = %session.user_id, "account created");
        Ok(session)
    }

    /// Records one finished round and raises the player's high score if
    /// `score` beats it.
    ///
    /// The profile is upserted when it does not exist yet or when `score`
    /// is strictly higher than the stored high score; the stored value
    /// never decreases. A failed games insert is logged and reported in the
    /// outcome; the high score is still updated.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if reading or writing the profile fails.
    pub async fn save_score(
        &self,
        session: &Session,
        score: u32,
        location_description: &str,
    ) -> Result<SaveOutcome, StoreError> {
        let score = i64::from(score);
        let game_recorded = match self.record_game(session, score, location_description).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(user_id = %session.user_id, error = %err, "failed to record game");
                false
            }
        };

        let profile = self.fetch_profile(session).await?;
        let current = profile.as_ref().map_or(0, ProfileRow::high_score);
        if profile.is_some() && score <= current {
            tracing::debug!(score, current, "high score unchanged");
            return Ok(SaveOutcome {
                game_recorded,
                high_score_raised: false,
            });
        }

        self.upsert_profile(session, score.max(current)).await?;
        tracing::info!(user_id = %session.user_id, score, previous = current, "high score updated");
        Ok(SaveOutcome {
            game_recorded,
            high_score_raised: true,
        })
    }

    /// Top profiles by high score, highest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on request or decoding failure.
    pub async fn leaderboard(&self, limit: u32) -> Result<Vec<ProfileRow>, StoreError> {
        let mut url = self.endpoint("rest/v1/profiles")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "high_score.desc")
            .append_pair("limit", &limit.to_string());

        let request = self.client.get(url);
        let response = self.authorize(request, &self.anon_key).send().await?;
        Self::read_json(response, "leaderboard").await
    }

    /// The signed-in player's best games, highest score first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on request or decoding failure.
    pub async fn personal_best(
        &self,
        session: &Session,
        limit: u32,
    ) -> Result<Vec<GameRow>, StoreError> {
        let mut url = self.endpoint("rest/v1/games")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("user_id", &format!("eq.{}", session.user_id))
            .append_pair("order", "score.desc")
            .append_pair("limit", &limit.to_string());

        let request = self.client.get(url);
        let response = self
            .authorize(request, &session.access_token)
            .send()
            .await?;
        Self::read_json(response, "personal_best").await
    }

    async fn record_game(
        &self,
        session: &Session,
        score: i64,
        location_name: &str,
    ) -> Result<(), StoreError> {
        let url = self.endpoint("rest/v1/games")?;
        let row = NewGame {
            user_id: session.user_id,
            score,
            location_name,
            created_at: Utc::now(),
        };
        let request = self
            .client
            .post(url)
            .header("Prefer", "return=minimal")
            .json(&row);
        let response = self
            .authorize(request, &session.access_token)
            .send()
            .await?;
        Self::expect_success(response).await
    }

    async fn fetch_profile(&self, session: &Session) -> Result<Option<ProfileRow>, StoreError> {
        let mut url = self.endpoint("rest/v1/profiles")?;
        url.query_pairs_mut()
            .append_pair("select", "id,high_score")
            .append_pair("id", &format!("eq.{}", session.user_id));

        let request = self.client.get(url);
        let response = self
            .authorize(request, &session.access_token)
            .send()
            .await?;
        let rows: Vec<ProfileRow> = Self::read_json(response, "fetch_profile").await?;
        Ok(rows.into_iter().next())
    }

    async fn upsert_profile(&self, session: &Session, high_score: i64) -> Result<(), StoreError> {
        let url = self.endpoint("rest/v1/profiles")?;
        let row = ProfileUpsert {
            id: session.user_id,
            username: &session.username,
            high_score,
            updated_at: Utc::now(),
        };
        let request = self
            .client
            .post(url)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&row);
        let response = self
            .authorize(request, &session.access_token)
            .send()
            .await?;
        Self::expect_success(response).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        self.base_url
            .join(path)
            .map_err(|e| StoreError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    fn authorize(&self, request: RequestBuilder, bearer: &str) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    async fn expect_success(response: Response) -> Result<(), StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await?;
        Err(StoreError::Api {
            status: status.as_u16(),
            message: ErrorBody::summary(&body),
        })
    }

    async fn read_json<T: DeserializeOwned>(
        response: Response,
        context: &str,
    ) -> Result<T, StoreError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: ErrorBody::summary(&body),
            });
        }
        serde_json::from_str(&body).map_err(|e| StoreError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_project_path_prefix() {
        let client = SupabaseClient::new("https://abc.supabase.co", "anon", 30).unwrap();
        assert_eq!(
            client.endpoint("rest/v1/games").unwrap().as_str(),
            "https://abc.supabase.co/rest/v1/games"
        );
    }

    #[test]
    fn new_rejects_unparseable_url() {
        let result = SupabaseClient::new("not a url", "anon", 30);
        assert!(matches!(result, Err(StoreError::InvalidBaseUrl { .. })));
    }
}
