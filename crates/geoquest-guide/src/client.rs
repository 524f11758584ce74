//! HTTP client for the Gemini `generateContent` REST endpoint.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::GuideError;
use crate::types::{Content, ErrorEnvelope, GenerateRequest, GenerateResponse, RequestPart};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";

/// Client for one Gemini model.
///
/// Use [`GeminiClient::new`] for production or [`GeminiClient::with_base_url`]
/// to point at a mock server in tests.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: Url,
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns [`GuideError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, GuideError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GuideError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GuideError::InvalidBaseUrl`] if `base_url`
    /// does not parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GuideError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("geoquest/0.1 (guide)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GuideError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url,
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends `prompt` as a single user turn and returns the model's text.
    ///
    /// # Errors
    ///
    /// - [`GuideError::RateLimited`] on HTTP 429.
    /// - [`GuideError::InvalidApiKey`] when the API reports `API_KEY_INVALID`.
    /// - [`GuideError::Blocked`] when safety filters withheld the answer.
    /// - [`GuideError::EmptyAnswer`] when the model returned no text.
    /// - [`GuideError::Api`] for any other non-2xx status.
    /// - [`GuideError::Http`] / [`GuideError::Deserialize`] on transport or
    ///   decoding failure.
    pub async fn generate(&self, prompt: &str) -> Result<String, GuideError> {
        let url = self.generate_url()?;
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        tracing::debug!(model = %self.model, "gemini generateContent request");
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Self::classify_failure(status, &body));
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| GuideError::Deserialize {
                context: format!("generateContent(model={})", self.model),
                source: e,
            })?;

        if let Some(reason) = parsed.block_reason() {
            return Err(GuideError::Blocked(reason));
        }
        let text = parsed.answer_text();
        if text.is_empty() {
            return Err(GuideError::EmptyAnswer);
        }
        Ok(text)
    }

    fn generate_url(&self) -> Result<Url, GuideError> {
        let path = format!("v1beta/models/{}:generateContent", self.model);
        self.base_url
            .join(&path)
            .map_err(|e| GuideError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    fn classify_failure(status: StatusCode, body: &str) -> GuideError {
        let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
        let message = envelope
            .as_ref()
            .map_or_else(|| body.to_owned(), |e| e.error.message.clone());

        if status == StatusCode::TOO_MANY_REQUESTS {
            return GuideError::RateLimited(message);
        }
        if envelope
            .as_ref()
            .is_some_and(|e| e.error.is_invalid_api_key())
        {
            return GuideError::InvalidApiKey(message);
        }
        if message.contains("SAFETY") {
            return GuideError::Blocked(message);
        }
        GuideError::Api {
            status: status.as_u16(),
            message,
        }
    }
}
