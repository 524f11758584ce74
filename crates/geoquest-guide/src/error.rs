use thiserror::Error;

/// Errors returned by the Gemini client.
#[derive(Debug, Error)]
pub enum GuideError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 429 from the model endpoint.
    #[error("Gemini rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Gemini rejected the API key: {0}")]
    InvalidApiKey(String),

    /// Prompt or answer blocked by the model's safety filters.
    #[error("Gemini blocked the response: {0}")]
    Blocked(String),

    /// Any other non-2xx response.
    #[error("Gemini API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Gemini returned an empty answer")]
    EmptyAnswer,

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl GuideError {
    /// The reply shown to the player instead of an answer.
    #[must_use]
    pub fn fallback_reply(&self) -> String {
        match self {
            GuideError::EmptyAnswer => {
                "The guide is speechless. Perhaps try asking in a different way?".to_owned()
            }
            GuideError::RateLimited(_) => {
                "The local spirits are weary from too many visitors. Try again in a moment, explorer!"
                    .to_owned()
            }
            GuideError::InvalidApiKey(_) => {
                "It seems my credentials are being questioned. Please check the API key.".to_owned()
            }
            GuideError::Blocked(_) => {
                "I'm not allowed to talk about that. Let's stick to the geography and culture!"
                    .to_owned()
            }
            other => format!(
                "I encountered an issue: {other}. A mysterious fog has obscured my vision; let's try again shortly!"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_answer_reply() {
        assert!(GuideError::EmptyAnswer.fallback_reply().contains("speechless"));
    }

    #[test]
    fn rate_limit_reply() {
        let reply = GuideError::RateLimited("quota".to_owned()).fallback_reply();
        assert!(reply.contains("weary"));
    }

    #[test]
    fn invalid_key_reply() {
        let reply = GuideError::InvalidApiKey("API_KEY_INVALID".to_owned()).fallback_reply();
        assert!(reply.contains("credentials"));
    }

    #[test]
    fn blocked_reply() {
        let reply = GuideError::Blocked("SAFETY".to_owned()).fallback_reply();
        assert!(reply.contains("geography and culture"));
    }

    #[test]
    fn other_errors_mention_the_issue() {
        let reply = GuideError::Api {
            status: 500,
            message: "backend exploded".to_owned(),
        }
        .fallback_reply();
        assert!(reply.starts_with("I encountered an issue"));
        assert!(reply.contains("backend exploded"));
        assert!(reply.contains("mysterious fog"));
    }
}
