use thiserror::Error;

/// Errors returned by the Supabase store client.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Sign-in was rejected (bad credentials, unconfirmed email).
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The account was created but must be confirmed by email before it
    /// can sign in.
    #[error("confirm the sign-up email sent to {0}, then sign in")]
    ConfirmationRequired(String),

    /// Any other non-2xx response from the REST endpoints.
    #[error("Supabase API error {status}: {message}")]
    Api { status: u16, message: String },

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
