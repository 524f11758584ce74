use thiserror::Error;

/// Errors raised while loading [`crate::AppConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    /// The variable is set but still holds an empty or `YOUR_...` template value.
    #[error("{0} holds a placeholder value; provide a real credential in .env")]
    PlaceholderCredential(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegionError {
    #[error("unknown region: \"{0}\"")]
    Unknown(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum LocationError {
    #[error("coordinates out of range: lat={lat}, lng={lng}")]
    OutOfRange { lat: f64, lng: f64 },

    #[error("location description has no country component: \"{0}\"")]
    MissingCountry(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoundError {
    #[error("no round is in play")]
    NotPlaying,

    #[error("submission is empty")]
    EmptySubmission,

    #[error("a round is still in play")]
    RoundInProgress,
}
