use geoquest_core::Region;
use thiserror::Error;

/// Errors returned by an imagery oracle lookup.
#[derive(Debug, Error)]
pub enum OracleError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected the request outright (bad key, billing, malformed request).
    #[error("imagery API denied the request ({status}): {message}")]
    Denied { status: String, message: String },

    /// The API reported a temporary condition (quota burst, internal error).
    #[error("imagery API temporary failure ({status}): {message}")]
    Transient { status: String, message: String },

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

impl OracleError {
    /// Returns `true` when the failure says nothing about the oracle's
    /// configuration and the sampler may simply draw another point.
    ///
    /// **Transient:** timeouts, HTTP 429 and 5xx, `OVER_QUERY_LIMIT` /
    /// `UNKNOWN_ERROR` statuses, garbled response bodies.
    ///
    /// **Fatal:** connection failures, HTTP 401/403, denied requests and
    /// invalid base URLs. The oracle is unreachable or misconfigured, and
    /// retrying would spin without ever finding imagery.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            OracleError::Http(e) => {
                if e.is_connect() || e.is_builder() {
                    return false;
                }
                match e.status() {
                    Some(status) => {
                        status.is_server_error()
                            || status == reqwest::StatusCode::TOO_MANY_REQUESTS
                            || status == reqwest::StatusCode::REQUEST_TIMEOUT
                    }
                    None => true,
                }
            }
            OracleError::Transient { .. } | OracleError::Deserialize { .. } => true,
            OracleError::Denied { .. } | OracleError::InvalidBaseUrl { .. } => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum SamplerError {
    /// The oracle cannot be used at all; surfaced as a setup problem.
    #[error("imagery unavailable: oracle unreachable or misconfigured: {0}")]
    OracleUnreachable(#[source] OracleError),

    /// Neither the requested region nor the global fallback produced imagery.
    #[error(
        "imagery unavailable: no panorama found in {region} or the global fallback \
         ({attempts} attempts each)"
    )]
    ImageryUnavailable { region: Region, attempts: u32 },
}
