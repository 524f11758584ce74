use crate::app_config::{AppConfig, StoreConfig, SupabaseConfig};
use crate::ConfigError;

/// Marker left in template `.env` files for credentials nobody filled in.
const PLACEHOLDER_MARKER: &str = "YOUR_";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing, still hold
/// placeholder credentials, or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load only the leaderboard settings. The imagery and guide API keys are
/// not required.
///
/// # Errors
///
/// Returns `ConfigError` if the Supabase pair is half set, holds
/// placeholders, or a numeric value is invalid.
pub fn load_store_config() -> Result<StoreConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_store_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let maps_api_key = require_credential(&lookup, "GEOQUEST_MAPS_API_KEY")?;
    let gemini_api_key = require_credential(&lookup, "GEOQUEST_GEMINI_API_KEY")?;
    let StoreConfig {
        log_level,
        supabase,
        request_timeout_secs,
    } = build_store_config(&lookup)?;

    let gemini_model = or_default(&lookup, "GEOQUEST_GEMINI_MODEL", "gemini-2.5-flash");
    let sampler_max_attempts: u32 = parse_var(&lookup, "GEOQUEST_SAMPLER_MAX_ATTEMPTS", "50")?;
    if sampler_max_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "GEOQUEST_SAMPLER_MAX_ATTEMPTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let sampler_radius_meters = parse_var(&lookup, "GEOQUEST_SAMPLER_RADIUS_METERS", "100000")?;
    let sampler_backoff_base_ms = parse_var(&lookup, "GEOQUEST_SAMPLER_BACKOFF_BASE_MS", "250")?;
    let sampler_max_consecutive_transient: u32 =
        parse_var(&lookup, "GEOQUEST_SAMPLER_MAX_TRANSIENT", "5")?;
    if sampler_max_consecutive_transient == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "GEOQUEST_SAMPLER_MAX_TRANSIENT".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        log_level,
        maps_api_key,
        gemini_api_key,
        gemini_model,
        supabase,
        request_timeout_secs,
        sampler_max_attempts,
        sampler_radius_meters,
        sampler_backoff_base_ms,
        sampler_max_consecutive_transient,
    })
}

fn build_store_config<F>(lookup: F) -> Result<StoreConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let supabase = match (
        credential(&lookup, "SUPABASE_URL")?,
        credential(&lookup, "SUPABASE_ANON_KEY")?,
    ) {
        (Some(url), Some(anon_key)) => Some(SupabaseConfig { url, anon_key }),
        (None, None) => None,
        (Some(_), None) => return Err(ConfigError::MissingEnvVar("SUPABASE_ANON_KEY".into())),
        (None, Some(_)) => return Err(ConfigError::MissingEnvVar("SUPABASE_URL".into())),
    };

    Ok(StoreConfig {
        log_level: or_default(&lookup, "GEOQUEST_LOG_LEVEL", "info"),
        supabase,
        request_timeout_secs: parse_var(&lookup, "GEOQUEST_REQUEST_TIMEOUT_SECS", "30")?,
    })
}

/// `Ok(None)` when unset; placeholders and blanks are errors.
fn credential<F>(lookup: &F, var: &str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    match lookup(var) {
        Ok(value) if is_placeholder(&value) => {
            Err(ConfigError::PlaceholderCredential(var.to_string()))
        }
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(_) => Ok(None),
    }
}

fn require_credential<F>(lookup: &F, var: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    credential(lookup, var)?.ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
}

fn or_default<F>(lookup: &F, var: &str, default: &str) -> String
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    lookup(var).unwrap_or_else(|_| default.to_string())
}

fn parse_var<F, T>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    or_default(lookup, var, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.contains(PLACEHOLDER_MARKER)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
