use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid values.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("GEOQUEST_MAPS_API_KEY", "maps-key");
    m.insert("GEOQUEST_GEMINI_API_KEY", "gemini-key");
    m
}

#[test]
fn build_app_config_fails_without_maps_key() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "GEOQUEST_MAPS_API_KEY"),
        "expected MissingEnvVar(GEOQUEST_MAPS_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_without_gemini_key() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("GEOQUEST_MAPS_API_KEY", "maps-key");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "GEOQUEST_GEMINI_API_KEY"),
        "expected MissingEnvVar(GEOQUEST_GEMINI_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_template_credentials() {
    let mut map = full_env();
    map.insert("GEOQUEST_MAPS_API_KEY", "YOUR_MAPS_API_KEY");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::PlaceholderCredential(ref v)) if v == "GEOQUEST_MAPS_API_KEY"),
        "expected PlaceholderCredential(GEOQUEST_MAPS_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_blank_credentials() {
    let mut map = full_env();
    map.insert("GEOQUEST_GEMINI_API_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::PlaceholderCredential(ref v)) if v == "GEOQUEST_GEMINI_API_KEY"),
        "expected PlaceholderCredential(GEOQUEST_GEMINI_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.maps_api_key, "maps-key");
    assert_eq!(cfg.gemini_api_key, "gemini-key");
    assert_eq!(cfg.gemini_model, "gemini-2.5-flash");
    assert!(cfg.supabase.is_none());
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.sampler_max_attempts, 50);
    assert_eq!(cfg.sampler_radius_meters, 100_000);
    assert_eq!(cfg.sampler_backoff_base_ms, 250);
    assert_eq!(cfg.sampler_max_consecutive_transient, 5);
}

#[test]
fn build_app_config_reads_supabase_pair() {
    let mut map = full_env();
    map.insert("SUPABASE_URL", "https://abc.supabase.co");
    map.insert("SUPABASE_ANON_KEY", "anon");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let supabase = cfg.supabase.expect("supabase configured");
    assert_eq!(supabase.url, "https://abc.supabase.co");
    assert_eq!(supabase.anon_key, "anon");
}

#[test]
fn build_app_config_rejects_half_supabase_config() {
    let mut map = full_env();
    map.insert("SUPABASE_URL", "https://abc.supabase.co");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "SUPABASE_ANON_KEY"),
        "expected MissingEnvVar(SUPABASE_ANON_KEY), got: {result:?}"
    );
}

#[test]
fn sampler_max_attempts_override() {
    let mut map = full_env();
    map.insert("GEOQUEST_SAMPLER_MAX_ATTEMPTS", "10");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.sampler_max_attempts, 10);
}

#[test]
fn sampler_transient_cap_zero_is_invalid() {
    let mut map = full_env();
    map.insert("GEOQUEST_SAMPLER_MAX_TRANSIENT", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GEOQUEST_SAMPLER_MAX_TRANSIENT"),
        "expected InvalidEnvVar(GEOQUEST_SAMPLER_MAX_TRANSIENT), got: {result:?}"
    );
}

#[test]
fn sampler_max_attempts_zero_is_invalid() {
    let mut map = full_env();
    map.insert("GEOQUEST_SAMPLER_MAX_ATTEMPTS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GEOQUEST_SAMPLER_MAX_ATTEMPTS"),
        "expected InvalidEnvVar(GEOQUEST_SAMPLER_MAX_ATTEMPTS), got: {result:?}"
    );
}

#[test]
fn request_timeout_invalid() {
    let mut map = full_env();
    map.insert("GEOQUEST_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GEOQUEST_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(GEOQUEST_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_credentials() {
    let mut map = full_env();
    map.insert("SUPABASE_URL", "https://abc.supabase.co");
    map.insert("SUPABASE_ANON_KEY", "anon-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("maps-key"));
    assert!(!rendered.contains("gemini-key"));
    assert!(!rendered.contains("anon-secret"));
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn store_config_needs_no_game_credentials() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("SUPABASE_URL", "https://abc.supabase.co");
    map.insert("SUPABASE_ANON_KEY", "anon");
    let cfg = build_store_config(lookup_from_map(&map)).unwrap();
    let supabase = cfg.supabase.expect("supabase configured");
    assert_eq!(supabase.url, "https://abc.supabase.co");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
}

#[test]
fn store_config_ignores_placeholder_game_credentials() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("GEOQUEST_MAPS_API_KEY", "YOUR_MAPS_API_KEY");
    let cfg = build_store_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.supabase.is_none());
}

#[test]
fn store_config_rejects_placeholder_anon_key() {
    let mut map: HashMap<&str, &str> = HashMap::new();
    map.insert("SUPABASE_URL", "https://abc.supabase.co");
    map.insert("SUPABASE_ANON_KEY", "YOUR_SUPABASE_ANON_KEY");
    let result = build_store_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::PlaceholderCredential(ref v)) if v == "SUPABASE_ANON_KEY"),
        "expected PlaceholderCredential(SUPABASE_ANON_KEY), got: {result:?}"
    );
}
