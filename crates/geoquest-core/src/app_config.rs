/// Connection details for the leaderboard backend.
#[derive(Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &"[redacted]")
            .finish()
    }
}

/// Settings for commands that only talk to the leaderboard backend.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub log_level: String,
    /// `None` disables score persistence.
    pub supabase: Option<SupabaseConfig>,
    pub request_timeout_secs: u64,
}

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub maps_api_key: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    /// `None` disables score persistence.
    pub supabase: Option<SupabaseConfig>,
    pub request_timeout_secs: u64,
    pub sampler_max_attempts: u32,
    pub sampler_radius_meters: u32,
    pub sampler_backoff_base_ms: u64,
    pub sampler_max_consecutive_transient: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("maps_api_key", &"[redacted]")
            .field("gemini_api_key", &"[redacted]")
            .field("gemini_model", &self.gemini_model)
            .field("supabase", &self.supabase)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("sampler_max_attempts", &self.sampler_max_attempts)
            .field("sampler_radius_meters", &self.sampler_radius_meters)
            .field("sampler_backoff_base_ms", &self.sampler_backoff_base_ms)
            .field(
                "sampler_max_consecutive_transient",
                &self.sampler_max_consecutive_transient,
            )
            .finish()
    }
}
