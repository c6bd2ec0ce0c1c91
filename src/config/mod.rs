use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Replicate API token. Requests that need the provider fail with a
    /// configuration error while this is unset.
    #[serde(default)]
    pub replicate_api_token: Option<String>,

    /// Replicate REST base URL
    #[serde(default = "default_replicate_base_url")]
    pub replicate_base_url: String,

    /// Seconds between two status queries for the same prediction
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Status queries before a prediction is reported as timed out
    #[serde(default = "default_poll_max_attempts")]
    pub poll_max_attempts: u32,

    /// Directory served under /public (actor portraits, product shots)
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Start the asset library with the demo photo and video
    #[serde(default = "default_seed_demo_assets")]
    pub seed_demo_assets: bool,

    /// Request body limit; inline images make these large
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_replicate_base_url() -> String {
    "https://api.replicate.com/v1".to_string()
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_poll_max_attempts() -> u32 {
    120
}

fn default_static_dir() -> String {
    "public".to_string()
}

fn default_seed_demo_assets() -> bool {
    true
}

fn default_max_body_bytes() -> usize {
    20 * 1024 * 1024
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// The token, treating an empty variable the same as a missing one.
    pub fn api_token(&self) -> Option<String> {
        self.replicate_api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}
