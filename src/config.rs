use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Recommender backend base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Path of the durable session file
    #[serde(default = "default_session_path")]
    pub session_path: String,

    /// Number of recommendations requested per feed load
    #[serde(default = "default_feed_size")]
    pub feed_size: u32,
}

fn default_api_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_session_path() -> String {
    ".movai_session.json".to_string()
}

fn default_feed_size() -> u32 {
    12
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = envy::from_iter(std::iter::empty::<(String, String)>()).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8000/api");
        assert_eq!(config.feed_size, 12);
        assert_eq!(config.request_timeout_secs, 10);
    }
}
