use serde::Deserialize;

use crate::services::similarity::SimilarityMetric;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the movie catalog / rating service
    #[serde(default = "default_movie_service_url")]
    pub movie_service_url: String,

    /// Timeout applied to every upstream read, in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Number of recommendations returned when the caller gives no limit
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Largest limit a caller may request
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    /// User-to-user similarity used by collaborative filtering
    #[serde(default)]
    pub similarity_metric: SimilarityMetric,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_movie_service_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_limit() -> usize {
    10
}

fn default_max_limit() -> usize {
    100
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8083
}

impl Default for Config {
    fn default() -> Self {
        Self {
            movie_service_url: default_movie_service_url(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            similarity_metric: SimilarityMetric::default(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Address the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
