use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// JustWatch bearer token (raw or already `Bearer `-prefixed)
    pub justwatch_auth_token: String,

    /// JustWatch GraphQL endpoint
    #[serde(default = "default_api_url")]
    pub justwatch_api_url: String,

    /// Country code sent with every request
    #[serde(default = "default_country")]
    pub country: String,

    /// Language tag sent with every request
    #[serde(default = "default_language")]
    pub language: String,

    /// Delay between processed rows, in milliseconds
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
}

fn default_api_url() -> String {
    "https://apis.justwatch.com/graphql".to_string()
}

fn default_country() -> String {
    "US".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_request_delay_ms() -> u64 {
    1000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Inter-row pacing delay
    pub fn request_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.request_delay_ms)
    }
}
