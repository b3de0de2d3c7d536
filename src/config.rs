use anyhow::{Context, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: String,
    pub database_url: Option<String>,
    pub api_url: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load `.env` (if any) and read configuration from the environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let github_token =
            get("GITHUB_TOKEN").context("GITHUB_TOKEN environment variable not set")?;

        let port = match get("PORT") {
            Some(p) => p
                .parse::<u16>()
                .with_context(|| format!("PORT must be a number, got `{p}`"))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            github_token,
            database_url: get("MONGO_URI"),
            api_url: get("GITHUB_API_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }
}
