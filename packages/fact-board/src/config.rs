use anyhow::{Context, Result};
use dotenvy::dotenv;
use secrecy::SecretString;
use std::env;

/// Data service configuration loaded from environment variables
#[derive(Debug)]
pub struct Config {
    pub api_url: String,
    pub api_key: SecretString,
    pub table: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            api_url: env::var("FACTS_API_URL").context("FACTS_API_URL must be set")?,
            api_key: SecretString::from(
                env::var("FACTS_API_KEY").context("FACTS_API_KEY must be set")?,
            ),
            table: env::var("FACTS_TABLE").unwrap_or_else(|_| "facts".to_string()),
        })
    }
}
