use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;

/// Runtime configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    /// Per-request timeout for model calls; the only timeout in the system.
    pub llm_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            llm_timeout_secs: parse_timeout(std::env::var("LLM_TIMEOUT_SECS").ok())?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_timeout(raw: Option<String>) -> Result<u64> {
    match raw {
        None => Ok(DEFAULT_LLM_TIMEOUT_SECS),
        Some(value) => {
            let secs = value
                .trim()
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?;
            if secs == 0 {
                bail!("LLM_TIMEOUT_SECS must be greater than 0");
            }
            Ok(secs)
        }
    }
}
