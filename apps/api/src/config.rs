use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::document::gate::{WaitStrategy, POLL_INTERVAL};
use crate::llm_client::DEFAULT_API_BASE;
use crate::models::report::Identity;

/// Application configuration loaded from environment variables.
/// Fails at startup if the generation API key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub gemini_api_base: String,
    pub identity: Identity,
    /// When set, every export is also written to `{export_dir}/report.docx`.
    pub export_dir: Option<PathBuf>,
    /// How exports wait for the document engine: `notify` (default) or `poll`.
    pub engine_wait: WaitStrategy,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_key: require_env("API_KEY")?,
            gemini_api_base: env_or("GEMINI_API_BASE", DEFAULT_API_BASE),
            identity: Identity {
                full_name: env_or("REPORT_FULL_NAME", "خالد مراوي"),
                rental_number: env_or("REPORT_RENTAL_NUMBER", "1597607"),
                location: env_or("REPORT_LOCATION", "مراكش"),
            },
            export_dir: std::env::var("EXPORT_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            engine_wait: parse_wait_strategy(&env_or("ENGINE_WAIT_STRATEGY", "notify"))?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_wait_strategy(value: &str) -> Result<WaitStrategy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "notify" => Ok(WaitStrategy::Notify),
        "poll" => Ok(WaitStrategy::Poll {
            interval: POLL_INTERVAL,
        }),
        other => anyhow::bail!("ENGINE_WAIT_STRATEGY must be 'notify' or 'poll', got '{other}'"),
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
