use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::interviews::repository::DEFAULT_LATEST_LIMIT;

/// Which `DocumentStore` implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Process-local store for development. Data is lost on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("STORE_BACKEND must be 'postgres' or 'memory', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    /// Required when `store_backend` is `Postgres`.
    pub database_url: Option<String>,
    pub anthropic_api_key: String,
    /// Overrides the Messages API endpoint (proxies, local mocks).
    pub anthropic_api_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub latest_interviews_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let store_backend = match std::env::var("STORE_BACKEND") {
            Ok(raw) => raw.parse::<StoreBackend>()?,
            Err(_) => StoreBackend::Postgres,
        };

        let database_url = std::env::var("DATABASE_URL").ok();
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            bail!("Required environment variable 'DATABASE_URL' is not set (STORE_BACKEND=postgres)");
        }

        Ok(Config {
            store_backend,
            database_url,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            anthropic_api_url: std::env::var("ANTHROPIC_API_URL").ok(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            latest_interviews_limit: parse_latest_limit(
                std::env::var("LATEST_INTERVIEWS_LIMIT").ok().as_deref(),
            )?,
        })
    }
}

fn parse_latest_limit(raw: Option<&str>) -> Result<usize> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_LATEST_LIMIT);
    };
    match raw.trim().parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => bail!("LATEST_INTERVIEWS_LIMIT must be a positive integer, got '{raw}'"),
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
