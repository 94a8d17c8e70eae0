use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Required variables abort startup; optional ones toggle capabilities.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    /// Absent key disables the managed-scraping path; the raw fetch fallback
    /// still works.
    pub firecrawl_api_key: Option<String>,
    pub data_dir: String,
    pub port: u16,
    pub rust_log: String,
}

/// Capability set computed once at startup and passed into components at
/// construction, so every present/absent combination is testable.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    /// Managed scraping (Firecrawl) is configured.
    pub scraping: bool,
    /// A vision-capable generative backend is configured.
    pub vision: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            firecrawl_api_key: std::env::var("FIRECRAWL_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "profile_data".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            scraping: self.firecrawl_api_key.is_some(),
            vision: !self.anthropic_api_key.is_empty(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
