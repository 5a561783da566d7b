use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Application configuration loaded from environment variables.
/// A missing API key is fatal: `main` refuses to start without it.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub database_url: String,
    pub upload_dir: PathBuf,
    pub completion_timeout: Duration,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: clean_secret(&require_env("OPENAI_API_KEY")?)
                .context("OPENAI_API_KEY is empty (check .env for stray spaces or quotes)")?,
            openai_base_url: optional_env("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            openai_model: optional_env("OPENAI_MODEL", DEFAULT_MODEL),
            database_url: optional_env("DATABASE_URL", "sqlite://recruiter.db"),
            upload_dir: PathBuf::from(optional_env("UPLOAD_DIR", "uploads")),
            completion_timeout: Duration::from_secs(
                optional_env("COMPLETION_TIMEOUT_SECS", "120")
                    .parse::<u64>()
                    .context("COMPLETION_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            max_upload_bytes: optional_env("MAX_UPLOAD_BYTES", "26214400")
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Strips whitespace and one layer of matching quotes, as `.env` files often carry both.
fn clean_secret(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|q| {
            trimmed
                .strip_prefix(*q)
                .and_then(|rest| rest.strip_suffix(*q))
        })
        .unwrap_or(trimmed)
        .trim();

    if unquoted.is_empty() {
        bail!("secret value is empty");
    }
    Ok(unquoted.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_secret_strips_whitespace_and_quotes() {
        assert_eq!(clean_secret("  sk-abc  ").unwrap(), "sk-abc");
        assert_eq!(clean_secret("\"sk-abc\"").unwrap(), "sk-abc");
        assert_eq!(clean_secret(" 'sk-abc' ").unwrap(), "sk-abc");
    }

    #[test]
    fn test_clean_secret_keeps_unbalanced_quotes() {
        assert_eq!(clean_secret("\"sk-abc").unwrap(), "\"sk-abc");
    }

    #[test]
    fn test_clean_secret_rejects_blank_values() {
        assert!(clean_secret("").is_err());
        assert!(clean_secret("   ").is_err());
        assert!(clean_secret("\"\"").is_err());
    }
}
