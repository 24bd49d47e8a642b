use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow!(
                "STORE_BACKEND must be 'postgres' or 'memory', got '{other}'"
            )),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub resume_output_dir: PathBuf,
    pub template_stylesheet: PathBuf,
    pub chromium_path: String,
    pub chromium_no_sandbox: bool,
    pub capture_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let store_backend: StoreBackend = optional_env("STORE_BACKEND")
            .unwrap_or_else(|| "postgres".to_string())
            .parse()?;
        let database_url = match store_backend {
            StoreBackend::Postgres => Some(require_env("DATABASE_URL")?),
            StoreBackend::Memory => optional_env("DATABASE_URL"),
        };

        let public_dir =
            PathBuf::from(optional_env("PUBLIC_DIR").unwrap_or_else(|| "public".to_string()));
        let resume_output_dir = optional_env("RESUME_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| public_dir.join("resumes"));
        let template_stylesheet = optional_env("TEMPLATE_STYLESHEET")
            .map(PathBuf::from)
            .unwrap_or_else(|| public_dir.join("templates").join("template-styles.css"));

        let capture_timeout_secs = optional_env("CAPTURE_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse::<u64>()
            .context("CAPTURE_TIMEOUT_SECS must be a whole number of seconds")?;
        if capture_timeout_secs == 0 {
            bail!("CAPTURE_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Config {
            store_backend,
            database_url,
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            resume_output_dir,
            template_stylesheet,
            chromium_path: optional_env("CHROMIUM_PATH").unwrap_or_else(|| "chromium".to_string()),
            chromium_no_sandbox: optional_env("CHROMIUM_NO_SANDBOX")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            capture_timeout: Duration::from_secs(capture_timeout_secs),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_parse() {
        assert_eq!("Postgres".parse::<StoreBackend>().unwrap(), StoreBackend::Postgres);
        assert_eq!("memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!("mongo".parse::<StoreBackend>().is_err());
    }
}
