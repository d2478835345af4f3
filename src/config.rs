use std::env;
use std::path::PathBuf;
use std::time::Duration;

use log::warn;

use crate::error::{ApiError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_TOAST_LIFE_MS: u64 = 3000;

/// Client settings, read from the environment (`.env` is loaded by the binary).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout: Duration,
    pub page_size: usize,
    pub toast_life: Duration,
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_size: DEFAULT_PAGE_SIZE,
            toast_life: Duration::from_millis(DEFAULT_TOAST_LIFE_MS),
            session_file: default_session_file(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("BUS_BOOK_API_URL") {
            config.api_url = url;
        }
        if let Some(secs) = lookup("BUS_BOOK_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_number("BUS_BOOK_TIMEOUT_SECS", &secs)?);
        }
        if let Some(size) = lookup("BUS_BOOK_PAGE_SIZE") {
            config.page_size = parse_number("BUS_BOOK_PAGE_SIZE", &size)?;
        }
        if let Some(ms) = lookup("BUS_BOOK_TOAST_LIFE_MS") {
            config.toast_life = Duration::from_millis(parse_number("BUS_BOOK_TOAST_LIFE_MS", &ms)?);
        }
        if let Some(path) = lookup("BUS_BOOK_SESSION_FILE") {
            config.session_file = PathBuf::from(path);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "API URL must start with http:// or https://, got '{}'",
                self.api_url
            )));
        }
        if self.page_size == 0 {
            return Err(ApiError::Config("page size must be greater than zero".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(ApiError::Config("timeout must be greater than zero".to_string()));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::Config(format!("{} must be a number, got '{}'", key, raw)))
}

fn default_session_file() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".bus-book").join("session.json"),
        None => {
            warn!("Could not determine the home directory, keeping the session in the working directory");
            PathBuf::from(".bus-book-session.json")
        }
    }
}
