//! Connection settings for the document service, loaded from environment variables.
//!
//! Call `dotenvy::dotenv()` before [`DbConfig::from_env`] if settings live in a `.env` file.

use std::env;
use std::fmt;

use reqwest::Url;

use crate::error::{ConfigError, Result};

pub const DB_URL: &str = "DB_URL";
pub const DB_USER: &str = "DB_USER";
pub const DB_PASS: &str = "DB_PASS";
pub const DB_NAME: &str = "DB_NAME";
pub const LOG_FILE: &str = "LOG_FILE";

/// Collection used when `DB_NAME` is not set.
pub const DEFAULT_DB_NAME: &str = "test-database";

/// Endpoint and credentials for the remote document service.
#[derive(Clone)]
pub struct DbConfig {
    pub url: Url,
    pub username: String,
    pub password: String,
    /// Default collection for binaries; the library always takes the name explicitly.
    pub db_name: String,
    pub log_file: Option<String>,
}

impl DbConfig {
    /// Builds a config from explicit values, validating the same way as [`DbConfig::from_env`].
    pub fn new(url: &str, username: &str, password: &str) -> Result<Self> {
        Ok(Self {
            url: parse_url(url)?,
            username: non_blank(DB_USER, username.to_string())?,
            password: non_blank(DB_PASS, password.to_string())?,
            db_name: DEFAULT_DB_NAME.to_string(),
            log_file: None,
        })
    }

    /// Reads `DB_URL`, `DB_USER`, `DB_PASS` (required), `DB_NAME` and `LOG_FILE` (optional).
    pub fn from_env() -> Result<Self> {
        let url = parse_url(&required(DB_URL)?)?;
        let username = required(DB_USER)?;
        let password = required(DB_PASS)?;
        let db_name = optional(DB_NAME).unwrap_or_else(|| DEFAULT_DB_NAME.to_string());
        let log_file = optional(LOG_FILE);

        Ok(Self {
            url,
            username,
            password,
            db_name,
            log_file,
        })
    }

    pub fn with_db_name(mut self, db_name: impl Into<String>) -> Self {
        self.db_name = db_name.into();
        self
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("url", &self.url.as_str())
            .field("username", &self.username)
            .field("password", &"***")
            .field("db_name", &self.db_name)
            .field("log_file", &self.log_file)
            .finish()
    }
}

fn required(var: &'static str) -> Result<String> {
    non_blank(var, env::var(var).unwrap_or_default())
}

fn optional(var: &'static str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn non_blank(var: &'static str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(ConfigError::Missing(var));
    }
    Ok(value)
}

fn parse_url(raw: &str) -> Result<Url> {
    let raw = non_blank(DB_URL, raw.to_string())?;
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
        var: DB_URL,
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            var: DB_URL,
            reason: format!("expected an http(s) base URL, got {}", url),
        });
    }
    Ok(url)
}
