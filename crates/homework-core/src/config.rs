use crate::api::DEFAULT_ENDPOINT;
use crate::error::ConfigError;
use crate::telegram::DEFAULT_API_BASE;
use std::path::PathBuf;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Environment variable names
// ---------------------------------------------------------------------------

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

pub const ENDPOINT_VAR: &str = "HOMEWORK_BOT_ENDPOINT";
pub const TELEGRAM_API_VAR: &str = "HOMEWORK_BOT_TELEGRAM_API";
pub const RETRY_SECS_VAR: &str = "HOMEWORK_BOT_RETRY_SECS";
pub const LOG_FILE_VAR: &str = "HOMEWORK_BOT_LOG_FILE";

pub const DEFAULT_RETRY_SECS: u64 = 600;

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// The three secrets the bot cannot run without.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

// Tokens must never end up in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// BotConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub credentials: Credentials,
    pub endpoint: String,
    pub telegram_api: String,
    pub retry_interval: Duration,
}

impl BotConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`. Unset and empty values are the
    /// same thing; required credentials are checked in a fixed order and the
    /// first missing one is reported.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::MissingCredential(key));

        let credentials = Credentials {
            practicum_token: require(PRACTICUM_TOKEN)?,
            telegram_token: require(TELEGRAM_TOKEN)?,
            telegram_chat_id: require(TELEGRAM_CHAT_ID)?,
        };

        let retry_secs = get(RETRY_SECS_VAR)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&secs| secs > 0)
            .unwrap_or(DEFAULT_RETRY_SECS);

        Ok(Self {
            credentials,
            endpoint: get(ENDPOINT_VAR).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            telegram_api: get(TELEGRAM_API_VAR).unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            retry_interval: Duration::from_secs(retry_secs),
        })
    }
}

// ---------------------------------------------------------------------------
// Log file
// ---------------------------------------------------------------------------

/// Extra log file path, read on its own because logging starts before the
/// credentials are checked.
pub fn log_file_from_env() -> Option<PathBuf> {
    log_file_from_lookup(|key| std::env::var(key).ok())
}

pub fn log_file_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    lookup(LOG_FILE_VAR)
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
