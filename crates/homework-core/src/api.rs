use crate::error::{PollError, Result};
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde_json::Value;

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Current time as a Unix timestamp in seconds.
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

// ---------------------------------------------------------------------------
// HomeworkSource
// ---------------------------------------------------------------------------

/// Something that can answer "which homework statuses changed since `cursor`".
pub trait HomeworkSource {
    /// Fetch the raw API answer for changes since `cursor`. The body is
    /// returned as parsed JSON without any shape checks.
    fn fetch(&self, cursor: i64) -> Result<Value>;
}

impl<T: HomeworkSource + ?Sized> HomeworkSource for &T {
    fn fetch(&self, cursor: i64) -> Result<Value> {
        (**self).fetch(cursor)
    }
}

// ---------------------------------------------------------------------------
// PracticumClient
// ---------------------------------------------------------------------------

/// Blocking client for the homework statuses endpoint.
pub struct PracticumClient {
    http: Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("homework-bot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PollError::Transport(Box::new(e)))?;
        Ok(Self::with_http_client(http, endpoint, token))
    }

    /// Use an already configured HTTP client, e.g. one with a custom timeout.
    pub fn with_http_client(
        http: Client,
        endpoint: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }
}

impl HomeworkSource for PracticumClient {
    fn fetch(&self, cursor: i64) -> Result<Value> {
        let from_date = if cursor == 0 { unix_now() } else { cursor };
        tracing::debug!(endpoint = %self.endpoint, from_date, "requesting homework statuses");

        let response = self
            .http
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .map_err(|e| {
                let err = PollError::Transport(Box::new(e));
                tracing::error!(error = %err, endpoint = %self.endpoint, "API request failed");
                err
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), endpoint = %self.endpoint, "API answered with non-200 status");
            return Err(PollError::UnexpectedStatus(status.as_u16()));
        }
        tracing::info!(status = status.as_u16(), from_date, "API request completed");

        let body = response
            .text()
            .map_err(|e| PollError::Transport(Box::new(e)))?;
        serde_json::from_str(&body).map_err(PollError::InvalidJson)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
