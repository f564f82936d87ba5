use std::error::Error as _;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Render `err` followed by every error in its `source()` chain, joined with
/// ": ". A cause whose text is already part of the rendering is skipped.
pub fn display_chain(err: &BoxError) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}

/// A failure in one poll cycle: fetching, validating or reading a record.
///
/// Every variant is recoverable. The poller renders it with `Display` and
/// reports it through the notifier.
#[derive(Debug, Error)]
pub enum PollError {
    // HTTP client errors keep the actual cause (timeout, refused connection)
    // in their source chain, so the whole chain goes into the message.
    #[error("API request failed: {}", display_chain(.0))]
    Transport(BoxError),

    #[error("API answered with status {0}")]
    UnexpectedStatus(u16),

    #[error("API answered with invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("unexpected response shape: {0}")]
    Shape(String),

    #[error("response has no '{0}' key")]
    MissingKey(&'static str),

    #[error("homework record has no '{0}'")]
    MissingField(&'static str),

    #[error("homework '{0}' has an empty status")]
    EmptyStatus(String),

    #[error("undocumented homework status: '{0}'")]
    UnknownStatus(String),
}

/// A message that could not be delivered. Logged by the notifier, never
/// propagated.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("request to messenger failed: {}", display_chain(.0))]
    Transport(BoxError),

    #[error("messenger rejected message (status {status}): {description}")]
    Rejected { status: u16, description: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingCredential(&'static str),
}

pub type Result<T> = std::result::Result<T, PollError>;
