//! `homework-core`: poll a homework review API and report status changes.
//!
//! # Architecture
//!
//! ```text
//! Poller::run_forever
//!     │   every retry interval
//!     ▼
//! HomeworkSource::fetch(cursor)   ← PracticumClient, GET ?from_date=<cursor>
//!     │
//!     ▼
//! check_response(value)           ← {"homeworks": [...]} or a PollError
//!     │
//!     ▼
//! parse_status(record)            ← verdict lookup, message template
//!     │
//!     ▼
//! Notifier::notify(text)          ← TelegramBot sendMessage, failures logged
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod poller;
pub mod status;
pub mod telegram;
pub mod validate;

pub use api::{HomeworkSource, PracticumClient};
pub use config::{BotConfig, Credentials};
pub use error::{ConfigError, NotifyError, PollError, Result};
pub use notify::{Messenger, Notifier};
pub use poller::{CycleOutcome, Poller};
pub use status::{parse_status, HomeworkStatus};
pub use telegram::TelegramBot;
pub use validate::check_response;
