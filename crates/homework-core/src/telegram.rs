use crate::error::NotifyError;
use crate::notify::Messenger;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct Reply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram Bot API client, limited to `sendMessage`.
pub struct TelegramBot {
    http: Client,
    api_base: String,
    token: String,
}

impl TelegramBot {
    pub fn new(api_base: impl Into<String>, token: impl Into<String>) -> Result<Self, NotifyError> {
        let http = Client::builder()
            .build()
            .map_err(|e| NotifyError::Transport(Box::new(e)))?;
        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.token)
    }
}

impl Messenger for TelegramBot {
    fn send(&self, chat_id: &str, text: &str) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&SendMessage { chat_id, text })
            .send()
            // The URL embeds the bot token; keep it out of the error text.
            .map_err(|e| NotifyError::Transport(Box::new(e.without_url())))?;

        let status = response.status();
        // Telegram reports failures as {"ok": false, "description": "..."},
        // usually with a 4xx status. Fall back to the status text when the
        // body is not a Bot API reply.
        let reply: Option<Reply> = response.json().ok();
        match reply {
            Some(Reply { ok: true, .. }) if status.is_success() => Ok(()),
            Some(Reply { description, .. }) => Err(NotifyError::Rejected {
                status: status.as_u16(),
                description: description.unwrap_or_else(|| status.to_string()),
            }),
            None => Err(NotifyError::Rejected {
                status: status.as_u16(),
                description: status.to_string(),
            }),
        }
    }
}
