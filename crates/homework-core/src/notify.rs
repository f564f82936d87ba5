use crate::error::NotifyError;

/// A transport able to deliver a text message to a chat.
pub trait Messenger {
    fn send(&self, chat_id: &str, text: &str) -> Result<(), NotifyError>;
}

impl<T: Messenger + ?Sized> Messenger for &T {
    fn send(&self, chat_id: &str, text: &str) -> Result<(), NotifyError> {
        (**self).send(chat_id, text)
    }
}

/// Delivers messages to the single configured chat.
///
/// Delivery failures are logged and dropped so a broken channel can never
/// stop the poller or feed back into error reporting.
pub struct Notifier<M> {
    messenger: M,
    chat_id: String,
}

impl<M: Messenger> Notifier<M> {
    pub fn new(messenger: M, chat_id: impl Into<String>) -> Self {
        Self {
            messenger,
            chat_id: chat_id.into(),
        }
    }

    pub fn notify(&self, message: &str) {
        tracing::debug!(chat_id = %self.chat_id, message, "sending message");
        match self.messenger.send(&self.chat_id, message) {
            Ok(()) => tracing::info!(message, "message delivered"),
            Err(e) => tracing::error!(error = %e, message, "failed to deliver message"),
        }
    }

    pub fn messenger(&self) -> &M {
        &self.messenger
    }
}
