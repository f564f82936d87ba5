use crate::api::{unix_now, HomeworkSource};
use crate::error::{PollError, Result};
use crate::notify::{Messenger, Notifier};
use crate::status::parse_status;
use crate::validate::check_response;
use std::time::Duration;

pub const NO_NEWS_MESSAGE: &str = "Новых статусов нет, но я работаю";

/// Text delivered when a cycle fails.
pub fn failure_message(error: &PollError) -> String {
    format!("Сбой в работе программы: {error}")
}

// ---------------------------------------------------------------------------
// CycleOutcome
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum CycleOutcome {
    /// The API reported no changes since the cursor.
    NothingNew,
    /// This many status messages were handed to the notifier.
    Delivered(usize),
    /// The cycle failed; the error was reported through the notifier.
    Failed(PollError),
}

// ---------------------------------------------------------------------------
// Poller
// ---------------------------------------------------------------------------

/// The fetch, validate, extract and notify loop.
///
/// Owns the poll cursor. The cursor only moves forward after a cycle whose
/// fetch, validation and extraction all succeeded; a failed cycle is retried
/// from the same point after the next sleep.
pub struct Poller<S, M> {
    source: S,
    notifier: Notifier<M>,
    cursor: i64,
    retry_interval: Duration,
}

impl<S: HomeworkSource, M: Messenger> Poller<S, M> {
    pub fn new(source: S, notifier: Notifier<M>, retry_interval: Duration) -> Self {
        Self {
            source,
            notifier,
            cursor: unix_now(),
            retry_interval,
        }
    }

    /// Start polling from `cursor` instead of the current time.
    pub fn starting_at(mut self, cursor: i64) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn retry_interval(&self) -> Duration {
        self.retry_interval
    }

    /// Run one poll cycle and deliver its messages. Never fails: errors are
    /// turned into a notification and returned as [`CycleOutcome::Failed`].
    pub fn run_cycle(&mut self) -> CycleOutcome {
        match self.collect_messages() {
            Ok(messages) if messages.is_empty() => {
                tracing::debug!(cursor = self.cursor, "no new homework statuses");
                self.notifier.notify(NO_NEWS_MESSAGE);
                self.cursor = unix_now();
                CycleOutcome::NothingNew
            }
            Ok(messages) => {
                for message in &messages {
                    self.notifier.notify(message);
                }
                self.cursor = unix_now();
                CycleOutcome::Delivered(messages.len())
            }
            Err(e) => {
                tracing::error!(error = %e, cursor = self.cursor, "poll cycle failed");
                self.notifier.notify(&failure_message(&e));
                CycleOutcome::Failed(e)
            }
        }
    }

    /// Poll forever, sleeping the retry interval after every cycle whatever
    /// its outcome.
    pub fn run_forever(mut self) -> ! {
        tracing::info!(
            cursor = self.cursor,
            interval_secs = self.retry_interval.as_secs(),
            "polling started"
        );
        loop {
            match self.run_cycle() {
                CycleOutcome::NothingNew => tracing::info!("cycle finished: nothing new"),
                CycleOutcome::Delivered(n) => {
                    tracing::info!(messages = n, "cycle finished: statuses delivered")
                }
                CycleOutcome::Failed(e) => tracing::warn!(error = %e, "cycle finished with error"),
            }
            std::thread::sleep(self.retry_interval);
        }
    }

    /// Fetch, validate and render every record. All records must render or
    /// the whole cycle fails, so nothing is delivered twice after a retry.
    fn collect_messages(&self) -> Result<Vec<String>> {
        let response = self.source.fetch(self.cursor)?;
        let records = check_response(response)?;
        records.iter().map(parse_status).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotifyError;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::collections::VecDeque;

    const APPROVED_HW1: &str =
        "Изменился статус проверки работы \"hw1\". Работа проверена: ревьюеру всё понравилось. Ура!";

    /// Replays queued answers and records the cursor of every fetch.
    #[derive(Default)]
    struct ScriptedSource {
        answers: RefCell<VecDeque<Result<Value>>>,
        cursors: RefCell<Vec<i64>>,
    }

    impl ScriptedSource {
        fn push(&self, answer: Result<Value>) -> &Self {
            self.answers.borrow_mut().push_back(answer);
            self
        }
    }

    impl HomeworkSource for ScriptedSource {
        fn fetch(&self, cursor: i64) -> Result<Value> {
            self.cursors.borrow_mut().push(cursor);
            self.answers
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(json!({"homeworks": []})))
        }
    }

    #[derive(Default)]
    struct Outbox {
        sent: RefCell<Vec<String>>,
        broken: bool,
    }

    impl Messenger for Outbox {
        fn send(&self, _chat_id: &str, text: &str) -> std::result::Result<(), NotifyError> {
            self.sent.borrow_mut().push(text.to_string());
            if self.broken {
                Err(NotifyError::Transport("connection reset".into()))
            } else {
                Ok(())
            }
        }
    }

    fn poller<'a>(
        source: &'a ScriptedSource,
        outbox: &'a Outbox,
    ) -> Poller<&'a ScriptedSource, &'a Outbox> {
        Poller::new(
            source,
            Notifier::new(outbox, "42"),
            Duration::from_secs(600),
        )
        .starting_at(1_000)
    }

    fn timeout() -> PollError {
        PollError::Transport(Box::new(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "operation timed out",
        )))
    }

    #[test]
    fn approved_homework_is_delivered() {
        let source = ScriptedSource::default();
        source.push(Ok(json!({"homeworks": [{"homework_name": "hw1", "status": "approved"}]})));
        let outbox = Outbox::default();
        let mut poller = poller(&source, &outbox);

        let outcome = poller.run_cycle();
        assert!(matches!(outcome, CycleOutcome::Delivered(1)));
        assert_eq!(*outbox.sent.borrow(), vec![APPROVED_HW1.to_string()]);
        assert_eq!(*source.cursors.borrow(), vec![1_000]);
        assert!(poller.cursor() > 1_000);
    }

    #[test]
    fn empty_homeworks_reports_nothing_new() {
        let source = ScriptedSource::default();
        source.push(Ok(json!({"homeworks": [], "current_date": 5})));
        let outbox = Outbox::default();
        let mut poller = poller(&source, &outbox);

        assert!(matches!(poller.run_cycle(), CycleOutcome::NothingNew));
        assert_eq!(*outbox.sent.borrow(), vec![NO_NEWS_MESSAGE.to_string()]);
        // The cursor moves to the local clock, not the response's current_date.
        assert!(poller.cursor() > 1_000);
    }

    #[test]
    fn transport_timeout_is_reported_and_polling_continues() {
        let source = ScriptedSource::default();
        source
            .push(Err(timeout()))
            .push(Ok(json!({"homeworks": [{"homework_name": "hw1", "status": "approved"}]})));
        let outbox = Outbox::default();
        let mut poller = poller(&source, &outbox);

        let first = poller.run_cycle();
        assert!(matches!(first, CycleOutcome::Failed(PollError::Transport(_))));
        assert_eq!(poller.cursor(), 1_000);

        let second = poller.run_cycle();
        assert!(matches!(second, CycleOutcome::Delivered(1)));

        let sent = outbox.sent.borrow();
        assert_eq!(sent.len(), 2);
        assert_eq!(
            sent[0],
            "Сбой в работе программы: API request failed: operation timed out"
        );
        assert_eq!(sent[1], APPROVED_HW1);
        // The failed cycle is retried from the same cursor.
        assert_eq!(*source.cursors.borrow(), vec![1_000, 1_000]);
    }

    #[test]
    fn validation_failure_is_reported() {
        let source = ScriptedSource::default();
        source.push(Ok(json!({"current_date": 1})));
        let outbox = Outbox::default();
        let mut poller = poller(&source, &outbox);

        assert!(matches!(
            poller.run_cycle(),
            CycleOutcome::Failed(PollError::MissingKey("homeworks"))
        ));
        assert_eq!(
            *outbox.sent.borrow(),
            vec!["Сбой в работе программы: response has no 'homeworks' key".to_string()]
        );
        assert_eq!(poller.cursor(), 1_000);
    }

    #[test]
    fn every_record_is_delivered_in_order() {
        let source = ScriptedSource::default();
        source.push(Ok(json!({"homeworks": [
            {"homework_name": "hw2", "status": "reviewing"},
            {"homework_name": "hw1", "status": "approved"},
        ]})));
        let outbox = Outbox::default();
        let mut poller = poller(&source, &outbox);

        assert!(matches!(poller.run_cycle(), CycleOutcome::Delivered(2)));
        let sent = outbox.sent.borrow();
        assert_eq!(
            sent[0],
            "Изменился статус проверки работы \"hw2\". Работа взята на проверку ревьюером."
        );
        assert_eq!(sent[1], APPROVED_HW1);
    }

    #[test]
    fn one_bad_record_fails_the_whole_cycle() {
        let source = ScriptedSource::default();
        source.push(Ok(json!({"homeworks": [
            {"homework_name": "hw1", "status": "approved"},
            {"homework_name": "hw2", "status": "lost"},
        ]})));
        let outbox = Outbox::default();
        let mut poller = poller(&source, &outbox);

        assert!(matches!(
            poller.run_cycle(),
            CycleOutcome::Failed(PollError::UnknownStatus(_))
        ));
        assert_eq!(
            *outbox.sent.borrow(),
            vec!["Сбой в работе программы: undocumented homework status: 'lost'".to_string()]
        );
        assert_eq!(poller.cursor(), 1_000);
    }

    #[test]
    fn broken_messenger_does_not_break_the_cycle() {
        let source = ScriptedSource::default();
        source.push(Ok(json!({"homeworks": [{"homework_name": "hw1", "status": "approved"}]})));
        let outbox = Outbox {
            broken: true,
            ..Default::default()
        };
        let mut poller = poller(&source, &outbox);

        assert!(matches!(poller.run_cycle(), CycleOutcome::Delivered(1)));
        // The failed delivery is not itself reported as an error message.
        assert_eq!(*outbox.sent.borrow(), vec![APPROVED_HW1.to_string()]);
    }

    #[test]
    fn new_poller_starts_at_current_time() {
        let source = ScriptedSource::default();
        let outbox = Outbox::default();
        let before = unix_now();
        let poller = Poller::new(&source, Notifier::new(&outbox, "42"), Duration::from_secs(600));
        assert!(poller.cursor() >= before);
        assert_eq!(poller.retry_interval(), Duration::from_secs(600));
    }
}
