use crate::error::{PollError, Result};
use serde_json::Value;

// ---------------------------------------------------------------------------
// HomeworkStatus
// ---------------------------------------------------------------------------

/// Review status codes the API documents. Anything else is a protocol
/// mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub fn all() -> &'static [HomeworkStatus] {
        &[
            HomeworkStatus::Approved,
            HomeworkStatus::Reviewing,
            HomeworkStatus::Rejected,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    /// The sentence shown to the student for this status.
    pub fn verdict(self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl std::fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HomeworkStatus {
    type Err = PollError;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "approved" => Ok(HomeworkStatus::Approved),
            "reviewing" => Ok(HomeworkStatus::Reviewing),
            "rejected" => Ok(HomeworkStatus::Rejected),
            _ => Err(PollError::UnknownStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// parse_status
// ---------------------------------------------------------------------------

/// Build the notification text for a single homework record.
///
/// `homework_name` must be a non-empty string and `status` one of the
/// documented codes. An absent, null or empty status is reported as
/// [`PollError::EmptyStatus`], which is distinct from an unrecognised one.
pub fn parse_status(record: &Value) -> Result<String> {
    let Value::Object(fields) = record else {
        return Err(PollError::Shape(format!(
            "homework record is {}, expected an object",
            kind_of(record)
        )));
    };

    let name = match fields.get("homework_name") {
        None | Some(Value::Null) => return Err(PollError::MissingField("homework_name")),
        Some(Value::String(s)) if s.is_empty() => {
            return Err(PollError::MissingField("homework_name"))
        }
        Some(Value::String(s)) => s.as_str(),
        Some(other) => {
            return Err(PollError::Shape(format!(
                "homework_name is {}, expected a string",
                kind_of(other)
            )))
        }
    };

    let code = match fields.get("status") {
        None | Some(Value::Null) => return Err(PollError::EmptyStatus(name.to_string())),
        Some(Value::String(s)) if s.is_empty() => {
            tracing::debug!(homework = %name, "homework has no status yet");
            return Err(PollError::EmptyStatus(name.to_string()));
        }
        Some(Value::String(s)) => s.as_str(),
        Some(other) => {
            return Err(PollError::Shape(format!(
                "status is {}, expected a string",
                kind_of(other)
            )))
        }
    };

    let status = code.parse::<HomeworkStatus>().inspect_err(|_| {
        tracing::error!(homework = %name, status = %code, "undocumented homework status");
    })?;

    Ok(format!(
        "Изменился статус проверки работы \"{name}\". {}",
        status.verdict()
    ))
}

/// Short name of a JSON value's kind, for shape diagnostics.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
