use crate::error::{PollError, Result};
use crate::status::kind_of;
use serde_json::Value;

pub const HOMEWORKS_KEY: &str = "homeworks";

/// Check that an API answer is an object holding a `homeworks` array and
/// return that array's records unchanged.
///
/// An empty array is a normal answer meaning nothing changed since the cursor.
/// Individual records are not inspected here.
pub fn check_response(response: Value) -> Result<Vec<Value>> {
    tracing::debug!(response = %response, "checking API response");

    let Value::Object(mut map) = response else {
        return Err(PollError::Shape(format!(
            "response is {}, expected an object",
            kind_of(&response)
        )));
    };

    match map.remove(HOMEWORKS_KEY) {
        None => {
            tracing::error!("API response has no '{HOMEWORKS_KEY}' key");
            Err(PollError::MissingKey(HOMEWORKS_KEY))
        }
        Some(Value::Array(records)) => Ok(records),
        Some(other) => Err(PollError::Shape(format!(
            "'{HOMEWORKS_KEY}' is {}, expected an array",
            kind_of(&other)
        ))),
    }
}
