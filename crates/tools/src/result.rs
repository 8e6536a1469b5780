use crate::error::ToolError;
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

/// Uniform outcome of every dispatcher operation.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    Success(Value),
    Failure(String),
}

impl CommandResult {
    pub fn failure(message: impl Into<String>) -> Self {
        CommandResult::Failure(message.into())
    }

    /// False for `Failure`, and for a payload the service itself marked
    /// `"success": false`. Such payloads stay intact in [`payload`](Self::payload).
    pub fn is_success(&self) -> bool {
        match self {
            CommandResult::Success(payload) => !reports_failure(payload),
            CommandResult::Failure(_) => false,
        }
    }

    /// The service's answer, whatever it reported.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            CommandResult::Success(payload) => Some(payload),
            CommandResult::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            CommandResult::Success(payload) if reports_failure(payload) => {
                payload.get("error").and_then(Value::as_str)
            }
            CommandResult::Success(_) => None,
            CommandResult::Failure(message) => Some(message),
        }
    }

    /// `{"success": true, ...payload}` or `{"success": false, "error": ...}`.
    ///
    /// Object payloads are flattened and keep their own `success` flag when
    /// they carry one; anything else lands under `data`.
    pub fn to_json(&self) -> Value {
        match self {
            CommandResult::Success(payload) => {
                let mut object = match payload {
                    Value::Object(map) => map.clone(),
                    other => {
                        let mut map = Map::new();
                        map.insert("data".to_string(), other.clone());
                        map
                    }
                };
                object
                    .entry("success")
                    .or_insert(Value::Bool(true));
                Value::Object(object)
            }
            CommandResult::Failure(message) => json!({
                "success": false,
                "error": message,
            }),
        }
    }
}

fn reports_failure(payload: &Value) -> bool {
    payload.get("success").and_then(Value::as_bool) == Some(false)
}

impl From<ToolError> for CommandResult {
    fn from(err: ToolError) -> Self {
        CommandResult::Failure(err.to_string())
    }
}

impl From<Result<Value, ToolError>> for CommandResult {
    fn from(result: Result<Value, ToolError>) -> Self {
        match result {
            Ok(payload) => CommandResult::Success(payload),
            Err(err) => err.into(),
        }
    }
}

impl Serialize for CommandResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
