//! Command decoding for the dispatch loop.
//!
//! A command payload is a JSON object carrying the method name and its
//! arguments:
//!
//! ```json
//! {"method":"read_item","args":"plant/boiler/temp1"}
//! ```
//!
//! `args` may hold any JSON value and defaults to `null` when omitted.
//! Unknown top-level fields are ignored.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::errors::DispatchError;

/// Decoded command from the host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Command {
    /// Method name, matched exactly against the dispatch table.
    pub method: String,
    /// Method arguments, validated by the method's handler.
    #[serde(default)]
    pub args: Value,
}

impl Command {
    /// Builds a command directly, bypassing the wire format.
    pub fn new(method: impl Into<String>, args: Value) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }

    /// Decodes a command payload.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidParameters`] when the payload is not a
    /// JSON object with a string `method` field.
    pub fn decode(payload: &[u8]) -> Result<Self, DispatchError> {
        // Decoding through a map keeps positional arrays from matching the struct.
        let fields: Map<String, Value> =
            serde_json::from_slice(payload).map_err(DispatchError::from_json_error)?;
        Self::deserialize(Value::Object(fields)).map_err(DispatchError::from_json_error)
    }

    /// Method name as received.
    #[must_use]
    pub fn method(&self) -> &str {
        self.method.as_str()
    }

    /// Arguments as received.
    #[must_use]
    pub const fn args(&self) -> &Value {
        &self.args
    }
}
