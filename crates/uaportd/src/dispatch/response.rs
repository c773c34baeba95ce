//! Reply encoding and the framed response writer.
//!
//! Success and failure share one wire shape: a successful reply is its value
//! serialised as JSON, a failed reply is the error message serialised as a
//! JSON string. The host tells them apart by content.

use std::io::Write;

use serde_json::Value;

use super::errors::{DispatchError, ServeError};
use crate::transport::FrameWriter;

/// Outcome of one command.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The command succeeded with this value.
    Ok(Value),
    /// The command failed with this message.
    Err(String),
}

impl Reply {
    /// Converts a handler result into a reply, rendering errors as their
    /// host-facing message.
    #[must_use]
    pub fn from_result(result: Result<Value, DispatchError>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(error) => Self::Err(error.to_string()),
        }
    }

    /// Creates a failed reply.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Err(message.into())
    }

    /// Returns `true` for a failed reply.
    #[must_use]
    pub const fn is_err(&self) -> bool {
        matches!(self, Self::Err(_))
    }

    /// Encodes the reply payload.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::SerializeReply`] when the value cannot be
    /// serialised.
    pub fn encode(&self) -> Result<Vec<u8>, DispatchError> {
        let encoded = match self {
            Self::Ok(value) => serde_json::to_vec(value),
            Self::Err(message) => serde_json::to_vec(message),
        };
        encoded.map_err(DispatchError::SerializeReply)
    }
}

/// Writes encoded replies as frames.
#[derive(Debug)]
pub struct ResponseWriter<W> {
    frames: FrameWriter<W>,
}

impl<W: Write> ResponseWriter<W> {
    /// Wraps a frame writer.
    pub const fn new(frames: FrameWriter<W>) -> Self {
        Self { frames }
    }

    /// Encodes `reply` and writes it as one frame.
    ///
    /// # Errors
    ///
    /// Returns [`ServeError::Reply`] when encoding fails and
    /// [`ServeError::Transport`] when the frame cannot be written.
    pub fn write_reply(&mut self, reply: &Reply) -> Result<(), ServeError> {
        let payload = reply.encode().map_err(ServeError::Reply)?;
        self.frames.write_message(&payload)?;
        Ok(())
    }

    /// Returns the wrapped frame writer.
    pub fn into_inner(self) -> FrameWriter<W> {
        self.frames
    }
}
