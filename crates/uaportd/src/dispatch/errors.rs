//! Error types for command decoding and dispatch.
//!
//! Every [`DispatchError`] except [`DispatchError::SerializeReply`] becomes an
//! error reply whose text is the error's `Display` output, so the messages
//! here are the exact strings the host receives. [`ServeError`] covers the
//! failures that end the serve loop.

use thiserror::Error;

use crate::driver::DriverError;
use crate::session::SessionError;
use crate::transport::TransportError;

/// Errors surfaced while decoding and dispatching a single command.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The payload is not a command object, or the top-level arguments have
    /// the wrong shape.
    #[error("invalid parameters")]
    InvalidParameters {
        /// Decoder failure, when the payload itself was malformed.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The method name is not in the dispatch table.
    #[error("invalid method")]
    InvalidMethod {
        /// Method name as received.
        method: String,
    },

    /// A method-specific argument check failed.
    #[error("{message}")]
    InvalidArguments {
        /// Message returned to the host.
        message: String,
    },

    /// The session refused the command.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The endpoint driver reported a failure.
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// Gateway-internal failure unrelated to the command's input.
    #[error("{message}")]
    Internal {
        /// Message returned to the host.
        message: String,
    },

    /// A reply value could not be serialised.
    #[error("failed to serialize reply: {0}")]
    SerializeReply(#[source] serde_json::Error),
}

impl DispatchError {
    /// Creates an invalid parameters error from a decoder failure.
    pub const fn from_json_error(source: serde_json::Error) -> Self {
        Self::InvalidParameters {
            source: Some(source),
        }
    }

    /// Creates an invalid parameters error without an underlying cause.
    pub const fn invalid_parameters() -> Self {
        Self::InvalidParameters { source: None }
    }

    /// Creates an invalid method error.
    pub fn invalid_method(method: impl Into<String>) -> Self {
        Self::InvalidMethod {
            method: method.into(),
        }
    }

    /// Creates an invalid arguments error.
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Failures that terminate the serve loop.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The framed channel failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A reply could not be encoded.
    #[error("failed to encode reply: {0}")]
    Reply(#[source] DispatchError),
}
