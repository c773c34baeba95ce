//! Error types for the framed byte channel.

use std::io;

use thiserror::Error;

/// Errors surfaced while reading or writing frames. All of them are fatal to
/// the serve loop.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying stream failed.
    #[error("channel I/O failed: {0}")]
    Io(#[from] io::Error),
    /// The peer closed the stream part-way through a frame.
    #[error("truncated frame: expected {expected} bytes, received {received}")]
    Truncated {
        /// Bytes required to complete the header or payload.
        expected: u64,
        /// Bytes actually received before the stream ended.
        received: u64,
    },
    /// A payload is too long for the configured header width.
    #[error("payload of {size} bytes exceeds the {max} byte frame limit")]
    PayloadTooLarge {
        /// Payload length in bytes.
        size: usize,
        /// Largest length the header can encode.
        max: u64,
    },
}
