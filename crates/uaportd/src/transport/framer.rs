//! Length-prefixed framing over a blocking byte stream.
//!
//! ```text
//! +----------------------------+---------------------+
//! | length (H bytes, BE, uint) | payload (length B)  |
//! +----------------------------+---------------------+
//! ```
//!
//! `H` comes from [`HeaderWidth`] and is identical for reads and writes.

use std::io::{self, Read, Write};

use uaport_config::HeaderWidth;

use super::errors::TransportError;

/// Reads length-prefixed messages from a byte stream.
#[derive(Debug)]
pub struct FrameReader<R> {
    reader: R,
    width: HeaderWidth,
}

impl<R: Read> FrameReader<R> {
    /// Wraps `reader`, decoding headers of `width` bytes.
    pub const fn new(reader: R, width: HeaderWidth) -> Self {
        Self { reader, width }
    }

    /// Reads the next message, blocking until it is complete.
    ///
    /// Returns `Ok(None)` when the peer closes the stream cleanly before the
    /// first header byte.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Truncated`] when the stream ends inside a
    /// header or payload, and [`TransportError::Io`] when reading fails.
    pub fn read_message(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        let mut buffer = [0_u8; 4];
        let (_, header) = buffer.split_at_mut(4 - self.width.len());
        let header_read = fill(&mut self.reader, header)?;
        if header_read == 0 {
            return Ok(None);
        }
        if header_read < header.len() {
            return Err(TransportError::Truncated {
                expected: header.len() as u64,
                received: header_read as u64,
            });
        }

        let length = decode_length(header);
        let mut payload = Vec::new();
        let payload_read = self
            .reader
            .by_ref()
            .take(length)
            .read_to_end(&mut payload)? as u64;
        if payload_read < length {
            return Err(TransportError::Truncated {
                expected: length,
                received: payload_read,
            });
        }
        Ok(Some(payload))
    }
}

/// Writes length-prefixed messages to a byte stream.
#[derive(Debug)]
pub struct FrameWriter<W> {
    writer: W,
    width: HeaderWidth,
}

impl<W: Write> FrameWriter<W> {
    /// Wraps `writer`, encoding headers of `width` bytes.
    pub const fn new(writer: W, width: HeaderWidth) -> Self {
        Self { writer, width }
    }

    /// Writes one message and flushes the stream.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::PayloadTooLarge`] when the header cannot
    /// encode the payload length, and [`TransportError::Io`] when writing
    /// fails.
    pub fn write_message(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        let encoded = encode_length(payload.len(), self.width)?;
        let (_, header) = encoded.split_at(encoded.len() - self.width.len());
        self.writer.write_all(header)?;
        self.writer.write_all(payload)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Reads into `buf` until it is full or the stream ends, retrying interrupts.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while let Some(remaining) = buf.get_mut(filled..).filter(|rest| !rest.is_empty()) {
        match reader.read(remaining) {
            Ok(0) => break,
            Ok(count) => filled += count,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => return Err(error),
        }
    }
    Ok(filled)
}

fn decode_length(header: &[u8]) -> u64 {
    header
        .iter()
        .fold(0_u64, |length, byte| (length << 8) | u64::from(*byte))
}

#[expect(
    clippy::big_endian_bytes,
    reason = "frame headers are big-endian on the wire"
)]
fn encode_length(size: usize, width: HeaderWidth) -> Result<[u8; 8], TransportError> {
    let max = width.max_payload();
    match u64::try_from(size) {
        Ok(length) if length <= max => Ok(length.to_be_bytes()),
        _ => Err(TransportError::PayloadTooLarge { size, max }),
    }
}
