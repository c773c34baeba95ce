//! Framed byte channel between the gateway and its host process.
//!
//! The host owns both ends of the gateway's stdio. Each direction carries a
//! sequence of length-prefixed messages; this module turns the raw streams
//! into whole messages and back without looking inside the payloads.

mod errors;
mod framer;

pub use self::errors::TransportError;
pub use self::framer::{FrameReader, FrameWriter};
