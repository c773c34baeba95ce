//! The sequential serve loop.
//!
//! One frame in, one frame out: the loop reads a command, routes it to
//! completion, and writes its reply before reading the next frame. Malformed
//! payloads and failed commands are answered; only channel failures and
//! unencodable replies stop the loop.

use std::io::{Read, Write};
use std::sync::Arc;

use tracing::{debug, warn};

use super::errors::ServeError;
use super::request::Command;
use super::response::{Reply, ResponseWriter};
use super::router::{DISPATCH_TARGET, MethodRouter};
use crate::driver::EndpointDriver;
use crate::health::HealthReporter;
use crate::session::Session;
use crate::transport::FrameReader;

/// Drives a session from a framed command channel.
#[derive(Debug, Clone)]
pub struct DispatchLoop {
    router: MethodRouter,
}

impl DispatchLoop {
    /// Creates a loop whose router reports to `reporter`.
    pub fn new(reporter: Arc<dyn HealthReporter>) -> Self {
        Self {
            router: MethodRouter::new(reporter),
        }
    }

    /// Serves commands until the host closes the channel.
    ///
    /// Returns the number of commands answered.
    ///
    /// # Errors
    ///
    /// Returns [`ServeError`] when a frame cannot be read or written, or when
    /// a reply cannot be encoded.
    pub fn serve<D, R, W>(
        &self,
        session: &mut Session<D>,
        frames: &mut FrameReader<R>,
        writer: &mut ResponseWriter<W>,
    ) -> Result<u64, ServeError>
    where
        D: EndpointDriver,
        R: Read,
        W: Write,
    {
        let mut answered = 0_u64;
        while let Some(payload) = frames.read_message()? {
            let reply = self.handle_payload(session, &payload);
            writer.write_reply(&reply)?;
            answered += 1;
        }
        debug!(target: DISPATCH_TARGET, answered, "channel reached end of stream");
        Ok(answered)
    }

    /// Decodes and executes one payload.
    pub fn handle_payload<D: EndpointDriver>(
        &self,
        session: &mut Session<D>,
        payload: &[u8],
    ) -> Reply {
        match Command::decode(payload) {
            Ok(command) => {
                let reply = self.router.route(session, &command);
                if let Reply::Err(message) = &reply {
                    debug!(
                        target: DISPATCH_TARGET,
                        method = command.method(),
                        %message,
                        "command failed"
                    );
                }
                reply
            }
            Err(error) => {
                warn!(
                    target: DISPATCH_TARGET,
                    bytes = payload.len(),
                    error = ?error,
                    "malformed command payload"
                );
                Reply::from_result(Err(error))
            }
        }
    }
}
