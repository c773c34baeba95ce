//! Shared doubles and helpers for the gateway test suites.

use std::io::Cursor;
use std::sync::Mutex;

use mockall::mock;
use serde_json::Value;

use uaport_config::{Config, HeaderWidth};

use crate::bootstrap::BootstrapError;
use crate::dispatch::{DispatchLoop, ResponseWriter, ServeError};
use crate::driver::{ConnectOptions, DriverError, EndpointDriver};
use crate::health::HealthReporter;
use crate::session::{Session, SessionError};
use crate::transport::{FrameReader, FrameWriter};

mock! {
    pub Driver {}

    impl EndpointDriver for Driver {
        fn browse_servers(&self, host: &str, port: u16) -> Result<Vec<String>, DriverError>;
        fn connect(&mut self, options: &ConnectOptions) -> Result<(), DriverError>;
        fn is_connected(&self) -> bool;
        fn read_value(&self, path: &str) -> Result<Value, DriverError>;
        fn write_value(&mut self, path: &str, value: &Value) -> Result<(), DriverError>;
        fn cached_paths(&self) -> Vec<String>;
    }
}

/// Lifecycle events captured by [`RecordingHealthReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    BootstrapStarting,
    BootstrapSucceeded,
    BootstrapFailed(String),
    SessionConnected(String),
    ConnectFailed(String),
    ChannelClosed(u64),
    ServeFailed(String),
}

/// Records health events for assertions.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Captures a copy of the recorded events.
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record(HealthEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn session_connected(&self, url: &str) {
        self.record(HealthEvent::SessionConnected(url.to_owned()));
    }

    fn connect_failed(&self, _url: &str, error: &SessionError) {
        self.record(HealthEvent::ConnectFailed(error.to_string()));
    }

    fn channel_closed(&self, commands: u64) {
        self.record(HealthEvent::ChannelClosed(commands));
    }

    fn serve_failed(&self, error: &ServeError) {
        self.record(HealthEvent::ServeFailed(error.to_string()));
    }
}

/// Frames each payload with `width`.
pub fn frame_all<'a, I>(width: HeaderWidth, payloads: I) -> Vec<u8>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut writer = FrameWriter::new(Vec::new(), width);
    for payload in payloads {
        writer.write_message(payload).expect("frame payload");
    }
    writer.into_inner()
}

/// Decodes every framed JSON reply in `bytes`.
pub fn decode_replies(width: HeaderWidth, bytes: Vec<u8>) -> Vec<Value> {
    let mut reader = FrameReader::new(Cursor::new(bytes), width);
    let mut replies = Vec::new();
    while let Some(payload) = reader.read_message().expect("read reply frame") {
        replies.push(serde_json::from_slice(&payload).expect("reply should be JSON"));
    }
    replies
}

/// Sends one framed command through a full serve pass and returns its reply.
pub fn exchange<D: EndpointDriver>(
    dispatch: &DispatchLoop,
    session: &mut Session<D>,
    payload: &str,
) -> Value {
    let width = HeaderWidth::Four;
    let input = frame_all(width, [payload.as_bytes()]);
    let mut frames = FrameReader::new(Cursor::new(input), width);
    let mut writer = ResponseWriter::new(FrameWriter::new(Vec::new(), width));
    let answered = dispatch
        .serve(session, &mut frames, &mut writer)
        .expect("serve pass should end cleanly");
    assert_eq!(answered, 1, "exactly one command should be answered");
    decode_replies(width, writer.into_inner().into_inner())
        .pop()
        .expect("one reply frame")
}

/// Parses the JSON text captured by a step placeholder.
pub fn step_json(text: &str) -> Value {
    serde_json::from_str(text.trim()).expect("step argument should be JSON")
}
