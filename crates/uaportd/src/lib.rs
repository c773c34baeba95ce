//! Framed JSON gateway between a host process and an OPC UA endpoint.
//!
//! The gateway runs as a child of its host and talks to it over stdin and
//! stdout. Every message in either direction is a length-prefixed frame (see
//! [`transport`]); request frames carry a JSON command naming a method and
//! its arguments, response frames carry the result value or an error string
//! (see [`dispatch`]).
//!
//! A single [`Session`] owns the endpoint driver. It starts disconnected and
//! only `browse_servers` and `connect` are accepted until a connect succeeds.
//! The connection then lasts until the host closes the channel.
//!
//! The OPC UA stack itself sits behind the [`EndpointDriver`] trait. The
//! crate ships [`SimulatedDriver`], an in-memory address space that can be
//! seeded from a JSON file, so the binary can run end to end without a
//! server.

pub mod bootstrap;
pub mod dispatch;
pub mod driver;
mod health;
pub mod node_cache;
mod process;
pub mod session;
pub mod telemetry;
pub mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, DriverFactory, Gateway, SimulatedDriverFactory,
    StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use driver::{EndpointDriver, SimulatedDriver};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use process::run;
pub use session::{Session, SessionError, SessionState};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
