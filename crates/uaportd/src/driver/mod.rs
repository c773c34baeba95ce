//! Seam between the gateway core and the component that owns the remote
//! OPC UA connection.
//!
//! The core never speaks the OPC UA wire protocol. Everything it needs from
//! the remote side goes through [`EndpointDriver`]: server discovery, the
//! connect handshake, single-value reads and writes, and a snapshot of the
//! node paths the driver has cached. Any background activity a driver runs
//! (periodic value refresh at the configured update cycle, for instance) is
//! the driver's own business and must be synchronised inside it.

mod simulated;

use serde_json::Value;
use thiserror::Error;

pub use self::simulated::{SeedError, SimulatedDriver};

/// Failure reported by an endpoint driver.
///
/// The message is forwarded to the host verbatim, so drivers should phrase it
/// for the host (an OPC UA status name, for example).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DriverError {
    message: String,
}

impl DriverError {
    /// Builds a driver error carrying `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Message reported by the driver.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Client certificate and private key, both base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCertificate {
    /// Base64-encoded DER certificate.
    pub certificate: String,
    /// Base64-encoded PEM private key.
    pub private_key: String,
}

/// User name and password for session activation.
#[derive(Clone, PartialEq, Eq)]
pub struct UserCredentials {
    /// Login name.
    pub login: String,
    /// Password paired with the login.
    pub password: String,
}

impl std::fmt::Debug for UserCredentials {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("UserCredentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated parameters for a `connect` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Endpoint URL, e.g. `opc.tcp://10.0.0.1:4840`.
    pub url: String,
    /// Present when the host asked for a secure channel.
    pub certificate: Option<ClientCertificate>,
    /// Present when the host asked for user-name authentication.
    pub credentials: Option<UserCredentials>,
    /// Value refresh period in milliseconds; `0` selects the driver default.
    pub update_cycle_ms: u64,
}

impl ConnectOptions {
    /// Options for an anonymous, unsecured connection to `url`.
    #[must_use]
    pub fn anonymous(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            certificate: None,
            credentials: None,
            update_cycle_ms: 0,
        }
    }
}

/// Operations the gateway core requires from the OPC UA side.
pub trait EndpointDriver {
    /// Lists endpoint URLs advertised by the discovery server at `host:port`.
    ///
    /// # Errors
    ///
    /// Returns the driver's failure when discovery cannot complete.
    fn browse_servers(&self, host: &str, port: u16) -> Result<Vec<String>, DriverError>;

    /// Opens the connection described by `options`.
    ///
    /// # Errors
    ///
    /// Returns the driver's failure (unreachable host, rejected credentials)
    /// and leaves the driver disconnected.
    fn connect(&mut self, options: &ConnectOptions) -> Result<(), DriverError>;

    /// Whether the driver currently holds an open connection.
    ///
    /// The session tracks connection state itself and does not call this.
    fn is_connected(&self) -> bool;

    /// Reads the current value of the node at `path`.
    ///
    /// # Errors
    ///
    /// Returns the driver's failure, e.g. for an unknown node.
    fn read_value(&self, path: &str) -> Result<Value, DriverError>;

    /// Writes `value` to the node at `path`.
    ///
    /// # Errors
    ///
    /// Returns the driver's failure, e.g. for an unknown node or a value the
    /// node's data type cannot hold.
    fn write_value(&mut self, path: &str, value: &Value) -> Result<(), DriverError>;

    /// Snapshot of the node paths currently cached by the driver, in the
    /// driver's enumeration order.
    fn cached_paths(&self) -> Vec<String>;
}
