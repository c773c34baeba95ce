//! Connection state for the lifetime of the gateway process.
//!
//! A [`Session`] starts disconnected and becomes connected through a single
//! successful [`Session::connect`]. There is no way back: the connection
//! lives until the process exits. A failed connect leaves the session
//! disconnected so the host may retry.

use thiserror::Error;

use crate::driver::{ConnectOptions, DriverError, EndpointDriver};

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No connection has been established yet.
    Disconnected,
    /// A connection is open and gated commands may run.
    Connected,
}

/// Errors raised by session state transitions and gating.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A gated command arrived before a successful connect.
    #[error("no connection")]
    NotConnected,
    /// A connect arrived while a connection is already open.
    #[error("already connected")]
    AlreadyConnected,
    /// The driver refused the connection.
    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Owner of the endpoint driver and of the current connection state.
#[derive(Debug)]
pub struct Session<D> {
    driver: D,
    connection: Option<ConnectOptions>,
}

impl<D> Session<D> {
    /// Creates a disconnected session around `driver`.
    pub const fn new(driver: D) -> Self {
        Self {
            driver,
            connection: None,
        }
    }

    /// Current state.
    pub const fn state(&self) -> SessionState {
        if self.connection.is_some() {
            SessionState::Connected
        } else {
            SessionState::Disconnected
        }
    }

    /// Whether a connection is open.
    pub const fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Options of the open connection, if any.
    pub const fn connection(&self) -> Option<&ConnectOptions> {
        self.connection.as_ref()
    }

    /// Driver access for commands that do not require a connection.
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Returns the driver when connected.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotConnected`] while disconnected.
    pub fn require_connected(&self) -> Result<&D, SessionError> {
        if self.is_connected() {
            Ok(&self.driver)
        } else {
            Err(SessionError::NotConnected)
        }
    }

    /// Returns the driver mutably when connected.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotConnected`] while disconnected.
    pub fn require_connected_mut(&mut self) -> Result<&mut D, SessionError> {
        if self.is_connected() {
            Ok(&mut self.driver)
        } else {
            Err(SessionError::NotConnected)
        }
    }
}

impl<D: EndpointDriver> Session<D> {
    /// Opens the connection described by `options`.
    ///
    /// The session only records the connection once the driver reports
    /// success.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyConnected`] without consulting the
    /// driver when a connection is open, or [`SessionError::Driver`] with the
    /// driver's failure.
    pub fn connect(&mut self, options: ConnectOptions) -> Result<(), SessionError> {
        if self.is_connected() {
            return Err(SessionError::AlreadyConnected);
        }
        self.driver.connect(&options)?;
        self.connection = Some(options);
        Ok(())
    }
}
