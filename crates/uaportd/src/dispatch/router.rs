//! Method routing for decoded commands.
//!
//! The dispatch table is fixed. `browse_servers` and `connect` run in any
//! state; every other method first asks the session for a connected driver
//! and fails with "no connection" before looking at its arguments.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::arguments::{self, INVALID_READ_ARGUMENTS, INVALID_WRITE_ITEMS_ARGUMENTS};
use super::batch::run_batch;
use super::errors::DispatchError;
use super::request::Command;
use super::response::Reply;
use crate::driver::EndpointDriver;
use crate::health::HealthReporter;
use crate::node_cache::NodeCache;
use crate::session::{Session, SessionError};

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

const OK: &str = "ok";

/// Methods the gateway understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Lists endpoints advertised by a discovery server.
    BrowseServers,
    /// Opens the session's connection.
    Connect,
    /// Reads one node value.
    ReadItem,
    /// Reads many node values.
    ReadItems,
    /// Writes one node value.
    WriteItem,
    /// Writes many node values.
    WriteItems,
    /// Lists every cached node path.
    BrowseNodes,
    /// Lists cached node paths containing a substring.
    Search,
}

impl Method {
    /// Every method, in table order.
    pub const ALL: [Self; 8] = [
        Self::BrowseServers,
        Self::Connect,
        Self::ReadItem,
        Self::ReadItems,
        Self::WriteItem,
        Self::WriteItems,
        Self::BrowseNodes,
        Self::Search,
    ];

    /// Parses a method name. Matching is exact and case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidMethod`] for names outside the table.
    pub fn parse(value: &str) -> Result<Self, DispatchError> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == value)
            .ok_or_else(|| DispatchError::invalid_method(value))
    }

    /// Wire name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BrowseServers => "browse_servers",
            Self::Connect => "connect",
            Self::ReadItem => "read_item",
            Self::ReadItems => "read_items",
            Self::WriteItem => "write_item",
            Self::WriteItems => "write_items",
            Self::BrowseNodes => "browse_nodes",
            Self::Search => "search",
        }
    }
}

/// Routes commands to their handlers against a session.
#[derive(Clone)]
pub struct MethodRouter {
    reporter: Arc<dyn HealthReporter>,
}

impl std::fmt::Debug for MethodRouter {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("MethodRouter").finish_non_exhaustive()
    }
}

impl MethodRouter {
    /// Creates a router that reports connection events to `reporter`.
    pub fn new(reporter: Arc<dyn HealthReporter>) -> Self {
        Self { reporter }
    }

    /// Executes `command` and produces its reply.
    pub fn route<D: EndpointDriver>(&self, session: &mut Session<D>, command: &Command) -> Reply {
        Reply::from_result(self.dispatch(session, command))
    }

    fn dispatch<D: EndpointDriver>(
        &self,
        session: &mut Session<D>,
        command: &Command,
    ) -> Result<Value, DispatchError> {
        let method = Method::parse(command.method())?;
        debug!(
            target: DISPATCH_TARGET,
            method = method.as_str(),
            connected = session.is_connected(),
            "routing command"
        );

        let args = command.args();
        match method {
            Method::BrowseServers => browse_servers(session.driver(), args),
            Method::Connect => self.connect(session, args),
            Method::ReadItem => read_item(session.require_connected()?, args),
            Method::ReadItems => {
                let driver = session.require_connected()?;
                run_batch(args, INVALID_READ_ARGUMENTS, |item| read_item(driver, item))
                    .map(Value::Array)
            }
            Method::WriteItem => write_item(session.require_connected_mut()?, args),
            Method::WriteItems => {
                let driver = session.require_connected_mut()?;
                run_batch(args, INVALID_WRITE_ITEMS_ARGUMENTS, |item| {
                    write_item(driver, item)
                })
                .map(Value::Array)
            }
            Method::BrowseNodes => {
                let cache = NodeCache::new(session.require_connected()?);
                Ok(Value::Array(cache.enumerate().map(Value::String).collect()))
            }
            Method::Search => {
                let cache = NodeCache::new(session.require_connected()?);
                let needle = arguments::search_needle(args)?;
                Ok(Value::Array(
                    cache.search(needle).map(Value::String).collect(),
                ))
            }
        }
    }

    fn connect<D: EndpointDriver>(
        &self,
        session: &mut Session<D>,
        args: &Value,
    ) -> Result<Value, DispatchError> {
        if session.is_connected() {
            return Err(SessionError::AlreadyConnected.into());
        }
        let options = arguments::connect_options(args)?;
        let url = options.url.clone();
        match session.connect(options) {
            Ok(()) => {
                self.reporter.session_connected(&url);
                Ok(Value::from(OK))
            }
            Err(error) => {
                self.reporter.connect_failed(&url, &error);
                Err(error.into())
            }
        }
    }
}

fn browse_servers<D: EndpointDriver>(driver: &D, args: &Value) -> Result<Value, DispatchError> {
    let target = arguments::discovery_target(args)?;
    let endpoints = driver.browse_servers(target.host, target.port)?;
    Ok(Value::Array(endpoints.into_iter().map(Value::String).collect()))
}

fn read_item<D: EndpointDriver>(driver: &D, args: &Value) -> Result<Value, DispatchError> {
    let path = arguments::node_path(args)?;
    Ok(driver.read_value(path)?)
}

fn write_item<D: EndpointDriver>(driver: &mut D, args: &Value) -> Result<Value, DispatchError> {
    let (path, value) = arguments::write_pair(args)?;
    driver.write_value(path, value)?;
    Ok(Value::from(OK))
}
