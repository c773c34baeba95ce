//! Per-method argument validation.
//!
//! Each parser checks its argument shape in a fixed order and stops at the
//! first failure, returning the message the host expects for that method.
//! Parsers never touch the session or the driver.

use serde_json::{Map, Number, Value};

use super::errors::DispatchError;
use crate::driver::{ClientCertificate, ConnectOptions, UserCredentials};

pub(crate) const HOST_NOT_DEFINED: &str = "host is not defined";
pub(crate) const PORT_NOT_DEFINED: &str = "port is not defined";
pub(crate) const URL_NOT_DEFINED: &str = "url is not defined";
pub(crate) const KEY_NOT_DEFINED: &str = "key is not defined";
pub(crate) const PASSWORD_NOT_DEFINED: &str = "password is not defined";
pub(crate) const PATH_NOT_DEFINED: &str = "path is not defined";
pub(crate) const INVALID_READ_ARGUMENTS: &str = "invalid read arguments";
pub(crate) const INVALID_WRITE_ITEM_ARGUMENTS: &str = "invalid write_item arguments";
pub(crate) const ITEM_PATH_NOT_DEFINED: &str = "item path is not defined";
pub(crate) const ITEM_VALUE_NOT_DEFINED: &str = "item value is not defined";
pub(crate) const INVALID_WRITE_ITEMS_ARGUMENTS: &str = "invalid write_items arguments";
pub(crate) const UNDEFINED_SEARCH_STRING: &str = "undefined search string";

const MILLIS_PER_SECOND: u64 = 1000;

/// Discovery target for `browse_servers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryTarget<'a> {
    /// Discovery server host name or address.
    pub host: &'a str,
    /// Discovery server TCP port.
    pub port: u16,
}

/// Parses `{ "host": string, "port": number }`.
///
/// Fractional ports are truncated, like the update cycle.
pub(crate) fn discovery_target(args: &Value) -> Result<DiscoveryTarget<'_>, DispatchError> {
    let map = object(args)?;
    let host = map
        .get("host")
        .and_then(Value::as_str)
        .ok_or_else(|| DispatchError::invalid_arguments(HOST_NOT_DEFINED))?;
    let port = map
        .get("port")
        .and_then(Value::as_number)
        .and_then(whole_number)
        .and_then(|port| u16::try_from(port).ok())
        .ok_or_else(|| DispatchError::invalid_arguments(PORT_NOT_DEFINED))?;
    Ok(DiscoveryTarget { host, port })
}

/// Parses the `connect` argument object into driver options.
///
/// A non-string `certificate` or `login` counts as absent. Once either is
/// present as a string, its partner field is required.
pub(crate) fn connect_options(args: &Value) -> Result<ConnectOptions, DispatchError> {
    let map = object(args)?;
    let url = string_field(map, "url")
        .ok_or_else(|| DispatchError::invalid_arguments(URL_NOT_DEFINED))?;

    let certificate = match string_field(map, "certificate") {
        Some(certificate) => {
            let private_key = string_field(map, "private_key")
                .ok_or_else(|| DispatchError::invalid_arguments(KEY_NOT_DEFINED))?;
            Some(ClientCertificate {
                certificate: certificate.to_owned(),
                private_key: private_key.to_owned(),
            })
        }
        None => None,
    };

    let credentials = match string_field(map, "login") {
        Some(login) => {
            let password = string_field(map, "password")
                .ok_or_else(|| DispatchError::invalid_arguments(PASSWORD_NOT_DEFINED))?;
            Some(UserCredentials {
                login: login.to_owned(),
                password: password.to_owned(),
            })
        }
        None => None,
    };

    let update_cycle_ms = map
        .get("update_cycle")
        .and_then(Value::as_number)
        .map_or(0, update_cycle_millis);

    Ok(ConnectOptions {
        url: url.to_owned(),
        certificate,
        credentials,
        update_cycle_ms,
    })
}

/// Parses a single node path.
pub(crate) fn node_path(args: &Value) -> Result<&str, DispatchError> {
    args.as_str()
        .ok_or_else(|| DispatchError::invalid_arguments(PATH_NOT_DEFINED))
}

/// Parses a `[path, value]` write pair. An explicit `null` value is accepted.
pub(crate) fn write_pair(args: &Value) -> Result<(&str, &Value), DispatchError> {
    let items = args
        .as_array()
        .ok_or_else(|| DispatchError::invalid_arguments(INVALID_WRITE_ITEM_ARGUMENTS))?;
    let path = items
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| DispatchError::invalid_arguments(ITEM_PATH_NOT_DEFINED))?;
    let value = items
        .get(1)
        .ok_or_else(|| DispatchError::invalid_arguments(ITEM_VALUE_NOT_DEFINED))?;
    Ok((path, value))
}

/// Parses a search needle.
pub(crate) fn search_needle(args: &Value) -> Result<&str, DispatchError> {
    args.as_str()
        .ok_or_else(|| DispatchError::invalid_arguments(UNDEFINED_SEARCH_STRING))
}

fn object(args: &Value) -> Result<&Map<String, Value>, DispatchError> {
    args.as_object().ok_or_else(DispatchError::invalid_parameters)
}

fn string_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

/// Converts an update cycle in seconds to whole milliseconds. Fractions are
/// truncated and negative or non-finite values select the driver default.
fn update_cycle_millis(seconds: &Number) -> u64 {
    let whole_seconds = seconds
        .as_u64()
        .or_else(|| seconds.as_i64().map(|_| 0))
        .or_else(|| seconds.as_f64().and_then(truncate_non_negative))
        .unwrap_or(0);
    whole_seconds.saturating_mul(MILLIS_PER_SECOND)
}

/// Integer part of a non-negative JSON number.
fn whole_number(number: &Number) -> Option<u64> {
    number
        .as_u64()
        .or_else(|| number.as_f64().and_then(truncate_non_negative))
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "float to integer casts saturate and the fraction is meant to be dropped"
)]
fn truncate_non_negative(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0).then(|| value.trunc() as u64)
}
