//! In-memory endpoint driver backed by a flat address space.
//!
//! The simulated driver lets the gateway run end to end without an OPC UA
//! stack. Nodes are seeded from a JSON object mapping node paths to values.
//! Failures use OPC UA status names so hosts see the same strings a real
//! stack would report.

use std::collections::BTreeMap;
use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::{ConnectOptions, DriverError, EndpointDriver};

const DRIVER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::driver::simulated");
const ENDPOINT_SCHEME: &str = "opc.tcp";
const BAD_ENDPOINT_URL: &str = "BadTcpEndpointUrlInvalid";
const BAD_NODE_ID: &str = "BadNodeIdUnknown";

/// Errors raised while loading a seed file for the simulated address space.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The seed file could not be read.
    #[error("failed to read node seed file '{path}': {source}")]
    Read {
        /// Seed file path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The seed file is not valid JSON.
    #[error("node seed file '{path}' is not valid JSON: {source}")]
    Parse {
        /// Seed file path.
        path: Utf8PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// The seed file is JSON but not an object of path to value.
    #[error("node seed file '{path}' must contain a JSON object")]
    NotObject {
        /// Seed file path.
        path: Utf8PathBuf,
    },
}

/// Endpoint driver holding its address space in memory.
#[derive(Debug, Clone, Default)]
pub struct SimulatedDriver {
    nodes: BTreeMap<String, Value>,
    connection: Option<Url>,
}

impl SimulatedDriver {
    /// Creates a driver with an empty address space.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a driver seeded with the given nodes.
    #[must_use]
    pub fn with_nodes<I, K>(nodes: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            nodes: nodes
                .into_iter()
                .map(|(path, value)| (path.into(), value))
                .collect(),
            connection: None,
        }
    }

    /// Loads the address space from a JSON object file.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError`] when the file is unreadable, malformed, or not an
    /// object.
    pub fn from_seed_file(path: &Utf8Path) -> Result<Self, SeedError> {
        let raw = fs::read(path).map_err(|source| SeedError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: Value = serde_json::from_slice(&raw).map_err(|source| SeedError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        match parsed {
            Value::Object(map) => Ok(Self::with_nodes(map)),
            _ => Err(SeedError::NotObject {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Endpoint the driver is connected to, if any.
    #[must_use]
    pub fn endpoint(&self) -> Option<&Url> {
        self.connection.as_ref()
    }

    fn parse_endpoint(url: &str) -> Result<Url, DriverError> {
        let parsed = Url::parse(url).map_err(|_| DriverError::new(BAD_ENDPOINT_URL))?;
        if parsed.scheme() != ENDPOINT_SCHEME {
            return Err(DriverError::new(BAD_ENDPOINT_URL));
        }
        Ok(parsed)
    }
}

impl EndpointDriver for SimulatedDriver {
    fn browse_servers(&self, host: &str, port: u16) -> Result<Vec<String>, DriverError> {
        if host.trim().is_empty() {
            return Err(DriverError::new(BAD_ENDPOINT_URL));
        }
        Ok(vec![format!("{ENDPOINT_SCHEME}://{host}:{port}")])
    }

    fn connect(&mut self, options: &ConnectOptions) -> Result<(), DriverError> {
        let endpoint = Self::parse_endpoint(&options.url)?;
        debug!(
            target: DRIVER_TARGET,
            endpoint = %endpoint,
            secure = options.certificate.is_some(),
            authenticated = options.credentials.is_some(),
            update_cycle_ms = options.update_cycle_ms,
            nodes = self.nodes.len(),
            "simulated endpoint connected"
        );
        self.connection = Some(endpoint);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    fn read_value(&self, path: &str) -> Result<Value, DriverError> {
        self.nodes
            .get(path)
            .cloned()
            .ok_or_else(|| DriverError::new(BAD_NODE_ID))
    }

    fn write_value(&mut self, path: &str, value: &Value) -> Result<(), DriverError> {
        let slot = self
            .nodes
            .get_mut(path)
            .ok_or_else(|| DriverError::new(BAD_NODE_ID))?;
        *slot = value.clone();
        Ok(())
    }

    fn cached_paths(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::{fixture, rstest};
    use serde_json::json;
    use tempfile::NamedTempFile;

    use super::*;

    #[fixture]
    fn driver() -> SimulatedDriver {
        SimulatedDriver::with_nodes([
            ("plant/boiler/temp1", json!(71.5)),
            ("plant/boiler/valve", json!(true)),
        ])
    }

    fn seed_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create seed file");
        file.write_all(contents.as_bytes()).expect("write seed file");
        file
    }

    fn utf8_path(file: &NamedTempFile) -> &Utf8Path {
        Utf8Path::from_path(file.path()).expect("temp path should be UTF-8")
    }

    #[rstest]
    #[case("opc.tcp://10.0.0.1:4840")]
    #[case("opc.tcp://plc.local:53530/OPCUA/SimulationServer")]
    fn connects_to_opc_tcp_endpoints(mut driver: SimulatedDriver, #[case] url: &str) {
        driver
            .connect(&ConnectOptions::anonymous(url))
            .expect("connect should succeed");
        assert!(driver.is_connected());
        assert_eq!(driver.endpoint().map(Url::scheme), Some("opc.tcp"));
    }

    #[rstest]
    #[case("x")]
    #[case("http://10.0.0.1:4840")]
    fn rejects_invalid_endpoint_urls(mut driver: SimulatedDriver, #[case] url: &str) {
        let error = driver
            .connect(&ConnectOptions::anonymous(url))
            .expect_err("connect should fail");
        assert_eq!(error.message(), BAD_ENDPOINT_URL);
        assert!(!driver.is_connected());
    }

    #[rstest]
    fn reads_and_writes_known_nodes(mut driver: SimulatedDriver) {
        assert_eq!(
            driver.read_value("plant/boiler/temp1").expect("read"),
            json!(71.5)
        );
        driver
            .write_value("plant/boiler/temp1", &json!(80))
            .expect("write");
        assert_eq!(
            driver.read_value("plant/boiler/temp1").expect("read"),
            json!(80)
        );
    }

    #[rstest]
    fn unknown_nodes_report_bad_node_id(mut driver: SimulatedDriver) {
        let read = driver.read_value("bad/path").expect_err("read should fail");
        assert_eq!(read.message(), BAD_NODE_ID);
        let write = driver
            .write_value("bad/path", &json!(1))
            .expect_err("write should fail");
        assert_eq!(write.message(), BAD_NODE_ID);
        assert_eq!(driver.cached_paths().len(), 2);
    }

    #[rstest]
    fn browse_servers_builds_endpoint_url(driver: SimulatedDriver) {
        let urls = driver.browse_servers("10.0.0.1", 4840).expect("browse");
        assert_eq!(urls, vec![String::from("opc.tcp://10.0.0.1:4840")]);
        assert!(driver.browse_servers("  ", 4840).is_err());
    }

    #[test]
    fn loads_seed_file_objects() {
        let file = seed_file(r#"{"b/node": 2, "a/node": "on"}"#);
        let driver = SimulatedDriver::from_seed_file(utf8_path(&file)).expect("seed");
        assert_eq!(driver.cached_paths(), vec!["a/node", "b/node"]);
    }

    #[rstest]
    #[case("not json")]
    #[case("[1, 2, 3]")]
    fn rejects_malformed_seed_files(#[case] contents: &str) {
        let file = seed_file(contents);
        let result = SimulatedDriver::from_seed_file(utf8_path(&file));
        assert!(matches!(
            result,
            Err(SeedError::Parse { .. } | SeedError::NotObject { .. })
        ));
    }

    #[test]
    fn missing_seed_file_reports_read_error() {
        let missing = Utf8Path::new("/nonexistent/uaport/nodes.json");
        let result = SimulatedDriver::from_seed_file(missing);
        assert!(matches!(result, Err(SeedError::Read { .. })));
    }
}
