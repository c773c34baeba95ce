//! Gateway bootstrap orchestration.

use std::io::{Read, Write};
use std::sync::Arc;

use thiserror::Error;

use uaport_config::{Config, ConfigError};

use crate::dispatch::{DispatchLoop, ResponseWriter, ServeError};
use crate::driver::{EndpointDriver, SeedError, SimulatedDriver};
use crate::health::HealthReporter;
use crate::session::Session;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};
use crate::transport::{FrameReader, FrameWriter};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the gateway configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration sources are invalid.
    fn load(&self) -> Result<Config, ConfigError>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, ConfigError> {
        Config::load()
    }
}

/// Loader that returns a configuration resolved earlier.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps an already resolved configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, ConfigError> {
        Ok(self.config.clone())
    }
}

/// Builds the endpoint driver for a resolved configuration.
pub trait DriverFactory {
    /// Driver type produced by the factory.
    type Driver: EndpointDriver;

    /// Creates a disconnected driver.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError`] when the driver's initial state cannot be
    /// loaded.
    fn create(&self, config: &Config) -> Result<Self::Driver, SeedError>;
}

/// Factory for the in-memory [`SimulatedDriver`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedDriverFactory;

impl DriverFactory for SimulatedDriverFactory {
    type Driver = SimulatedDriver;

    fn create(&self, config: &Config) -> Result<SimulatedDriver, SeedError> {
        config
            .nodes()
            .map_or_else(|| Ok(SimulatedDriver::new()), SimulatedDriver::from_seed_file)
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: ConfigError,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The endpoint driver could not be created.
    #[error("failed to prepare endpoint driver: {source}")]
    Driver {
        /// Underlying seed error.
        #[source]
        source: SeedError,
    },
}

/// Result of a successful bootstrap invocation.
pub struct Gateway<D> {
    config: Config,
    session: Session<D>,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl<D> Gateway<D> {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Accessor for the session, primarily useful for testing.
    #[must_use]
    pub const fn session(&self) -> &Session<D> {
        &self.session
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }
}

impl<D: EndpointDriver> Gateway<D> {
    /// Serves framed commands from `input` and writes replies to `output`
    /// until the host closes `input`.
    ///
    /// Returns the number of commands answered.
    ///
    /// # Errors
    ///
    /// Returns [`ServeError`] when the channel fails or a reply cannot be
    /// encoded.
    pub fn serve<R: Read, W: Write>(&mut self, input: R, output: W) -> Result<u64, ServeError> {
        let width = self.config.header_width();
        let mut frames = FrameReader::new(input, width);
        let mut writer = ResponseWriter::new(FrameWriter::new(output, width));
        let dispatch = DispatchLoop::new(Arc::clone(&self.reporter));

        match dispatch.serve(&mut self.session, &mut frames, &mut writer) {
            Ok(answered) => {
                self.reporter.channel_closed(answered);
                Ok(answered)
            }
            Err(error) => {
                self.reporter.serve_failed(&error);
                Err(error)
            }
        }
    }
}

/// Bootstraps the gateway using the supplied collaborators.
///
/// # Errors
///
/// Returns [`BootstrapError`] when configuration, telemetry, or driver
/// construction fails. The failure is also passed to `reporter`.
pub fn bootstrap_with<F>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    factory: &F,
) -> Result<Gateway<F::Driver>, BootstrapError>
where
    F: DriverFactory,
{
    reporter.bootstrap_starting();

    let config = match loader.load() {
        Ok(config) => config,
        Err(source) => {
            let error = BootstrapError::Configuration { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let telemetry = match telemetry::initialise(&config) {
        Ok(handle) => handle,
        Err(source) => {
            let error = BootstrapError::Telemetry { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let driver = match factory.create(&config) {
        Ok(driver) => driver,
        Err(source) => {
            let error = BootstrapError::Driver { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    reporter.bootstrap_succeeded(&config);
    Ok(Gateway {
        config,
        session: Session::new(driver),
        telemetry,
        reporter,
    })
}
