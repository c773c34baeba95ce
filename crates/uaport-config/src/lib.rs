//! Shared configuration for the uaport gateway.
//!
//! The gateway runs as a child of its host process and receives its settings
//! through command-line flags, falling back to `UAPORT_*` environment
//! variables and then to the defaults in [`defaults`]. Stdout is reserved for
//! the framed command channel, so nothing in this crate prints.

mod defaults;
mod framing;
mod logging;

use std::ffi::OsString;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use thiserror::Error;

pub use defaults::{
    DEFAULT_LOG_FILTER, default_header_width, default_log_filter_string, default_log_format,
};
pub use framing::{HeaderWidth, HeaderWidthError};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "uaportd",
    version,
    about = "Framed JSON gateway between a host process and an OPC UA endpoint"
)]
pub struct Config {
    /// Tracing filter expression (for example `info` or `uaportd=debug`).
    #[arg(long, env = "UAPORT_LOG_FILTER", default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,

    /// Diagnostic output format written to stderr.
    #[arg(long, env = "UAPORT_LOG_FORMAT", default_value_t = default_log_format())]
    pub log_format: LogFormat,

    /// Width in bytes of the big-endian frame length prefix (1, 2 or 4).
    #[arg(long, env = "UAPORT_HEADER_WIDTH", default_value_t = default_header_width())]
    pub header_width: HeaderWidth,

    /// JSON file seeding the simulated address space (path to value).
    #[arg(long, env = "UAPORT_NODES")]
    pub nodes: Option<Utf8PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            header_width: default_header_width(),
            nodes: None,
        }
    }
}

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Command-line or environment input was rejected.
    #[error("{0}")]
    Cli(#[from] clap::Error),
}

impl ConfigError {
    /// Returns `true` when the error is a help or version request rather than
    /// a genuine failure.
    #[must_use]
    pub fn is_informational(&self) -> bool {
        match self {
            Self::Cli(error) => matches!(
                error.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ),
        }
    }
}

impl Config {
    /// Loads configuration from the process arguments and environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Cli`] when a flag or environment value is
    /// invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_iter(std::env::args_os())
    }

    /// Loads configuration from an explicit argument list. The first element
    /// is the binary name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Cli`] when a flag or environment value is
    /// invalid.
    pub fn load_from_iter<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(Self::try_parse_from(args)?)
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Diagnostic output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Frame header width used in both directions.
    #[must_use]
    pub const fn header_width(&self) -> HeaderWidth {
        self.header_width
    }

    /// Optional seed file for the simulated address space.
    #[must_use]
    pub fn nodes(&self) -> Option<&Utf8Path> {
        self.nodes.as_deref()
    }
}
