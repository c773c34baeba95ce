use crate::framing::HeaderWidth;
use crate::logging::LogFormat;

/// Default log filter expression used by the gateway.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Owned log filter value used where allocation is required (e.g. clap).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the gateway.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default frame header width agreed with the host process.
#[must_use]
pub const fn default_header_width() -> HeaderWidth {
    HeaderWidth::Four
}
