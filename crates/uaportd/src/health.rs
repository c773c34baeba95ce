//! Structured health reporting for gateway lifecycle events.

use std::sync::Arc;

use uaport_config::Config;

use crate::bootstrap::BootstrapError;
use crate::dispatch::ServeError;
use crate::session::SessionError;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked after the session connects to `url`.
    fn session_connected(&self, url: &str);

    /// Invoked when a connect attempt to `url` is refused.
    fn connect_failed(&self, url: &str, error: &SessionError);

    /// Invoked when the host closes the channel cleanly.
    fn channel_closed(&self, commands: u64);

    /// Invoked when the serve loop stops on a fatal error.
    fn serve_failed(&self, error: &ServeError);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn session_connected(&self, url: &str) {
        (**self).session_connected(url);
    }

    fn connect_failed(&self, url: &str, error: &SessionError) {
        (**self).connect_failed(url, error);
    }

    fn channel_closed(&self, commands: u64) {
        (**self).channel_closed(commands);
    }

    fn serve_failed(&self, error: &ServeError) {
        (**self).serve_failed(error);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting gateway bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            header_width = %config.header_width(),
            log_filter = %config.log_filter(),
            log_format = %config.log_format(),
            nodes = ?config.nodes(),
            "gateway bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "gateway bootstrap failed"
        );
    }

    fn session_connected(&self, url: &str) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "session_connected",
            url,
            "session connected"
        );
    }

    fn connect_failed(&self, url: &str, error: &SessionError) {
        tracing::warn!(
            target: HEALTH_TARGET,
            event = "connect_failed",
            url,
            error = %error,
            "connect attempt refused"
        );
    }

    fn channel_closed(&self, commands: u64) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "channel_closed",
            commands,
            "host closed the channel"
        );
    }

    fn serve_failed(&self, error: &ServeError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "serve_failed",
            error = %error,
            "serve loop stopped"
        );
    }
}
