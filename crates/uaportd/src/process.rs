//! Process entry point: configuration, bootstrap, and the stdio serve loop.

use std::io::{self, Read, Write};
use std::process::ExitCode;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use uaport_config::ConfigError;

use crate::bootstrap::{
    BootstrapError, ConfigLoader, DriverFactory, SimulatedDriverFactory, StaticConfigLoader,
    SystemConfigLoader, bootstrap_with,
};
use crate::dispatch::ServeError;
use crate::health::{HealthReporter, StructuredHealthReporter};

const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");

/// Failures that end the process with a non-zero status.
#[derive(Debug, Error)]
pub(crate) enum RunError {
    /// Command-line or environment configuration was rejected.
    #[error(transparent)]
    Config(ConfigError),
    /// Bootstrap failed after configuration loaded.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
    /// The serve loop stopped on a fatal error.
    #[error(transparent)]
    Serve(#[from] ServeError),
    /// Help or version output could not be written.
    #[error("failed to write usage output: {0}")]
    Usage(#[source] io::Error),
}

/// Runs the gateway on the process's stdin and stdout.
///
/// Exits successfully when the host closes stdin. Configuration, bootstrap,
/// and channel failures exit with status 1.
#[must_use]
pub fn run() -> ExitCode {
    let reporter = Arc::new(StructuredHealthReporter::new());
    let stdin = io::stdin();
    let stdout = io::stdout();
    let result = run_with(
        &SystemConfigLoader,
        reporter,
        &SimulatedDriverFactory,
        stdin.lock(),
        stdout.lock(),
        &mut io::stderr(),
    );
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

/// Runs the gateway with injected collaborators and streams.
///
/// Returns the number of commands answered. Failures that happen before
/// telemetry exists are also written to `diagnostics`.
pub(crate) fn run_with<F, R, W, E>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    factory: &F,
    input: R,
    output: W,
    diagnostics: &mut E,
) -> Result<u64, RunError>
where
    F: DriverFactory,
    R: Read,
    W: Write,
    E: Write,
{
    let config = match loader.load() {
        Ok(config) => config,
        Err(error) if error.is_informational() => {
            let ConfigError::Cli(usage) = error;
            usage.print().map_err(RunError::Usage)?;
            return Ok(0);
        }
        Err(error) => {
            let ConfigError::Cli(ref clap_error) = error;
            write_diagnostic(diagnostics, &clap_error.render().to_string());
            return Err(RunError::Config(error));
        }
    };

    let static_loader = StaticConfigLoader::new(config);
    let mut gateway = bootstrap_with(&static_loader, reporter, factory).map_err(|error| {
        // Telemetry is not installed yet when it is the failing step.
        if matches!(error, BootstrapError::Telemetry { .. }) {
            write_diagnostic(diagnostics, &format!("uaportd: {error}\n"));
        }
        RunError::from(error)
    })?;

    info!(
        target: PROCESS_TARGET,
        header_width = %gateway.config().header_width(),
        "serving framed commands on stdio"
    );
    Ok(gateway.serve(input, output)?)
}

fn write_diagnostic<E: Write>(diagnostics: &mut E, message: &str) {
    if diagnostics
        .write_all(message.as_bytes())
        .and_then(|()| diagnostics.flush())
        .is_err()
    {
        tracing::debug!(target: PROCESS_TARGET, "diagnostic stream unavailable");
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use serde_json::json;
    use uaport_config::{Config, HeaderWidth};

    use super::*;
    use crate::transport::{FrameReader, FrameWriter, TransportError};

    struct FailingLoader;

    impl ConfigLoader for FailingLoader {
        fn load(&self) -> Result<Config, ConfigError> {
            Config::load_from_iter(["uaportd", "--header-width", "3"])
        }
    }

    fn static_loader(width: HeaderWidth) -> StaticConfigLoader {
        StaticConfigLoader::new(Config {
            header_width: width,
            ..Config::default()
        })
    }

    #[test]
    fn clean_end_of_stream_completes_the_run() {
        let mut frames = FrameWriter::new(Vec::new(), HeaderWidth::Two);
        frames
            .write_message(br#"{"method":"browse_servers","args":{"host":"h","port":1}}"#)
            .expect("frame");
        let mut output = Vec::new();
        let mut diagnostics = Vec::new();

        let answered = run_with(
            &static_loader(HeaderWidth::Two),
            Arc::new(StructuredHealthReporter::new()),
            &SimulatedDriverFactory,
            Cursor::new(frames.into_inner()),
            &mut output,
            &mut diagnostics,
        )
        .expect("run should end cleanly");

        assert_eq!(answered, 1);
        let mut replies = FrameReader::new(Cursor::new(output), HeaderWidth::Two);
        let payload = replies.read_message().expect("read").expect("one reply");
        let reply: serde_json::Value = serde_json::from_slice(&payload).expect("json");
        assert_eq!(reply, json!(["opc.tcp://h:1"]));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn truncated_input_is_a_serve_failure() {
        let mut output = Vec::new();
        let error = run_with(
            &static_loader(HeaderWidth::Four),
            Arc::new(StructuredHealthReporter::new()),
            &SimulatedDriverFactory,
            Cursor::new(vec![0x00, 0x00]),
            &mut output,
            &mut Vec::new(),
        )
        .expect_err("truncated header");
        assert!(matches!(
            error,
            RunError::Serve(ServeError::Transport(TransportError::Truncated { .. }))
        ));
        assert!(output.is_empty());
    }

    #[test]
    fn invalid_configuration_is_reported_on_diagnostics() {
        let mut diagnostics = Vec::new();
        let error = run_with(
            &FailingLoader,
            Arc::new(StructuredHealthReporter::new()),
            &SimulatedDriverFactory,
            Cursor::new(Vec::new()),
            Vec::new(),
            &mut diagnostics,
        )
        .expect_err("width 3 is unsupported");
        assert!(matches!(error, RunError::Config(_)));
        let message = String::from_utf8(diagnostics).expect("utf8");
        assert!(message.contains("header-width"), "diagnostics: {message}");
    }
}
