//! Logging setup and the `tracing` diagnostics sink

use crate::domain::{Diagnostic, Diagnostics, Severity};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Forwards diagnostics to `tracing` as `warn!`/`error!` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        let path = diagnostic.path.as_str();
        let lineno = diagnostic.lineno;

        match diagnostic.severity {
            Severity::Error => {
                tracing::error!(path, lineno, kind = ?diagnostic.kind, "{}", diagnostic)
            }
            Severity::Warning => {
                tracing::warn!(path, lineno, kind = ?diagnostic.kind, "{}", diagnostic)
            }
        }
    }
}

/// Install a stderr fmt subscriber. `RUST_LOG` wins over `verbose`.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}
