//! Infrastructure layer - Configuration, resolution, I/O and logging

pub mod config;
pub mod loader;
pub mod logging;
pub mod resolver;

pub use config::{Config, SafeMode};
pub use loader::{ContentLoader, DefaultLoader};
pub use logging::TracingDiagnostics;
pub use resolver::{Location, TargetResolver};
