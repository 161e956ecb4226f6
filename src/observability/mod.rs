//! Observability.
//!
//! Structured logging via `tracing`; the benchmark engine itself is the
//! workbench's metrics surface, so nothing else lives here.

mod logging;

pub use logging::{InitOptions, LogFormat, init_logging};
