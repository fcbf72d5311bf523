//! Observability for the ray engine
//!
//! The engine emits `tracing` events: `debug` for every bounce decision,
//! `warn` for infeasible forced paths and boundary exhaustion. Hosts that do
//! not install their own subscriber can call [`init_logging`].

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
