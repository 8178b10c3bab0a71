//! Loader core for Ersatz.
//!
//! This crate owns the simulated data source and everything it touches:
//!
//! - [`loader`]: the loader itself, one timed producer task per invocation,
//!   delivering a constant payload exactly once through a handle that can be
//!   awaited or given a continuation
//! - [`config`]: validated loader configuration and TOML loading
//! - [`sink`]: the write-only output boundary values are rendered through

pub mod config;
pub mod loader;
pub mod sink;

pub use config::{ConfigError, LoaderConfig};
pub use loader::{LoadHandle, Loader};
pub use sink::{MemorySink, OutputSink, StdoutSink};
