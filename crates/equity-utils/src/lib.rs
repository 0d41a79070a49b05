//! Shared utilities for the equity research workspace
//!
//! Logging setup and process-level settings read from the environment.

pub mod config;
pub mod logging;

pub use config::{Settings, SettingsError};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
