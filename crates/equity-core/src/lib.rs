//! Core abstractions for the equity research agent
//!
//! This crate defines the `Agent` trait shared by every agent in the workspace
//! and the run-level error taxonomy, including the errors raised while parsing
//! model output into actions.

pub mod agent;
pub mod error;

pub use agent::Agent;
pub use error::{Error, ParseError, Result};
