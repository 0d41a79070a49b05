//! Tool management and dispatch for the equity research agent
//!
//! Tools are named capabilities with a JSON-schema input contract. The
//! reasoning loop never calls a tool directly; it goes through a
//! [`ToolRegistry`], which checks the name and the required parameters
//! before anything runs.

pub mod registry;
pub mod schema;
pub mod tool;

pub use registry::ToolRegistry;
pub use tool::{Tool, ToolInput};
