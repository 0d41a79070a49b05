//! ReAct reasoning loop for the equity research agent
//!
//! The model is asked to answer in a fixed text grammar:
//!
//! ```text
//! Thought: <reasoning>
//! Action: <tool_name>
//! Action Input: <JSON object>
//! ```
//!
//! or, to finish, `Final Answer: <summary>`. Each turn is parsed into a
//! [`ModelTurn`]; tool calls go through the [`ToolRegistry`](equity_tools::ToolRegistry)
//! and their results come back to the model as `Observation:` messages until
//! it produces a final answer or the iteration budget runs out.

pub mod agent;
pub mod config;
pub mod conversation;
pub mod events;
pub mod parser;
pub mod prompt;
pub mod simple;

pub use agent::{ReactAgent, ReactAgentBuilder, EXHAUSTED_MESSAGE};
pub use config::{ReactConfig, ToolFailurePolicy, DEFAULT_MODEL};
pub use conversation::Conversation;
pub use events::{NoOpEventHandler, ReactEventHandler};
pub use parser::{parse_turn, ModelTurn, ToolCall};
pub use simple::{SimpleAgent, SimpleConfig};
