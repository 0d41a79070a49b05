//! Language model provider abstraction for the equity research agent
//!
//! This crate provides provider-agnostic types for talking to chat models:
//!
//! - Role-tagged text messages
//! - Completion request/response types
//! - The `LLMProvider` trait
//! - An OpenAI-compatible chat-completions provider (behind the
//!   `openai-compat` feature), defaulting to Groq

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;

pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(feature = "openai-compat")]
pub mod providers;
