//! Concrete LLM provider implementations
//!
//! This module contains implementations of the LLMProvider trait for
//! chat-completions style services.

pub mod openai_compat;

pub use openai_compat::{OpenAICompatConfig, OpenAICompatProvider};
