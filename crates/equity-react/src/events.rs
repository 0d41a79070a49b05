//! Callbacks fired while the reasoning loop runs

use async_trait::async_trait;
use serde_json::Value;

/// Event handler for ReAct loop events
///
/// Every method has a no-op default; implement the ones you need.
#[async_trait]
pub trait ReactEventHandler: Send + Sync {
    /// Called with the raw text of every model turn
    async fn on_model_turn(&self, _iteration: usize, _text: &str) {}

    /// Called when a tool dispatch starts
    async fn on_tool_start(&self, _name: &str, _input: &Value) {}

    /// Called when a tool dispatch finishes, successfully or not
    async fn on_tool_done(
        &self,
        _name: &str,
        _result: std::result::Result<&Value, &str>,
        _duration_ms: u64,
    ) {
    }

    /// Called when the model produces its final answer
    async fn on_final_answer(&self, _answer: &str) {}

    /// Called when the iteration budget runs out
    async fn on_exhausted(&self, _iterations: usize) {}
}

/// No-op event handler for when events are not needed
pub struct NoOpEventHandler;

#[async_trait]
impl ReactEventHandler for NoOpEventHandler {}
