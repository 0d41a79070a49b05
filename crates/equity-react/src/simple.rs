//! Simple agent implementation (LLM only, no tools)

use crate::config::DEFAULT_MODEL;
use async_trait::async_trait;
use equity_core::{Agent, Result};
use equity_llm::{CompletionRequest, LLMProvider, Message};
use std::sync::Arc;

/// Configuration for a simple agent
#[derive(Debug, Clone)]
pub struct SimpleConfig {
    /// Model to use
    pub model: String,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature for sampling
    pub temperature: f32,
}

impl Default for SimpleConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
            temperature: 0.2,
        }
    }
}

/// A simple agent that uses the LLM without tools
///
/// The prompt is sent as a single user message and the reply text is
/// returned as is.
///
/// # Example
///
/// ```no_run
/// use equity_core::Agent;
/// use equity_llm::LLMProvider;
/// use equity_react::{SimpleAgent, SimpleConfig};
/// use std::sync::Arc;
///
/// # async fn example(provider: Arc<dyn LLMProvider>) -> equity_core::Result<()> {
/// let agent = SimpleAgent::new(provider, SimpleConfig::default());
/// let reply = agent.run("Summarise NVDA's last quarter").await?;
/// # Ok(())
/// # }
/// ```
pub struct SimpleAgent {
    provider: Arc<dyn LLMProvider>,
    config: SimpleConfig,
}

impl SimpleAgent {
    /// Create a new simple agent
    pub fn new(provider: Arc<dyn LLMProvider>, config: SimpleConfig) -> Self {
        Self { provider, config }
    }

    /// Get the agent's configuration
    pub fn config(&self) -> &SimpleConfig {
        &self.config
    }
}

#[async_trait]
impl Agent for SimpleAgent {
    async fn run(&self, input: &str) -> Result<String> {
        let request = CompletionRequest::builder(&self.config.model)
            .add_message(Message::user(input))
            .max_tokens(self.config.max_tokens)
            .temperature(self.config.temperature)
            .build();

        let response = self.provider.complete(request).await?;
        Ok(response.message.content)
    }

    fn name(&self) -> &str {
        "SimpleLLMAgent"
    }
}
