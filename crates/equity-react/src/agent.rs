//! ReAct agent: the reasoning loop
//!
//! Each iteration sends the whole conversation to the model, parses the
//! reply, and either returns the final answer or dispatches the requested
//! tool and appends the observation:
//!
//! ```text
//! INIT -> AWAITING_MODEL -> PARSING -> DISPATCHING -> AWAITING_MODEL ... -> DONE | EXHAUSTED
//! ```
//!
//! Parser failures, unknown tools and missing parameters end the run. Tool
//! backend failures follow [`ToolFailurePolicy`].

use crate::config::{ReactConfig, ToolFailurePolicy};
use crate::conversation::Conversation;
use crate::events::ReactEventHandler;
use crate::parser::{parse_turn, ModelTurn, ToolCall};
use crate::prompt::system_prompt;
use equity_core::{Agent, Error, Result};
use equity_llm::{CompletionRequest, LLMProvider, StopReason};
use equity_tools::ToolRegistry;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Returned when the iteration budget runs out without a final answer
pub const EXHAUSTED_MESSAGE: &str = "Reached max iteration limit.";

const PREVIEW_CHARS: usize = 300;

/// Agent that alternates model reasoning with tool calls
pub struct ReactAgent {
    provider: Arc<dyn LLMProvider>,
    registry: Arc<ToolRegistry>,
    config: ReactConfig,
    system_prompt: String,
    event_handler: Option<Arc<dyn ReactEventHandler>>,
    name: String,
}

impl ReactAgent {
    /// Create a builder
    pub fn builder() -> ReactAgentBuilder {
        ReactAgentBuilder::new()
    }

    /// Get the agent's configuration
    pub fn config(&self) -> &ReactConfig {
        &self.config
    }

    /// The system instruction sent at the start of every run
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Run the loop for one query with a per-call event handler
    pub async fn run_with_handler(
        &self,
        query: &str,
        handler: Option<Arc<dyn ReactEventHandler>>,
    ) -> Result<String> {
        let mut conversation = Conversation::new(self.system_prompt.clone(), query);

        for iteration in 1..=self.config.max_iterations {
            info!(
                iteration = iteration,
                max_iterations = self.config.max_iterations,
                model = %self.config.model,
                "ReAct iteration started"
            );

            let request = CompletionRequest::builder(&self.config.model)
                .messages(conversation.messages().to_vec())
                .max_tokens(self.config.max_tokens)
                .temperature(self.config.temperature)
                .stop_sequences(self.config.stop_sequences.clone())
                .build();

            let response = self.provider.complete(request).await?;
            if response.stop_reason == StopReason::MaxTokens {
                warn!(iteration = iteration, "Model output truncated at max tokens");
            }

            let text = response.message.content;
            debug!(
                iteration = iteration,
                output_tokens = response.usage.output_tokens,
                preview = %preview(&text),
                "Model turn received"
            );
            if let Some(handler) = &handler {
                handler.on_model_turn(iteration, &text).await;
            }

            match parse_turn(&text)? {
                ModelTurn::FinalAnswer(answer) => {
                    info!(
                        iteration = iteration,
                        answer_length = answer.len(),
                        "Final answer produced"
                    );
                    if let Some(handler) = &handler {
                        handler.on_final_answer(&answer).await;
                    }
                    return Ok(answer);
                }
                ModelTurn::ToolCall(call) => {
                    let observation = self.dispatch(call, handler.as_ref()).await?;
                    let observation = self.render_observation(&observation);
                    debug!(preview = %preview(&observation), "Observation appended");
                    conversation.push_turn(text, &observation);
                }
            }
        }

        warn!(
            max_iterations = self.config.max_iterations,
            "Max iterations reached without a final answer"
        );
        if let Some(handler) = &handler {
            handler.on_exhausted(self.config.max_iterations).await;
        }
        Ok(EXHAUSTED_MESSAGE.to_string())
    }

    /// Run one tool call through the registry
    ///
    /// Returns the observation value, or the error if the run must end.
    async fn dispatch(
        &self,
        call: ToolCall,
        handler: Option<&Arc<dyn ReactEventHandler>>,
    ) -> Result<Value> {
        let ToolCall { name, input } = call;
        info!(tool_name = %name, "Dispatching tool");

        if let Some(handler) = handler {
            handler
                .on_tool_start(&name, &Value::Object(input.clone()))
                .await;
        }

        let started = Instant::now();
        let result = self.registry.call(&name, input).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(value) => {
                info!(tool_name = %name, duration_ms = duration_ms, "Tool succeeded");
                if let Some(handler) = handler {
                    handler.on_tool_done(&name, Ok(&value), duration_ms).await;
                }
                Ok(value)
            }
            Err(err) => {
                let message = err.to_string();
                warn!(tool_name = %name, duration_ms = duration_ms, error = %message, "Tool failed");
                if let Some(handler) = handler {
                    handler.on_tool_done(&name, Err(&message), duration_ms).await;
                }

                match self.config.tool_failure {
                    ToolFailurePolicy::Observe if err.is_tool_failure() => {
                        Ok(json!({ "error": message }))
                    }
                    _ => Err(err),
                }
            }
        }
    }

    fn render_observation(&self, value: &Value) -> String {
        let rendered = value.to_string();
        match self.config.observation_char_limit {
            Some(limit) if rendered.chars().count() > limit => {
                let mut truncated: String = rendered.chars().take(limit).collect();
                truncated.push_str("...[truncated]");
                truncated
            }
            _ => rendered,
        }
    }
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

#[async_trait]
impl Agent for ReactAgent {
    async fn run(&self, input: &str) -> Result<String> {
        self.run_with_handler(input, self.event_handler.clone()).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for ReactAgent
pub struct ReactAgentBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    registry: Arc<ToolRegistry>,
    config: ReactConfig,
    system_prompt: Option<String>,
    event_handler: Option<Arc<dyn ReactEventHandler>>,
    name: String,
}

impl ReactAgentBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            provider: None,
            registry: Arc::new(ToolRegistry::new()),
            config: ReactConfig::default(),
            system_prompt: None,
            event_handler: None,
            name: "ReActAgent".to_string(),
        }
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the tool registry
    pub fn tool_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Set the full configuration
    pub fn config(mut self, config: ReactConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set maximum iterations
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    /// Set temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Set max tokens
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    /// Set the tool failure policy
    pub fn tool_failure(mut self, policy: ToolFailurePolicy) -> Self {
        self.config.tool_failure = policy;
        self
    }

    /// Truncate observations to `limit` characters
    pub fn observation_char_limit(mut self, limit: usize) -> Self {
        self.config.observation_char_limit = Some(limit);
        self
    }

    /// Replace the generated system prompt
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set the default event handler
    pub fn event_handler(mut self, handler: Arc<dyn ReactEventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Set the agent name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Build the agent
    pub fn build(self) -> Result<ReactAgent> {
        let provider = self
            .provider
            .ok_or_else(|| Error::InitializationFailed("Provider not set".to_string()))?;

        if self.config.max_iterations == 0 {
            return Err(Error::Configuration(
                "max_iterations must be at least 1".to_string(),
            ));
        }

        let system_prompt = self
            .system_prompt
            .unwrap_or_else(|| system_prompt(&self.registry));

        Ok(ReactAgent {
            provider,
            registry: self.registry,
            config: self.config,
            system_prompt,
            event_handler: self.event_handler,
            name: self.name,
        })
    }
}

impl Default for ReactAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
