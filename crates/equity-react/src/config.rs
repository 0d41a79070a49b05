//! Reasoning loop configuration

/// Default chat model
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// What the loop does when a tool's backend fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolFailurePolicy {
    /// Feed `{"error": "..."}` back to the model as the observation
    #[default]
    Observe,
    /// End the run with the tool's error
    Abort,
}

/// Configuration for a [`ReactAgent`](crate::ReactAgent)
#[derive(Debug, Clone)]
pub struct ReactConfig {
    /// Model to use
    pub model: String,

    /// Maximum number of model turns before giving up
    pub max_iterations: usize,

    /// Sampling temperature
    pub temperature: f32,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Stop sequences passed to the provider (none by default)
    pub stop_sequences: Vec<String>,

    /// Handling of tool backend failures
    pub tool_failure: ToolFailurePolicy,

    /// Truncate observations to this many characters (None = unbounded)
    pub observation_char_limit: Option<usize>,
}

impl Default for ReactConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_iterations: 5,
            temperature: 0.2,
            max_tokens: 1024,
            stop_sequences: Vec::new(),
            tool_failure: ToolFailurePolicy::default(),
            observation_char_limit: None,
        }
    }
}
