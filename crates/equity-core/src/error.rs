//! Error types for equity-core
//!
//! Parser and dispatch failures end the run. Failures inside a tool's own
//! backend are reported as `ToolFailed` and the reasoning loop decides
//! whether they become an observation or abort the run.

use thiserror::Error;

/// Maximum number of characters of an unparseable payload kept for diagnostics
pub const PAYLOAD_SNIPPET_CHARS: usize = 100;

/// Result type alias for equity-core
pub type Result<T> = std::result::Result<T, Error>;

/// Failure to turn model output into a tool call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No line starting with `Action:` was found
    #[error("No Action found in model output")]
    MissingAction,

    /// No line starting with `Action Input:` was found
    #[error("No Action Input found in model output")]
    MissingActionInput,

    /// The action input could not be decoded as a JSON object
    #[error("Failed to parse Action Input as JSON ({reason}): {snippet}...")]
    ActionInputParse {
        /// The first characters of the offending payload
        snippet: String,
        /// Decoder error message
        reason: String,
    },
}

impl ParseError {
    /// Build an `ActionInputParse` error, keeping only the head of the payload
    pub fn action_input(payload: &str, reason: impl Into<String>) -> Self {
        Self::ActionInputParse {
            snippet: payload.chars().take(PAYLOAD_SNIPPET_CHARS).collect(),
            reason: reason.into(),
        }
    }
}

/// Error type for agent operations
#[derive(Error, Debug)]
pub enum Error {
    /// The model's text did not follow the action grammar
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The model named a tool that is not registered
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A required tool parameter was absent or null
    #[error("Tool '{tool}' is missing required parameter '{parameter}'")]
    MissingParameter {
        /// Tool name
        tool: String,
        /// Name of the missing parameter
        parameter: String,
    },

    /// Tool parameters were present but had the wrong shape
    #[error("Invalid parameters for tool '{tool}': {reason}")]
    InvalidParameters {
        /// Tool name
        tool: String,
        /// What was wrong
        reason: String,
    },

    /// The tool's backend failed while executing
    #[error("Tool '{tool}' failed: {reason}")]
    ToolFailed {
        /// Tool name
        tool: String,
        /// Failure description
        reason: String,
    },

    /// The language model provider failed
    #[error("Model provider error: {0}")]
    Provider(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Agent initialization failed
    #[error("Agent initialization failed: {0}")]
    InitializationFailed(String),

    /// Generic error message
    #[error("{0}")]
    Generic(String),
}

impl Error {
    /// Wrap a backend failure of the named tool
    pub fn tool_failed(tool: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            reason: reason.to_string(),
        }
    }

    /// Wrap a parameter decoding failure of the named tool
    pub fn invalid_parameters(tool: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::InvalidParameters {
            tool: tool.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error came from inside a tool, either its backend or its
    /// own parameter decoding, rather than from the model violating the
    /// action or dispatch contract
    pub fn is_tool_failure(&self) -> bool {
        matches!(self, Self::ToolFailed { .. } | Self::InvalidParameters { .. })
    }
}
