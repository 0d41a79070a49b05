//! Tool registry: the single dispatch point for tool calls

use crate::{Tool, ToolInput};
use equity_core::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Registry for managing tools
///
/// Tools are registered while the registry is being built. Agents hold it
/// behind an `Arc`, so the set of tools cannot change during a run and one
/// registry can be shared by concurrent runs.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    ///
    /// A tool with the same name replaces the earlier one and keeps its
    /// position in the catalogue.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        match self.index.get(&name) {
            Some(&slot) => self.tools[slot] = tool,
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Builder-style registration
    pub fn with(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&slot| Arc::clone(&self.tools[slot]))
    }

    /// Whether a tool with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// List all registered tools in registration order
    pub fn list_tools(&self) -> Vec<Arc<dyn Tool>> {
        self.tools.clone()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch a call to the named tool
    ///
    /// Fails with `UnknownTool` if nothing is registered under `name`, and
    /// with `MissingParameter` if a required key is absent or null. In both
    /// cases the tool is never invoked.
    pub async fn call(&self, name: &str, input: ToolInput) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| Error::UnknownTool(name.to_string()))?;

        for parameter in tool.required_params() {
            if input.get(&parameter).is_none_or(Value::is_null) {
                return Err(Error::MissingParameter {
                    tool: name.to_string(),
                    parameter,
                });
            }
        }

        debug!(tool = name, "Dispatching tool call");
        tool.execute(input).await
    }

    /// Numbered `name: {example}` list of every tool, for the system prompt
    pub fn catalogue(&self) -> String {
        self.tools
            .iter()
            .enumerate()
            .map(|(i, tool)| format!("{}. {}: {}", i + 1, tool.name(), tool.example_input()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
