//! Tool trait definition

use crate::schema;
use async_trait::async_trait;
use equity_core::Result;
use serde_json::{Map, Value};

/// Keyword arguments of a tool call, decoded from the model's action input
pub type ToolInput = Map<String, Value>;

/// Trait for tools that agents can execute
///
/// Tools are functions that LLM agents can call to interact with the world.
/// Each tool provides a name, a description, and a JSON schema for its input.
/// The output is always plain JSON so it can be embedded back into the
/// conversation as an observation.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with given parameters
    ///
    /// The registry has already checked that every parameter listed in the
    /// schema's `required` array is present and non-null.
    async fn execute(&self, input: ToolInput) -> Result<Value>;

    /// Get the tool's name
    ///
    /// Must be unique within a ToolRegistry
    fn name(&self) -> &str;

    /// Get the tool's description
    fn description(&self) -> &str;

    /// Get the tool's input schema (JSON Schema format)
    ///
    /// # Example
    ///
    /// ```
    /// use equity_tools::schema;
    /// use serde_json::json;
    ///
    /// let schema = schema::object(
    ///     json!({ "ticker": schema::string("Stock ticker symbol") }),
    ///     vec!["ticker"],
    /// );
    /// assert_eq!(schema["required"][0], "ticker");
    /// ```
    fn input_schema(&self) -> Value;

    /// Names of the parameters that must be present and non-null
    fn required_params(&self) -> Vec<String> {
        schema::required(&self.input_schema())
    }

    /// Example input shown to the model in the tool catalogue
    ///
    /// Defaults to a sketch derived from the schema, with `{...}` and `[...]`
    /// standing in for nested objects and arrays.
    fn example_input(&self) -> String {
        schema::example(&self.input_schema())
    }
}
