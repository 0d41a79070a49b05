//! Helpers to build and read JSON schemas for tools

use serde_json::{json, Value};

/// Create a JSON schema for an object with properties
///
/// # Example
///
/// ```
/// use equity_tools::schema;
/// use serde_json::json;
///
/// let schema = schema::object(
///     json!({
///         "query": schema::string("Search query"),
///     }),
///     vec!["query"],
/// );
/// ```
pub fn object(properties: Value, required: Vec<&str>) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// String property schema
pub fn string(description: &str) -> Value {
    json!({
        "type": "string",
        "description": description,
    })
}

/// Number property schema
pub fn number(description: &str) -> Value {
    json!({
        "type": "number",
        "description": description,
    })
}

/// Boolean property schema
pub fn boolean(description: &str) -> Value {
    json!({
        "type": "boolean",
        "description": description,
    })
}

/// Free-form object property schema
pub fn any_object(description: &str) -> Value {
    json!({
        "type": "object",
        "description": description,
    })
}

/// Array property schema
pub fn array(description: &str, items: Value) -> Value {
    json!({
        "type": "array",
        "description": description,
        "items": items,
    })
}

/// Names listed in a schema's `required` array
pub fn required(schema: &Value) -> Vec<String> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Render a one-line example input for a schema
///
/// Only required properties are shown. Strings use their `example` keyword
/// when present, otherwise the property name.
pub fn example(schema: &Value) -> String {
    let properties = schema.get("properties").and_then(Value::as_object);
    let fields: Vec<String> = required(schema)
        .into_iter()
        .map(|name| {
            let property = properties.and_then(|p| p.get(&name));
            let sketch = match property.and_then(|p| p.get("type")).and_then(Value::as_str) {
                Some("object") => "{...}".to_string(),
                Some("array") => "[...]".to_string(),
                Some("number" | "integer") => "0".to_string(),
                Some("boolean") => "false".to_string(),
                _ => {
                    let sample = property
                        .and_then(|p| p.get("example"))
                        .and_then(Value::as_str)
                        .unwrap_or(&name);
                    Value::String(sample.to_string()).to_string()
                }
            };
            format!("{}: {sketch}", Value::String(name.clone()))
        })
        .collect();

    format!("{{{}}}", fields.join(", "))
}

/// Attach an `example` value to a property schema
pub fn with_example(mut property: Value, example: &str) -> Value {
    if let Some(map) = property.as_object_mut() {
        map.insert("example".to_string(), Value::String(example.to_string()));
    }
    property
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_builders() {
        assert_eq!(string("test")["type"], "string");
        assert_eq!(number("count")["type"], "number");
        assert_eq!(boolean("flag")["type"], "boolean");
        assert_eq!(any_object("blob")["type"], "object");
        assert_eq!(array("items", any_object("item"))["items"]["type"], "object");
    }

    #[test]
    fn test_required_names() {
        let schema = object(
            json!({ "summary": any_object("s"), "financials": any_object("f") }),
            vec!["summary", "financials"],
        );
        assert_eq!(required(&schema), vec!["summary", "financials"]);
        assert!(required(&json!({"type": "object"})).is_empty());
    }

    #[test]
    fn test_example_rendering() {
        let schema = object(
            json!({ "ticker": with_example(string("Ticker"), "AAPL") }),
            vec!["ticker"],
        );
        assert_eq!(example(&schema), r#"{"ticker": "AAPL"}"#);

        let schema = object(
            json!({
                "summary": any_object("s"),
                "financials": any_object("f"),
                "verbose": boolean("optional flag"),
            }),
            vec!["summary", "financials"],
        );
        assert_eq!(example(&schema), r#"{"summary": {...}, "financials": {...}}"#);

        let schema = object(
            json!({ "news_items": array("items", any_object("item")) }),
            vec!["news_items"],
        );
        assert_eq!(example(&schema), r#"{"news_items": [...]}"#);
    }

    #[test]
    fn test_example_falls_back_to_property_name() {
        let schema = object(json!({ "query": string("q") }), vec!["query"]);
        assert_eq!(example(&schema), r#"{"query": "query"}"#);
    }
}
