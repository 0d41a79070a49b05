//! Action parser: model text to a final answer or a tool call
//!
//! Parsing is a pure function of the text. Failures are returned as
//! [`ParseError`] values so callers branch on them explicitly.

use equity_core::ParseError;
use equity_tools::ToolInput;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Marker that ends the loop
pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";
/// Marker of the line naming the tool
pub const ACTION_MARKER: &str = "Action:";
/// Marker of the line carrying the tool's JSON input
pub const ACTION_INPUT_MARKER: &str = "Action Input:";
/// Prefix of tool results fed back to the model
pub const OBSERVATION_MARKER: &str = "Observation:";
/// Marker of a reasoning line
pub const THOUGHT_MARKER: &str = "Thought:";

const FENCE: &str = "```";

static FENCED_OBJECT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").ok());

static PLACEHOLDER_OBJECT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\{\s*(?:\.\.\.|…)\s*\}").ok());

/// One parsed model turn
#[derive(Debug, Clone, PartialEq)]
pub enum ModelTurn {
    /// The model is done; carries the trimmed answer text
    FinalAnswer(String),
    /// The model wants a tool run
    ToolCall(ToolCall),
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    /// Tool name as written after `Action:`
    pub name: String,
    /// Decoded keyword arguments (may be empty)
    pub input: ToolInput,
}

/// Parse one model turn
///
/// A final-answer marker anywhere in the text wins: the trimmed text after
/// its last occurrence is returned and no action is looked for.
///
/// # Example
///
/// ```
/// use equity_react::{parse_turn, ModelTurn};
///
/// let text = "Thought: need news\nAction: news\nAction Input: {\"query\": \"NVDA\"}";
/// let ModelTurn::ToolCall(call) = parse_turn(text).unwrap() else { panic!() };
/// assert_eq!(call.name, "news");
/// assert_eq!(call.input["query"], "NVDA");
/// ```
pub fn parse_turn(text: &str) -> Result<ModelTurn, ParseError> {
    if let Some(answer) = final_answer(text) {
        return Ok(ModelTurn::FinalAnswer(answer));
    }

    let name = extract_action(text)?;
    let input = extract_action_input(text)?;

    Ok(ModelTurn::ToolCall(ToolCall { name, input }))
}

/// Text after the last final-answer marker, if any
pub fn final_answer(text: &str) -> Option<String> {
    text.rfind(FINAL_ANSWER_MARKER)
        .map(|at| text[at + FINAL_ANSWER_MARKER.len()..].trim().to_string())
}

fn marker_remainder<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.trim_start().strip_prefix(marker)
}

fn extract_action(text: &str) -> Result<String, ParseError> {
    text.lines()
        .find_map(|line| marker_remainder(line, ACTION_MARKER))
        .map(|rest| rest.trim().to_string())
        .ok_or(ParseError::MissingAction)
}

/// Decoded payload of the first `Action Input:` line
///
/// The remainder of that line is decoded on its own first. Only when it
/// fails and is empty, opens a fence it doesn't close, or opens braces it
/// doesn't balance are the following lines appended, until the payload is
/// complete or another grammar line starts.
fn extract_action_input(text: &str) -> Result<ToolInput, ParseError> {
    let mut lines = text.lines();
    let first = lines
        .by_ref()
        .find_map(|line| marker_remainder(line, ACTION_INPUT_MARKER))
        .ok_or(ParseError::MissingActionInput)?;

    let mut payload = first.trim().to_string();
    if !payload.is_empty() {
        match decode_input(&payload) {
            Ok(input) => return Ok(input),
            Err(err) if !is_incomplete(&payload) => return Err(err),
            Err(_) => {}
        }
    }

    for line in lines {
        if !is_incomplete(&payload) || starts_grammar_line(line) {
            break;
        }
        if !payload.is_empty() {
            payload.push('\n');
        }
        payload.push_str(line);
        payload = payload.trim().to_string();
    }

    decode_input(&payload)
}

fn starts_grammar_line(line: &str) -> bool {
    [OBSERVATION_MARKER, THOUGHT_MARKER, ACTION_MARKER]
        .iter()
        .any(|marker| marker_remainder(line, marker).is_some())
}

fn is_incomplete(payload: &str) -> bool {
    if payload.is_empty() {
        return true;
    }
    if payload.starts_with(FENCE) {
        return payload.matches(FENCE).count() < 2;
    }
    brace_depth(payload) > 0
}

/// Net count of open braces, ignoring braces inside double-quoted strings
fn brace_depth(payload: &str) -> i64 {
    let mut depth = 0i64;
    let mut in_string = false;
    let mut escaped = false;

    for c in payload.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
    }
    depth
}

/// Normalize and decode an action payload into a JSON object
///
/// Applied in order: fence extraction, `{ ... }` placeholder collapse,
/// strict decoding, then one retry with single quotes turned into double
/// quotes.
pub fn decode_input(payload: &str) -> Result<ToolInput, ParseError> {
    let mut normalized = payload.trim().to_string();

    if normalized.starts_with(FENCE) {
        if let Some(inner) = FENCED_OBJECT
            .as_ref()
            .and_then(|re| re.captures(&normalized))
            .and_then(|caps| caps.get(1))
        {
            normalized = inner.as_str().to_string();
        }
    }

    if let Some(re) = PLACEHOLDER_OBJECT.as_ref() {
        normalized = re.replace_all(&normalized, "{}").into_owned();
    }

    let value = match serde_json::from_str::<Value>(&normalized) {
        Ok(value) => value,
        Err(strict_err) => serde_json::from_str::<Value>(&normalized.replace('\'', "\""))
            .map_err(|_| ParseError::action_input(&normalized, strict_err.to_string()))?,
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ParseError::action_input(
            &normalized,
            format!("expected a JSON object, got {}", json_kind(&other)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool_call(text: &str) -> ToolCall {
        match parse_turn(text) {
            Ok(ModelTurn::ToolCall(call)) => call,
            other => panic!("expected a tool call, got {other:?}"),
        }
    }

    fn object(value: Value) -> ToolInput {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_final_answer_takes_last_marker() {
        let text = "Thought: done\nFinal Answer: first\nmore\nFinal Answer:   NVDA looks strong.  \n";
        assert_eq!(
            parse_turn(text).unwrap(),
            ModelTurn::FinalAnswer("NVDA looks strong.".to_string())
        );
    }

    #[test]
    fn test_final_answer_wins_over_action() {
        let text = "Action: news\nAction Input: not json at all\nFinal Answer: ok";
        assert_eq!(
            parse_turn(text).unwrap(),
            ModelTurn::FinalAnswer("ok".to_string())
        );
    }

    #[test]
    fn test_final_answer_mid_line() {
        let text = "So the Final Answer: Mixed outlook";
        assert_eq!(final_answer(text).as_deref(), Some("Mixed outlook"));
    }

    #[test]
    fn test_basic_tool_call() {
        let call = tool_call(
            "Thought: I need the latest news\nAction: news\nAction Input: {\"query\": \"NVDA\"}\n",
        );
        assert_eq!(call.name, "news");
        assert_eq!(call.input, object(json!({"query": "NVDA"})));
    }

    #[test]
    fn test_leading_whitespace_on_markers() {
        let call = tool_call("  Action:   finance_data  \n\tAction Input: {\"ticker\": \"AAPL\"}");
        assert_eq!(call.name, "finance_data");
        assert_eq!(call.input["ticker"], "AAPL");
    }

    #[test]
    fn test_fenced_json_payload() {
        let call =
            tool_call("Action: finance_data\nAction Input: ```json {\"ticker\": \"AAPL\"} ```");
        assert_eq!(call.input, object(json!({"ticker": "AAPL"})));

        let call = tool_call("Action: finance_data\nAction Input: ```{\"ticker\": \"AAPL\"}```");
        assert_eq!(call.input, object(json!({"ticker": "AAPL"})));
    }

    #[test]
    fn test_multiline_fenced_payload() {
        let text = "Thought: fetch\nAction: finance_data\nAction Input: ```json\n{\"ticker\": \"AAPL\"}\n```\n";
        let call = tool_call(text);
        assert_eq!(call.input, object(json!({"ticker": "AAPL"})));
    }

    #[test]
    fn test_multiline_object_payload() {
        let text = "Action: financial_ratios\nAction Input: {\n  \"summary\": {\"PERatio\": \"25\"},\n  \"financials\": {}\n}\nObservation: (pending)";
        let call = tool_call(text);
        assert_eq!(call.input["summary"], json!({"PERatio": "25"}));
        assert_eq!(call.input["financials"], json!({}));
    }

    #[test]
    fn test_payload_on_next_line() {
        let call = tool_call("Action: search\nAction Input:\n{\"query\": \"AAPL earnings\"}");
        assert_eq!(call.input["query"], "AAPL earnings");
    }

    #[test]
    fn test_continuation_stops_at_grammar_line() {
        let text = "Action: search\nAction Input: {\"query\": \"AAPL\"\nThought: oops\n}";
        let err = parse_turn(text).unwrap_err();
        assert!(matches!(err, ParseError::ActionInputParse { ref snippet, .. } if snippet == "{\"query\": \"AAPL\""));
    }

    #[test]
    fn test_braces_in_strings_do_not_count() {
        let call = tool_call("Action: search\nAction Input: {\"query\": \"a { b\"}\nignored line");
        assert_eq!(call.input["query"], "a { b");
    }

    #[test]
    fn test_single_line_payload_ignores_following_prose() {
        let text = "Action: search\nAction Input: {'query': 'NVDA {guidance'}\nWaiting for the result.";
        let call = tool_call(text);
        assert_eq!(call.input, object(json!({"query": "NVDA {guidance"})));
    }

    #[test]
    fn test_single_quote_recovery() {
        let call = tool_call("Action: search\nAction Input: {'query': 'AAPL news'}");
        assert_eq!(call.input, object(json!({"query": "AAPL news"})));
    }

    #[test]
    fn test_placeholder_collapse() {
        let call = tool_call("Action: score_company\nAction Input: { ... }");
        assert!(call.input.is_empty());

        let call = tool_call(
            "Action: financial_ratios\nAction Input: {\"summary\": {...}, \"financials\": { … }}",
        );
        assert_eq!(call.input["summary"], json!({}));
        assert_eq!(call.input["financials"], json!({}));
    }

    #[test]
    fn test_empty_object_input() {
        let call = tool_call("Action: score_company\nAction Input: {}");
        assert!(call.input.is_empty());
    }

    #[test]
    fn test_missing_action() {
        let err = parse_turn("Thought: hmm\nAction Input: {}").unwrap_err();
        assert_eq!(err, ParseError::MissingAction);
        assert_eq!(parse_turn("").unwrap_err(), ParseError::MissingAction);
    }

    #[test]
    fn test_missing_action_input() {
        let err = parse_turn("Thought: hmm\nAction: news").unwrap_err();
        assert_eq!(err, ParseError::MissingActionInput);
    }

    #[test]
    fn test_unparseable_input_snippet() {
        let payload = format!("{{ticker: AAPL, note: {}}}", "x".repeat(200));
        let err = parse_turn(&format!("Action: finance_data\nAction Input: {payload}")).unwrap_err();
        let ParseError::ActionInputParse { snippet, reason } = err else {
            panic!("expected ActionInputParse");
        };
        assert_eq!(snippet.chars().count(), 100);
        assert!(payload.starts_with(&snippet));
        assert!(!reason.is_empty());
    }

    #[test]
    fn test_non_object_input_rejected() {
        for payload in ["[1, 2]", "\"AAPL\"", "42", "null"] {
            let err = parse_turn(&format!("Action: search\nAction Input: {payload}")).unwrap_err();
            assert!(
                matches!(err, ParseError::ActionInputParse { ref reason, .. } if reason.starts_with("expected a JSON object")),
                "payload {payload} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_first_action_line_wins() {
        let text = "Action: news\nAction Input: {\"query\": \"NVDA\"}\nAction: search\nAction Input: {\"query\": \"AMD\"}";
        let call = tool_call(text);
        assert_eq!(call.name, "news");
        assert_eq!(call.input["query"], "NVDA");
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let text = "Action: search\nAction Input: {'query': 'x'}";
        assert_eq!(parse_turn(text), parse_turn(text));
    }
}
