//! Append-only conversation log for one run

use crate::parser::OBSERVATION_MARKER;
use equity_llm::{Message, Role};

/// Ordered message log owned by a single run
///
/// The layout is fixed: one system message, the user query, then
/// `(assistant, user)` pairs where the user side carries the observation of
/// the tool the assistant asked for. Only [`Conversation::push_turn`] can
/// grow it, so the alternation always holds.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Seed a conversation with the system instruction and the user query
    pub fn new(system_prompt: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt), Message::user(query)],
        }
    }

    /// Record a tool-calling model turn and the observation it produced
    pub fn push_turn(&mut self, model_output: impl Into<String>, observation: &str) {
        self.messages.push(Message::assistant(model_output));
        self.messages
            .push(Message::user(format!("{OBSERVATION_MARKER} {observation}")));
    }

    /// All messages in order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of completed tool turns
    pub fn turns(&self) -> usize {
        (self.messages.len() - 2) / 2
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false: a conversation starts with two messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether the role sequence is system, user, then assistant/user pairs
    pub fn is_well_formed(&self) -> bool {
        self.messages.iter().enumerate().all(|(i, m)| {
            let expected = match i {
                0 => Role::System,
                1 => Role::User,
                i if i % 2 == 0 => Role::Assistant,
                _ => Role::User,
            };
            m.role == expected
        })
    }

    /// Consume the log
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}
