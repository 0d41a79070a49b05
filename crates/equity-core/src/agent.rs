//! Core Agent trait definition

use crate::Result;
use async_trait::async_trait;

/// Core trait that all agents must implement
///
/// An agent takes one natural-language input and produces one text output.
/// Each call to [`Agent::run`] is independent: no conversation state is
/// carried from one call to the next.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Process a query and return the agent's answer
    async fn run(&self, input: &str) -> Result<String>;

    /// Get the agent's name
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl Agent for Echo {
        async fn run(&self, input: &str) -> Result<String> {
            Ok(input.to_uppercase())
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    #[tokio::test]
    async fn test_agent_as_trait_object() {
        let agent: Box<dyn Agent> = Box::new(Echo);
        assert_eq!(agent.name(), "echo");
        assert_eq!(agent.run("nvda").await.unwrap(), "NVDA");
    }
}
