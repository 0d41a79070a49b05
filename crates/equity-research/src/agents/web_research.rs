//! News plus web search for a query, optionally with article text

use crate::api::{NewsItem, PageFetcher, SearchProvider, SearchResult};
use crate::config::ResearchConfig;
use crate::error::{Result, ResearchError};
use crate::tools::ResearchBackends;
use async_trait::async_trait;
use equity_core::Agent;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Output of [`WebResearchAgent::run`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchDigest {
    pub news: Vec<NewsItem>,
    pub web: Vec<SearchResult>,
}

/// Runs news and web search side by side
pub struct WebResearchAgent {
    search: Arc<dyn SearchProvider>,
    pages: Arc<dyn PageFetcher>,
    max_results: usize,
    fetch_content: bool,
}

impl WebResearchAgent {
    pub fn new(backends: &ResearchBackends, config: &ResearchConfig) -> Self {
        Self {
            search: backends.search.clone(),
            pages: backends.pages.clone(),
            max_results: config.max_results,
            fetch_content: false,
        }
    }

    /// Build over live backends
    pub fn from_config(config: &ResearchConfig) -> Result<Self> {
        Ok(Self::new(&ResearchBackends::from_config(config)?, config))
    }

    /// Whether the [`Agent`] entry point fetches article text
    pub fn with_fetch_content(mut self, fetch_content: bool) -> Self {
        self.fetch_content = fetch_content;
        self
    }

    /// News and web results for `query`
    ///
    /// With `fetch_content`, each news item that has a URL gets the page
    /// text in `content`; fetch failures leave the error text there.
    pub async fn run(&self, query: &str, fetch_content: bool) -> Result<ResearchDigest> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ResearchError::SearchError("query must not be empty".to_string()));
        }
        info!(query, fetch_content, "Running web research");

        let (mut news, web) = tokio::try_join!(
            self.search.news(query, self.max_results),
            self.search.search(query, self.max_results),
        )?;

        if fetch_content {
            for item in news.iter_mut().filter(|item| !item.url.is_empty()) {
                debug!(url = %item.url, "Fetching article text");
                item.content = Some(self.pages.fetch_text(&item.url).await);
            }
        }

        Ok(ResearchDigest { news, web })
    }
}

#[async_trait]
impl Agent for WebResearchAgent {
    async fn run(&self, input: &str) -> equity_core::Result<String> {
        let digest = WebResearchAgent::run(self, input, self.fetch_content).await?;
        serde_json::to_string_pretty(&digest).map_err(|e| equity_core::Error::Generic(e.to_string()))
    }

    fn name(&self) -> &str {
        "WebResearchAgent"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheManager;
    use crate::tools::testing::{StubMarket, StubPages, StubSearch};
    use serde_json::Value;
    use std::time::Duration;

    fn agent(search: Arc<StubSearch>) -> WebResearchAgent {
        let backends = ResearchBackends {
            market: Arc::new(StubMarket::default()),
            search,
            pages: Arc::new(StubPages),
            cache: CacheManager::new(Duration::from_secs(60), Duration::from_secs(60)),
        };
        WebResearchAgent::new(&backends, &ResearchConfig::default())
    }

    #[tokio::test]
    async fn test_digest_without_content() {
        let search = Arc::new(StubSearch::default());
        let digest = agent(search.clone()).run("NVDA", false).await.unwrap();

        assert_eq!(digest.news.len(), 5);
        assert_eq!(digest.web.len(), 5);
        assert!(digest.news.iter().all(|item| item.content.is_none()));
        assert_eq!(search.calls(), 2);
    }

    #[tokio::test]
    async fn test_digest_with_content() {
        let digest = agent(Arc::new(StubSearch::default()))
            .run("NVDA", true)
            .await
            .unwrap();

        assert_eq!(
            digest.news[0].content.as_deref(),
            Some("text of https://example.com/news/0")
        );

        let json = serde_json::to_value(&digest).unwrap();
        assert!(json["news"][0]["content"].is_string());
        assert!(json["web"][0].get("content").is_none());
    }

    #[tokio::test]
    async fn test_agent_entry_point() {
        let agent = agent(Arc::new(StubSearch::default())).with_fetch_content(true);
        let text = Agent::run(&agent, "NVDA").await.unwrap();
        let json: Value = serde_json::from_str(&text).unwrap();
        assert!(json["news"][0]["content"].is_string());

        assert!(Agent::run(&agent, "   ").await.is_err());
    }
}
