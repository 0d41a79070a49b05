//! Web search, news and page text tools

use super::parse_params;
use crate::api::{PageFetcher, SearchProvider};
use crate::cache::{CacheKey, ResponseCache};
use crate::error::ResearchError;
use async_trait::async_trait;
use equity_core::{Error, Result};
use equity_tools::{Tool, ToolInput, schema};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Upper bound on `max_results` a caller may ask for
const MAX_RESULTS_CAP: usize = 25;

#[derive(Debug, Deserialize)]
struct QueryParams {
    query: String,
    #[serde(default)]
    max_results: Option<usize>,
}

impl QueryParams {
    fn validate(&self, tool: &str, default_max: usize) -> Result<usize> {
        if self.query.trim().is_empty() {
            return Err(Error::invalid_parameters(tool, "query must not be empty"));
        }
        Ok(self
            .max_results
            .unwrap_or(default_max)
            .clamp(1, MAX_RESULTS_CAP))
    }
}

fn query_schema() -> Value {
    schema::object(
        json!({
            "query": schema::with_example(schema::string("Search query"), "company news"),
            "max_results": schema::number("Number of results (default 5)"),
        }),
        vec!["query"],
    )
}

/// `search(query) -> [{title, snippet, url}]`
pub struct SearchTool {
    provider: Arc<dyn SearchProvider>,
    cache: ResponseCache,
    max_results: usize,
}

impl SearchTool {
    pub fn new(provider: Arc<dyn SearchProvider>, cache: ResponseCache, max_results: usize) -> Self {
        Self {
            provider,
            cache,
            max_results,
        }
    }
}

#[async_trait]
impl Tool for SearchTool {
    async fn execute(&self, input: ToolInput) -> Result<Value> {
        let params: QueryParams = parse_params(self.name(), input)?;
        let max_results = params.validate(self.name(), self.max_results)?;
        let query = params.query.trim();

        let key = CacheKey::new(query, "search", json!({ "max_results": max_results }));
        self.cache
            .get_or_fetch(key, || async {
                let results = self.provider.search(query, max_results).await?;
                Ok::<_, ResearchError>(serde_json::to_value(results)?)
            })
            .await
            .map_err(|e| e.into_tool_error(self.name()))
    }

    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "General web search. Returns title, snippet and url for each hit."
    }

    fn input_schema(&self) -> Value {
        query_schema()
    }
}

/// `news(query) -> [{title, snippet, url, date}]`
pub struct NewsTool {
    provider: Arc<dyn SearchProvider>,
    cache: ResponseCache,
    max_results: usize,
}

impl NewsTool {
    pub fn new(provider: Arc<dyn SearchProvider>, cache: ResponseCache, max_results: usize) -> Self {
        Self {
            provider,
            cache,
            max_results,
        }
    }
}

#[async_trait]
impl Tool for NewsTool {
    async fn execute(&self, input: ToolInput) -> Result<Value> {
        let params: QueryParams = parse_params(self.name(), input)?;
        let max_results = params.validate(self.name(), self.max_results)?;
        let query = params.query.trim();

        let key = CacheKey::new(query, "news", json!({ "max_results": max_results }));
        self.cache
            .get_or_fetch(key, || async {
                let items = self.provider.news(query, max_results).await?;
                Ok::<_, ResearchError>(serde_json::to_value(items)?)
            })
            .await
            .map_err(|e| e.into_tool_error(self.name()))
    }

    fn name(&self) -> &str {
        "news"
    }

    fn description(&self) -> &str {
        "Recent news articles for a query. Returns title, snippet, url and date for each article."
    }

    fn input_schema(&self) -> Value {
        query_schema()
    }
}

/// `fetch_page(url) -> text`
pub struct FetchPageTool {
    fetcher: Arc<dyn PageFetcher>,
}

#[derive(Debug, Deserialize)]
struct UrlParams {
    url: String,
}

impl FetchPageTool {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl Tool for FetchPageTool {
    async fn execute(&self, input: ToolInput) -> Result<Value> {
        let params: UrlParams = parse_params(self.name(), input)?;
        Ok(Value::String(self.fetcher.fetch_text(params.url.trim()).await))
    }

    fn name(&self) -> &str {
        "fetch_page"
    }

    fn description(&self) -> &str {
        "Readable text of a web page, truncated. Fetch errors are returned as text."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({
                "url": schema::with_example(
                    schema::string("Absolute http(s) URL"),
                    "https://example.com/article",
                ),
            }),
            vec!["url"],
        )
    }
}
