//! Research tools exposed to the reasoning loop

pub mod analysis;
pub mod market;
pub mod web;

pub use analysis::{FinancialRatiosTool, NewsSentimentTool, ScoreCompanyTool};
pub use market::{FinanceDataTool, PriceHistoryTool};
pub use web::{FetchPageTool, NewsTool, SearchTool};

use crate::api::{
    DuckDuckGoClient, HttpPageFetcher, MarketDataClient, MarketDataProvider, PageFetcher,
    SearchProvider,
};
use crate::cache::CacheManager;
use crate::config::ResearchConfig;
use crate::error::Result;
use equity_tools::{ToolInput, ToolRegistry};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Backends shared by the tools and the direct pipelines
#[derive(Clone)]
pub struct ResearchBackends {
    pub market: Arc<dyn MarketDataProvider>,
    pub search: Arc<dyn SearchProvider>,
    pub pages: Arc<dyn PageFetcher>,
    pub cache: CacheManager,
}

impl ResearchBackends {
    /// Network-backed clients built from configuration
    pub fn from_config(config: &ResearchConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            market: Arc::new(MarketDataClient::new(config)?),
            search: Arc::new(DuckDuckGoClient::new(config.request_timeout)?),
            pages: Arc::new(HttpPageFetcher::new(
                config.page_fetch_timeout,
                config.page_text_limit,
            )?),
            cache: CacheManager::new(config.cache_ttl_market, config.cache_ttl_news),
        })
    }
}

/// Registry holding every research tool, backed by live services
pub fn default_registry(config: &ResearchConfig) -> Result<ToolRegistry> {
    let backends = ResearchBackends::from_config(config)?;
    Ok(registry_with(&backends, config))
}

/// Registry holding every research tool over the given backends
pub fn registry_with(backends: &ResearchBackends, config: &ResearchConfig) -> ToolRegistry {
    let market_cache = backends.cache.market.clone();
    let news_cache = backends.cache.news.clone();

    ToolRegistry::new()
        .with(Arc::new(FinanceDataTool::new(backends.market.clone(), market_cache.clone())))
        .with(Arc::new(PriceHistoryTool::new(
            backends.market.clone(),
            market_cache,
            config.history_range.clone(),
        )))
        .with(Arc::new(SearchTool::new(
            backends.search.clone(),
            news_cache.clone(),
            config.max_results,
        )))
        .with(Arc::new(NewsTool::new(
            backends.search.clone(),
            news_cache,
            config.max_results,
        )))
        .with(Arc::new(FinancialRatiosTool))
        .with(Arc::new(ScoreCompanyTool))
        .with(Arc::new(NewsSentimentTool))
        .with(Arc::new(FetchPageTool::new(backends.pages.clone())))
}

/// Decode a tool's keyword arguments into its parameter struct
pub(crate) fn parse_params<T: DeserializeOwned>(
    tool: &str,
    input: ToolInput,
) -> equity_core::Result<T> {
    serde_json::from_value(Value::Object(input))
        .map_err(|e| equity_core::Error::invalid_parameters(tool, e))
}
