//! Configuration for research tools

use crate::error::{Result, ResearchError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// History ranges understood by the price backend
pub const HISTORY_RANGES: &[&str] = &[
    "1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max",
];

/// Configuration for research tools and pipelines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Alpha Vantage API key (required for fundamentals)
    pub alpha_vantage_api_key: Option<String>,

    /// Alpha Vantage requests per minute
    pub alpha_vantage_rate_limit: u32,

    /// Results per search or news query
    pub max_results: usize,

    /// Range of daily price history
    pub history_range: String,

    /// Timeout for API requests
    pub request_timeout: Duration,

    /// Timeout for fetching a web page
    pub page_fetch_timeout: Duration,

    /// Maximum characters of page text returned
    pub page_text_limit: usize,

    /// Cache TTL for market data (fundamentals, prices)
    pub cache_ttl_market: Duration,

    /// Cache TTL for search and news results
    pub cache_ttl_news: Duration,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            alpha_vantage_api_key: None,
            alpha_vantage_rate_limit: 5,
            max_results: 5,
            history_range: "1y".to_string(),
            request_timeout: Duration::from_secs(30),
            page_fetch_timeout: Duration::from_secs(8),
            page_text_limit: 20_000,
            cache_ttl_market: Duration::from_secs(3600),
            cache_ttl_news: Duration::from_secs(300),
        }
    }
}

impl ResearchConfig {
    /// Create a new configuration builder
    pub fn builder() -> ResearchConfigBuilder {
        ResearchConfigBuilder::default()
    }

    /// Defaults plus the Alpha Vantage key from the environment
    pub fn from_env() -> Self {
        Self::default().with_env_api_key()
    }

    /// Load Alpha Vantage API key from environment
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var("ALPHA_VANTAGE_API_KEY") {
            if !key.is_empty() {
                self.alpha_vantage_api_key = Some(key);
            }
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.alpha_vantage_rate_limit == 0 {
            return Err(ResearchError::ConfigError(
                "alpha_vantage_rate_limit must be greater than 0".to_string(),
            ));
        }

        if self.max_results == 0 {
            return Err(ResearchError::ConfigError(
                "max_results must be greater than 0".to_string(),
            ));
        }

        if !HISTORY_RANGES.contains(&self.history_range.as_str()) {
            return Err(ResearchError::ConfigError(format!(
                "history_range '{}' is not one of {HISTORY_RANGES:?}",
                self.history_range
            )));
        }

        if self.page_text_limit == 0 {
            return Err(ResearchError::ConfigError(
                "page_text_limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for ResearchConfig
#[derive(Debug, Default)]
pub struct ResearchConfigBuilder {
    alpha_vantage_api_key: Option<String>,
    alpha_vantage_rate_limit: Option<u32>,
    max_results: Option<usize>,
    history_range: Option<String>,
    request_timeout: Option<Duration>,
    page_fetch_timeout: Option<Duration>,
    page_text_limit: Option<usize>,
    cache_ttl_market: Option<Duration>,
    cache_ttl_news: Option<Duration>,
}

impl ResearchConfigBuilder {
    /// Set Alpha Vantage API key
    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    /// Set Alpha Vantage requests per minute
    pub fn alpha_vantage_rate_limit(mut self, per_minute: u32) -> Self {
        self.alpha_vantage_rate_limit = Some(per_minute);
        self
    }

    /// Set results per query
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = Some(max);
        self
    }

    /// Set price history range
    pub fn history_range(mut self, range: impl Into<String>) -> Self {
        self.history_range = Some(range.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set page fetch timeout
    pub fn page_fetch_timeout(mut self, duration: Duration) -> Self {
        self.page_fetch_timeout = Some(duration);
        self
    }

    /// Set maximum page text length
    pub fn page_text_limit(mut self, chars: usize) -> Self {
        self.page_text_limit = Some(chars);
        self
    }

    /// Set cache TTL for market data
    pub fn cache_ttl_market(mut self, duration: Duration) -> Self {
        self.cache_ttl_market = Some(duration);
        self
    }

    /// Set cache TTL for search and news
    pub fn cache_ttl_news(mut self, duration: Duration) -> Self {
        self.cache_ttl_news = Some(duration);
        self
    }

    /// Load Alpha Vantage API key from environment
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var("ALPHA_VANTAGE_API_KEY") {
            if !key.is_empty() {
                self.alpha_vantage_api_key = Some(key);
            }
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ResearchConfig> {
        let defaults = ResearchConfig::default();

        let config = ResearchConfig {
            alpha_vantage_api_key: self.alpha_vantage_api_key,
            alpha_vantage_rate_limit: self
                .alpha_vantage_rate_limit
                .unwrap_or(defaults.alpha_vantage_rate_limit),
            max_results: self.max_results.unwrap_or(defaults.max_results),
            history_range: self.history_range.unwrap_or(defaults.history_range),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            page_fetch_timeout: self.page_fetch_timeout.unwrap_or(defaults.page_fetch_timeout),
            page_text_limit: self.page_text_limit.unwrap_or(defaults.page_text_limit),
            cache_ttl_market: self.cache_ttl_market.unwrap_or(defaults.cache_ttl_market),
            cache_ttl_news: self.cache_ttl_news.unwrap_or(defaults.cache_ttl_news),
        };

        config.validate()?;
        Ok(config)
    }
}
