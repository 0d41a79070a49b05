//! Market data facade: fundamentals from Alpha Vantage, prices from Yahoo

use super::alpha_vantage::AlphaVantageClient;
use super::yahoo::{PriceRecord, YahooFinanceClient};
use crate::config::ResearchConfig;
use crate::error::{Result, ResearchError};
use async_trait::async_trait;
use serde_json::Value;

/// Backend for `finance_data`, `price_history` and the direct pipelines
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Company overview: valuation multiples, margins, sector, ...
    async fn summary(&self, ticker: &str) -> Result<Value>;

    /// `{income_statement, balance_sheet, cashflow}`, annual reports most recent first
    async fn financials(&self, ticker: &str) -> Result<Value>;

    /// Daily bars over a named range such as "1y"
    async fn price_history(&self, ticker: &str, range: &str) -> Result<Vec<PriceRecord>>;
}

/// Default market data backend
#[derive(Debug, Clone)]
pub struct MarketDataClient {
    alpha_vantage: Option<AlphaVantageClient>,
    yahoo: YahooFinanceClient,
}

impl MarketDataClient {
    /// Build from configuration
    ///
    /// Without an Alpha Vantage key price history still works; fundamentals
    /// requests fail with a configuration error.
    pub fn new(config: &ResearchConfig) -> Result<Self> {
        let alpha_vantage = config
            .alpha_vantage_api_key
            .as_deref()
            .map(|key| {
                AlphaVantageClient::new(
                    key,
                    config.alpha_vantage_rate_limit,
                    config.request_timeout,
                )
            })
            .transpose()?;

        Ok(Self {
            alpha_vantage,
            yahoo: YahooFinanceClient::new(),
        })
    }

    /// Whether fundamentals are available
    pub fn has_fundamentals(&self) -> bool {
        self.alpha_vantage.is_some()
    }

    fn alpha_vantage(&self) -> Result<&AlphaVantageClient> {
        self.alpha_vantage.as_ref().ok_or_else(|| {
            ResearchError::ConfigError(
                "ALPHA_VANTAGE_API_KEY is required for company fundamentals".to_string(),
            )
        })
    }
}

#[async_trait]
impl MarketDataProvider for MarketDataClient {
    async fn summary(&self, ticker: &str) -> Result<Value> {
        let ticker = normalize_ticker(ticker)?;
        let overview = self.alpha_vantage()?.overview(&ticker).await?;
        Ok(Value::Object(overview))
    }

    async fn financials(&self, ticker: &str) -> Result<Value> {
        let ticker = normalize_ticker(ticker)?;
        self.alpha_vantage()?.financials(&ticker).await
    }

    async fn price_history(&self, ticker: &str, range: &str) -> Result<Vec<PriceRecord>> {
        let ticker = normalize_ticker(ticker)?;
        let history = self.yahoo.history_range(&ticker, range).await?;

        if history.is_empty() {
            return Err(ResearchError::DataUnavailable {
                ticker,
                reason: format!("no price history for range {range}"),
            });
        }
        Ok(history)
    }
}

/// Trim and upper-case a ticker, rejecting anything that cannot be a symbol
pub fn normalize_ticker(ticker: &str) -> Result<String> {
    let ticker = ticker.trim();
    let valid = !ticker.is_empty()
        && ticker.len() <= 12
        && ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));

    if !valid {
        return Err(ResearchError::InvalidTicker(ticker.to_string()));
    }
    Ok(ticker.to_ascii_uppercase())
}
