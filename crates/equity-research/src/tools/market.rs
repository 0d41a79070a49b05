//! Fundamentals and price history tools

use super::parse_params;
use crate::api::{MarketDataProvider, normalize_ticker};
use crate::cache::{CacheKey, ResponseCache};
use crate::config::HISTORY_RANGES;
use crate::error::ResearchError;
use async_trait::async_trait;
use equity_core::{Error, Result};
use equity_tools::{Tool, ToolInput, schema};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// `finance_data(ticker) -> {summary, financials}`
pub struct FinanceDataTool {
    market: Arc<dyn MarketDataProvider>,
    cache: ResponseCache,
}

#[derive(Debug, Deserialize)]
struct TickerParams {
    ticker: String,
}

impl FinanceDataTool {
    pub fn new(market: Arc<dyn MarketDataProvider>, cache: ResponseCache) -> Self {
        Self { market, cache }
    }
}

#[async_trait]
impl Tool for FinanceDataTool {
    async fn execute(&self, input: ToolInput) -> Result<Value> {
        let params: TickerParams = parse_params(self.name(), input)?;
        let ticker = normalize_ticker(&params.ticker).map_err(|e| e.into_tool_error(self.name()))?;

        self.cache
            .get_or_fetch(CacheKey::new(&ticker, "finance_data", json!({})), || async {
                let (summary, financials) = tokio::try_join!(
                    self.market.summary(&ticker),
                    self.market.financials(&ticker),
                )?;
                Ok::<_, ResearchError>(json!({
                    "summary": summary,
                    "financials": financials,
                }))
            })
            .await
            .map_err(|e| e.into_tool_error(self.name()))
    }

    fn name(&self) -> &str {
        "finance_data"
    }

    fn description(&self) -> &str {
        "Company overview (valuation multiples, margins, sector) plus annual income \
         statement, balance sheet and cash flow reports, most recent first."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({
                "ticker": schema::with_example(
                    schema::string("Stock ticker symbol (e.g., 'AAPL', 'NVDA')"),
                    "AAPL",
                ),
            }),
            vec!["ticker"],
        )
    }
}

/// `price_history(ticker) -> [price record]`
pub struct PriceHistoryTool {
    market: Arc<dyn MarketDataProvider>,
    cache: ResponseCache,
    default_range: String,
}

#[derive(Debug, Deserialize)]
struct PriceHistoryParams {
    ticker: String,
    #[serde(default)]
    range: Option<String>,
}

impl PriceHistoryTool {
    pub fn new(
        market: Arc<dyn MarketDataProvider>,
        cache: ResponseCache,
        default_range: impl Into<String>,
    ) -> Self {
        Self {
            market,
            cache,
            default_range: default_range.into(),
        }
    }
}

#[async_trait]
impl Tool for PriceHistoryTool {
    async fn execute(&self, input: ToolInput) -> Result<Value> {
        let params: PriceHistoryParams = parse_params(self.name(), input)?;
        let ticker = normalize_ticker(&params.ticker).map_err(|e| e.into_tool_error(self.name()))?;
        let range = params.range.unwrap_or_else(|| self.default_range.clone());

        if !HISTORY_RANGES.contains(&range.as_str()) {
            return Err(Error::invalid_parameters(
                self.name(),
                format!("range must be one of {HISTORY_RANGES:?}, got '{range}'"),
            ));
        }

        let key = CacheKey::new(&ticker, "price_history", json!({ "range": &range }));
        self.cache
            .get_or_fetch(key, || async {
                let history = self.market.price_history(&ticker, &range).await?;
                Ok::<_, ResearchError>(serde_json::to_value(history)?)
            })
            .await
            .map_err(|e| e.into_tool_error(self.name()))
    }

    fn name(&self) -> &str {
        "price_history"
    }

    fn description(&self) -> &str {
        "Daily open/high/low/close/volume records for a ticker over a period (default one year)."
    }

    fn input_schema(&self) -> Value {
        let mut range = schema::string("History range");
        range["enum"] = json!(HISTORY_RANGES);

        schema::object(
            json!({
                "ticker": schema::with_example(schema::string("Stock ticker symbol"), "AAPL"),
                "range": range,
            }),
            vec!["ticker"],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::StubMarket;
    use std::time::Duration;

    fn input(value: Value) -> ToolInput {
        match value {
            Value::Object(map) => map,
            _ => panic!("test input must be an object"),
        }
    }

    fn cache() -> ResponseCache {
        ResponseCache::new(Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_finance_data_shape_and_cache() {
        let market = Arc::new(StubMarket::default());
        let tool = FinanceDataTool::new(market.clone(), cache());

        let result = tool.execute(input(json!({"ticker": "nvda"}))).await.unwrap();
        assert_eq!(result["summary"]["Symbol"], "NVDA");
        assert!(result["financials"]["income_statement"].is_array());
        assert_eq!(market.calls(), 2);

        let again = tool.execute(input(json!({"ticker": "NVDA"}))).await.unwrap();
        assert_eq!(again, result);
        assert_eq!(market.calls(), 2);
    }

    #[tokio::test]
    async fn test_finance_data_backend_failure() {
        let tool = FinanceDataTool::new(Arc::new(StubMarket::default()), cache());

        let err = tool.execute(input(json!({"ticker": "FAIL"}))).await.unwrap_err();
        assert!(err.is_tool_failure());
        assert!(err.to_string().contains("Rate limit exceeded"));
    }

    #[tokio::test]
    async fn test_finance_data_rejects_bad_input() {
        let tool = FinanceDataTool::new(Arc::new(StubMarket::default()), cache());

        let err = tool.execute(input(json!({"ticker": 42}))).await.unwrap_err();
        assert!(matches!(err, Error::InvalidParameters { .. }));

        let err = tool.execute(input(json!({"ticker": "$$$"}))).await.unwrap_err();
        assert!(matches!(err, Error::InvalidParameters { .. }));
    }

    #[tokio::test]
    async fn test_price_history_range() {
        let market = Arc::new(StubMarket::default());
        let tool = PriceHistoryTool::new(market.clone(), cache(), "1y");

        let result = tool.execute(input(json!({"ticker": "AAPL"}))).await.unwrap();
        assert_eq!(result[0]["date"], "range-1y");
        assert_eq!(result[0]["volume"], 100);

        let result = tool
            .execute(input(json!({"ticker": "AAPL", "range": "5d"})))
            .await
            .unwrap();
        assert_eq!(result[0]["date"], "range-5d");
        assert_eq!(market.calls(), 2);

        let err = tool
            .execute(input(json!({"ticker": "AAPL", "range": "7w"})))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameters { .. }));
    }

    #[test]
    fn test_metadata() {
        let tool = PriceHistoryTool::new(Arc::new(StubMarket::default()), cache(), "1y");
        assert_eq!(tool.required_params(), vec!["ticker"]);
        assert_eq!(tool.example_input(), "{\"ticker\": \"AAPL\"}");
        assert_eq!(tool.input_schema()["properties"]["range"]["enum"][0], "1d");
    }
}
