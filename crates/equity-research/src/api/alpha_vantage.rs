//! Alpha Vantage API client for company fundamentals

use crate::error::{Result, ResearchError};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde_json::{json, Map, Value};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Annual reports kept per statement, most recent first
pub const MAX_ANNUAL_REPORTS: usize = 4;

const FREE_TIER_PER_MINUTE: NonZeroU32 = match NonZeroU32::new(5) {
    Some(limit) => limit,
    None => NonZeroU32::MIN,
};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl AlphaVantageClient {
    /// Create a new Alpha Vantage client
    ///
    /// # Arguments
    /// * `api_key` - Alpha Vantage API key
    /// * `rate_limit` - Maximum requests per minute (5 on the free tier)
    /// * `timeout` - Per-request timeout
    pub fn new(api_key: impl Into<String>, rate_limit: u32, timeout: Duration) -> Result<Self> {
        let quota = Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(FREE_TIER_PER_MINUTE));
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    /// Company overview (`OVERVIEW`): valuation multiples, margins, sector, ...
    pub async fn overview(&self, symbol: &str) -> Result<Map<String, Value>> {
        match self.query("OVERVIEW", symbol).await? {
            Value::Object(map) => Ok(map),
            _ => Err(ResearchError::AlphaVantageError(
                "OVERVIEW did not return an object".to_string(),
            )),
        }
    }

    /// Most recent annual reports of one statement
    ///
    /// `function` is one of `INCOME_STATEMENT`, `BALANCE_SHEET`, `CASH_FLOW`.
    pub async fn annual_reports(&self, function: &str, symbol: &str) -> Result<Vec<Value>> {
        let data = self.query(function, symbol).await?;
        Ok(annual_reports(&data))
    }

    /// `{income_statement, balance_sheet, cashflow}` for a symbol
    pub async fn financials(&self, symbol: &str) -> Result<Value> {
        let (income, balance, cashflow) = tokio::try_join!(
            self.annual_reports("INCOME_STATEMENT", symbol),
            self.annual_reports("BALANCE_SHEET", symbol),
            self.annual_reports("CASH_FLOW", symbol),
        )?;

        Ok(json!({
            "income_statement": income,
            "balance_sheet": balance,
            "cashflow": cashflow,
        }))
    }

    async fn query(&self, function: &str, symbol: &str) -> Result<Value> {
        self.rate_limiter.until_ready().await;
        debug!(function, symbol, "Alpha Vantage request");

        let response = self
            .client
            .get(BASE_URL)
            .query(&[("function", function), ("symbol", symbol), ("apikey", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ResearchError::AlphaVantageError(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let data: Value = response.json().await?;
        check_payload(data, symbol)
    }
}

/// Map Alpha Vantage's in-band error conventions to errors
fn check_payload(data: Value, symbol: &str) -> Result<Value> {
    if let Some(error) = data.get("Error Message") {
        return Err(ResearchError::AlphaVantageError(error.to_string()));
    }

    // Throttling is reported as "Note" on older accounts and "Information" on newer ones
    if data.get("Note").is_some() || data.get("Information").is_some() {
        return Err(ResearchError::RateLimitExceeded {
            provider: "Alpha Vantage".to_string(),
        });
    }

    if data.as_object().is_none_or(Map::is_empty) {
        return Err(ResearchError::DataUnavailable {
            ticker: symbol.to_string(),
            reason: "empty response".to_string(),
        });
    }

    Ok(data)
}

fn annual_reports(data: &Value) -> Vec<Value> {
    data.get("annualReports")
        .and_then(Value::as_array)
        .map(|reports| reports.iter().take(MAX_ANNUAL_REPORTS).cloned().collect())
        .unwrap_or_default()
}
