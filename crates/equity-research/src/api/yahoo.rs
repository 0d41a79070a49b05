//! Yahoo Finance client for daily price history

use crate::error::{Result, ResearchError};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

/// One daily OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Trading day (YYYY-MM-DD)
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjclose: f64,
    pub volume: u64,
}

/// Yahoo Finance API client
#[derive(Debug, Clone, Default)]
pub struct YahooFinanceClient;

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self
    }

    /// Daily bars between `start` and `end`
    pub async fn history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PriceRecord>> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| ResearchError::YahooFinanceError(e.to_string()))?;

        let start = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| ResearchError::YahooFinanceError(format!("Invalid start timestamp: {e}")))?;
        let end = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| ResearchError::YahooFinanceError(format!("Invalid end timestamp: {e}")))?;

        let response = provider
            .get_quote_history(symbol, start, end)
            .await
            .map_err(|e| ResearchError::YahooFinanceError(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| ResearchError::YahooFinanceError(e.to_string()))?;

        Ok(quotes
            .iter()
            .map(|q| PriceRecord {
                date: DateTime::from_timestamp(q.timestamp as i64, 0)
                    .map(|ts| ts.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                adjclose: q.adjclose,
                volume: q.volume,
            })
            .collect())
    }

    /// Daily bars for a named range ending now (e.g. "1mo", "1y", "ytd")
    pub async fn history_range(&self, symbol: &str, range: &str) -> Result<Vec<PriceRecord>> {
        let end = Utc::now();
        let start = range_start(range, end)?;
        self.history(symbol, start, end).await
    }
}

/// Start of a named range ending at `end`
pub fn range_start(range: &str, end: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let days = match range {
        "1d" => 1,
        "5d" => 5,
        "1mo" => 30,
        "3mo" => 90,
        "6mo" => 180,
        "1y" => 365,
        "2y" => 730,
        "5y" => 1825,
        "10y" => 3650,
        "max" => 36500,
        "ytd" => {
            return NaiveDate::from_ymd_opt(end.year(), 1, 1)
                .and_then(|day| day.and_hms_opt(0, 0, 0))
                .map(|start| start.and_utc())
                .ok_or_else(|| ResearchError::ApiError("Invalid year start".to_string()));
        }
        _ => {
            return Err(ResearchError::ApiError(format!("Invalid range: {range}")));
        }
    };
    Ok(end - Duration::days(days))
}
