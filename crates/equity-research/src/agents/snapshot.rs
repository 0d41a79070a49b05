//! Price history, overview and statements for one ticker

use crate::api::{MarketDataProvider, PriceRecord, normalize_ticker};
use crate::config::ResearchConfig;
use crate::error::Result;
use crate::tools::ResearchBackends;
use async_trait::async_trait;
use equity_core::Agent;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Everything known about a ticker from the market backends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceSnapshot {
    pub ticker: String,
    pub price_history: Vec<PriceRecord>,
    pub summary: Value,
    pub financials: Value,
}

/// Fetches a [`FinanceSnapshot`]
pub struct FinanceSnapshotAgent {
    market: Arc<dyn MarketDataProvider>,
    range: String,
}

impl FinanceSnapshotAgent {
    pub fn new(backends: &ResearchBackends, config: &ResearchConfig) -> Self {
        Self {
            market: backends.market.clone(),
            range: config.history_range.clone(),
        }
    }

    /// Build over live backends
    pub fn from_config(config: &ResearchConfig) -> Result<Self> {
        Ok(Self::new(&ResearchBackends::from_config(config)?, config))
    }

    /// Fetch price history, summary and financials concurrently
    pub async fn run(&self, ticker: &str) -> Result<FinanceSnapshot> {
        let ticker = normalize_ticker(ticker)?;
        info!(ticker = %ticker, range = %self.range, "Fetching finance snapshot");

        let (price_history, summary, financials) = tokio::try_join!(
            self.market.price_history(&ticker, &self.range),
            self.market.summary(&ticker),
            self.market.financials(&ticker),
        )?;

        Ok(FinanceSnapshot {
            ticker,
            price_history,
            summary,
            financials,
        })
    }
}

#[async_trait]
impl Agent for FinanceSnapshotAgent {
    async fn run(&self, input: &str) -> equity_core::Result<String> {
        let snapshot = FinanceSnapshotAgent::run(self, input).await?;
        serde_json::to_string_pretty(&snapshot).map_err(|e| equity_core::Error::Generic(e.to_string()))
    }

    fn name(&self) -> &str {
        "FinanceSnapshotAgent"
    }
}
