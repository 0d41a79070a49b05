//! Ratios and score for one ticker

use crate::analysis::{Ratios, Score, score_company};
use crate::api::{MarketDataProvider, normalize_ticker};
use crate::config::ResearchConfig;
use crate::error::Result;
use crate::tools::ResearchBackends;
use async_trait::async_trait;
use equity_core::Agent;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Output of [`FinancialAnalysisAgent::run`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub ticker: String,
    pub valuation_ratios: Ratios,
    pub score: Score,
}

/// Fetches fundamentals, computes ratios and scores the company
pub struct FinancialAnalysisAgent {
    market: Arc<dyn MarketDataProvider>,
}

impl FinancialAnalysisAgent {
    pub fn new(backends: &ResearchBackends) -> Self {
        Self {
            market: backends.market.clone(),
        }
    }

    /// Build over live backends
    pub fn from_config(config: &ResearchConfig) -> Result<Self> {
        Ok(Self::new(&ResearchBackends::from_config(config)?))
    }

    pub async fn run(&self, ticker: &str) -> Result<AnalysisReport> {
        let ticker = normalize_ticker(ticker)?;
        info!(ticker = %ticker, "Running financial analysis");

        let (summary, financials) = tokio::try_join!(
            self.market.summary(&ticker),
            self.market.financials(&ticker),
        )?;

        let valuation_ratios = Ratios::compute(&summary, &financials);
        let score = serde_json::to_value(&valuation_ratios)
            .map(|ratios| score_company(&ratios))?;

        Ok(AnalysisReport {
            ticker,
            valuation_ratios,
            score,
        })
    }
}

#[async_trait]
impl Agent for FinancialAnalysisAgent {
    async fn run(&self, input: &str) -> equity_core::Result<String> {
        let report = FinancialAnalysisAgent::run(self, input).await?;
        serde_json::to_string_pretty(&report).map_err(|e| equity_core::Error::Generic(e.to_string()))
    }

    fn name(&self) -> &str {
        "FinancialAnalysisAgent"
    }
}
