//! Equity research tools and pipelines
//!
//! This crate provides the concrete capabilities the reasoning loop can call:
//!
//! - Company fundamentals from Alpha Vantage (rate-limited, cached)
//! - Daily price history from Yahoo Finance
//! - Web and news search through DuckDuckGo
//! - Readable text of arbitrary web pages
//! - Valuation ratios, a heuristic company score and lexicon news sentiment
//!
//! Each capability is a [`equity_tools::Tool`]; [`default_registry`] builds a
//! registry holding all of them. The [`agents`] module runs the same
//! backends as fixed pipelines, without a model in the loop.
//!
//! # Example
//!
//! ```rust,ignore
//! use equity_research::{ResearchConfig, default_registry};
//!
//! let registry = default_registry(&ResearchConfig::from_env())?;
//! let news = registry.call("news", input).await?;
//! ```

pub mod agents;
pub mod analysis;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod tools;

pub use agents::{FinanceSnapshotAgent, FinancialAnalysisAgent, WebResearchAgent};
pub use config::ResearchConfig;
pub use error::{ResearchError, Result};
pub use tools::{ResearchBackends, default_registry, registry_with};
