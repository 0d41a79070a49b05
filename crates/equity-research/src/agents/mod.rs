//! Direct research pipelines: fixed sequences of backend calls, no model

pub mod fundamentals;
pub mod snapshot;
pub mod web_research;

pub use fundamentals::{AnalysisReport, FinancialAnalysisAgent};
pub use snapshot::{FinanceSnapshot, FinanceSnapshotAgent};
pub use web_research::{ResearchDigest, WebResearchAgent};
