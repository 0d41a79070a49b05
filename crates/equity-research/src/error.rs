//! Error types for research backends

use thiserror::Error;

/// Errors raised by market-data, search and page backends
#[derive(Debug, Error)]
pub enum ResearchError {
    /// API request failed
    #[error("API error: {0}")]
    ApiError(String),

    /// Invalid ticker symbol provided
    #[error("Invalid ticker: {0}")]
    InvalidTicker(String),

    /// Data not available for the requested ticker
    #[error("Data not available for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    /// Rate limit exceeded for API
    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded { provider: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Alpha Vantage API error
    #[error("Alpha Vantage error: {0}")]
    AlphaVantageError(String),

    /// Search provider error
    #[error("Search error: {0}")]
    SearchError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for research operations
pub type Result<T> = std::result::Result<T, ResearchError>;

impl ResearchError {
    /// Report this backend failure as a failure of the named tool
    ///
    /// A malformed ticker is the caller's mistake and maps to invalid
    /// parameters; everything else is a tool failure.
    pub fn into_tool_error(self, tool: &str) -> equity_core::Error {
        match self {
            Self::InvalidTicker(_) => equity_core::Error::invalid_parameters(tool, self),
            _ => equity_core::Error::tool_failed(tool, self),
        }
    }
}

impl From<ResearchError> for equity_core::Error {
    fn from(err: ResearchError) -> Self {
        match err {
            ResearchError::ConfigError(msg) => Self::Configuration(msg),
            other => Self::Generic(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ResearchError::InvalidTicker("??".to_string());
        assert_eq!(err.to_string(), "Invalid ticker: ??");

        let err = ResearchError::DataUnavailable {
            ticker: "AAPL".to_string(),
            reason: "No data found".to_string(),
        };
        assert_eq!(err.to_string(), "Data not available for AAPL: No data found");
    }

    #[test]
    fn test_tool_error_conversion() {
        let err = ResearchError::RateLimitExceeded {
            provider: "Alpha Vantage".to_string(),
        }
        .into_tool_error("finance_data");

        assert!(err.is_tool_failure());
        assert_eq!(
            err.to_string(),
            "Tool 'finance_data' failed: Rate limit exceeded for Alpha Vantage"
        );

        let err = ResearchError::InvalidTicker("??".to_string()).into_tool_error("price_history");
        assert!(matches!(err, equity_core::Error::InvalidParameters { .. }));
    }
}
