//! Clients for market data, search and web pages

pub mod alpha_vantage;
pub mod duckduckgo;
pub mod market;
pub mod page;
pub mod yahoo;

pub use alpha_vantage::AlphaVantageClient;
pub use duckduckgo::{DuckDuckGoClient, NewsItem, SearchProvider, SearchResult};
pub use market::{MarketDataClient, MarketDataProvider, normalize_ticker};
pub use page::{HttpPageFetcher, PageFetcher, extract_text};
pub use yahoo::{PriceRecord, YahooFinanceClient};
