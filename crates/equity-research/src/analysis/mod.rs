//! Pure analysis over fetched data: ratios, scoring and news sentiment

pub mod ratios;
pub mod scoring;
pub mod sentiment;

pub use ratios::Ratios;
pub use scoring::{score_company, Score};
pub use sentiment::{analyze as analyze_sentiment, Sentiment, SentimentReport};
