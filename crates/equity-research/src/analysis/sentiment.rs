//! Lexicon-based sentiment for news headlines
//!
//! Each known word carries a polarity in [-1, 1]. A word preceded (within
//! two tokens) by a negator has its polarity flipped and halved; a directly
//! preceding modifier such as "very" or "slightly" scales it. The text
//! polarity is the mean over the known words, clamped to [-1, 1].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Article label threshold
pub const ARTICLE_THRESHOLD: f64 = 0.15;
/// Overall label threshold
pub const OVERALL_THRESHOLD: f64 = 0.1;

const NEGATORS: &[&str] = &["not", "no", "never", "without", "hardly", "barely", "nor"];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("extremely", 1.5),
    ("highly", 1.3),
    ("sharply", 1.4),
    ("significantly", 1.3),
    ("slightly", 0.5),
    ("somewhat", 0.7),
];

const LEXICON: &[(&str, f64)] = &[
    // positive
    ("beat", 0.6),
    ("beats", 0.6),
    ("boost", 0.5),
    ("boosts", 0.5),
    ("breakthrough", 0.7),
    ("bullish", 0.7),
    ("gain", 0.5),
    ("gains", 0.5),
    ("good", 0.7),
    ("great", 0.8),
    ("grow", 0.4),
    ("growth", 0.4),
    ("high", 0.16),
    ("improve", 0.5),
    ("improved", 0.5),
    ("jump", 0.4),
    ("jumps", 0.4),
    ("best", 1.0),
    ("optimistic", 0.6),
    ("outperform", 0.6),
    ("positive", 0.5),
    ("profit", 0.4),
    ("profitable", 0.5),
    ("rally", 0.5),
    ("rallies", 0.5),
    ("record", 0.3),
    ("rise", 0.3),
    ("rises", 0.3),
    ("soar", 0.7),
    ("soars", 0.7),
    ("strong", 0.43),
    ("success", 0.6),
    ("surge", 0.6),
    ("surges", 0.6),
    ("upbeat", 0.6),
    ("upgrade", 0.5),
    ("upgraded", 0.5),
    ("win", 0.8),
    ("wins", 0.8),
    // negative
    ("bad", -0.7),
    ("bearish", -0.7),
    ("cut", -0.3),
    ("cuts", -0.3),
    ("decline", -0.4),
    ("declines", -0.4),
    ("downgrade", -0.5),
    ("downgraded", -0.5),
    ("drop", -0.4),
    ("drops", -0.4),
    ("fall", -0.4),
    ("falls", -0.4),
    ("fear", -0.6),
    ("fears", -0.6),
    ("fraud", -0.9),
    ("lawsuit", -0.5),
    ("layoffs", -0.5),
    ("loss", -0.5),
    ("losses", -0.5),
    ("low", -0.2),
    ("miss", -0.5),
    ("misses", -0.5),
    ("negative", -0.5),
    ("plunge", -0.7),
    ("plunges", -0.7),
    ("poor", -0.6),
    ("probe", -0.4),
    ("recession", -0.6),
    ("risk", -0.3),
    ("risks", -0.3),
    ("selloff", -0.6),
    ("slump", -0.6),
    ("slumps", -0.6),
    ("tumble", -0.6),
    ("tumbles", -0.6),
    ("weak", -0.5),
    ("worst", -1.0),
    ("worse", -0.6),
];

/// Sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    fn from_polarity(polarity: f64, threshold: f64) -> Self {
        if polarity > threshold {
            Self::Positive
        } else if polarity < -threshold {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

/// Per-article breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSentiment {
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub polarity: f64,
    pub sentiment: Sentiment,
}

/// Result of scoring a batch of news items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReport {
    pub overall_sentiment: Sentiment,
    pub average_polarity: f64,
    pub articles: Vec<ArticleSentiment>,
}

/// Polarity of free text in [-1, 1]; 0 when no known word occurs
pub fn polarity(text: &str) -> f64 {
    let tokens: Vec<String> = text
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect();

    let mut scores = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        let Some(&(_, weight)) = LEXICON.iter().find(|(word, _)| *word == token.as_str()) else {
            continue;
        };

        let mut score = weight;
        if let Some(previous) = i.checked_sub(1).map(|j| tokens[j].as_str()) {
            if let Some(&(_, factor)) = INTENSIFIERS.iter().find(|(word, _)| *word == previous) {
                score *= factor;
            }
        }

        let window = &tokens[i.saturating_sub(2)..i];
        if window.iter().any(|t| is_negator(t)) {
            score *= -0.5;
        }

        scores.push(score.clamp(-1.0, 1.0));
    }

    if scores.is_empty() {
        return 0.0;
    }
    (scores.iter().sum::<f64>() / scores.len() as f64).clamp(-1.0, 1.0)
}

fn is_negator(token: &str) -> bool {
    NEGATORS.contains(&token) || token.ends_with("n't")
}

/// Score news items of the shape `{title, snippet, ...}`
///
/// Each article is scored on `"{title}. {snippet}"`. `body` and `excerpt`
/// are accepted in place of `snippet`.
pub fn analyze(news_items: &[Value]) -> SentimentReport {
    let articles: Vec<ArticleSentiment> = news_items
        .iter()
        .map(|item| {
            let title = text_field(item, &["title"]);
            let snippet = text_field(item, &["snippet", "body", "excerpt"]);
            let polarity = polarity(&format!(
                "{}. {}",
                title.as_deref().unwrap_or_default(),
                snippet.as_deref().unwrap_or_default()
            ));

            ArticleSentiment {
                title,
                snippet,
                polarity,
                sentiment: Sentiment::from_polarity(polarity, ARTICLE_THRESHOLD),
            }
        })
        .collect();

    let average_polarity = if articles.is_empty() {
        0.0
    } else {
        articles.iter().map(|a| a.polarity).sum::<f64>() / articles.len() as f64
    };

    SentimentReport {
        overall_sentiment: Sentiment::from_polarity(average_polarity, OVERALL_THRESHOLD),
        average_polarity,
        articles,
    }
}

fn text_field(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| item.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_polarity_signs() {
        assert!(polarity("NVDA shares surge to record high") > ARTICLE_THRESHOLD);
        assert!(polarity("Stock plunges after earnings miss") < -ARTICLE_THRESHOLD);
        assert_eq!(polarity("Company schedules annual meeting"), 0.0);
    }

    #[test]
    fn test_negation_flips_and_halves() {
        let plain = polarity("good");
        let negated = polarity("not good");
        assert!((negated + plain * 0.5).abs() < 1e-9);
        assert!(polarity("results weren't good") < 0.0);
    }

    #[test]
    fn test_intensifier_is_clamped() {
        assert!((polarity("extremely best") - 1.0).abs() < 1e-9);
        assert!(polarity("very good") > polarity("good"));
    }

    #[test]
    fn test_analyze_report() {
        let items = vec![
            json!({"title": "NVDA beats estimates", "snippet": "Strong growth in data center", "url": "u1"}),
            json!({"title": "Chip stocks tumble", "snippet": "Fears of weak demand", "url": "u2"}),
            json!({"title": "NVDA to hold annual meeting", "snippet": "Scheduled for June", "url": "u3"}),
        ];

        let report = analyze(&items);
        assert_eq!(report.articles.len(), 3);
        assert_eq!(report.articles[0].sentiment, Sentiment::Positive);
        assert_eq!(report.articles[1].sentiment, Sentiment::Negative);
        assert_eq!(report.articles[2].sentiment, Sentiment::Neutral);
        assert_eq!(report.articles[0].title.as_deref(), Some("NVDA beats estimates"));

        let expected = report.articles.iter().map(|a| a.polarity).sum::<f64>() / 3.0;
        assert!((report.average_polarity - expected).abs() < 1e-12);
    }

    #[test]
    fn test_empty_batch() {
        let report = analyze(&[]);
        assert_eq!(report.overall_sentiment, Sentiment::Neutral);
        assert_eq!(report.average_polarity, 0.0);
        assert!(report.articles.is_empty());
    }

    #[test]
    fn test_report_shape() {
        let report = analyze(&[json!({"title": "Shares rally", "body": "Investors upbeat"})]);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["overall_sentiment"], "positive");
        assert_eq!(json["articles"][0]["snippet"], "Investors upbeat");
        assert_eq!(json["articles"][0]["sentiment"], "positive");
        assert!(json["average_polarity"].is_f64());
    }
}
