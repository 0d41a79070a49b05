//! DuckDuckGo web and news search
//!
//! Web results come from the JavaScript-free HTML endpoint. News needs a
//! `vqd` token scraped from the regular search page, which is then passed
//! to the `news.js` JSON endpoint.

use super::page::extract_text;
use crate::error::{Result, ResearchError};
use async_trait::async_trait;
use chrono::DateTime;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;
use url::Url;

const HTML_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
const TOKEN_ENDPOINT: &str = "https://duckduckgo.com/";
const NEWS_ENDPOINT: &str = "https://duckduckgo.com/news.js";

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

static RESULT_LINK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?s)<a([^>]*class="result__a"[^>]*)>(.*?)</a>"#).ok());
static RESULT_SNIPPET: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"(?s)<(a|div)[^>]*class="result__snippet"[^>]*>(.*?)</(?:a|div)>"#).ok()
});
static HREF: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r#"href="([^"]*)""#).ok());
static VQD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"vqd=["']?([0-9-]+)["']?"#).ok());

/// One web search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

/// One news article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub snippet: String,
    pub url: String,
    /// Publication time (RFC 3339), empty when unknown
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Page text, filled in by the research pipeline on request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Backend for the `search` and `news` tools
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// General web search
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;

    /// Recent news articles
    async fn news(&self, query: &str, max_results: usize) -> Result<Vec<NewsItem>>;
}

/// DuckDuckGo search client
#[derive(Debug, Clone)]
pub struct DuckDuckGoClient {
    client: Client,
}

impl DuckDuckGoClient {
    /// Create a new client with the given per-request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let response = self.client.get(url).query(query).send().await?;

        if !response.status().is_success() {
            return Err(ResearchError::SearchError(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        Ok(response.text().await?)
    }

    async fn vqd(&self, query: &str) -> Result<String> {
        let page = self.get_text(TOKEN_ENDPOINT, &[("q", query)]).await?;
        extract_vqd(&page)
            .ok_or_else(|| ResearchError::SearchError("no search token in response".to_string()))
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        debug!(query, max_results, "DuckDuckGo web search");
        let html = self.get_text(HTML_ENDPOINT, &[("q", query)]).await?;
        Ok(parse_web_results(&html, max_results))
    }

    async fn news(&self, query: &str, max_results: usize) -> Result<Vec<NewsItem>> {
        debug!(query, max_results, "DuckDuckGo news search");
        let vqd = self.vqd(query).await?;

        let body = self
            .get_text(
                NEWS_ENDPOINT,
                &[
                    ("l", "us-en"),
                    ("o", "json"),
                    ("noamp", "1"),
                    ("q", query),
                    ("vqd", vqd.as_str()),
                    ("p", "-1"),
                ],
            )
            .await?;

        let data: Value = serde_json::from_str(&body)?;
        Ok(parse_news_results(&data, max_results))
    }
}

/// Web results from the HTML endpoint, ads skipped
pub fn parse_web_results(html: &str, max_results: usize) -> Vec<SearchResult> {
    let (Some(link), Some(snippet), Some(href)) =
        (RESULT_LINK.as_ref(), RESULT_SNIPPET.as_ref(), HREF.as_ref())
    else {
        return Vec::new();
    };

    html.split("result__body")
        .skip(1)
        .filter_map(|block| {
            let caps = link.captures(block)?;
            let raw_href = href.captures(caps.get(1)?.as_str())?.get(1)?.as_str();
            let url = resolve_href(raw_href)?;

            let snippet = snippet
                .captures(block)
                .and_then(|c| c.get(2))
                .map(|m| extract_text(m.as_str(), usize::MAX))
                .unwrap_or_default();

            Some(SearchResult {
                title: extract_text(caps.get(2)?.as_str(), usize::MAX),
                snippet,
                url,
            })
        })
        .take(max_results)
        .collect()
}

/// Unwrap DuckDuckGo's `/l/?uddg=` redirect; `None` for ad links
fn resolve_href(raw: &str) -> Option<String> {
    let raw = raw.replace("&amp;", "&");
    let absolute = if raw.starts_with("//") {
        format!("https:{raw}")
    } else {
        raw
    };

    let url = Url::parse(&absolute).ok()?;
    let is_ddg = url
        .host_str()
        .is_some_and(|host| host.ends_with("duckduckgo.com"));

    if !is_ddg {
        return Some(url.into());
    }
    if url.path().starts_with("/y.js") {
        return None;
    }

    url.query_pairs()
        .find(|(key, _)| key == "uddg")
        .map(|(_, target)| target.into_owned())
}

fn extract_vqd(page: &str) -> Option<String> {
    VQD.as_ref()?
        .captures(page)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// News items from a `news.js` response
pub fn parse_news_results(data: &Value, max_results: usize) -> Vec<NewsItem> {
    let Some(results) = data.get("results").and_then(Value::as_array) else {
        return Vec::new();
    };

    results
        .iter()
        .filter_map(|item| {
            let text = |key: &str| item.get(key).and_then(Value::as_str);

            let url = text("url")?.to_string();
            let date = item
                .get("date")
                .and_then(Value::as_i64)
                .and_then(|ts| DateTime::from_timestamp(ts, 0))
                .map(|ts| ts.to_rfc3339())
                .unwrap_or_default();

            Some(NewsItem {
                title: extract_text(text("title").unwrap_or_default(), usize::MAX),
                snippet: extract_text(text("excerpt").unwrap_or_default(), usize::MAX),
                url,
                date,
                source: text("source").map(str::to_string),
                content: None,
            })
        })
        .take(max_results)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RESULTS_PAGE: &str = r#"
<div class="result results_links results_links_deep result--ad">
  <div class="links_main links_deep result__body">
    <h2 class="result__title">
      <a rel="nofollow" class="result__a" href="https://duckduckgo.com/y.js?ad_provider=x&amp;u3=1">Buy GPUs</a>
    </h2>
    <a class="result__snippet" href="https://duckduckgo.com/y.js?u3=1">Sponsored</a>
  </div>
</div>
<div class="result results_links results_links_deep web-result">
  <div class="links_main links_deep result__body">
    <h2 class="result__title">
      <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fnvidianews.nvidia.com%2Fnews%2Fq3&amp;rut=abc">NVIDIA <b>Q3</b> Results</a>
    </h2>
    <a class="result__snippet" href="//duckduckgo.com/l/?uddg=x">Revenue of $35.1 billion, up 94% &amp; more</a>
  </div>
</div>
<div class="result results_links results_links_deep web-result">
  <div class="links_main links_deep result__body">
    <h2 class="result__title">
      <a rel="nofollow" class="result__a" href="https://example.com/nvda">NVDA quote</a>
    </h2>
  </div>
</div>
"#;

    #[test]
    fn test_parse_web_results() {
        let results = parse_web_results(RESULTS_PAGE, 5);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "NVIDIA Q3 Results");
        assert_eq!(results[0].url, "https://nvidianews.nvidia.com/news/q3");
        assert_eq!(results[0].snippet, "Revenue of $35.1 billion, up 94% & more");

        assert_eq!(results[1].url, "https://example.com/nvda");
        assert_eq!(results[1].snippet, "");
    }

    #[test]
    fn test_parse_web_results_respects_max() {
        assert_eq!(parse_web_results(RESULTS_PAGE, 1).len(), 1);
        assert!(parse_web_results("<html>no results</html>", 5).is_empty());
    }

    #[test]
    fn test_extract_vqd() {
        let page = r#"<script>DDG.deep.initialize('/d.js?q=nvda&vqd=4-1234567890&kl=wt-wt');</script>"#;
        assert_eq!(extract_vqd(page).as_deref(), Some("4-1234567890"));

        let page = r#"{"vqd":"4-99"}"#;
        assert_eq!(extract_vqd(r#"vqd="4-99""#).as_deref(), Some("4-99"));
        assert!(extract_vqd(page).is_none());
    }

    #[test]
    fn test_parse_news_results() {
        let data = json!({
            "results": [
                {
                    "date": 1_732_000_000,
                    "excerpt": "Nvidia <b>beats</b> estimates",
                    "source": "Reuters",
                    "title": "Nvidia results",
                    "url": "https://www.reuters.com/nvda"
                },
                {"title": "no url"},
                {"title": "Second", "excerpt": "", "url": "https://example.com/2"}
            ]
        });

        let items = parse_news_results(&data, 5);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].snippet, "Nvidia beats estimates");
        assert_eq!(items[0].source.as_deref(), Some("Reuters"));
        assert!(items[0].date.starts_with("2024-11-19"));
        assert_eq!(items[1].date, "");

        assert_eq!(parse_news_results(&data, 1).len(), 1);
        assert!(parse_news_results(&json!({}), 5).is_empty());
    }

    #[test]
    fn test_news_item_shape() {
        let item = NewsItem {
            title: "t".to_string(),
            snippet: "s".to_string(),
            url: "u".to_string(),
            date: String::new(),
            source: None,
            content: None,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json, json!({"title": "t", "snippet": "s", "url": "u", "date": ""}));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_live_search() {
        let client = DuckDuckGoClient::new(Duration::from_secs(20)).unwrap();
        let results = client.search("NVIDIA earnings", 3).await.unwrap();
        assert!(results.len() <= 3);

        let news = client.news("NVDA", 3).await.unwrap();
        assert!(news.len() <= 3);
    }
}
