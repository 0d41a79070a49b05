//! Readable text from web pages

use async_trait::async_trait;
use regex::{Captures, Regex};
use reqwest::Client;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

static SCRIPT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script\s*>").ok());
static STYLE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b.*?</style\s*>").ok());
static NOSCRIPT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<noscript\b.*?</noscript\s*>").ok());
static COMMENT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").ok());
static TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").ok());
static NUMERIC_ENTITY: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"&#(?:[xX]([0-9a-fA-F]{1,6})|([0-9]{1,7}));").ok());

const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&#39;", "'"),
    ("&ndash;", "-"),
    ("&mdash;", "-"),
    ("&hellip;", "..."),
    ("&rsquo;", "'"),
    ("&lsquo;", "'"),
    ("&rdquo;", "\""),
    ("&ldquo;", "\""),
    // must stay last
    ("&amp;", "&"),
];

/// Source of page text for the `fetch_page` tool and the research pipeline
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Readable text of the page at `url`
    ///
    /// Never fails: fetch errors come back as `"Error fetching page: ..."`.
    async fn fetch_text(&self, url: &str) -> String;
}

/// Fetches pages over HTTP and strips them down to text
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
    text_limit: usize,
}

impl HttpPageFetcher {
    /// Create a fetcher with a per-page timeout and a cap on returned characters
    pub fn new(timeout: Duration, text_limit: usize) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("equity-research/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, text_limit))
    }

    /// Use a preconfigured HTTP client
    pub fn with_client(client: Client, text_limit: usize) -> Self {
        Self { client, text_limit }
    }

    async fn fetch_html(&self, url: &str) -> Result<String, String> {
        let url = Url::parse(url).map_err(|e| format!("invalid URL '{url}': {e}"))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| e.to_string())?;

        response.text().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_text(&self, url: &str) -> String {
        match self.fetch_html(url).await {
            Ok(html) => {
                let text = extract_text(&html, self.text_limit);
                debug!(url, chars = text.len(), "Fetched page");
                text
            }
            Err(e) => {
                warn!(url, error = %e, "Page fetch failed");
                format!("Error fetching page: {e}")
            }
        }
    }
}

/// Strip markup from `html` and keep at most `limit` characters
pub fn extract_text(html: &str, limit: usize) -> String {
    let mut text = html.to_string();
    for pattern in [&*SCRIPT, &*STYLE, &*NOSCRIPT, &*COMMENT, &*TAG] {
        if let Some(re) = pattern {
            text = re.replace_all(&text, " ").into_owned();
        }
    }

    let text = decode_entities(&text);
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    match collapsed.char_indices().nth(limit) {
        Some((cut, _)) => collapsed[..cut].to_string(),
        None => collapsed,
    }
}

fn decode_entities(text: &str) -> String {
    let mut decoded = match NUMERIC_ENTITY.as_ref() {
        Some(re) => re
            .replace_all(text, |caps: &Captures<'_>| {
                let code = match (caps.get(1), caps.get(2)) {
                    (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
                    (_, Some(dec)) => dec.as_str().parse().ok(),
                    _ => None,
                };
                code.and_then(char::from_u32)
                    .map(String::from)
                    .unwrap_or_default()
            })
            .into_owned(),
        None => text.to_string(),
    };

    for (entity, replacement) in NAMED_ENTITIES {
        if decoded.contains(entity) {
            decoded = decoded.replace(entity, replacement);
        }
    }
    decoded
}
