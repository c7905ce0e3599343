use articast_core::{ArticastError, ArticastResult, ExtractedPage};
use articast_pipeline::Extractor;
use async_trait::async_trait;
use regex::Regex;
use std::time::Duration;
use tracing::info;

const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024; // 5MB
const MIN_TEXT_CHARS: usize = 100;
const USER_AGENT: &str = "articast/0.1 (article narration service)";

/// Fetches a page over HTTP and extracts its title and readable text.
///
/// Extraction is deliberately crude: strip scripts, styles, and markup,
/// decode the common entities, collapse whitespace. Pages whose cleaned text
/// is shorter than [`MIN_TEXT_CHARS`] are rejected as not being articles.
pub struct HttpExtractor {
    client: reqwest::Client,
    title_re: Regex,
    drop_re: Regex,
    tag_re: Regex,
    space_re: Regex,
}

impl HttpExtractor {
    /// Creates an extractor with a 15 second request timeout.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            title_re: Regex::new(r"(?is)<title[^>]*>(.*?)</title>")
                .expect("Invalid title pattern"),
            drop_re: Regex::new(
                r"(?is)<(script|style|noscript|nav|header|footer)[^>]*>.*?</(script|style|noscript|nav|header|footer)>",
            )
            .expect("Invalid drop pattern"),
            tag_re: Regex::new(r"(?s)<[^>]+>").expect("Invalid tag pattern"),
            space_re: Regex::new(r"\s+").expect("Invalid whitespace pattern"),
        }
    }

    fn clean(&self, html: &str) -> (String, String) {
        let title = self
            .title_re
            .captures(html)
            .and_then(|c| c.get(1))
            .map(|m| self.space_re.replace_all(m.as_str().trim(), " ").into_owned())
            .unwrap_or_else(|| "Untitled".to_string());

        let without_blocks = self.drop_re.replace_all(html, " ");
        let without_tags = self.tag_re.replace_all(&without_blocks, " ");
        let decoded = decode_entities(&without_tags);
        let text = self.space_re.replace_all(decoded.trim(), " ").into_owned();

        (decode_entities(&title), text)
    }
}

impl Default for HttpExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for HttpExtractor {
    async fn extract(&self, url: &str) -> ArticastResult<ExtractedPage> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| ArticastError::Extraction(format!("invalid URL '{url}': {e}")))?;

        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ArticastError::Extraction(format!(
                    "unsupported scheme '{scheme}', only http/https allowed"
                )));
            }
        }

        info!(url = %url, "Fetching article");

        let resp = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| ArticastError::Extraction(format!("fetch failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ArticastError::Extraction(format!(
                "page returned {status}"
            )));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| ArticastError::Extraction(format!("body read failed: {e}")))?;

        if body.len() > MAX_RESPONSE_SIZE {
            return Err(ArticastError::Extraction(format!(
                "page too large: {} bytes",
                body.len()
            )));
        }

        let html = String::from_utf8_lossy(&body);
        let (title, text) = self.clean(&html);

        if text.chars().count() < MIN_TEXT_CHARS {
            return Err(ArticastError::Extraction(format!(
                "content too short: {} chars of readable text",
                text.chars().count()
            )));
        }

        Ok(ExtractedPage { title, text })
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}
