use super::{ImagePayload, ImageProvider};
use articast_core::{ArticastError, ArticastResult};
use async_trait::async_trait;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://loremflickr.com";

/// Keyword-matched stock photo backend.
///
/// Last remote resort before the local placeholder: it does not synthesize
/// images, it serves an existing photo tagged with keywords pulled from the
/// prompt.
pub struct LoremFlickrProvider {
    base_url: String,
    http: reqwest::Client,
}

impl LoremFlickrProvider {
    /// Creates the provider against the public endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a provider against a custom endpoint (used in tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    fn request_url(&self, prompt: &str) -> ArticastResult<reqwest::Url> {
        let keywords = extract_keywords(prompt);
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ArticastError::Http(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ArticastError::Http("base URL cannot be a base".to_string()))?
            .push("800")
            .push("600")
            .push(&keywords);
        Ok(url)
    }
}

impl Default for LoremFlickrProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageProvider for LoremFlickrProvider {
    fn name(&self) -> &str {
        "loremflickr"
    }

    async fn fetch(&self, prompt: &str) -> ArticastResult<ImagePayload> {
        let url = self.request_url(prompt)?;

        let resp = self
            .http
            .get(url)
            .timeout(Duration::from_secs(60))
            .send()
            .await
            .map_err(|e| ArticastError::Http(format!("loremflickr: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ArticastError::Http(format!(
                "loremflickr returned {status}"
            )));
        }

        let content_type = resp
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ArticastError::Http(format!("loremflickr: body read failed: {e}")))?;

        Ok(ImagePayload {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

/// Picks up to three searchable keywords from a free-form prompt.
fn extract_keywords(prompt: &str) -> String {
    let words: Vec<&str> = prompt
        .split_whitespace()
        .filter(|w| w.len() > 3 && w.chars().all(char::is_alphanumeric))
        .take(3)
        .collect();
    if words.is_empty() {
        "abstract".to_string()
    } else {
        words.join(",").to_lowercase()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn keywords_skip_short_and_punctuated_words() {
        assert_eq!(
            extract_keywords("A red fox, jumping over frozen rivers at dawn"),
            "jumping,over,frozen"
        );
        assert_eq!(extract_keywords("an of to"), "abstract");
        assert_eq!(extract_keywords(""), "abstract");
    }

    #[test]
    fn request_url_uses_fixed_canvas() {
        let provider = LoremFlickrProvider::with_base_url("https://example.com");
        let url = provider.request_url("mountain sunrise panorama").unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/800/600/mountain,sunrise,panorama"
        );
    }
}
