use super::{ImagePayload, ImageProvider};
use articast_core::{ArticastError, ArticastResult};
use async_trait::async_trait;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://image.pollinations.ai";

/// Pollinations image API backend, parameterized by model variant.
pub struct PollinationsProvider {
    name: String,
    model: String,
    base_url: String,
    http: reqwest::Client,
}

impl PollinationsProvider {
    /// The `flux` model variant (higher quality, slower).
    pub fn flux() -> Self {
        Self::with_base_url("flux", DEFAULT_BASE_URL)
    }

    /// The `turbo` model variant (faster, lower quality).
    pub fn turbo() -> Self {
        Self::with_base_url("turbo", DEFAULT_BASE_URL)
    }

    /// Creates a provider against a custom endpoint (used in tests).
    pub fn with_base_url(model: impl Into<String>, base_url: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            name: format!("pollinations-{model}"),
            model,
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    fn request_url(&self, prompt: &str) -> ArticastResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ArticastError::Http(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ArticastError::Http("base URL cannot be a base".to_string()))?
            .push("prompt")
            .push(prompt);
        // A per-call seed so identical prompts yield varied images.
        let seed = chrono::Utc::now().timestamp_subsec_micros();
        url.query_pairs_mut()
            .append_pair("model", &self.model)
            .append_pair("width", "800")
            .append_pair("height", "600")
            .append_pair("nologo", "true")
            .append_pair("seed", &seed.to_string());
        Ok(url)
    }
}

#[async_trait]
impl ImageProvider for PollinationsProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, prompt: &str) -> ArticastResult<ImagePayload> {
        let url = self.request_url(prompt)?;

        let resp = self
            .http
            .get(url)
            .timeout(Duration::from_secs(60))
            .send()
            .await
            .map_err(|e| ArticastError::Http(format!("{}: {e}", self.name)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ArticastError::Http(format!(
                "{} returned {status}",
                self.name
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
            .map_err(|e| ArticastError::Http(format!("{}: body read failed: {e}", self.name)))?;

        Ok(ImagePayload {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}
