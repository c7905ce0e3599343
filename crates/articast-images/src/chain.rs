use crate::placeholder::placeholder_image;
use crate::providers::{ImagePayload, ImageProvider, LoremFlickrProvider, PollinationsProvider};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::time::Duration;
use tracing::{debug, warn};

/// Payloads below this size are treated as corrupt or empty images.
pub const MIN_IMAGE_BYTES: usize = 1024;

/// One slot in the chain: a provider and its request timeout.
pub struct ProviderEntry {
    /// Bounded wall-clock time for this provider's attempt.
    pub timeout: Duration,
    /// The provider to invoke.
    pub provider: Box<dyn ImageProvider>,
}

impl ProviderEntry {
    /// Creates an entry with the given timeout.
    pub fn new(timeout: Duration, provider: Box<dyn ImageProvider>) -> Self {
        Self { timeout, provider }
    }
}

/// Priority-ordered image generation chain.
///
/// Tries each provider in order with its own timeout and returns the first
/// plausible payload as a base64 data URL. Any network error, non-success
/// status, timeout, or undersized payload fails that provider and the chain
/// advances. When every provider fails the chain renders a local SVG
/// placeholder, so [`ProviderChain::generate`] never fails.
pub struct ProviderChain {
    entries: Vec<ProviderEntry>,
    min_bytes: usize,
}

impl ProviderChain {
    /// The production chain: Pollinations flux, Pollinations turbo, then a
    /// keyword photo service.
    pub fn standard() -> Self {
        Self::with_providers(vec![
            ProviderEntry::new(
                Duration::from_secs(30),
                Box::new(PollinationsProvider::flux()),
            ),
            ProviderEntry::new(
                Duration::from_secs(25),
                Box::new(PollinationsProvider::turbo()),
            ),
            ProviderEntry::new(Duration::from_secs(20), Box::new(LoremFlickrProvider::new())),
        ])
    }

    /// Creates a chain from explicit entries (used for injection in tests).
    pub fn with_providers(entries: Vec<ProviderEntry>) -> Self {
        Self {
            entries,
            min_bytes: MIN_IMAGE_BYTES,
        }
    }

    /// Overrides the minimum plausible payload size.
    pub fn with_min_bytes(mut self, min_bytes: usize) -> Self {
        self.min_bytes = min_bytes;
        self
    }

    /// Generates an image reference for the prompt. Never fails.
    ///
    /// A blank prompt skips provider dispatch entirely and yields a generic
    /// placeholder.
    pub async fn generate(&self, prompt: &str) -> String {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            debug!("Blank image prompt, using placeholder");
            return placeholder_image("");
        }

        for entry in &self.entries {
            let name = entry.provider.name();
            match tokio::time::timeout(entry.timeout, entry.provider.fetch(prompt)).await {
                Ok(Ok(payload)) if payload.bytes.len() >= self.min_bytes => {
                    debug!(
                        provider = name,
                        bytes = payload.bytes.len(),
                        "Image generated"
                    );
                    return data_url(&payload);
                }
                Ok(Ok(payload)) => {
                    warn!(
                        provider = name,
                        bytes = payload.bytes.len(),
                        "Payload below minimum size, trying next provider"
                    );
                }
                Ok(Err(e)) => {
                    warn!(provider = name, error = %e, "Provider failed, trying next");
                }
                Err(_) => {
                    warn!(
                        provider = name,
                        timeout_s = entry.timeout.as_secs(),
                        "Provider timed out, trying next"
                    );
                }
            }
        }

        warn!("All image providers failed, rendering placeholder");
        placeholder_image(prompt)
    }
}

fn data_url(payload: &ImagePayload) -> String {
    format!(
        "data:{};base64,{}",
        payload.content_type,
        STANDARD.encode(&payload.bytes)
    )
}
