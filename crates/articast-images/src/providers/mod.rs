use articast_core::ArticastResult;
use async_trait::async_trait;

mod loremflickr;
mod pollinations;

pub use loremflickr::LoremFlickrProvider;
pub use pollinations::PollinationsProvider;

/// Raw image bytes returned by a provider, with their content type.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    /// Encoded image bytes as received from the provider.
    pub bytes: Vec<u8>,
    /// MIME type reported by the provider (e.g. `image/jpeg`).
    pub content_type: String,
}

/// A single remote image-generation service.
///
/// Implementations issue one request per call and surface any network error
/// or non-success status as an `Err`; the chain decides what failure means.
/// To add a new provider: implement this trait and add a descriptor to the
/// chain's provider list.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    /// Requests an image for the given prompt.
    async fn fetch(&self, prompt: &str) -> ArticastResult<ImagePayload>;
}
