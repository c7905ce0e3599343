use articast_core::{AnalysisResult, ArticastResult, ExtractedPage, GeneratedArtifact};
use async_trait::async_trait;
use uuid::Uuid;

/// Fetches a page and extracts its title and readable body text.
///
/// Any failure (network, parse, content too short) is fatal to the pipeline.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extracts title and text from the page at `url`.
    async fn extract(&self, url: &str) -> ArticastResult<ExtractedPage>;
}

/// Produces a summary, key points, and image prompts from extracted text.
///
/// The pipeline substitutes a fallback when this fails, so implementations
/// may surface errors freely.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Analyzes the extracted article.
    async fn analyze(&self, title: &str, text: &str) -> ArticastResult<AnalysisResult>;
}

/// Persists the finished artifact. Failure here is fatal to the pipeline.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Saves the artifact on behalf of `owner_id`, returning its id.
    async fn save(&self, owner_id: &str, artifact: &GeneratedArtifact) -> ArticastResult<Uuid>;
}
