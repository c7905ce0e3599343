use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The terminal output of a successful generation run.
///
/// Owned by the pipeline until handed to the artifact store. The image list
/// holds up to three entries in generation order; every attempt yields an
/// entry because the provider chain falls back to a placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    /// Unique identifier for this artifact.
    pub id: Uuid,
    /// Article title as extracted from the page.
    pub title: String,
    /// Full extracted article text.
    pub text: String,
    /// Narratable summary of the article.
    pub summary: String,
    /// Ordered list of key points.
    pub key_points: Vec<String>,
    /// Ordered list of image references (data URLs or remote URLs).
    pub image_urls: Vec<String>,
    /// UTC timestamp of when the artifact was generated.
    pub created_at: DateTime<Utc>,
}

impl GeneratedArtifact {
    /// Creates a new artifact with a fresh id and the current timestamp.
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        summary: impl Into<String>,
        key_points: Vec<String>,
        image_urls: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            text: text.into(),
            summary: summary.into(),
            key_points,
            image_urls,
            created_at: Utc::now(),
        }
    }
}

/// Title and body text produced by the extraction collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedPage {
    /// Page title.
    pub title: String,
    /// Cleaned article body text.
    pub text: String,
}

/// Output of the analysis collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Narratable summary of the article.
    pub summary: String,
    /// Ordered key points.
    pub key_points: Vec<String>,
    /// Prompts offered to the image provider chain, in order.
    pub image_prompts: Vec<String>,
}
