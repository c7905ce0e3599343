use crate::collaborators::{Analyzer, ArtifactStore, Extractor};
use articast_core::{AnalysisResult, ArticastResult, GeneratedArtifact};
use articast_images::ProviderChain;
use articast_progress::{ProgressTracker, CLEANUP_DELAY};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Maximum number of prompts offered to the image chain per run.
pub const MAX_IMAGE_PROMPTS: usize = 3;

const FALLBACK_SUMMARY_CHARS: usize = 280;

/// The generation orchestrator.
///
/// One call to [`Generator::generate`] drives a single request through all
/// stages, as the sole writer of that request's progress session. Stages run
/// strictly in order; each remote call is a suspension point.
pub struct Generator {
    extractor: Arc<dyn Extractor>,
    analyzer: Arc<dyn Analyzer>,
    store: Arc<dyn ArtifactStore>,
    images: Arc<ProviderChain>,
    tracker: Arc<ProgressTracker>,
    cleanup_delay: Duration,
}

impl Generator {
    /// Wires the pipeline from its collaborators.
    pub fn new(
        extractor: Arc<dyn Extractor>,
        analyzer: Arc<dyn Analyzer>,
        store: Arc<dyn ArtifactStore>,
        images: Arc<ProviderChain>,
        tracker: Arc<ProgressTracker>,
    ) -> Self {
        Self {
            extractor,
            analyzer,
            store,
            images,
            tracker,
            cleanup_delay: CLEANUP_DELAY,
        }
    }

    /// Overrides the terminal-state cleanup delay (shortened in tests).
    pub fn with_cleanup_delay(mut self, delay: Duration) -> Self {
        self.cleanup_delay = delay;
        self
    }

    /// The progress tracker this generator writes to.
    pub fn tracker(&self) -> &Arc<ProgressTracker> {
        &self.tracker
    }

    /// Runs the full pipeline for one request.
    ///
    /// Creates the progress session (rejecting an id that is already in
    /// flight), drives the stages, and finalizes the session: progress 100 on
    /// success, `error = true` with the failure message otherwise. Cleanup is
    /// scheduled either way. The caller receives the artifact or the fatal
    /// stage error synchronously.
    pub async fn generate(
        &self,
        session_id: &str,
        owner_id: &str,
        url: &str,
    ) -> ArticastResult<GeneratedArtifact> {
        self.tracker.create(session_id, owner_id)?;
        info!(session_id = %session_id, url = %url, "Generation started");

        let result = self.run(session_id, owner_id, url).await;
        match &result {
            Ok(artifact) => {
                self.tracker.update(session_id, 100, "Complete");
                info!(
                    session_id = %session_id,
                    artifact_id = %artifact.id,
                    images = artifact.image_urls.len(),
                    "Generation complete"
                );
            }
            Err(e) => {
                self.tracker.fail(session_id, e.to_string());
                warn!(session_id = %session_id, error = %e, "Generation failed");
            }
        }
        self.tracker.schedule_cleanup(session_id, self.cleanup_delay);
        result
    }

    async fn run(
        &self,
        session_id: &str,
        owner_id: &str,
        url: &str,
    ) -> ArticastResult<GeneratedArtifact> {
        // Scraping: fatal on failure.
        self.tracker.update(session_id, 10, "Fetching article...");
        let page = self.extractor.extract(url).await?;
        self.tracker.update(session_id, 20, "Article fetched");

        // Analyzing: never fatal, falls back to a heuristic substitute.
        self.tracker.update(session_id, 30, "Analyzing content...");
        let analysis = match self.analyzer.analyze(&page.title, &page.text).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Analysis failed, using fallback");
                fallback_analysis(&page.title, &page.text)
            }
        };
        self.tracker.update(session_id, 50, "Analysis complete");

        // Image generation: the chain never fails, so progress advances by a
        // fixed increment per prompt regardless of provider outcomes.
        self.tracker.update(session_id, 60, "Generating images...");
        let prompts: Vec<&String> = analysis.image_prompts.iter().take(MAX_IMAGE_PROMPTS).collect();
        let total = prompts.len();
        let mut image_urls = Vec::with_capacity(total);
        for (i, prompt) in prompts.into_iter().enumerate() {
            image_urls.push(self.images.generate(prompt).await);
            let progress = 60 + (20 * (i + 1) / total.max(1)) as u8;
            self.tracker.update(
                session_id,
                progress,
                format!("Generated image {}/{total}", i + 1),
            );
        }

        // Saving: fatal on failure.
        self.tracker.update(session_id, 85, "Saving...");
        let artifact = GeneratedArtifact::new(
            page.title,
            page.text,
            analysis.summary,
            analysis.key_points,
            image_urls,
        );
        self.store.save(owner_id, &artifact).await?;
        self.tracker.update(session_id, 90, "Saved");

        Ok(artifact)
    }
}

/// Heuristic substitute used when the analysis collaborator fails.
///
/// Guarantees a non-empty summary, at least one key point, and at least one
/// image prompt, so the pipeline always has something to narrate.
pub fn fallback_analysis(title: &str, text: &str) -> AnalysisResult {
    let mut summary = leading_excerpt(text, FALLBACK_SUMMARY_CHARS);
    if summary.is_empty() {
        summary = format!("{title}.");
    }

    AnalysisResult {
        summary,
        key_points: vec![
            format!("The article is titled \"{title}\"."),
            "Automatic analysis was unavailable; this summary is taken from the opening of the article.".to_string(),
            "Read the full text for complete details.".to_string(),
        ],
        image_prompts: vec![format!(
            "Editorial illustration for an article titled \"{title}\""
        )],
    }
}

/// Takes up to `max_chars` from the start of `text`, preferring to cut at the
/// last sentence boundary inside the window.
fn leading_excerpt(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let window: String = trimmed.chars().take(max_chars).collect();
    match window.rfind(['.', '!', '?']) {
        Some(idx) if idx > max_chars / 2 => window[..=idx].to_string(),
        _ => format!("{}...", window.trim_end()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_never_empty() {
        let analysis = fallback_analysis("A Title", "");
        assert!(!analysis.summary.is_empty());
        assert!(!analysis.key_points.is_empty());
        assert!(!analysis.image_prompts.is_empty());
    }

    #[test]
    fn fallback_summary_uses_leading_text() {
        let text = "First sentence here. Second sentence follows. ".repeat(20);
        let analysis = fallback_analysis("A Title", &text);
        assert!(analysis.summary.starts_with("First sentence here."));
        assert!(analysis.summary.chars().count() <= FALLBACK_SUMMARY_CHARS + 3);
    }

    #[test]
    fn fallback_prompt_mentions_title() {
        let analysis = fallback_analysis("Rust in Production", "body");
        assert!(analysis.image_prompts[0].contains("Rust in Production"));
    }

    #[test]
    fn excerpt_cuts_at_sentence_boundary() {
        let text = format!("{} End of story.", "word ".repeat(100));
        let excerpt = leading_excerpt(&text, 40);
        assert!(excerpt.ends_with("..."));

        let text = format!("A fairly long opening sentence sits here. {}", "x".repeat(300));
        let excerpt = leading_excerpt(&text, 60);
        assert_eq!(excerpt, "A fairly long opening sentence sits here.");
    }
}
