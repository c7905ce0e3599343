#![allow(clippy::unwrap_used, clippy::expect_used)]

use articast_core::{
    AnalysisResult, ArticastError, ArticastResult, ExtractedPage, GeneratedArtifact,
};
use articast_images::{ImagePayload, ImageProvider, ProviderChain, ProviderEntry};
use articast_pipeline::{Analyzer, ArtifactStore, Extractor, Generator};
use articast_progress::ProgressTracker;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

// --- Mock collaborators ---

struct MockExtractor {
    result: Result<ExtractedPage, String>,
    calls: AtomicU32,
}

impl MockExtractor {
    fn ok() -> Self {
        Self {
            result: Ok(ExtractedPage {
                title: "A".to_string(),
                text: "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
                       Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua."
                    .to_string(),
            }),
            calls: AtomicU32::new(0),
        }
    }

    fn failing(reason: &str) -> Self {
        Self {
            result: Err(reason.to_string()),
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    async fn extract(&self, _url: &str) -> ArticastResult<ExtractedPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.result {
            Ok(page) => Ok(page.clone()),
            Err(reason) => Err(ArticastError::Extraction(reason.clone())),
        }
    }
}

struct MockAnalyzer {
    fail: bool,
    prompts: usize,
    calls: AtomicU32,
}

impl MockAnalyzer {
    fn with_prompts(prompts: usize) -> Self {
        Self {
            fail: false,
            prompts,
            calls: AtomicU32::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            prompts: 0,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl Analyzer for MockAnalyzer {
    async fn analyze(&self, title: &str, _text: &str) -> ArticastResult<AnalysisResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ArticastError::Analysis("model unavailable".to_string()));
        }
        Ok(AnalysisResult {
            summary: format!("Summary of {title}"),
            key_points: vec!["point one".to_string(), "point two".to_string()],
            image_prompts: (0..self.prompts).map(|i| format!("prompt {i}")).collect(),
        })
    }
}

struct MockStore {
    fail: bool,
    calls: AtomicU32,
}

impl MockStore {
    fn ok() -> Self {
        Self {
            fail: false,
            calls: AtomicU32::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl ArtifactStore for MockStore {
    async fn save(&self, _owner_id: &str, artifact: &GeneratedArtifact) -> ArticastResult<Uuid> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ArticastError::Storage("disk full".to_string()));
        }
        Ok(artifact.id)
    }
}

/// An image provider that fails `failures` times before succeeding.
struct FlakyProvider {
    failures: u32,
    seen: AtomicU32,
}

#[async_trait]
impl ImageProvider for FlakyProvider {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn fetch(&self, _prompt: &str) -> ArticastResult<ImagePayload> {
        let n = self.seen.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            return Err(ArticastError::Http("503 Service Unavailable".to_string()));
        }
        Ok(ImagePayload {
            bytes: vec![0xAB; 4096],
            content_type: "image/jpeg".to_string(),
        })
    }
}

struct GoodProvider;

#[async_trait]
impl ImageProvider for GoodProvider {
    fn name(&self) -> &str {
        "good"
    }

    async fn fetch(&self, _prompt: &str) -> ArticastResult<ImagePayload> {
        Ok(ImagePayload {
            bytes: vec![0xCD; 4096],
            content_type: "image/jpeg".to_string(),
        })
    }
}

fn good_chain() -> Arc<ProviderChain> {
    Arc::new(ProviderChain::with_providers(vec![ProviderEntry::new(
        Duration::from_secs(1),
        Box::new(GoodProvider),
    )]))
}

fn generator(
    extractor: Arc<MockExtractor>,
    analyzer: Arc<MockAnalyzer>,
    store: Arc<MockStore>,
    chain: Arc<ProviderChain>,
) -> Generator {
    Generator::new(
        extractor,
        analyzer,
        store,
        chain,
        ProgressTracker::shared(),
    )
    .with_cleanup_delay(Duration::from_secs(60))
}

// --- Scenarios ---

#[tokio::test]
async fn full_run_produces_three_images_and_completes() {
    // First two providers fail for every prompt; the third succeeds. Every
    // prompt must still yield an image reference.
    let chain = Arc::new(ProviderChain::with_providers(vec![
        ProviderEntry::new(
            Duration::from_secs(1),
            Box::new(FlakyProvider {
                failures: u32::MAX,
                seen: AtomicU32::new(0),
            }),
        ),
        ProviderEntry::new(
            Duration::from_secs(1),
            Box::new(FlakyProvider {
                failures: u32::MAX,
                seen: AtomicU32::new(0),
            }),
        ),
        ProviderEntry::new(Duration::from_secs(1), Box::new(GoodProvider)),
    ]));

    let gen = generator(
        Arc::new(MockExtractor::ok()),
        Arc::new(MockAnalyzer::with_prompts(3)),
        Arc::new(MockStore::ok()),
        chain,
    );

    let artifact = gen
        .generate("s1", "owner-1", "https://example.com/a")
        .await
        .unwrap();

    assert_eq!(artifact.title, "A");
    assert_eq!(artifact.image_urls.len(), 3);
    for url in &artifact.image_urls {
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }

    let session = gen.tracker().get("s1").unwrap();
    assert_eq!(session.progress, 100);
    assert!(!session.error);
}

#[tokio::test]
async fn extraction_failure_short_circuits() {
    let analyzer = Arc::new(MockAnalyzer::with_prompts(3));
    let store = Arc::new(MockStore::ok());
    let gen = generator(
        Arc::new(MockExtractor::failing("timeout fetching page")),
        Arc::clone(&analyzer),
        Arc::clone(&store),
        good_chain(),
    );

    let err = gen
        .generate("s1", "owner-1", "https://example.com/a")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("timeout"));

    // No downstream collaborator ran.
    assert_eq!(analyzer.calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);

    let session = gen.tracker().get("s1").unwrap();
    assert!(session.error);
    assert!(session.message.contains("timeout"));
}

#[tokio::test]
async fn analysis_failure_falls_back_and_completes() {
    let gen = generator(
        Arc::new(MockExtractor::ok()),
        Arc::new(MockAnalyzer::failing()),
        Arc::new(MockStore::ok()),
        good_chain(),
    );

    let artifact = gen
        .generate("s1", "owner-1", "https://example.com/a")
        .await
        .unwrap();

    assert!(!artifact.summary.is_empty());
    assert!(!artifact.key_points.is_empty());
    assert!(!artifact.image_urls.is_empty());

    let session = gen.tracker().get("s1").unwrap();
    assert_eq!(session.progress, 100);
    assert!(!session.error);
}

#[tokio::test]
async fn storage_failure_is_terminal_error() {
    let gen = generator(
        Arc::new(MockExtractor::ok()),
        Arc::new(MockAnalyzer::with_prompts(1)),
        Arc::new(MockStore::failing()),
        good_chain(),
    );

    let err = gen
        .generate("s1", "owner-1", "https://example.com/a")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("disk full"));

    let session = gen.tracker().get("s1").unwrap();
    assert!(session.error);
}

#[tokio::test]
async fn prompts_are_capped_at_three() {
    let gen = generator(
        Arc::new(MockExtractor::ok()),
        Arc::new(MockAnalyzer::with_prompts(7)),
        Arc::new(MockStore::ok()),
        good_chain(),
    );

    let artifact = gen
        .generate("s1", "owner-1", "https://example.com/a")
        .await
        .unwrap();
    assert_eq!(artifact.image_urls.len(), 3);
}

#[tokio::test]
async fn duplicate_session_id_is_rejected_without_touching_first_run() {
    let tracker = ProgressTracker::shared();
    tracker.create("s1", "owner-1").unwrap();
    tracker.update("s1", 50, "halfway");

    let gen = Generator::new(
        Arc::new(MockExtractor::ok()),
        Arc::new(MockAnalyzer::with_prompts(1)),
        Arc::new(MockStore::ok()),
        good_chain(),
        Arc::clone(&tracker),
    );

    let err = gen
        .generate("s1", "owner-2", "https://example.com/b")
        .await
        .unwrap_err();
    assert!(matches!(err, ArticastError::Session(_)));

    let session = tracker.get("s1").unwrap();
    assert_eq!(session.progress, 50);
    assert_eq!(session.owner_id, "owner-1");
}

#[tokio::test]
async fn terminal_session_is_cleaned_up_after_delay() {
    let gen = Generator::new(
        Arc::new(MockExtractor::ok()),
        Arc::new(MockAnalyzer::with_prompts(1)),
        Arc::new(MockStore::ok()),
        good_chain(),
        ProgressTracker::shared(),
    )
    .with_cleanup_delay(Duration::from_millis(20));

    gen.generate("s1", "owner-1", "https://example.com/a")
        .await
        .unwrap();
    assert!(gen.tracker().get("s1").is_some());

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(gen.tracker().get("s1").is_none());
}
