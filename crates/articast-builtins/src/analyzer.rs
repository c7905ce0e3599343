use articast_core::{AnalysisResult, ArticastError, ArticastResult};
use articast_pipeline::Analyzer;
use async_trait::async_trait;

const SUMMARY_SENTENCES: usize = 3;
const MAX_KEY_POINTS: usize = 5;
const MAX_IMAGE_PROMPTS: usize = 3;
const PROMPT_SNIPPET_CHARS: usize = 60;

/// Deterministic sentence-based analyzer.
///
/// No model behind it: the summary is the article's opening, key points are
/// informative-looking sentences, and image prompts are derived from the
/// title and leading sentences. Good enough to keep the pipeline fully
/// functional without an inference dependency.
pub struct HeuristicAnalyzer;

impl HeuristicAnalyzer {
    /// Creates the analyzer.
    pub fn new() -> Self {
        Self
    }
}

impl Default for HeuristicAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Analyzer for HeuristicAnalyzer {
    async fn analyze(&self, title: &str, text: &str) -> ArticastResult<AnalysisResult> {
        let sentences = split_sentences(text);
        if sentences.is_empty() {
            return Err(ArticastError::Analysis(
                "no sentences found in article text".to_string(),
            ));
        }

        let summary = sentences
            .iter()
            .take(SUMMARY_SENTENCES)
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");

        let mut key_points: Vec<String> = sentences
            .iter()
            .filter(|s| (40..=240).contains(&s.chars().count()))
            .take(MAX_KEY_POINTS)
            .cloned()
            .collect();
        if key_points.is_empty() {
            key_points.push(sentences[0].clone());
        }

        let mut image_prompts = vec![format!("Editorial illustration: {title}")];
        for sentence in sentences.iter().take(MAX_IMAGE_PROMPTS - 1) {
            image_prompts.push(format!("Scene depicting: {}", snippet(sentence)));
        }

        Ok(AnalysisResult {
            summary,
            key_points,
            image_prompts,
        })
    }
}

/// Splits text into trimmed sentences on `.`, `!`, and `?` boundaries.
fn split_sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            let trimmed = current.trim();
            if trimmed.chars().count() > 10 {
                out.push(trimmed.to_string());
            }
            current.clear();
        }
    }
    let tail = current.trim();
    if tail.chars().count() > 10 {
        out.push(tail.to_string());
    }
    out
}

fn snippet(sentence: &str) -> String {
    let s: String = sentence.chars().take(PROMPT_SNIPPET_CHARS).collect();
    s.trim_end_matches(['.', '!', '?']).trim().to_string()
}
