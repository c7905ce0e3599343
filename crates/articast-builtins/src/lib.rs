//! Built-in collaborator implementations for the generation pipeline.
//!
//! These are the thin production wrappers behind the pipeline's boundary
//! traits: an HTTP page extractor, a heuristic text analyzer, and a
//! file-backed artifact store. Each can be swapped out independently by
//! implementing the corresponding trait from `articast-pipeline`.

/// Heuristic sentence-based analyzer.
pub mod analyzer;
/// HTTP page fetch and text extraction.
pub mod extractor;
/// JSON-file artifact store.
pub mod store;

pub use analyzer::HeuristicAnalyzer;
pub use extractor::HttpExtractor;
pub use store::{FileArtifactStore, StoredArtifact};
