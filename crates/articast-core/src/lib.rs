//! Core types and error definitions for the Articast pipeline.
//!
//! This crate provides the foundational types shared across all Articast
//! crates, including error handling and the artifact produced by a
//! successful generation run.
//!
//! # Main types
//!
//! - [`ArticastError`]: unified error enum for all Articast subsystems.
//! - [`ArticastResult`]: convenience alias for `Result<T, ArticastError>`.
//! - [`GeneratedArtifact`]: the structured output of one generation run.
//! - [`ExtractedPage`]: title and body text produced by content extraction.
//! - [`AnalysisResult`]: summary, key points, and image prompts produced by
//!   content analysis.

/// Artifact and collaborator boundary types.
pub mod artifact;

pub use artifact::{AnalysisResult, ExtractedPage, GeneratedArtifact};

// --- Error types ---

/// Top-level error type for the Articast service.
///
/// Each variant corresponds to a subsystem that can produce errors. The
/// pipeline treats [`ArticastError::Extraction`] and
/// [`ArticastError::Storage`] as fatal stage errors; analysis and individual
/// image-provider failures are absorbed before they reach this type.
#[derive(Debug, thiserror::Error)]
pub enum ArticastError {
    /// Content extraction from the source URL failed (fatal stage error).
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Content analysis failed. Only surfaced by collaborators; the pipeline
    /// substitutes a fallback instead of propagating it.
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Persisting the finished artifact failed (fatal stage error).
    #[error("Storage error: {0}")]
    Storage(String),

    /// An error from an outbound HTTP request (image provider, page fetch).
    #[error("HTTP error: {0}")]
    Http(String),

    /// An error related to progress-session lookup or lifecycle.
    #[error("Session error: {0}")]
    Session(String),

    /// An error from the HTTP gateway layer.
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`ArticastError`].
pub type ArticastResult<T> = Result<T, ArticastError>;
