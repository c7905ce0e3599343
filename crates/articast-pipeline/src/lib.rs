//! The generation pipeline: URL in, narratable artifact out.
//!
//! The [`Generator`] drives one request through extraction, analysis, image
//! generation, and storage, writing a progress record at each stage boundary.
//! Extraction and storage failures are fatal; analysis failures are absorbed
//! with a fallback so that stage can never abort the pipeline.

/// Boundary traits for the external collaborators the pipeline consumes.
pub mod collaborators;
/// The stage-driving orchestrator.
pub mod generator;

pub use collaborators::{Analyzer, ArtifactStore, Extractor};
pub use generator::{fallback_analysis, Generator, MAX_IMAGE_PROMPTS};
