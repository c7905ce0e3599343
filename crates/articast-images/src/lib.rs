//! Ordered multi-provider image generation with a local fallback.
//!
//! The [`ProviderChain`] tries remote providers in priority order and always
//! returns a usable image reference: the first provider to deliver a
//! plausible payload wins, and when every provider fails the chain renders a
//! deterministic SVG placeholder locally. Callers never need to null-check
//! image references.

/// The "try in order" combinator over provider descriptors.
pub mod chain;
/// Locally rendered SVG fallback.
pub mod placeholder;
/// Remote provider implementations behind the [`ImageProvider`] trait.
pub mod providers;

pub use chain::{ProviderChain, ProviderEntry, MIN_IMAGE_BYTES};
pub use placeholder::placeholder_image;
pub use providers::{ImagePayload, ImageProvider, LoremFlickrProvider, PollinationsProvider};
