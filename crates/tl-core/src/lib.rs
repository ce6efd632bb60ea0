//! Core types for Taleloom: scenes, illustrations, and the story transcript.
//!
//! Everything here is plain data. Scenes are produced by a narrative backend
//! and never edited afterwards; the transcript only grows until the player
//! restarts.

/// Opaque, renderable illustration returned by the image backend.
pub mod image;
/// Scenes as returned by the backend and scenes ready to be played.
pub mod scene;
/// Append-only record of the turns played so far.
pub mod transcript;

/// Re-export the illustration handle.
pub use image::ImageHandle;
/// Re-export scene types.
pub use scene::{MAX_CHOICES, PlayableScene, Scene};
/// Re-export transcript types.
pub use transcript::{Transcript, Turn};
