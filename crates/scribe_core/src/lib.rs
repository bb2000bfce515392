//! Scribe Core - media transcription pipeline
//!
//! This crate converts an uploaded video or audio file into recognized
//! text: adaptive re-encoding when the source exceeds a size budget,
//! audio-track extraction, speech-to-text conversion, and deterministic
//! temporary-file cleanup on every exit path.
//!
//! It contains all business logic with zero bot/UI dependencies. The
//! chat surface and file transport are external callers that hand in a
//! local file path and receive a [`models::PipelineReport`] back.

pub mod codec;
pub mod config;
pub mod janitor;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod recognition;
pub mod stages;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
