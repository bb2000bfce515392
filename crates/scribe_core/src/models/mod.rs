//! Data models for the transcription pipeline.
//!
//! This module contains the core data structures shared across stages:
//! - Media descriptors (source files, probe results, decoded audio)
//! - Outcome types (failure taxonomy, per-stage outcomes)
//! - The caller-facing `PipelineReport`

mod media;
mod report;

// Re-export all public types
pub use media::{AudioBuffer, MediaKind, MediaProbe, SourceMedia};
pub use report::{FailureKind, PipelineReport, TranscriptionOutcome};

pub(crate) use media::file_size;
