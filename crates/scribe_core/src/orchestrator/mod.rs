//! Pipeline orchestrator for media transcription runs.
//!
//! Composes the stages into the two caller-facing workflows:
//!
//! ```text
//! run_video_to_text
//!     ├── Compress   (only when over the processing size budget)
//!     ├── Extract    (audio track → standalone MP3)
//!     ├── Transcribe (decode → calibrate → recognize)
//!     └── Cleanup    (always: intermediates in reverse order, source last)
//!
//! run_audio_to_text
//!     ├── Transcribe
//!     └── Cleanup
//! ```
//!
//! The caller receives a [`crate::models::PipelineReport`] on every
//! path; stage failures are values, never panics or escaped errors.

mod artifacts;
mod runner;

pub use artifacts::ArtifactTracker;
pub use runner::MediaPipeline;
