//! Codec-engine boundary.
//!
//! All decode/encode work goes through the [`CodecEngine`] trait so the
//! pipeline stages stay independent of the concrete tool. The production
//! implementation, [`FfmpegEngine`], shells out to `ffprobe`/`ffmpeg`;
//! tests substitute mock engines.

mod ffmpeg;
mod types;

pub use ffmpeg::FfmpegEngine;
pub use types::{CodecError, CodecResult};

use std::path::Path;

use crate::models::{AudioBuffer, MediaProbe};

/// Synchronous codec operations used by the pipeline stages.
///
/// All operations are blocking and potentially long-running; callers
/// orchestrating concurrent requests run each pipeline invocation on
/// its own worker.
pub trait CodecEngine: Send + Sync {
    /// Inspect a container: audio presence, duration, size on disk.
    fn probe(&self, path: &Path) -> CodecResult<MediaProbe>;

    /// Re-encode a video under a resolution ceiling with the given
    /// quality factor (CRF, higher = smaller) and audio bitrate.
    fn transcode_video(
        &self,
        input: &Path,
        output: &Path,
        max_height: u32,
        crf: u32,
        audio_bitrate_kbps: u32,
    ) -> CodecResult<()>;

    /// Demultiplex the audio track and encode it to a standalone
    /// lossy audio file.
    fn extract_audio_track(
        &self,
        input: &Path,
        output: &Path,
        audio_bitrate_kbps: u32,
    ) -> CodecResult<()>;

    /// Decode any supported container to mono 16-bit PCM at the given
    /// sample rate.
    fn decode_samples(&self, path: &Path, sample_rate: u32) -> CodecResult<AudioBuffer>;
}
