//! Adaptive video re-encoding against a size budget.
//!
//! A source over the target size is re-encoded down a fixed two-rung
//! quality ladder. Each rung trades video fidelity for size while the
//! audio bitrate stays comparatively high: the downstream value is the
//! speech content, not the picture.

use std::fs;
use std::path::{Path, PathBuf};

use crate::codec::CodecEngine;
use crate::models::file_size;

use super::unique_temp_path;

/// One step in the compression quality ladder.
#[derive(Debug, Clone, Copy)]
pub struct QualityRung {
    /// Resolution ceiling (output height never exceeds this).
    pub max_height: u32,
    /// x264 CRF quality factor; higher means smaller and worse.
    pub crf: u32,
    /// Audio bitrate in kbit/s.
    pub audio_bitrate_kbps: u32,
}

/// An ordered, fixed escalation of quality rungs.
///
/// Exactly two rungs: the second is the final fallback and its output
/// is accepted whatever its size. Additional rungs would slot into the
/// array without touching the loop below.
#[derive(Debug, Clone, Copy)]
pub struct CompressionProfile {
    pub name: &'static str,
    pub rungs: [QualityRung; 2],
}

impl CompressionProfile {
    /// Ladder for pipeline-internal processing: size wins over
    /// fidelity since the artifact only feeds audio extraction.
    pub const PROCESSING: Self = Self {
        name: "processing",
        rungs: [
            QualityRung {
                max_height: 480,
                crf: 28,
                audio_bitrate_kbps: 128,
            },
            QualityRung {
                max_height: 360,
                crf: 35,
                audio_bitrate_kbps: 96,
            },
        ],
    };

    /// Ladder for artifacts sent back to a person; keeps a higher
    /// resolution floor.
    pub const DELIVERY: Self = Self {
        name: "delivery",
        rungs: [
            QualityRung {
                max_height: 720,
                crf: 26,
                audio_bitrate_kbps: 128,
            },
            QualityRung {
                max_height: 480,
                crf: 32,
                audio_bitrate_kbps: 96,
            },
        ],
    };
}

/// Result of a compression attempt.
#[derive(Debug, Clone)]
pub struct CompressionOutcome {
    /// Path to use downstream: a new artifact when `compressed`,
    /// otherwise the original input.
    pub path: PathBuf,
    /// Whether a new artifact was produced.
    pub compressed: bool,
}

impl CompressionOutcome {
    fn original(input: &Path) -> Self {
        Self {
            path: input.to_path_buf(),
            compressed: false,
        }
    }
}

/// Re-encode `input` until it fits `target_bytes`, walking the
/// profile's ladder.
///
/// - At or under the target: no-op, no new artifact.
/// - Each rung re-encodes from the original (never from a previous
///   rung's output) and replaces the previous rung's file.
/// - After the last rung the result is accepted regardless of size.
/// - Any codec failure degrades gracefully: the original path comes
///   back with `compressed = false` and partial files are removed.
pub fn compress<E: CodecEngine>(
    engine: &E,
    input: &Path,
    target_bytes: u64,
    profile: &CompressionProfile,
    work_dir: &Path,
) -> CompressionOutcome {
    if target_bytes == 0 {
        tracing::warn!("Compression target of 0 bytes; passing source through");
        return CompressionOutcome::original(input);
    }

    let source_size = match fs::metadata(input) {
        Ok(meta) => meta.len(),
        Err(e) => {
            tracing::warn!(
                "Could not stat {}: {}; passing source through",
                input.display(),
                e
            );
            return CompressionOutcome::original(input);
        }
    };
    if source_size <= target_bytes {
        tracing::debug!(
            "{} is {} bytes, within target {}; no compression needed",
            input.display(),
            source_size,
            target_bytes
        );
        return CompressionOutcome::original(input);
    }

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());

    let mut produced: Option<PathBuf> = None;

    for (rung_index, rung) in profile.rungs.iter().enumerate() {
        let output = unique_temp_path(
            work_dir,
            &stem,
            &format!("{}_r{}", profile.name, rung_index + 1),
            "mp4",
        );

        tracing::info!(
            "Compressing {} (rung {}: {}p, crf {}, audio {}k)",
            input.display(),
            rung_index + 1,
            rung.max_height,
            rung.crf,
            rung.audio_bitrate_kbps
        );

        if let Err(e) = engine.transcode_video(
            input,
            &output,
            rung.max_height,
            rung.crf,
            rung.audio_bitrate_kbps,
        ) {
            tracing::warn!(
                "Compression failed at rung {}: {}; falling back to original",
                rung_index + 1,
                e
            );
            remove_quietly(&output);
            if let Some(prev) = produced.take() {
                remove_quietly(&prev);
            }
            return CompressionOutcome::original(input);
        }

        // The new rung replaces the previous one's artifact.
        if let Some(prev) = produced.take() {
            remove_quietly(&prev);
        }

        let out_size = file_size(&output);
        tracing::info!(
            "Rung {} produced {} bytes (target {})",
            rung_index + 1,
            out_size,
            target_bytes
        );

        produced = Some(output);
        if out_size <= target_bytes {
            break;
        }
    }

    match produced {
        Some(path) => CompressionOutcome {
            path,
            compressed: true,
        },
        None => CompressionOutcome::original(input),
    }
}

fn remove_quietly(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!("Could not remove {}: {}", path.display(), e);
        }
    }
}
