//! Pipeline stages: compression, audio extraction, transcription.
//!
//! Each stage is a plain function over the codec-engine and
//! recognition-service traits. Stages create their own uniquely-named
//! temporary files; the orchestrator registers and reclaims them.

mod compress;
mod extract;
mod transcribe;

pub use compress::{compress, CompressionOutcome, CompressionProfile, QualityRung};
pub use extract::{extract_audio, ExtractError};
pub use transcribe::{transcribe, DEFAULT_SAMPLE_RATE};

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide sequence for temp-file names.
static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Build a unique path under `dir` for an artifact derived from `stem`.
///
/// Uniqueness comes from the process id plus a process-wide counter, so
/// concurrent runs never reference the same path and no locking is
/// needed anywhere in the pipeline.
pub(crate) fn unique_temp_path(dir: &Path, stem: &str, label: &str, ext: &str) -> PathBuf {
    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    dir.join(format!(
        "{}_{}_{}_{}.{}",
        stem,
        label,
        std::process::id(),
        seq,
        ext
    ))
}
