//! Media descriptors: source files, probe results, decoded audio.

use std::fs;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Declared kind of an uploaded media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }
}

/// A source file handed to the pipeline by the file store.
///
/// The orchestrator takes ownership for the duration of a run and
/// deletes the file when the run ends, after all derived artifacts
/// have been reclaimed.
#[derive(Debug, Clone)]
pub struct SourceMedia {
    /// Path to the downloaded file on local storage.
    pub path: PathBuf,
    /// Size on disk at hand-off time.
    pub size_bytes: u64,
    /// Declared media kind.
    pub kind: MediaKind,
}

impl SourceMedia {
    /// Build a source descriptor from an existing file.
    pub fn from_path(path: impl Into<PathBuf>, kind: MediaKind) -> io::Result<Self> {
        let path = path.into();
        let size_bytes = fs::metadata(&path)?.len();
        Ok(Self {
            path,
            size_bytes,
            kind,
        })
    }
}

/// Container information reported by the codec engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaProbe {
    /// Whether the container has at least one audio stream.
    pub has_audio: bool,
    /// Container duration, if the engine could determine it.
    pub duration_secs: Option<f64>,
    /// Size of the file on disk.
    pub size_bytes: u64,
}

/// Decoded PCM audio with its format metadata.
///
/// Samples are mono, signed 16-bit, at `sample_rate` Hz.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    /// Bytes per sample (2 for i16 PCM).
    pub sample_width: u16,
}

impl AudioBuffer {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            sample_width: 2,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration of the buffer in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Root-mean-square energy over a sample range (clamped to the
    /// buffer). Returns 0.0 for an empty range.
    pub fn rms(&self, range: Range<usize>) -> f64 {
        let start = range.start.min(self.samples.len());
        let end = range.end.min(self.samples.len());
        if start >= end {
            return 0.0;
        }
        let sum_sq: f64 = self.samples[start..end]
            .iter()
            .map(|&s| {
                let v = s as f64;
                v * v
            })
            .sum();
        (sum_sq / (end - start) as f64).sqrt()
    }
}

/// Size of a file on disk, 0 if it cannot be statted.
pub(crate) fn file_size(path: &Path) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
