//! Audio-track extraction from a video container.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::codec::CodecEngine;

use super::unique_temp_path;

/// Typed failures of the extraction stage. Both are fatal to a
/// video-to-text run.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The container has no audio stream at all.
    #[error("The video file has no audio track")]
    NoAudioTrack,

    /// The codec engine failed during probe or encode.
    #[error("Audio extraction failed: {0}")]
    ExtractionFailed(String),
}

/// Demultiplex the audio track of `video_path` and encode it to a
/// standalone MP3 under `work_dir`.
///
/// Probes first: a container without an audio stream fails with the
/// typed [`ExtractError::NoAudioTrack`] before any artifact is created.
pub fn extract_audio<E: CodecEngine>(
    engine: &E,
    video_path: &Path,
    work_dir: &Path,
    audio_bitrate_kbps: u32,
) -> Result<PathBuf, ExtractError> {
    tracing::info!("Extracting audio from {}", video_path.display());

    let probe = engine
        .probe(video_path)
        .map_err(|e| ExtractError::ExtractionFailed(e.to_string()))?;

    if !probe.has_audio {
        tracing::warn!("{} has no audio stream", video_path.display());
        return Err(ExtractError::NoAudioTrack);
    }

    let stem = video_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());
    let output = unique_temp_path(work_dir, &stem, "audio", "mp3");

    engine
        .extract_audio_track(video_path, &output, audio_bitrate_kbps)
        .map_err(|e| {
            remove_quietly(&output);
            ExtractError::ExtractionFailed(e.to_string())
        })?;

    // The engine reported success; the artifact must exist and be
    // non-empty or something went wrong underneath.
    let size = fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
    if size == 0 {
        remove_quietly(&output);
        return Err(ExtractError::ExtractionFailed(format!(
            "Extracted audio missing or empty: {}",
            output.display()
        )));
    }

    tracing::info!("Audio extracted: {} ({} bytes)", output.display(), size);
    Ok(output)
}

fn remove_quietly(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!("Could not remove {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CodecError, CodecResult};
    use crate::models::{AudioBuffer, MediaProbe};

    struct FakeEngine {
        has_audio: bool,
        fail_extract: bool,
        write_empty: bool,
    }

    impl CodecEngine for FakeEngine {
        fn probe(&self, path: &Path) -> CodecResult<MediaProbe> {
            Ok(MediaProbe {
                has_audio: self.has_audio,
                duration_secs: Some(10.0),
                size_bytes: fs::metadata(path).map(|m| m.len()).unwrap_or(0),
            })
        }

        fn transcode_video(
            &self,
            _input: &Path,
            _output: &Path,
            _max_height: u32,
            _crf: u32,
            _audio_bitrate_kbps: u32,
        ) -> CodecResult<()> {
            unimplemented!("not used in extraction tests")
        }

        fn extract_audio_track(
            &self,
            _input: &Path,
            output: &Path,
            _audio_bitrate_kbps: u32,
        ) -> CodecResult<()> {
            if self.fail_extract {
                return Err(CodecError::engine_failed("ffmpeg", 1, "demux error"));
            }
            let content = if self.write_empty {
                Vec::new()
            } else {
                vec![0u8; 2048]
            };
            fs::write(output, content).unwrap();
            Ok(())
        }

        fn decode_samples(&self, _path: &Path, _sample_rate: u32) -> CodecResult<AudioBuffer> {
            unimplemented!("not used in extraction tests")
        }
    }

    fn write_video(dir: &Path) -> PathBuf {
        let path = dir.join("clip.mp4");
        fs::write(&path, vec![0u8; 100]).unwrap();
        path
    }

    #[test]
    fn extracts_audio_to_mp3() {
        let dir = tempfile::tempdir().unwrap();
        let video = write_video(dir.path());
        let engine = FakeEngine {
            has_audio: true,
            fail_extract: false,
            write_empty: false,
        };

        let audio = extract_audio(&engine, &video, dir.path(), 128).unwrap();
        assert!(audio.exists());
        assert_eq!(audio.extension().unwrap(), "mp3");
    }

    #[test]
    fn no_audio_track_is_typed_and_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let video = write_video(dir.path());
        let engine = FakeEngine {
            has_audio: false,
            fail_extract: false,
            write_empty: false,
        };

        let result = extract_audio(&engine, &video, dir.path(), 128);
        assert!(matches!(result, Err(ExtractError::NoAudioTrack)));
        // Only the source video in the work dir.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn engine_failure_maps_to_extraction_failed() {
        let dir = tempfile::tempdir().unwrap();
        let video = write_video(dir.path());
        let engine = FakeEngine {
            has_audio: true,
            fail_extract: true,
            write_empty: false,
        };

        let result = extract_audio(&engine, &video, dir.path(), 128);
        match result {
            Err(ExtractError::ExtractionFailed(msg)) => assert!(msg.contains("demux error")),
            other => panic!("unexpected result: {:?}", other.map(|p| p.display().to_string())),
        }
    }

    #[test]
    fn empty_output_is_rejected_and_removed() {
        let dir = tempfile::tempdir().unwrap();
        let video = write_video(dir.path());
        let engine = FakeEngine {
            has_audio: true,
            fail_extract: false,
            write_empty: true,
        };

        let result = extract_audio(&engine, &video, dir.path(), 128);
        assert!(matches!(result, Err(ExtractError::ExtractionFailed(_))));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
