//! Pipeline runner composing the stages into the two workflows.

use std::fs;
use std::path::PathBuf;

use crate::codec::CodecEngine;
use crate::config::{ProcessingSettings, Settings};
use crate::models::{file_size, FailureKind, PipelineReport, SourceMedia, TranscriptionOutcome};
use crate::recognition::Recognizer;
use crate::stages::{self, CompressionProfile, ExtractError};

use super::artifacts::ArtifactTracker;

/// Orchestrates `video → text` and `audio → text` runs.
///
/// Each run is a single sequential workflow over one source file. The
/// pipeline holds no per-run state, so one instance can serve many
/// concurrent runs from independent workers; uniqueness of temp-file
/// names is the only shared-namespace discipline.
pub struct MediaPipeline<E, R> {
    engine: E,
    recognizer: R,
    work_dir: PathBuf,
    processing: ProcessingSettings,
}

impl<E: CodecEngine, R: Recognizer> MediaPipeline<E, R> {
    pub fn new(engine: E, recognizer: R, settings: &Settings) -> Self {
        Self {
            engine,
            recognizer,
            work_dir: PathBuf::from(&settings.paths.temp_root),
            processing: settings.processing.clone(),
        }
    }

    /// The configured default language hint.
    pub fn default_language(&self) -> &str {
        &self.processing.language
    }

    /// Run the full `video → text` workflow.
    ///
    /// Takes ownership of the source file: it is deleted when the run
    /// ends, after every derived artifact, regardless of outcome.
    pub fn run_video_to_text(&self, source: SourceMedia, language: Option<&str>) -> PipelineReport {
        let run_id = new_run_id();
        let span = tracing::info_span!("pipeline_run", id = %run_id);
        let _guard = span.enter();

        let language = language.unwrap_or(&self.processing.language);
        let original_size = source.size_bytes;
        tracing::info!(
            "Video run: {} ({} bytes, lang={})",
            source.path.display(),
            original_size,
            language
        );

        self.ensure_work_dir();
        let mut tracker = ArtifactTracker::new(source.path.clone());

        // Compression, only when the source exceeds the processing
        // budget. Failure inside the stage degrades to the original.
        let budget = self.processing.size_budget_bytes;
        let (video_path, compressed) = if original_size > budget {
            let outcome = stages::compress(
                &self.engine,
                &source.path,
                budget,
                &CompressionProfile::PROCESSING,
                &self.work_dir,
            );
            if outcome.compressed {
                tracker.register(outcome.path.clone());
            }
            (outcome.path, outcome.compressed)
        } else {
            (source.path.clone(), false)
        };

        let video_size = if compressed {
            file_size(&video_path)
        } else {
            original_size
        };

        // Extraction failures are fatal and skip straight to cleanup.
        let audio_path = match stages::extract_audio(
            &self.engine,
            &video_path,
            &self.work_dir,
            self.processing.audio_bitrate_kbps,
        ) {
            Ok(path) => {
                tracker.register(path.clone());
                path
            }
            Err(e) => {
                let kind = match e {
                    ExtractError::NoAudioTrack => FailureKind::NoAudioTrack,
                    ExtractError::ExtractionFailed(_) => FailureKind::ExtractionFailed,
                };
                let report = PipelineReport::from_outcome(
                    TranscriptionOutcome::failure(kind, e.to_string()),
                    original_size,
                    video_size,
                    0,
                    compressed,
                );
                tracker.cleanup();
                return report;
            }
        };

        let audio_size = file_size(&audio_path);

        let outcome = stages::transcribe(
            &self.engine,
            &self.recognizer,
            &audio_path,
            language,
            self.processing.sample_rate,
        );

        let report = PipelineReport::from_outcome(
            outcome,
            original_size,
            video_size,
            audio_size,
            compressed,
        );
        tracker.cleanup();

        tracing::info!("Video run finished: success={}", report.success);
        report
    }

    /// Run the `audio → text` workflow: transcribe directly, then
    /// delete the source in cleanup.
    pub fn run_audio_to_text(&self, source: SourceMedia, language: Option<&str>) -> PipelineReport {
        let run_id = new_run_id();
        let span = tracing::info_span!("pipeline_run", id = %run_id);
        let _guard = span.enter();

        let language = language.unwrap_or(&self.processing.language);
        let original_size = source.size_bytes;
        tracing::info!(
            "Audio run: {} ({} bytes, lang={})",
            source.path.display(),
            original_size,
            language
        );

        self.ensure_work_dir();
        let mut tracker = ArtifactTracker::new(source.path.clone());

        let outcome = stages::transcribe(
            &self.engine,
            &self.recognizer,
            &source.path,
            language,
            self.processing.sample_rate,
        );

        let report =
            PipelineReport::from_outcome(outcome, original_size, 0, original_size, false);
        tracker.cleanup();

        tracing::info!("Audio run finished: success={}", report.success);
        report
    }

    fn ensure_work_dir(&self) {
        if let Err(e) = fs::create_dir_all(&self.work_dir) {
            tracing::warn!(
                "Could not create work dir {}: {}",
                self.work_dir.display(),
                e
            );
        }
    }
}

/// Timestamped run identifier for log correlation.
fn new_run_id() -> String {
    format!("run_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S%.3f"))
}
