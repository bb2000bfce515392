//! Outcome types: failure taxonomy, stage outcomes, and the
//! caller-facing pipeline report.

use serde::{Deserialize, Serialize};

/// Failure taxonomy spanning the three failure domains: encoding,
/// decoding, and the recognition service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Video has no audio stream. Fatal to the run.
    NoAudioTrack,
    /// Codec engine error during audio extraction. Fatal to the run.
    ExtractionFailed,
    /// Re-encoding failed. Non-fatal: the run proceeds with the
    /// uncompressed source, so this kind never reaches a report.
    CompressionFailed,
    /// The recognition service found no speech. Fatal, but distinct
    /// from an outage: the caller should suggest a different file
    /// rather than retry.
    Unrecognizable,
    /// Recognition service unreachable or it rejected the request.
    /// Fatal; eligible for caller-level retry.
    ServiceError,
    /// Catch-all decode/runtime fault. Fatal to the run.
    ProcessingError,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::NoAudioTrack => "no_audio_track",
            FailureKind::ExtractionFailed => "extraction_failed",
            FailureKind::CompressionFailed => "compression_failed",
            FailureKind::Unrecognizable => "unrecognizable",
            FailureKind::ServiceError => "service_error",
            FailureKind::ProcessingError => "processing_error",
        }
    }
}

/// Outcome of the transcription stage (and of the whole pipeline, once
/// wrapped into a report). Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptionOutcome {
    Success { text: String },
    Failure { kind: FailureKind, message: String },
}

impl TranscriptionOutcome {
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The user-facing text for this outcome: recognized text on
    /// success, the explanatory message on failure.
    pub fn text(&self) -> &str {
        match self {
            Self::Success { text } => text,
            Self::Failure { message, .. } => message,
        }
    }
}

/// Aggregate result returned to the caller. Created once per run,
/// never mutated after return. The only value crossing the caller
/// boundary; serializable so the excluded chat layer can render it.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Whether the run produced recognized text.
    pub success: bool,
    /// Recognized text, or an explanatory error message.
    pub text: String,
    /// Failure kind when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    /// Size of the source file as handed in.
    pub original_size: u64,
    /// Size of the video actually processed (post-compression when a
    /// compressed artifact was produced). 0 for audio-only runs.
    pub video_size: u64,
    /// Size of the extracted (or source) audio artifact.
    pub audio_size: u64,
    /// Whether a compressed artifact was produced.
    pub compressed: bool,
}

impl PipelineReport {
    /// Build a report from a transcription outcome plus size metrics.
    pub fn from_outcome(
        outcome: TranscriptionOutcome,
        original_size: u64,
        video_size: u64,
        audio_size: u64,
        compressed: bool,
    ) -> Self {
        match outcome {
            TranscriptionOutcome::Success { text } => Self {
                success: true,
                text,
                failure: None,
                original_size,
                video_size,
                audio_size,
                compressed,
            },
            TranscriptionOutcome::Failure { kind, message } => Self {
                success: false,
                text: message,
                failure: Some(kind),
                original_size,
                video_size,
                audio_size,
                compressed,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_text_for_both_variants() {
        let ok = TranscriptionOutcome::success("привет мир");
        assert!(ok.is_success());
        assert_eq!(ok.text(), "привет мир");

        let err = TranscriptionOutcome::failure(FailureKind::Unrecognizable, "no speech");
        assert!(!err.is_success());
        assert_eq!(err.text(), "no speech");
    }

    #[test]
    fn report_from_success_outcome() {
        let report = PipelineReport::from_outcome(
            TranscriptionOutcome::success("text"),
            60_000_000,
            44_000_000,
            2_000_000,
            true,
        );
        assert!(report.success);
        assert!(report.failure.is_none());
        assert_eq!(report.video_size, 44_000_000);
        assert!(report.compressed);
    }

    #[test]
    fn report_from_failure_carries_kind() {
        let report = PipelineReport::from_outcome(
            TranscriptionOutcome::failure(FailureKind::ServiceError, "service down"),
            1000,
            1000,
            0,
            false,
        );
        assert!(!report.success);
        assert_eq!(report.failure, Some(FailureKind::ServiceError));
        assert_eq!(report.text, "service down");
    }

    #[test]
    fn failure_kind_serializes_snake_case() {
        let json = serde_json::to_string(&FailureKind::NoAudioTrack).unwrap();
        assert_eq!(json, "\"no_audio_track\"");
        assert_eq!(FailureKind::NoAudioTrack.as_str(), "no_audio_track");
    }

    #[test]
    fn report_serializes_without_failure_field_on_success() {
        let report = PipelineReport::from_outcome(
            TranscriptionOutcome::success("ok"),
            10,
            10,
            5,
            false,
        );
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("failure"));
        assert!(json.contains("\"success\":true"));
    }
}
