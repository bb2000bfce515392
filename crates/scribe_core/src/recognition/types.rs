//! Error types for the recognition-service boundary.

use thiserror::Error;

/// Typed failures from the speech recognition service.
#[derive(Error, Debug)]
pub enum RecognitionError {
    /// The service processed the audio but found no speech
    /// (silence, music-only, or too quiet).
    #[error("No speech detected in the audio")]
    NoSpeechDetected,

    /// The service is unreachable, timed out, or returned a server
    /// error. Eligible for caller-level retry.
    #[error("Recognition service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The service rejected the request (bad key, unsupported format,
    /// malformed payload).
    #[error("Recognition service rejected the request: {0}")]
    InvalidRequest(String),
}

/// Result type for recognition operations.
pub type RecognitionResult<T> = Result<T, RecognitionError>;
