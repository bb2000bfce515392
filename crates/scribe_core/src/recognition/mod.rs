//! Recognition-service boundary.
//!
//! The transcription stage talks to speech-to-text through the
//! [`Recognizer`] trait. The production implementation,
//! [`GoogleRecognizer`], posts PCM audio to the Google speech endpoint;
//! tests substitute deterministic mocks.

mod google;
mod types;

pub use google::{GoogleRecognizer, DEFAULT_ENDPOINT};
pub use types::{RecognitionError, RecognitionResult};

use crate::models::AudioBuffer;

/// Synchronous speech-to-text service.
///
/// `recognize` is blocking and may take seconds on long audio; the
/// caller runs each pipeline invocation on its own worker.
pub trait Recognizer: Send + Sync {
    /// Recognize speech in the sample buffer using a language hint
    /// (BCP-47 / ISO 639-1 code, e.g. "ru" or "en-US").
    fn recognize(&self, audio: &AudioBuffer, language: &str) -> RecognitionResult<String>;
}
