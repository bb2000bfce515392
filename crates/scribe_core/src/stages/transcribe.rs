//! Speech-to-text conversion with ambient-noise calibration.
//!
//! The stage decodes an audio file to PCM, calibrates an energy
//! threshold against the leading portion of the stream, and sends the
//! remainder to the recognition service. Every failure mode becomes a
//! [`TranscriptionOutcome::Failure`] value; nothing escapes this
//! boundary as an error.

use std::path::Path;

use crate::codec::CodecEngine;
use crate::models::{AudioBuffer, FailureKind, TranscriptionOutcome};
use crate::recognition::{RecognitionError, Recognizer};

/// Recognition sample rate: speech services expect 16 kHz mono.
pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

/// Leading portion of the stream used for noise calibration. It is
/// consumed: recognition runs on the remainder.
const CALIBRATION_WINDOW_SECS: f64 = 0.5;

/// Multiplier applied to the ambient RMS to get the speech threshold.
const DYNAMIC_ENERGY_FACTOR: f64 = 1.5;

/// Floor for the energy threshold, in i16 amplitude units.
const MIN_ENERGY_THRESHOLD: f64 = 300.0;

/// Frame length for the silence gate.
const FRAME_SECS: f64 = 0.03;

/// Convert an audio file into text.
///
/// Never returns an error: decode faults map to `ProcessingError`,
/// service faults to `ServiceError`, and absent speech to
/// `Unrecognizable`.
pub fn transcribe<E: CodecEngine, R: Recognizer>(
    engine: &E,
    recognizer: &R,
    audio_path: &Path,
    language: &str,
    sample_rate: u32,
) -> TranscriptionOutcome {
    tracing::info!("Transcribing {} (lang={})", audio_path.display(), language);

    let audio = match engine.decode_samples(audio_path, sample_rate) {
        Ok(audio) => audio,
        Err(e) => {
            tracing::error!("Failed to decode {}: {}", audio_path.display(), e);
            return TranscriptionOutcome::failure(
                FailureKind::ProcessingError,
                format!("Failed to decode audio: {}", e),
            );
        }
    };

    if audio.is_empty() {
        return TranscriptionOutcome::failure(
            FailureKind::ProcessingError,
            "Decoded audio stream is empty",
        );
    }

    let calibration = calibrate(&audio);
    tracing::debug!(
        "Noise calibration: threshold {:.1} over {} leading samples",
        calibration.threshold,
        calibration.consumed
    );

    let speech = &audio.samples[calibration.consumed..];
    if speech.is_empty() || !crosses_threshold(speech, audio.sample_rate, calibration.threshold) {
        tracing::warn!("No speech energy above the ambient noise floor");
        return TranscriptionOutcome::failure(
            FailureKind::Unrecognizable,
            "Could not recognize speech: the audio is silent or too quiet",
        );
    }

    let payload = AudioBuffer::new(speech.to_vec(), audio.sample_rate);

    match recognizer.recognize(&payload, language) {
        Ok(text) if text.trim().is_empty() => TranscriptionOutcome::failure(
            FailureKind::Unrecognizable,
            "The recognition service returned an empty transcript",
        ),
        Ok(text) => {
            tracing::info!("Recognized {} characters of text", text.chars().count());
            TranscriptionOutcome::success(text)
        }
        Err(RecognitionError::NoSpeechDetected) => TranscriptionOutcome::failure(
            FailureKind::Unrecognizable,
            "Could not recognize speech in the audio: it may be too quiet or contain only music",
        ),
        Err(e @ RecognitionError::ServiceUnavailable(_)) => {
            tracing::error!("Recognition service error: {}", e);
            TranscriptionOutcome::failure(FailureKind::ServiceError, e.to_string())
        }
        Err(e @ RecognitionError::InvalidRequest(_)) => {
            tracing::error!("Recognition request rejected: {}", e);
            TranscriptionOutcome::failure(FailureKind::ServiceError, e.to_string())
        }
    }
}

struct Calibration {
    /// Energy threshold separating ambient noise from speech.
    threshold: f64,
    /// Samples consumed by the calibration window.
    consumed: usize,
}

/// Measure the ambient noise floor over the leading window.
///
/// The threshold is the ambient RMS scaled by the dynamic factor, never
/// below the floor. Buffers shorter than the window skip calibration
/// entirely and keep all samples for recognition.
fn calibrate(audio: &AudioBuffer) -> Calibration {
    let window = (audio.sample_rate as f64 * CALIBRATION_WINDOW_SECS) as usize;
    if window == 0 || audio.len() <= window {
        return Calibration {
            threshold: MIN_ENERGY_THRESHOLD,
            consumed: 0,
        };
    }

    let ambient_rms = audio.rms(0..window);
    let threshold = (ambient_rms * DYNAMIC_ENERGY_FACTOR).max(MIN_ENERGY_THRESHOLD);

    Calibration {
        threshold,
        consumed: window,
    }
}

/// Whether any frame's RMS exceeds the threshold.
fn crosses_threshold(samples: &[i16], sample_rate: u32, threshold: f64) -> bool {
    let frame_len = ((sample_rate as f64 * FRAME_SECS) as usize).max(1);

    samples.chunks(frame_len).any(|frame| {
        let sum_sq: f64 = frame
            .iter()
            .map(|&s| {
                let v = s as f64;
                v * v
            })
            .sum();
        (sum_sq / frame.len() as f64).sqrt() > threshold
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CodecError, CodecResult};
    use crate::models::MediaProbe;
    use crate::recognition::RecognitionResult;
    use std::fs;
    use std::sync::Mutex;

    struct DecodingEngine {
        samples: Vec<i16>,
        fail: bool,
    }

    impl CodecEngine for DecodingEngine {
        fn probe(&self, _path: &Path) -> CodecResult<MediaProbe> {
            Ok(MediaProbe::default())
        }

        fn transcode_video(
            &self,
            _input: &Path,
            _output: &Path,
            _max_height: u32,
            _crf: u32,
            _audio_bitrate_kbps: u32,
        ) -> CodecResult<()> {
            unimplemented!("not used in transcription tests")
        }

        fn extract_audio_track(
            &self,
            _input: &Path,
            _output: &Path,
            _audio_bitrate_kbps: u32,
        ) -> CodecResult<()> {
            unimplemented!("not used in transcription tests")
        }

        fn decode_samples(&self, path: &Path, sample_rate: u32) -> CodecResult<AudioBuffer> {
            if self.fail {
                return Err(CodecError::EmptyDecode(path.to_path_buf()));
            }
            Ok(AudioBuffer::new(self.samples.clone(), sample_rate))
        }
    }

    enum Respond {
        Text(&'static str),
        NoSpeech,
        Unavailable,
    }

    struct FakeRecognizer {
        respond: Respond,
        calls: Mutex<u32>,
    }

    impl FakeRecognizer {
        fn new(respond: Respond) -> Self {
            Self {
                respond,
                calls: Mutex::new(0),
            }
        }

        fn call_count(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    impl Recognizer for FakeRecognizer {
        fn recognize(&self, _audio: &AudioBuffer, _language: &str) -> RecognitionResult<String> {
            *self.calls.lock().unwrap() += 1;
            match &self.respond {
                Respond::Text(t) => Ok(t.to_string()),
                Respond::NoSpeech => Err(RecognitionError::NoSpeechDetected),
                Respond::Unavailable => {
                    Err(RecognitionError::ServiceUnavailable("timeout".into()))
                }
            }
        }
    }

    /// Half a second of near-silence followed by loud speech-like audio.
    fn speechy_samples() -> Vec<i16> {
        let mut samples = vec![10i16; 8_000];
        samples.extend((0..16_000).map(|i| if i % 2 == 0 { 5_000 } else { -5_000 }));
        samples
    }

    fn audio_file(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("speech.mp3");
        fs::write(&path, b"fake").unwrap();
        path
    }

    #[test]
    fn recognized_speech_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = audio_file(dir.path());
        let engine = DecodingEngine {
            samples: speechy_samples(),
            fail: false,
        };
        let recognizer = FakeRecognizer::new(Respond::Text("привет мир"));

        let outcome = transcribe(&engine, &recognizer, &path, "ru", 16_000);
        assert_eq!(outcome, TranscriptionOutcome::success("привет мир"));
        assert_eq!(recognizer.call_count(), 1);
    }

    #[test]
    fn silence_short_circuits_without_service_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = audio_file(dir.path());
        let engine = DecodingEngine {
            samples: vec![0i16; 32_000],
            fail: false,
        };
        let recognizer = FakeRecognizer::new(Respond::Text("should not be called"));

        let outcome = transcribe(&engine, &recognizer, &path, "ru", 16_000);
        match outcome {
            TranscriptionOutcome::Failure { kind, .. } => {
                assert_eq!(kind, FailureKind::Unrecognizable)
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(recognizer.call_count(), 0);
    }

    #[test]
    fn no_speech_maps_to_unrecognizable() {
        let dir = tempfile::tempdir().unwrap();
        let path = audio_file(dir.path());
        let engine = DecodingEngine {
            samples: speechy_samples(),
            fail: false,
        };
        let recognizer = FakeRecognizer::new(Respond::NoSpeech);

        let outcome = transcribe(&engine, &recognizer, &path, "ru", 16_000);
        match outcome {
            TranscriptionOutcome::Failure { kind, .. } => {
                assert_eq!(kind, FailureKind::Unrecognizable)
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn outage_maps_to_service_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = audio_file(dir.path());
        let engine = DecodingEngine {
            samples: speechy_samples(),
            fail: false,
        };
        let recognizer = FakeRecognizer::new(Respond::Unavailable);

        let outcome = transcribe(&engine, &recognizer, &path, "ru", 16_000);
        match outcome {
            TranscriptionOutcome::Failure { kind, message } => {
                assert_eq!(kind, FailureKind::ServiceError);
                assert!(message.contains("timeout"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn decode_fault_maps_to_processing_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = audio_file(dir.path());
        let engine = DecodingEngine {
            samples: Vec::new(),
            fail: true,
        };
        let recognizer = FakeRecognizer::new(Respond::Text("unused"));

        let outcome = transcribe(&engine, &recognizer, &path, "ru", 16_000);
        match outcome {
            TranscriptionOutcome::Failure { kind, .. } => {
                assert_eq!(kind, FailureKind::ProcessingError)
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(recognizer.call_count(), 0);
    }

    #[test]
    fn calibration_consumes_leading_window() {
        let audio = AudioBuffer::new(speechy_samples(), 16_000);
        let calibration = calibrate(&audio);
        assert_eq!(calibration.consumed, 8_000);
        // Leading amplitude of 10 keeps the threshold at the floor.
        assert_eq!(calibration.threshold, MIN_ENERGY_THRESHOLD);
    }

    #[test]
    fn calibration_scales_with_noisy_lead() {
        let mut samples = vec![2_000i16; 8_000];
        samples.extend(vec![8_000i16; 8_000]);
        let audio = AudioBuffer::new(samples, 16_000);

        let calibration = calibrate(&audio);
        assert!((calibration.threshold - 3_000.0).abs() < 1.0);
    }

    #[test]
    fn short_buffer_skips_calibration() {
        let audio = AudioBuffer::new(vec![100i16; 1_000], 16_000);
        let calibration = calibrate(&audio);
        assert_eq!(calibration.consumed, 0);
        assert_eq!(calibration.threshold, MIN_ENERGY_THRESHOLD);
    }
}
