//! HTTP client for the Google speech-to-text endpoint.
//!
//! Sends the decoded PCM as an in-memory WAV body and parses the
//! line-delimited JSON response. The endpoint URL and key are
//! configurable, so any provider speaking the same protocol works.

use std::io::Cursor;
use std::time::Duration;

use hound::{SampleFormat, WavSpec, WavWriter};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use super::types::{RecognitionError, RecognitionResult};
use super::Recognizer;
use crate::models::AudioBuffer;

/// Default recognition endpoint (the free Google Speech API v2).
pub const DEFAULT_ENDPOINT: &str = "http://www.google.com/speech-api/v2/recognize";

/// Blocking HTTP recognizer for the Google speech protocol.
pub struct GoogleRecognizer {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl GoogleRecognizer {
    /// Build a recognizer with a request timeout.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> RecognitionResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RecognitionError::ServiceUnavailable(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }
}

impl Recognizer for GoogleRecognizer {
    fn recognize(&self, audio: &AudioBuffer, language: &str) -> RecognitionResult<String> {
        let payload = wav_payload(audio)?;

        tracing::debug!(
            "Sending {} bytes of audio ({:.2}s) for recognition, lang={}",
            payload.len(),
            audio.duration_secs(),
            language
        );

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[
                ("client", "chromium"),
                ("lang", language),
                ("key", self.api_key.as_str()),
            ])
            .header(
                CONTENT_TYPE,
                format!("audio/l16; rate={}", audio.sample_rate),
            )
            .body(payload)
            .send()
            .map_err(|e| RecognitionError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| RecognitionError::ServiceUnavailable(e.to_string()))?;

        if status.is_client_error() {
            return Err(RecognitionError::InvalidRequest(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }
        if !status.is_success() {
            return Err(RecognitionError::ServiceUnavailable(format!(
                "HTTP {}",
                status
            )));
        }

        parse_response(&body)
    }
}

/// Serialize a sample buffer to an in-memory WAV file.
fn wav_payload(audio: &AudioBuffer) -> RecognitionResult<Vec<u8>> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)
            .map_err(|e| RecognitionError::InvalidRequest(e.to_string()))?;
        for &sample in &audio.samples {
            writer
                .write_sample(sample)
                .map_err(|e| RecognitionError::InvalidRequest(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| RecognitionError::InvalidRequest(e.to_string()))?;
    }
    Ok(cursor.into_inner())
}

/// Parse the line-delimited JSON response.
///
/// The service streams one JSON object per line; the first line is
/// usually an empty `{"result":[]}` placeholder. The transcript lives
/// at `result[].alternative[].transcript`, best alternative first
/// (highest `confidence` when present).
fn parse_response(body: &str) -> RecognitionResult<String> {
    for line in body.lines().filter(|l| !l.trim().is_empty()) {
        let Ok(json) = serde_json::from_str::<Value>(line) else {
            continue;
        };
        let Some(results) = json.get("result").and_then(|r| r.as_array()) else {
            continue;
        };

        for result in results {
            let Some(alternatives) = result.get("alternative").and_then(|a| a.as_array()) else {
                continue;
            };
            if let Some(text) = best_transcript(alternatives) {
                return Ok(text);
            }
        }
    }

    Err(RecognitionError::NoSpeechDetected)
}

/// Pick the highest-confidence transcript among alternatives.
fn best_transcript(alternatives: &[Value]) -> Option<String> {
    let mut best: Option<(f64, &str)> = None;

    for alt in alternatives {
        let Some(transcript) = alt.get("transcript").and_then(|t| t.as_str()) else {
            continue;
        };
        if transcript.trim().is_empty() {
            continue;
        }
        let confidence = alt
            .get("confidence")
            .and_then(|c| c.as_f64())
            .unwrap_or(0.0);

        match best {
            Some((best_conf, _)) if best_conf >= confidence => {}
            _ => best = Some((confidence, transcript)),
        }
    }

    best.map(|(_, t)| t.trim().to_string())
}
