//! FFmpeg-backed codec engine.
//!
//! Probing uses `ffprobe -show_streams -show_format` with JSON output;
//! transcode and extraction run `ffmpeg` with captured stderr; decoding
//! streams raw s16le PCM over a pipe.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};

use serde_json::Value;

use super::types::{CodecError, CodecResult};
use super::CodecEngine;
use crate::models::{AudioBuffer, MediaProbe};

/// Codec engine that shells out to `ffmpeg`/`ffprobe`.
#[derive(Debug, Clone, Default)]
pub struct FfmpegEngine;

impl FfmpegEngine {
    pub fn new() -> Self {
        Self
    }
}

impl CodecEngine for FfmpegEngine {
    fn probe(&self, path: &Path) -> CodecResult<MediaProbe> {
        if !path.exists() {
            return Err(CodecError::FileNotFound(path.to_path_buf()));
        }

        tracing::debug!("Probing file: {}", path.display());

        let output = Command::new("ffprobe")
            .args(["-v", "error", "-show_streams", "-show_format", "-of", "json"])
            .arg(path)
            .output()
            .map_err(|e| CodecError::spawn_failed("ffprobe", e))?;

        if !output.status.success() {
            return Err(CodecError::engine_failed(
                "ffprobe",
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let json: Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| CodecError::parse_error("ffprobe", e.to_string()))?;

        let size_bytes = fs::metadata(path)
            .map_err(|e| CodecError::io("stat probe target", e))?
            .len();

        Ok(parse_probe_json(&json, size_bytes))
    }

    fn transcode_video(
        &self,
        input: &Path,
        output: &Path,
        max_height: u32,
        crf: u32,
        audio_bitrate_kbps: u32,
    ) -> CodecResult<()> {
        if !input.exists() {
            return Err(CodecError::FileNotFound(input.to_path_buf()));
        }

        // Never upscale: cap the height at the source's own height.
        // Width of -2 keeps the aspect ratio and an even dimension.
        let scale = format!("scale=-2:'min({},ih)'", max_height);

        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-y")
            .arg("-i")
            .arg(input)
            .arg("-vf")
            .arg(&scale)
            .args(["-c:v", "libx264"])
            .arg("-crf")
            .arg(crf.to_string())
            .args(["-preset", "fast"])
            .args(["-c:a", "aac"])
            .arg("-b:a")
            .arg(format!("{}k", audio_bitrate_kbps))
            .arg(output);

        tracing::debug!("Running FFmpeg transcode: {:?}", cmd);
        run_tool(cmd, "ffmpeg")
    }

    fn extract_audio_track(
        &self,
        input: &Path,
        output: &Path,
        audio_bitrate_kbps: u32,
    ) -> CodecResult<()> {
        if !input.exists() {
            return Err(CodecError::FileNotFound(input.to_path_buf()));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-y")
            .arg("-i")
            .arg(input)
            .arg("-vn")
            .args(["-acodec", "libmp3lame"])
            .arg("-b:a")
            .arg(format!("{}k", audio_bitrate_kbps))
            .arg(output);

        tracing::debug!("Running FFmpeg audio extraction: {:?}", cmd);
        run_tool(cmd, "ffmpeg")
    }

    fn decode_samples(&self, path: &Path, sample_rate: u32) -> CodecResult<AudioBuffer> {
        if !path.exists() {
            return Err(CodecError::FileNotFound(path.to_path_buf()));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-i")
            .arg(path)
            .arg("-vn")
            .args(["-ac", "1"]) // Mono
            .arg("-ar")
            .arg(sample_rate.to_string())
            .args(["-f", "s16le"])
            .args(["-acodec", "pcm_s16le"])
            .arg("pipe:1");

        cmd.stderr(Stdio::null()).stdout(Stdio::piped());

        tracing::debug!("Running FFmpeg decode: {:?}", cmd);

        let mut child = cmd
            .spawn()
            .map_err(|e| CodecError::spawn_failed("ffmpeg", e))?;

        let mut stdout = child.stdout.take().ok_or_else(|| {
            CodecError::parse_error("ffmpeg", "Failed to capture stdout")
        })?;

        let mut buffer = Vec::new();
        stdout
            .read_to_end(&mut buffer)
            .map_err(|e| CodecError::io("read decoded PCM", e))?;

        let status = child
            .wait()
            .map_err(|e| CodecError::io("wait for ffmpeg", e))?;

        if !status.success() {
            return Err(CodecError::engine_failed(
                "ffmpeg",
                status.code().unwrap_or(-1),
                "decode to PCM failed",
            ));
        }

        let samples = bytes_to_i16_samples(&buffer);
        if samples.is_empty() {
            return Err(CodecError::EmptyDecode(path.to_path_buf()));
        }

        tracing::debug!(
            "Decoded {} samples ({:.2}s) from {}",
            samples.len(),
            samples.len() as f64 / sample_rate as f64,
            path.display()
        );

        Ok(AudioBuffer::new(samples, sample_rate))
    }
}

/// Run a prepared command, mapping a failure status to `EngineFailed`
/// with the stderr tail as the message.
fn run_tool(mut cmd: Command, tool: &str) -> CodecResult<()> {
    let output = cmd
        .output()
        .map_err(|e| CodecError::spawn_failed(tool, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CodecError::engine_failed(
            tool,
            output.status.code().unwrap_or(-1),
            stderr_tail(&stderr),
        ));
    }
    Ok(())
}

/// Last few stderr lines; ffmpeg puts the actual error at the end of a
/// long banner.
fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(4);
    lines[start..].join("\n")
}

/// Parse ffprobe JSON into a probe result.
fn parse_probe_json(json: &Value, size_bytes: u64) -> MediaProbe {
    let has_audio = json
        .get("streams")
        .and_then(|s| s.as_array())
        .map(|streams| {
            streams.iter().any(|stream| {
                stream.get("codec_type").and_then(|t| t.as_str()) == Some("audio")
            })
        })
        .unwrap_or(false);

    let duration_secs = json
        .get("format")
        .and_then(|f| f.get("duration"))
        .and_then(|d| d.as_str())
        .and_then(|s| s.parse::<f64>().ok());

    MediaProbe {
        has_audio,
        duration_secs,
        size_bytes,
    }
}

/// Convert raw bytes to i16 samples (little-endian). A trailing
/// partial sample is dropped.
fn bytes_to_i16_samples(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|chunk| i16::from_le_bytes([chunk[0], chunk[1]]))
        .collect()
}
