//! Error types for codec-engine operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error from a codec-engine operation.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Input file not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Failed to spawn the external tool.
    #[error("Failed to run {tool}: {source}")]
    SpawnFailed {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The external tool exited with a failure status.
    #[error("{tool} failed with exit code {exit_code}: {message}")]
    EngineFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// Failed to parse tool output.
    #[error("Failed to parse {tool} output: {message}")]
    ParseError { tool: String, message: String },

    /// Decode produced no samples.
    #[error("No audio samples decoded from {0}")]
    EmptyDecode(PathBuf),

    /// File I/O error with operation context.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl CodecError {
    pub fn spawn_failed(tool: impl Into<String>, source: io::Error) -> Self {
        Self::SpawnFailed {
            tool: tool.into(),
            source,
        }
    }

    pub fn engine_failed(tool: impl Into<String>, exit_code: i32, message: impl Into<String>) -> Self {
        Self::EngineFailed {
            tool: tool.into(),
            exit_code,
            message: message.into(),
        }
    }

    pub fn parse_error(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
