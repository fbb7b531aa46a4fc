//! Error types for the codec module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a [`MediaCodec`](super::MediaCodec) while decoding or encoding.
#[derive(Debug, Error)]
pub enum CodecError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// FFprobe binary not found.
    #[error("FFprobe not found at path: {path}")]
    FfprobeNotFound { path: PathBuf },

    /// The input could not be probed as media.
    #[error("Failed to probe media file: {reason}")]
    ProbeFailed { reason: String },

    /// The audio data could not be decoded in full.
    #[error("Failed to decode audio in {path}: {reason}")]
    DecodeFailed { path: PathBuf, reason: String },

    /// The input has no audio stream to convert.
    #[error("No audio stream in {path}")]
    NoAudioStream { path: PathBuf },

    /// Failed to parse FFprobe output.
    #[error("Failed to parse media info: {reason}")]
    ParseError { reason: String },

    /// The encoder process failed.
    #[error("Encoding failed: {reason}")]
    EncodeFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// The encoder reported success but produced no file.
    #[error("Output file not created: {path}")]
    OutputMissing { path: PathBuf },

    /// A single codec operation exceeded its time limit.
    #[error("Codec operation timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error while talking to the codec.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// Creates a probe failed error.
    pub fn probe_failed(reason: impl Into<String>) -> Self {
        Self::ProbeFailed {
            reason: reason.into(),
        }
    }

    /// Creates an encode failed error with optional stderr output.
    pub fn encode_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::EncodeFailed {
            reason: reason.into(),
            stderr,
        }
    }
}
