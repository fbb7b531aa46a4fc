//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use super::error::ConversionError;
use crate::formats::{ChannelLayout, OutputFormat};

/// Output parameters shared by every file in a batch.
///
/// The format is kept as the string the host supplied; it is checked against the
/// supported set when each file is converted. Leaving `sample_rate` or `channels`
/// unset keeps the source value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputParams {
    /// Target format name, e.g. "mp3".
    #[serde(default = "default_format")]
    pub format: String,
    /// Encoder bitrate; only used for mp3.
    #[serde(default = "default_bitrate")]
    pub bitrate: String,
    /// Target sample rate in Hz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<NonZeroU32>,
    /// Target channel layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<ChannelLayout>,
}

fn default_format() -> String {
    "mp3".to_string()
}

fn default_bitrate() -> String {
    "192k".to_string()
}

impl Default for OutputParams {
    fn default() -> Self {
        Self {
            format: default_format(),
            bitrate: default_bitrate(),
            sample_rate: None,
            channels: None,
        }
    }
}

impl OutputParams {
    /// Sets the target format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Sets the mp3 bitrate.
    pub fn with_bitrate(mut self, bitrate: impl Into<String>) -> Self {
        self.bitrate = bitrate.into();
        self
    }

    /// Sets the target sample rate.
    pub fn with_sample_rate(mut self, hz: NonZeroU32) -> Self {
        self.sample_rate = Some(hz);
        self
    }

    /// Sets the target channel layout.
    pub fn with_channels(mut self, channels: ChannelLayout) -> Self {
        self.channels = Some(channels);
        self
    }

    /// Output path for an input: `output_dir/<input stem>.<format>`.
    ///
    /// Inputs sharing a stem map to the same path; the last one written wins.
    pub fn output_path_for(&self, input_path: &Path, output_dir: &Path) -> PathBuf {
        let stem = input_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        output_dir.join(format!("{}.{}", stem, self.format))
    }

    /// Builds the conversion request for one input file.
    pub fn request_for(&self, input_path: &Path, output_dir: &Path) -> ConversionRequest {
        ConversionRequest {
            input_path: input_path.to_path_buf(),
            output_path: self.output_path_for(input_path, output_dir),
            output_format: self.format.clone(),
            bitrate: self.bitrate.clone(),
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }
}

/// One file's conversion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// Input file path.
    pub input_path: PathBuf,
    /// Output file path.
    pub output_path: PathBuf,
    /// Requested output format name.
    pub output_format: String,
    /// Encoder bitrate; only used for mp3.
    pub bitrate: String,
    /// Target sample rate, or `None` to keep the source rate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<NonZeroU32>,
    /// Target channel layout, or `None` to keep the source layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<ChannelLayout>,
}

impl ConversionRequest {
    /// Creates a request with the default bitrate and no retargeting.
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        output_format: impl Into<String>,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            output_format: output_format.into(),
            bitrate: default_bitrate(),
            sample_rate: None,
            channels: None,
        }
    }

    /// Sets the mp3 bitrate.
    pub fn with_bitrate(mut self, bitrate: impl Into<String>) -> Self {
        self.bitrate = bitrate.into();
        self
    }

    /// Sets the target sample rate.
    pub fn with_sample_rate(mut self, hz: NonZeroU32) -> Self {
        self.sample_rate = Some(hz);
        self
    }

    /// Sets the target channel layout.
    pub fn with_channels(mut self, channels: ChannelLayout) -> Self {
        self.channels = Some(channels);
        self
    }

    /// Resolves the requested format against the supported output set.
    pub fn target_format(&self) -> Result<OutputFormat, ConversionError> {
        self.output_format
            .parse()
            .map_err(|_| ConversionError::unsupported_format(&self.output_format))
    }
}

/// Kind of a per-file conversion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    UnsupportedFormat,
    Load,
    Export,
    Unexpected,
}

impl ErrorKind {
    /// Stable label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::UnsupportedFormat => "unsupported_format",
            Self::Load => "load",
            Self::Export => "export",
            Self::Unexpected => "unexpected",
        }
    }
}

/// A successfully converted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedFile {
    /// Input file path.
    pub input_path: PathBuf,
    /// Output file path.
    pub output_path: PathBuf,
    /// Output file size in bytes.
    pub output_size_bytes: u64,
    /// Conversion duration in milliseconds.
    pub duration_ms: u64,
}

/// A file whose conversion failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedFile {
    /// Input file path.
    pub input_path: PathBuf,
    /// What went wrong.
    pub error_kind: ErrorKind,
    /// Human-readable message, including the underlying cause.
    pub message: String,
}

/// Result of one conversion attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionOutcome {
    Success(ConvertedFile),
    Failure(FailedFile),
}

impl ConversionOutcome {
    /// Builds a failure outcome from a conversion error.
    pub fn failure(input_path: &Path, error: &ConversionError) -> Self {
        Self::Failure(FailedFile {
            input_path: input_path.to_path_buf(),
            error_kind: error.kind(),
            message: error.to_string(),
        })
    }

    /// Whether the conversion succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Input path of the conversion.
    pub fn input_path(&self) -> &Path {
        match self {
            Self::Success(file) => &file.input_path,
            Self::Failure(file) => &file.input_path,
        }
    }

    /// Failure kind, if the conversion failed.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success(_) => None,
            Self::Failure(file) => Some(file.error_kind),
        }
    }
}
