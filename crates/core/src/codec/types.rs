//! Types for the codec module.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use crate::formats::{ChannelLayout, OutputFormat};

/// Information about a media file, as reported by the codec on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    /// File path.
    pub path: PathBuf,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Container format (e.g., "wav", "mov").
    pub format: String,
    /// Audio codec (e.g., "pcm_s16le", "aac").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<String>,
    /// Audio bitrate in kbps (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_bitrate_kbps: Option<u32>,
    /// Audio sample rate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    /// Audio channels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u8>,
    /// Whether a video stream is present next to the audio.
    #[serde(default)]
    pub has_video: bool,
}

/// Decoded input ready for export, with the output parameters requested for it.
///
/// Resampling and remixing are the codec's job; this value only records the
/// targets, which the codec applies during export.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    info: MediaInfo,
    target_sample_rate: Option<NonZeroU32>,
    target_channels: Option<ChannelLayout>,
}

impl DecodedAudio {
    /// Wraps probed media info as loaded audio with no retargeting.
    pub fn new(info: MediaInfo) -> Self {
        Self {
            info,
            target_sample_rate: None,
            target_channels: None,
        }
    }

    /// Source file this audio was loaded from.
    pub fn source(&self) -> &Path {
        &self.info.path
    }

    /// Media info reported at load time.
    pub fn info(&self) -> &MediaInfo {
        &self.info
    }

    /// Requests a new sample rate for the exported audio.
    pub fn set_sample_rate(&mut self, hz: NonZeroU32) {
        self.target_sample_rate = Some(hz);
    }

    /// Requests a new channel count for the exported audio.
    pub fn set_channel_count(&mut self, layout: ChannelLayout) {
        self.target_channels = Some(layout);
    }

    /// Requested sample rate, if any.
    pub fn target_sample_rate(&self) -> Option<NonZeroU32> {
        self.target_sample_rate
    }

    /// Requested channel layout, if any.
    pub fn target_channels(&self) -> Option<ChannelLayout> {
        self.target_channels
    }

    /// Sample rate the export will have.
    pub fn sample_rate(&self) -> Option<u32> {
        self.target_sample_rate
            .map(NonZeroU32::get)
            .or(self.info.sample_rate)
    }

    /// Channel count the export will have.
    pub fn channel_count(&self) -> Option<u8> {
        self.target_channels
            .map(|c| c.count())
            .or(self.info.channels)
    }
}

/// Encoder options passed to export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Encoder bitrate such as "192k". Only set for formats that honor it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<String>,
}

impl ExportOptions {
    /// Builds options for a format, dropping the bitrate where it does not apply.
    pub fn for_format(format: OutputFormat, bitrate: &str) -> Self {
        Self {
            bitrate: format.honors_bitrate().then(|| bitrate.to_string()),
        }
    }
}
