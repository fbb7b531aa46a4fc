//! Supported media formats and the parameter choices offered to hosts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Input extensions accepted for conversion.
pub const SUPPORTED_INPUT_FORMATS: &[&str] = &["mp4", "wav", "flac", "mp3", "ogg", "aac", "m4a"];

/// Output formats a conversion can target.
pub const SUPPORTED_OUTPUT_FORMATS: &[&str] = &["mp3", "wav", "flac", "ogg", "aac", "m4a"];

/// MP3 bitrates offered to hosts.
pub const BITRATE_CHOICES: &[&str] = &["64k", "128k", "192k", "256k", "320k"];

/// Sample rates offered to hosts.
pub const SAMPLE_RATE_CHOICES: &[u32] = &[22050, 44100, 48000];

/// Channel counts offered to hosts.
pub const CHANNEL_CHOICES: &[u8] = &[1, 2];

/// Input container, recognized by file extension only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Mp4,
    Wav,
    Flac,
    Mp3,
    Ogg,
    Aac,
    M4a,
}

impl InputFormat {
    /// All input formats, in the order hosts list them.
    pub const ALL: [InputFormat; 7] = [
        Self::Mp4,
        Self::Wav,
        Self::Flac,
        Self::Mp3,
        Self::Ogg,
        Self::Aac,
        Self::M4a,
    ];

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Wav => "wav",
            Self::Flac => "flac",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
            Self::Aac => "aac",
            Self::M4a => "m4a",
        }
    }

    /// Matches an extension case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }

    /// Detects the input format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Whether the container usually carries a video stream next to the audio.
    pub fn is_video_container(&self) -> bool {
        matches!(self, Self::Mp4)
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Target audio format of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// MPEG Audio Layer III
    Mp3,
    /// WAVE (uncompressed PCM)
    Wav,
    /// Free Lossless Audio Codec
    Flac,
    /// Ogg Vorbis
    Ogg,
    /// Raw AAC in an ADTS stream
    Aac,
    /// AAC in an MPEG-4 audio container
    M4a,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 6] = [
        Self::Mp3,
        Self::Wav,
        Self::Flac,
        Self::Ogg,
        Self::Aac,
        Self::M4a,
    ];

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Flac => "flac",
            Self::Ogg => "ogg",
            Self::Aac => "aac",
            Self::M4a => "m4a",
        }
    }

    /// Returns the ffmpeg encoder name for this format.
    pub fn ffmpeg_codec(&self) -> &'static str {
        match self {
            Self::Mp3 => "libmp3lame",
            Self::Wav => "pcm_s16le",
            Self::Flac => "flac",
            Self::Ogg => "libvorbis",
            Self::Aac | Self::M4a => "aac",
        }
    }

    /// Returns the ffmpeg muxer name for this format.
    pub fn ffmpeg_muxer(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Flac => "flac",
            Self::Ogg => "ogg",
            Self::Aac => "adts",
            Self::M4a => "ipod",
        }
    }

    /// Whether a requested bitrate is passed to the encoder.
    pub fn honors_bitrate(&self) -> bool {
        matches!(self, Self::Mp3)
    }

    /// The allowed output set joined for error messages.
    pub fn allowed_list() -> String {
        SUPPORTED_OUTPUT_FORMATS.join(", ")
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Error returned when a string names no supported output format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported output format '{0}'")]
pub struct ParseFormatError(pub String);

impl FromStr for OutputFormat {
    type Err = ParseFormatError;

    /// Exact, lowercase match against the supported output set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.extension() == s)
            .ok_or_else(|| ParseFormatError(s.to_string()))
    }
}

/// Output channel layout. Only mono and stereo are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ChannelLayout {
    Mono,
    Stereo,
}

impl ChannelLayout {
    /// Number of channels.
    pub fn count(&self) -> u8 {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }
}

impl TryFrom<u8> for ChannelLayout {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Mono),
            2 => Ok(Self::Stereo),
            other => Err(format!("channel count must be 1 or 2, got {}", other)),
        }
    }
}

impl From<ChannelLayout> for u8 {
    fn from(layout: ChannelLayout) -> Self {
        layout.count()
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.count())
    }
}
