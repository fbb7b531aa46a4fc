//! Settings for the ffmpeg-backed codec.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How the codec finds and drives the ffmpeg tools.
///
/// Probing reads only container headers and is bounded by
/// `probe_timeout_secs`. Decoding a whole input and encoding an output can
/// take as long as the media itself, so both share `transcode_timeout_secs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,

    pub probe_timeout_secs: u64,
    pub transcode_timeout_secs: u64,

    /// Decode the entire input during load so damaged audio data is caught
    /// before anything is written.
    pub verify_decode: bool,

    /// Value passed to `-loglevel` when encoding.
    pub log_level: String,

    /// Extra encoder arguments, placed before the output muxer.
    pub extra_args: Vec<String>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            probe_timeout_secs: 60,
            transcode_timeout_secs: 3600,
            verify_decode: true,
            log_level: "error".to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl CodecConfig {
    /// Uses `ffmpeg` and `ffprobe` from one install directory.
    pub fn from_install_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            ffmpeg_path: dir.join("ffmpeg"),
            ffprobe_path: dir.join("ffprobe"),
            ..Default::default()
        }
    }

    pub fn with_extra_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.extra_args.extend(args);
        self
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn transcode_timeout(&self) -> Duration {
        Duration::from_secs(self.transcode_timeout_secs)
    }
}
