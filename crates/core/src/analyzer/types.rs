use serde::{Deserialize, Serialize};
use std::fmt;

/// Properties of an uncompressed audio file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioProperties {
    /// Number of interleaved channels.
    pub channel_count: u16,
    /// Bits per sample.
    pub sample_width_bits: u32,
    /// Frames per second.
    pub frame_rate_hz: u32,
    /// Length in seconds, rounded to two decimals.
    pub duration_seconds: f64,
}

impl AudioProperties {
    /// Builds properties from raw header values. `frame_rate_hz` must be non-zero.
    pub fn from_frames(
        channel_count: u16,
        sample_width_bits: u32,
        frame_rate_hz: u32,
        frames: u64,
    ) -> Self {
        let duration = frames as f64 / frame_rate_hz as f64;
        Self {
            channel_count,
            sample_width_bits,
            frame_rate_hz,
            duration_seconds: (duration * 100.0).round_ties_even() / 100.0,
        }
    }
}

impl fmt::Display for AudioProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "channels={}, sample_width={} bits, frame_rate={} Hz, duration={:.2} s",
            self.channel_count, self.sample_width_bits, self.frame_rate_hz, self.duration_seconds
        )
    }
}
