//! Testing utilities and a mock codec for batch tests.
//!
//! [`MockCodec`] stands in for ffmpeg so conversions and batches can be
//! exercised without external binaries. [`fixtures`] writes small input
//! files into temporary directories.
//!
//! # Example
//!
//! ```rust,ignore
//! use batchconv_core::testing::{fixtures, MockCodec};
//!
//! let dir = tempfile::TempDir::new()?;
//! let wav = fixtures::write_test_wav(dir.path(), "a.wav")?;
//!
//! let codec = MockCodec::new();
//! codec.fail_load_for(&wav).await;
//! ```

mod mock_codec;

pub use mock_codec::{MockCodec, RecordedExport};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::io;
    use std::path::{Path, PathBuf};

    /// Channels in the file written by [`write_test_wav`].
    pub const TEST_WAV_CHANNELS: u16 = 2;
    /// Sample rate of the file written by [`write_test_wav`].
    pub const TEST_WAV_SAMPLE_RATE: u32 = 44100;
    /// Bits per sample of the file written by [`write_test_wav`].
    pub const TEST_WAV_BITS: u16 = 16;
    /// Frames in the file written by [`write_test_wav`] (1.5 seconds).
    pub const TEST_WAV_FRAMES: u32 = 66150;

    /// Write arbitrary bytes to `dir/name`.
    pub fn write_file(dir: &Path, name: &str, contents: &[u8]) -> io::Result<PathBuf> {
        let path = dir.join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    /// Build a canonical 44-byte-header PCM WAV holding silence.
    pub fn pcm_wav_bytes(channels: u16, sample_rate: u32, bits: u16, frames: u32) -> Vec<u8> {
        let block_align = channels * (bits / 8);
        let byte_rate = sample_rate * block_align as u32;
        let data_len = frames * block_align as u32;

        let mut buf = Vec::with_capacity(44 + data_len as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_len).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&channels.to_le_bytes());
        buf.extend_from_slice(&sample_rate.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_len.to_le_bytes());
        buf.resize(44 + data_len as usize, 0);
        buf
    }

    /// Write a PCM WAV with the given layout.
    pub fn write_pcm_wav(
        dir: &Path,
        name: &str,
        channels: u16,
        sample_rate: u32,
        bits: u16,
        frames: u32,
    ) -> io::Result<PathBuf> {
        write_file(dir, name, &pcm_wav_bytes(channels, sample_rate, bits, frames))
    }

    /// Write 1.5 seconds of 16-bit stereo silence at 44.1 kHz.
    pub fn write_test_wav(dir: &Path, name: &str) -> io::Result<PathBuf> {
        write_pcm_wav(
            dir,
            name,
            TEST_WAV_CHANNELS,
            TEST_WAV_SAMPLE_RATE,
            TEST_WAV_BITS,
            TEST_WAV_FRAMES,
        )
    }

    /// Write a file whose contents are not audio.
    pub fn write_corrupt_file(dir: &Path, name: &str) -> io::Result<PathBuf> {
        write_file(dir, name, b"this is definitely not an audio stream\n")
    }
}
