//! Codec module: the decode/encode capability behind every conversion.
//!
//! [`MediaCodec`] is the seam between the conversion engine and whatever does the
//! signal work. [`FfmpegCodec`] implements it with `ffprobe` (load) and `ffmpeg`
//! (export); tests use [`crate::testing::MockCodec`].
//!
//! # Example
//!
//! ```ignore
//! use batchconv_core::codec::{ExportOptions, FfmpegCodec, MediaCodec};
//! use batchconv_core::formats::{ChannelLayout, OutputFormat};
//!
//! let codec = FfmpegCodec::with_defaults();
//! codec.validate().await?;
//!
//! let mut audio = codec.load(Path::new("/music/take.flac")).await?;
//! audio.set_channel_count(ChannelLayout::Mono);
//!
//! let options = ExportOptions::for_format(OutputFormat::Mp3, "192k");
//! codec.export(&audio, Path::new("/out/take.mp3"), OutputFormat::Mp3, &options).await?;
//! ```

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use config::CodecConfig;
pub use error::CodecError;
pub use ffmpeg::FfmpegCodec;
pub use traits::MediaCodec;
pub use types::{DecodedAudio, ExportOptions, MediaInfo};
