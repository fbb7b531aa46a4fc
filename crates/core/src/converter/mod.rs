//! Converter module: one file, one conversion.
//!
//! [`AudioConverter`] runs a single [`ConversionRequest`] through the codec:
//!
//! 1. the input file must exist
//! 2. the requested format must be a supported output format
//! 3. the codec loads the input
//! 4. requested sample rate and channel layout are applied
//! 5. the codec exports, with a bitrate only for mp3
//!
//! Each step fails with its own [`ConversionError`] variant, and
//! [`AudioConverter::convert`] folds the result into a [`ConversionOutcome`].
//!
//! # Example
//!
//! ```ignore
//! use batchconv_core::converter::{AudioConverter, ConversionRequest};
//! use batchconv_core::codec::FfmpegCodec;
//!
//! let converter = AudioConverter::new(FfmpegCodec::with_defaults());
//! let request = ConversionRequest::new("/in/a.wav", "/out/a.mp3", "mp3").with_bitrate("320k");
//!
//! match converter.convert(&request).await {
//!     ConversionOutcome::Success(file) => println!("wrote {}", file.output_path.display()),
//!     ConversionOutcome::Failure(failed) => eprintln!("{}", failed.message),
//! }
//! ```

mod audio;
mod error;
mod types;

pub use audio::AudioConverter;
pub use error::ConversionError;
pub use types::{
    ConversionOutcome, ConversionRequest, ConvertedFile, ErrorKind, FailedFile, OutputParams,
};
