//! Trait definitions for the codec module.

use async_trait::async_trait;
use std::path::Path;

use super::error::CodecError;
use super::types::{DecodedAudio, ExportOptions};
use crate::formats::OutputFormat;

/// The decode/encode capability conversions delegate to.
#[async_trait]
pub trait MediaCodec: Send + Sync {
    /// Returns the name of this codec implementation.
    fn name(&self) -> &str;

    /// Loads an input file. Fails on any decode problem.
    async fn load(&self, path: &Path) -> Result<DecodedAudio, CodecError>;

    /// Encodes loaded audio to `output_path` in the given format.
    ///
    /// Sample rate and channel targets set on `audio` are applied here.
    async fn export(
        &self,
        audio: &DecodedAudio,
        output_path: &Path,
        format: OutputFormat,
        options: &ExportOptions,
    ) -> Result<(), CodecError>;

    /// Validates that the codec is properly configured and ready.
    async fn validate(&self) -> Result<(), CodecError> {
        Ok(())
    }
}
