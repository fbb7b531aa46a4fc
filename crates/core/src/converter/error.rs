//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

use super::types::ErrorKind;
use crate::codec::CodecError;
use crate::formats::OutputFormat;

/// Errors that can occur while converting one file.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Input file does not exist.
    #[error("The input file does not exist: {path}")]
    NotFound { path: PathBuf },

    /// Requested output format is not in the supported set.
    #[error("Unsupported output format '{format}'. The output format must be one of: {allowed}")]
    UnsupportedFormat { format: String, allowed: String },

    /// The codec could not load the input.
    #[error("Failed to load the input file {path}. Please ensure it is a valid audio file: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// The codec could not write the output.
    #[error("Failed to export the audio file {path}. Please check the output path and format: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// Anything else, with the original cause rendered into `reason`.
    #[error("An unexpected error occurred during the conversion process: {reason}")]
    Unexpected { reason: String },
}

impl ConversionError {
    /// Creates an unsupported format error naming the allowed set.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
            allowed: OutputFormat::allowed_list(),
        }
    }

    /// Creates an unexpected error.
    pub fn unexpected(reason: impl Into<String>) -> Self {
        Self::Unexpected {
            reason: reason.into(),
        }
    }

    /// The tag this error carries into a conversion outcome.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::Load { .. } => ErrorKind::Load,
            Self::Export { .. } => ErrorKind::Export,
            Self::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_kinds() {
        let err = ConversionError::NotFound {
            path: PathBuf::from("/missing.wav"),
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(
            ConversionError::unexpected("panic").kind(),
            ErrorKind::Unexpected
        );
    }

    #[test]
    fn test_load_error_keeps_cause() {
        let err = ConversionError::Load {
            path: PathBuf::from("/in/corrupt.wav"),
            source: CodecError::probe_failed("Invalid data found when processing input"),
        };

        assert_eq!(err.kind(), ErrorKind::Load);
        assert!(err.to_string().contains("valid audio file"));
        assert!(err.to_string().contains("Invalid data found"));
        assert!(err.source().is_some());
    }
}
