use std::path::PathBuf;
use thiserror::Error;

/// Errors from probing a file's audio properties.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The file does not exist.
    #[error("The specified file does not exist: {path}")]
    NotFound { path: PathBuf },

    /// The file is not a WAV (RIFF/PCM) container.
    #[error("The file is not a valid audio format: {path} ({reason})")]
    InvalidFormat { path: PathBuf, reason: String },

    /// Any other failure, with its cause.
    #[error("Failed to analyze the audio file {path}: {source}")]
    Failed {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl AnalysisError {
    pub fn invalid_format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn failed(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Failed {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Stable label used in metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InvalidFormat { .. } => "invalid_format",
            Self::Failed { .. } => "failed",
        }
    }
}
