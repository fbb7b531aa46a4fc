use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a batch before any file is processed.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Output directory does not exist: {path}")]
    OutputDirMissing { path: PathBuf },
}
