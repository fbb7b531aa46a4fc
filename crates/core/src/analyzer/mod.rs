//! Analyzer module: audio properties of a single WAV file.
//!
//! [`AudioAnalyzer`] reports channel count, sample width, frame rate and
//! duration. Parsing is synchronous; [`AudioAnalyzer::analyze`] moves it to
//! the blocking pool for async callers.

mod error;
mod types;
mod wav;

pub use error::AnalysisError;
pub use types::AudioProperties;
pub use wav::AudioAnalyzer;
