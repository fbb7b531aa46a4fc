use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::batch::BatchConfig;
use crate::codec::CodecConfig;
use crate::converter::OutputParams;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputParams,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub codec: CodecConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// File every log record is appended to.
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
    /// Default filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit console log records as JSON.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_file() -> PathBuf {
    PathBuf::from("conversion.log")
}

fn default_log_level() -> String {
    "info".to_string()
}
