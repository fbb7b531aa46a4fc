use regex_lite::Regex;
use std::str::FromStr;

use super::{types::Config, ConfigError};
use crate::formats::{OutputFormat, BITRATE_CHOICES, SAMPLE_RATE_CHOICES};

/// Validate configuration
/// Currently validates:
/// - Output format is a supported output format
/// - Bitrate looks like "<digits>k" and is one of the offered choices
/// - Sample rate, when set, is one of the offered choices
/// - At least one worker
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let output = &config.output;

    if OutputFormat::from_str(&output.format).is_err() {
        return Err(ConfigError::ValidationError(format!(
            "output.format '{}' is not supported (allowed: {})",
            output.format,
            OutputFormat::allowed_list()
        )));
    }

    let bitrate_shape =
        Regex::new(r"^\d+k$").map_err(|e| ConfigError::ValidationError(e.to_string()))?;
    if !bitrate_shape.is_match(&output.bitrate) {
        return Err(ConfigError::ValidationError(format!(
            "output.bitrate '{}' must look like 192k",
            output.bitrate
        )));
    }
    if !BITRATE_CHOICES.contains(&output.bitrate.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "output.bitrate '{}' is not offered (choices: {})",
            output.bitrate,
            BITRATE_CHOICES.join(", ")
        )));
    }

    if let Some(rate) = output.sample_rate {
        if !SAMPLE_RATE_CHOICES.contains(&rate.get()) {
            return Err(ConfigError::ValidationError(format!(
                "output.sample_rate {} is not offered (choices: 22050, 44100, 48000)",
                rate
            )));
        }
    }

    if config.batch.max_workers == 0 {
        return Err(ConfigError::ValidationError(
            "batch.max_workers cannot be 0".to_string(),
        ));
    }

    if config.codec.probe_timeout_secs == 0 || config.codec.transcode_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "codec timeouts cannot be 0".to_string(),
        ));
    }

    Ok(())
}
