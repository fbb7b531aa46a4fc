use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

const ENV_PREFIX: &str = "BATCHCONV_";

fn base() -> Figment {
    Figment::from(Serialized::defaults(Config::default()))
}

fn extract(figment: Figment) -> Result<Config, ConfigError> {
    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    extract(base().merge(Toml::file(path)))
}

/// Load configuration from an optional file; defaults plus environment when absent
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => extract(base()),
    }
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::ChannelLayout;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[output]
format = "flac"
sample_rate = 48000
channels = 1

[batch]
max_workers = 2
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.output.format, "flac");
        assert_eq!(config.output.sample_rate.map(|r| r.get()), Some(48000));
        assert_eq!(config.output.channels, Some(ChannelLayout::Mono));
        assert_eq!(config.batch.max_workers, 2);
        assert_eq!(config.output.bitrate, "192k");
    }

    #[test]
    fn test_load_config_from_str_empty_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.output.format, "mp3");
        assert_eq!(config.batch.max_workers, 4);
        assert_eq!(config.logging.file.to_str(), Some("conversion.log"));
        assert!(config.output.sample_rate.is_none());
    }

    #[test]
    fn test_load_config_from_str_bad_channels() {
        let result = load_config_from_str("[output]\nchannels = 6\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));

        let result = load_config_from_str("[output]\nsample_rate = 0\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/batchconv.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[output]
format = "ogg"

[codec]
ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"
transcode_timeout_secs = 60

[logging]
file = "/var/log/batchconv.log"
"#
        )
        .unwrap();

        let config = load_config_or_default(Some(temp_file.path())).unwrap();
        assert_eq!(config.output.format, "ogg");
        assert_eq!(config.codec.transcode_timeout_secs, 60);
        assert_eq!(config.codec.ffprobe_path.to_str(), Some("ffprobe"));
        assert_eq!(config.logging.level, "info");
    }
}
