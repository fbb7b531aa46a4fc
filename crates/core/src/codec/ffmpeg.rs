//! FFmpeg-based codec implementation.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::time::timeout;

use super::config::CodecConfig;
use super::error::CodecError;
use super::traits::MediaCodec;
use super::types::{DecodedAudio, ExportOptions, MediaInfo};
use crate::formats::OutputFormat;

/// Codec that probes with `ffprobe`, then decodes and transcodes with `ffmpeg`.
pub struct FfmpegCodec {
    config: CodecConfig,
}

impl FfmpegCodec {
    /// Creates a new FFmpeg codec with the given configuration.
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Creates a codec with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(CodecConfig::default())
    }

    /// Builds ffmpeg arguments that extract and encode the audio track.
    fn build_export_args(
        &self,
        audio: &DecodedAudio,
        output_path: &Path,
        format: OutputFormat,
        options: &ExportOptions,
    ) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(), // Overwrite output
            "-i".to_string(),
            audio.source().to_string_lossy().to_string(),
            "-vn".to_string(), // Drop any video stream
            "-c:a".to_string(),
            format.ffmpeg_codec().to_string(),
        ];

        if let Some(ref bitrate) = options.bitrate {
            args.extend(["-b:a".to_string(), bitrate.clone()]);
        }

        if let Some(rate) = audio.target_sample_rate() {
            args.extend(["-ar".to_string(), rate.to_string()]);
        }

        if let Some(channels) = audio.target_channels() {
            args.extend(["-ac".to_string(), channels.count().to_string()]);
        }

        args.extend(["-loglevel".to_string(), self.config.log_level.clone()]);
        args.extend(self.config.extra_args.iter().cloned());

        // Force the muxer so the output extension never has to be guessed
        args.extend(["-f".to_string(), format.ffmpeg_muxer().to_string()]);
        args.push(output_path.to_string_lossy().to_string());

        args
    }

    /// Arguments for a full decode of the first audio stream into the null muxer.
    fn build_decode_args(path: &Path) -> Vec<String> {
        vec![
            "-nostdin".to_string(),
            "-v".to_string(),
            "error".to_string(),
            "-i".to_string(),
            path.to_string_lossy().to_string(),
            "-map".to_string(),
            "0:a:0".to_string(),
            "-f".to_string(),
            "null".to_string(),
            "-".to_string(),
        ]
    }

    /// Fails on a non-zero exit or on any error output. Damaged packets are
    /// skipped and can leave the exit code at 0.
    fn check_decode(path: &Path, exit_code: Option<i32>, stderr: &str) -> Result<(), CodecError> {
        let stderr = stderr.trim();
        if exit_code == Some(0) && stderr.is_empty() {
            return Ok(());
        }
        let reason = match stderr.lines().last() {
            Some(line) => line.to_string(),
            None => format!("ffmpeg exited with code: {:?}", exit_code),
        };
        Err(CodecError::DecodeFailed {
            path: path.to_path_buf(),
            reason,
        })
    }

    async fn probe(&self, path: &Path) -> Result<MediaInfo, CodecError> {
        let probe = Command::new(&self.config.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .kill_on_drop(true)
            .output();

        let output = timeout(self.config.probe_timeout(), probe)
            .await
            .map_err(|_| CodecError::Timeout {
                timeout_secs: self.config.probe_timeout_secs,
            })?
            .map_err(|e| self.spawn_error(e, &self.config.ffprobe_path, true))?;

        if !output.status.success() {
            return Err(CodecError::probe_failed(format!(
                "ffprobe failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::parse_probe_output(path, &stdout)
    }

    async fn decode(&self, path: &Path) -> Result<(), CodecError> {
        let decode = Command::new(&self.config.ffmpeg_path)
            .args(Self::build_decode_args(path))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = timeout(self.config.transcode_timeout(), decode)
            .await
            .map_err(|_| CodecError::Timeout {
                timeout_secs: self.config.transcode_timeout_secs,
            })?
            .map_err(|e| self.spawn_error(e, &self.config.ffmpeg_path, false))?;

        Self::check_decode(
            path,
            output.status.code(),
            &String::from_utf8_lossy(&output.stderr),
        )
    }

    /// Parses ffprobe JSON output into MediaInfo.
    fn parse_probe_output(path: &Path, output: &str) -> Result<MediaInfo, CodecError> {
        #[derive(Deserialize)]
        struct ProbeOutput {
            format: ProbeFormat,
            #[serde(default)]
            streams: Vec<ProbeStream>,
        }

        #[derive(Deserialize)]
        struct ProbeFormat {
            format_name: String,
            duration: Option<String>,
            size: Option<String>,
        }

        #[derive(Deserialize)]
        struct ProbeStream {
            codec_type: String,
            codec_name: Option<String>,
            bit_rate: Option<String>,
            sample_rate: Option<String>,
            channels: Option<u8>,
        }

        let probe: ProbeOutput =
            serde_json::from_str(output).map_err(|e| CodecError::ParseError {
                reason: format!("Failed to parse ffprobe output: {}", e),
            })?;

        let audio_stream = probe
            .streams
            .iter()
            .find(|s| s.codec_type == "audio")
            .ok_or_else(|| CodecError::NoAudioStream {
                path: path.to_path_buf(),
            })?;

        let has_video = probe.streams.iter().any(|s| s.codec_type == "video");

        let format_name = probe
            .format
            .format_name
            .split(',')
            .next()
            .unwrap_or("unknown");

        Ok(MediaInfo {
            path: path.to_path_buf(),
            size_bytes: probe
                .format
                .size
                .as_ref()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(0),
            duration_secs: probe
                .format
                .duration
                .as_ref()
                .and_then(|d| d.parse::<f64>().ok())
                .unwrap_or(0.0),
            format: format_name.to_string(),
            audio_codec: audio_stream.codec_name.clone(),
            audio_bitrate_kbps: audio_stream
                .bit_rate
                .as_ref()
                .and_then(|b| b.parse::<u32>().ok())
                .map(|b| b / 1000),
            sample_rate: audio_stream
                .sample_rate
                .as_ref()
                .and_then(|r| r.parse::<u32>().ok()),
            channels: audio_stream.channels,
            has_video,
        })
    }

    fn spawn_error(&self, e: std::io::Error, binary: &Path, is_probe: bool) -> CodecError {
        if e.kind() != std::io::ErrorKind::NotFound {
            return CodecError::Io(e);
        }
        if is_probe {
            CodecError::FfprobeNotFound {
                path: binary.to_path_buf(),
            }
        } else {
            CodecError::FfmpegNotFound {
                path: binary.to_path_buf(),
            }
        }
    }
}

#[async_trait]
impl MediaCodec for FfmpegCodec {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn load(&self, path: &Path) -> Result<DecodedAudio, CodecError> {
        let info = self.probe(path).await?;
        if self.config.verify_decode {
            self.decode(path).await?;
        }
        Ok(DecodedAudio::new(info))
    }

    async fn export(
        &self,
        audio: &DecodedAudio,
        output_path: &Path,
        format: OutputFormat,
        options: &ExportOptions,
    ) -> Result<(), CodecError> {
        let args = self.build_export_args(audio, output_path, format, options);
        tracing::debug!("Running {} {}", self.config.ffmpeg_path.display(), args.join(" "));

        let mut child = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e, &self.config.ffmpeg_path, false))?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| CodecError::encode_failed("ffmpeg stderr was not captured", None))?;
        let mut reader = BufReader::new(stderr).lines();

        let result = timeout(self.config.transcode_timeout(), async {
            let mut error_output = String::new();
            while let Some(line) = reader.next_line().await? {
                error_output.push_str(&line);
                error_output.push('\n');
            }
            let status = child.wait().await?;
            Ok::<(std::process::ExitStatus, String), std::io::Error>((status, error_output))
        })
        .await;

        match result {
            Ok(Ok((status, error_output))) => {
                if !status.success() {
                    return Err(CodecError::encode_failed(
                        format!("FFmpeg exited with code: {:?}", status.code()),
                        (!error_output.is_empty()).then_some(error_output),
                    ));
                }
            }
            Ok(Err(e)) => return Err(CodecError::Io(e)),
            Err(_) => {
                let _ = child.kill().await;
                return Err(CodecError::Timeout {
                    timeout_secs: self.config.transcode_timeout_secs,
                });
            }
        }

        if !tokio::fs::try_exists(output_path).await.unwrap_or(false) {
            return Err(CodecError::OutputMissing {
                path: output_path.to_path_buf(),
            });
        }

        Ok(())
    }

    async fn validate(&self) -> Result<(), CodecError> {
        Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .output()
            .await
            .map_err(|e| self.spawn_error(e, &self.config.ffmpeg_path, false))?;

        Command::new(&self.config.ffprobe_path)
            .arg("-version")
            .output()
            .await
            .map_err(|e| self.spawn_error(e, &self.config.ffprobe_path, true))?;

        Ok(())
    }
}
