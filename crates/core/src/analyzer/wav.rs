//! WAV header analysis via symphonia.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::error::AnalysisError;
use super::types::AudioProperties;
use crate::metrics::ANALYSES_TOTAL;

/// Reads channel count, sample width, frame rate and duration from WAV files.
///
/// Only RIFF/PCM WAV is recognised; compressed or video inputs fail with
/// [`AnalysisError::InvalidFormat`] even though they convert fine.
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioAnalyzer;

impl AudioAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyzes a file on the blocking thread pool.
    pub async fn analyze(&self, path: &Path) -> Result<AudioProperties, AnalysisError> {
        let analyzer = *self;
        let owned = path.to_path_buf();
        tokio::task::spawn_blocking(move || analyzer.analyze_file(&owned))
            .await
            .unwrap_or_else(|join_err| {
                let err = AnalysisError::failed(path, join_err);
                tracing::error!("Error analyzing audio file {}: {}", path.display(), err);
                ANALYSES_TOTAL.with_label_values(&[err.label()]).inc();
                Err(err)
            })
    }

    /// Analyzes a file on the calling thread.
    pub fn analyze_file(&self, path: &Path) -> Result<AudioProperties, AnalysisError> {
        match read_properties(path) {
            Ok(props) => {
                tracing::info!("Audio analysis for {}: {}", path.display(), props);
                ANALYSES_TOTAL.with_label_values(&["success"]).inc();
                Ok(props)
            }
            Err(err) => {
                tracing::error!("Error analyzing audio file {}: {}", path.display(), err);
                ANALYSES_TOTAL.with_label_values(&[err.label()]).inc();
                Err(err)
            }
        }
    }
}

fn read_properties(path: &Path) -> Result<AudioProperties, AnalysisError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => AnalysisError::NotFound {
            path: path.to_path_buf(),
        },
        _ => AnalysisError::failed(path, e),
    })?;
    let metadata = file.metadata().map_err(|e| AnalysisError::failed(path, e))?;
    if !metadata.is_file() {
        return Err(AnalysisError::failed(path, io::Error::other("not a regular file")));
    }
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| classify(path, e))?;

    let track = probed
        .format
        .default_track()
        .ok_or_else(|| AnalysisError::invalid_format(path, "no audio track"))?;
    let params = &track.codec_params;

    // Rejects WAV payloads that are not PCM.
    symphonia::default::get_codecs()
        .make(params, &DecoderOptions::default())
        .map_err(|e| classify(path, e))?;

    let missing = |field: &str| AnalysisError::invalid_format(path, format!("missing {field}"));

    let channel_count = params
        .channels
        .map(|c| c.count() as u16)
        .ok_or_else(|| missing("channel layout"))?;
    let sample_width_bits = params
        .bits_per_sample
        .ok_or_else(|| missing("sample width"))?;
    let frame_rate_hz = params
        .sample_rate
        .filter(|&rate| rate > 0)
        .ok_or_else(|| missing("frame rate"))?;
    let frames = params.n_frames.ok_or_else(|| missing("frame count"))?;

    Ok(AudioProperties::from_frames(
        channel_count,
        sample_width_bits,
        frame_rate_hz,
        frames,
    ))
}

fn classify(path: &Path, err: SymphoniaError) -> AnalysisError {
    match err {
        SymphoniaError::Unsupported(reason) | SymphoniaError::DecodeError(reason) => {
            AnalysisError::invalid_format(path, reason)
        }
        SymphoniaError::IoError(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            AnalysisError::invalid_format(path, "unexpected end of file")
        }
        other => AnalysisError::Failed {
            path: PathBuf::from(path),
            source: Box::new(other),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use tempfile::TempDir;

    #[test]
    fn test_analyze_stereo_wav() {
        let dir = TempDir::new().unwrap();
        let path = fixtures::write_test_wav(dir.path(), "a.wav").unwrap();

        let props = AudioAnalyzer::new().analyze_file(&path).unwrap();

        assert_eq!(props.channel_count, fixtures::TEST_WAV_CHANNELS);
        assert_eq!(props.sample_width_bits, fixtures::TEST_WAV_BITS as u32);
        assert_eq!(props.frame_rate_hz, fixtures::TEST_WAV_SAMPLE_RATE);
        assert_eq!(props.duration_seconds, 1.5);
    }

    #[test]
    fn test_analyze_mono_24_bit() {
        let dir = TempDir::new().unwrap();
        let path = fixtures::write_pcm_wav(dir.path(), "mono.wav", 1, 48000, 24, 24000).unwrap();

        let props = AudioAnalyzer::new().analyze_file(&path).unwrap();

        assert_eq!(props.channel_count, 1);
        assert_eq!(props.sample_width_bits, 24);
        assert_eq!(props.frame_rate_hz, 48000);
        assert_eq!(props.duration_seconds, 0.5);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = AudioAnalyzer::new()
            .analyze_file(&dir.path().join("missing.wav"))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::NotFound { .. }));
    }

    #[test]
    fn test_directory_is_an_analysis_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.wav");
        std::fs::create_dir(&path).unwrap();

        let err = AudioAnalyzer::new().analyze_file(&path).unwrap_err();
        assert!(matches!(err, AnalysisError::Failed { .. }));
        assert_eq!(err.label(), "failed");
        assert!(err.to_string().contains("not a regular file"));
    }

    #[test]
    fn test_non_wav_content() {
        let dir = TempDir::new().unwrap();
        let path = fixtures::write_corrupt_file(dir.path(), "fake.wav").unwrap();

        let err = AudioAnalyzer::new().analyze_file(&path).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidFormat { .. }));
    }

    #[test]
    fn test_compressed_input_is_not_analyzed() {
        let dir = TempDir::new().unwrap();
        // ID3 tag header followed by junk; only WAV readers are compiled in.
        let path =
            fixtures::write_file(dir.path(), "song.mp3", b"ID3\x04\x00\x00\x00\x00\x00\x00junk")
                .unwrap();

        let err = AudioAnalyzer::new().analyze_file(&path).unwrap_err();
        assert_eq!(err.label(), "invalid_format");
    }

    #[test]
    fn test_analyze_outside_async_context() {
        let dir = TempDir::new().unwrap();
        let path = fixtures::write_test_wav(dir.path(), "a.wav").unwrap();

        let props = tokio_test::block_on(AudioAnalyzer::new().analyze(&path)).unwrap();
        assert_eq!(props.frame_rate_hz, 44100);
    }

    #[tokio::test]
    async fn test_analyze_on_blocking_pool() {
        let dir = TempDir::new().unwrap();
        let path = fixtures::write_test_wav(dir.path(), "a.wav").unwrap();

        let props = AudioAnalyzer::new().analyze(&path).await.unwrap();
        assert_eq!(props.channel_count, 2);

        let err = AudioAnalyzer::new()
            .analyze(&dir.path().join("nope.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::NotFound { .. }));
    }
}
