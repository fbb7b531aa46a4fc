//! Mock codec for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::codec::{CodecError, DecodedAudio, ExportOptions, MediaCodec, MediaInfo};
use crate::formats::{InputFormat, OutputFormat};

/// A recorded export for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedExport {
    /// File the audio was loaded from.
    pub source: PathBuf,
    /// Destination passed to export.
    pub output_path: PathBuf,
    /// Target format.
    pub format: OutputFormat,
    /// Sample rate the export was asked to produce.
    pub sample_rate: Option<u32>,
    /// Channel count the export was asked to produce.
    pub channels: Option<u8>,
    /// Encoder options.
    pub options: ExportOptions,
}

/// Mock implementation of the MediaCodec trait.
///
/// Provides controllable behavior for testing:
/// - Track loads and exports for assertions
/// - Fail or panic on chosen paths
/// - Slow down exports and observe how many overlap
///
/// Exports write a small deterministic file describing what was requested,
/// so identical requests produce byte-identical output.
///
/// # Example
///
/// ```rust,ignore
/// use batchconv_core::testing::MockCodec;
///
/// let codec = MockCodec::new();
/// codec.fail_load_for("/in/broken.wav").await;
/// codec.set_export_delay(Duration::from_millis(20)).await;
///
/// // ... run conversions ...
///
/// assert_eq!(codec.recorded_exports().await.len(), 2);
/// assert!(codec.max_concurrent_exports() <= 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockCodec {
    loads: Arc<RwLock<Vec<PathBuf>>>,
    exports: Arc<RwLock<Vec<RecordedExport>>>,
    failing_loads: Arc<RwLock<HashSet<PathBuf>>>,
    failing_exports: Arc<RwLock<HashSet<PathBuf>>>,
    panicking_loads: Arc<RwLock<HashSet<PathBuf>>>,
    export_delay_ms: Arc<RwLock<u64>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

/// Decrements the in-flight counter when an export ends, however it ends.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockCodec {
    /// Sample rate reported for every loaded file.
    pub const SOURCE_SAMPLE_RATE: u32 = 44100;
    /// Channel count reported for every loaded file.
    pub const SOURCE_CHANNELS: u8 = 2;

    /// Create a new mock codec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make loading this path fail with a decode error.
    pub async fn fail_load_for(&self, path: impl AsRef<Path>) {
        self.failing_loads
            .write()
            .await
            .insert(path.as_ref().to_path_buf());
    }

    /// Make exporting to this output path fail.
    pub async fn fail_export_for(&self, output_path: impl AsRef<Path>) {
        self.failing_exports
            .write()
            .await
            .insert(output_path.as_ref().to_path_buf());
    }

    /// Make loading this path panic.
    pub async fn panic_on_load_for(&self, path: impl AsRef<Path>) {
        self.panicking_loads
            .write()
            .await
            .insert(path.as_ref().to_path_buf());
    }

    /// Set how long each export takes.
    pub async fn set_export_delay(&self, delay: Duration) {
        *self.export_delay_ms.write().await = delay.as_millis() as u64;
    }

    /// Get all paths that were loaded, in call order.
    pub async fn recorded_loads(&self) -> Vec<PathBuf> {
        self.loads.read().await.clone()
    }

    /// Get the number of load calls.
    pub async fn load_count(&self) -> usize {
        self.loads.read().await.len()
    }

    /// Get all successful exports, in completion order.
    pub async fn recorded_exports(&self) -> Vec<RecordedExport> {
        self.exports.read().await.clone()
    }

    /// Highest number of exports observed running at the same time.
    pub fn max_concurrent_exports(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Bytes the mock writes for a given export.
    pub fn rendered_output(
        audio: &DecodedAudio,
        format: OutputFormat,
        options: &ExportOptions,
    ) -> Vec<u8> {
        let source = audio
            .source()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!(
            "MOCK {} source={} rate={:?} channels={:?} bitrate={:?}\n",
            format.extension(),
            source,
            audio.sample_rate(),
            audio.channel_count(),
            options.bitrate
        )
        .into_bytes()
    }

    fn media_info(path: &Path, size_bytes: u64) -> MediaInfo {
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("unknown")
            .to_lowercase();
        let has_video = InputFormat::from_path(path)
            .map(|f| f.is_video_container())
            .unwrap_or(false);

        MediaInfo {
            path: path.to_path_buf(),
            size_bytes,
            duration_secs: 1.5,
            audio_codec: Some(if has_video { "aac" } else { "pcm_s16le" }.to_string()),
            audio_bitrate_kbps: Some(1411),
            sample_rate: Some(Self::SOURCE_SAMPLE_RATE),
            channels: Some(Self::SOURCE_CHANNELS),
            has_video,
            format,
        }
    }
}

#[async_trait]
impl MediaCodec for MockCodec {
    fn name(&self) -> &str {
        "mock"
    }

    async fn load(&self, path: &Path) -> Result<DecodedAudio, CodecError> {
        self.loads.write().await.push(path.to_path_buf());

        let should_panic = self.panicking_loads.read().await.contains(path);
        if should_panic {
            panic!("mock codec panic while loading {}", path.display());
        }

        if self.failing_loads.read().await.contains(path) {
            return Err(CodecError::DecodeFailed {
                path: path.to_path_buf(),
                reason: "mock decode failure".to_string(),
            });
        }

        let size_bytes = tokio::fs::metadata(path)
            .await
            .map_err(|e| CodecError::probe_failed(e.to_string()))?
            .len();

        Ok(DecodedAudio::new(Self::media_info(path, size_bytes)))
    }

    async fn export(
        &self,
        audio: &DecodedAudio,
        output_path: &Path,
        format: OutputFormat,
        options: &ExportOptions,
    ) -> Result<(), CodecError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay_ms = *self.export_delay_ms.read().await;
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        if self.failing_exports.read().await.contains(output_path) {
            return Err(CodecError::encode_failed(
                format!("mock encode failure for {}", output_path.display()),
                None,
            ));
        }

        tokio::fs::write(output_path, Self::rendered_output(audio, format, options)).await?;

        self.exports.write().await.push(RecordedExport {
            source: audio.source().to_path_buf(),
            output_path: output_path.to_path_buf(),
            format,
            sample_rate: audio.sample_rate(),
            channels: audio.channel_count(),
            options: options.clone(),
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_reports_source_properties() {
        let dir = TempDir::new().unwrap();
        let path = fixtures::write_file(dir.path(), "clip.mp4", b"not really a movie").unwrap();

        let codec = MockCodec::new();
        let audio = codec.load(&path).await.unwrap();

        assert_eq!(audio.info().format, "mp4");
        assert!(audio.info().has_video);
        assert_eq!(audio.sample_rate(), Some(MockCodec::SOURCE_SAMPLE_RATE));
        assert_eq!(codec.recorded_loads().await, vec![path]);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let dir = TempDir::new().unwrap();
        let path = fixtures::write_test_wav(dir.path(), "a.wav").unwrap();
        let output = dir.path().join("a.mp3");

        let codec = MockCodec::new();
        let audio = codec.load(&path).await.unwrap();

        codec.fail_export_for(&output).await;
        let err = codec
            .export(&audio, &output, OutputFormat::Mp3, &ExportOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CodecError::EncodeFailed { .. }));
        assert!(!output.exists());
        assert_eq!(codec.max_concurrent_exports(), 1);

        codec.fail_load_for(&path).await;
        assert!(codec.load(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_export_writes_deterministic_bytes() {
        let dir = TempDir::new().unwrap();
        let path = fixtures::write_test_wav(dir.path(), "a.wav").unwrap();
        let output = dir.path().join("a.flac");

        let codec = MockCodec::new();
        let audio = codec.load(&path).await.unwrap();
        let options = ExportOptions::default();
        codec
            .export(&audio, &output, OutputFormat::Flac, &options)
            .await
            .unwrap();

        let written = std::fs::read(&output).unwrap();
        assert_eq!(
            written,
            MockCodec::rendered_output(&audio, OutputFormat::Flac, &options)
        );
        assert_eq!(codec.recorded_exports().await[0].format, OutputFormat::Flac);
    }
}
