//! Batch lifecycle integration tests.
//!
//! These tests drive the batch coordinator end to end with the mock codec:
//! - Output path derivation and shared parameters
//! - Output directory validation
//! - Per-file failures without aborting the batch
//! - Progress event ordering and the worker bound

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc;

use batchconv_core::{
    batch::{BatchConfig, BatchCoordinator, BatchError, BatchEvent, BatchStatus, MAX_WORKERS},
    converter::{ConversionOutcome, ErrorKind, OutputParams},
    formats::ChannelLayout,
    testing::{fixtures, MockCodec},
};

/// Test helper holding a coordinator over a mock codec.
struct TestHarness {
    coordinator: BatchCoordinator<MockCodec>,
    codec: MockCodec,
    input_dir: TempDir,
    output_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_config(BatchConfig::default())
    }

    fn with_config(config: BatchConfig) -> Self {
        let codec = MockCodec::new();
        Self {
            coordinator: BatchCoordinator::new(config, codec.clone()),
            codec,
            input_dir: TempDir::new().expect("Failed to create input dir"),
            output_dir: TempDir::new().expect("Failed to create output dir"),
        }
    }

    fn wav(&self, name: &str) -> PathBuf {
        fixtures::write_test_wav(self.input_dir.path(), name).expect("Failed to write wav")
    }

    fn video(&self, name: &str) -> PathBuf {
        fixtures::write_file(self.input_dir.path(), name, b"\x00\x00\x00\x18ftypmp42")
            .expect("Failed to write video")
    }

    async fn corrupt(&self, name: &str) -> PathBuf {
        let path = fixtures::write_corrupt_file(self.input_dir.path(), name)
            .expect("Failed to write corrupt file");
        self.codec.fail_load_for(&path).await;
        path
    }

    async fn run(
        &self,
        inputs: &[PathBuf],
        params: &OutputParams,
    ) -> (Result<batchconv_core::BatchResult, BatchError>, Vec<BatchEvent>) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let result = self
            .coordinator
            .run_batch(inputs, self.output_dir.path(), params, Some(tx))
            .await;

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        (result, events)
    }
}

fn progress_counts(events: &[BatchEvent]) -> Vec<(usize, usize)> {
    events
        .iter()
        .filter_map(|e| match e {
            BatchEvent::Progress(p) => Some((p.completed, p.total)),
            _ => None,
        })
        .collect()
}

// =============================================================================
// Successful Batches
// =============================================================================

#[tokio::test]
async fn test_wav_and_video_convert_to_mp3() {
    let harness = TestHarness::new();
    let inputs = vec![harness.wav("a.wav"), harness.video("b.mp4")];
    let params = OutputParams::default()
        .with_bitrate("192k")
        .with_sample_rate(NonZeroU32::new(44100).unwrap())
        .with_channels(ChannelLayout::Stereo);

    let (result, events) = harness.run(&inputs, &params).await;
    let result = result.unwrap();

    assert_eq!(result.status, BatchStatus::Completed { failures: 0 });
    assert_eq!(result.succeeded().count(), 2);

    let a = harness.output_dir.path().join("a.mp3");
    let b = harness.output_dir.path().join("b.mp3");
    assert!(std::fs::metadata(&a).unwrap().len() > 0);
    assert!(std::fs::metadata(&b).unwrap().len() > 0);

    let exports = harness.codec.recorded_exports().await;
    assert_eq!(exports.len(), 2);
    for export in &exports {
        assert_eq!(export.options.bitrate.as_deref(), Some("192k"));
        assert_eq!(export.sample_rate, Some(44100));
        assert_eq!(export.channels, Some(2));
    }

    assert!(matches!(events.first(), Some(BatchEvent::Started { total: 2, .. })));
    assert!(matches!(
        events.last(),
        Some(BatchEvent::Completed { succeeded: 2, failed: 0, .. })
    ));
}

#[tokio::test]
async fn test_outputs_land_in_output_dir_with_new_extension() {
    let harness = TestHarness::new();
    let inputs = vec![harness.wav("take one.wav")];
    let params = OutputParams::default().with_format("flac");

    let (result, _) = harness.run(&inputs, &params).await;
    let result = result.unwrap();

    let converted: Vec<_> = result.succeeded().collect();
    assert_eq!(
        converted[0].output_path,
        harness.output_dir.path().join("take one.flac")
    );
    assert_eq!(harness.codec.recorded_exports().await[0].options.bitrate, None);
}

#[tokio::test]
async fn test_empty_batch_is_completed() {
    let harness = TestHarness::new();

    let (result, events) = harness.run(&[], &OutputParams::default()).await;
    let result = result.unwrap();

    assert_eq!(result.status, BatchStatus::Completed { failures: 0 });
    assert!(progress_counts(&events).is_empty());
}

// =============================================================================
// Failure Handling
// =============================================================================

#[tokio::test]
async fn test_missing_output_dir_processes_nothing() {
    let harness = TestHarness::new();
    let inputs = vec![harness.wav("a.wav")];
    let (tx, mut rx) = mpsc::unbounded_channel();

    let result = harness
        .coordinator
        .run_batch(
            &inputs,
            &harness.output_dir.path().join("does-not-exist"),
            &OutputParams::default(),
            Some(tx),
        )
        .await;

    assert!(matches!(result, Err(BatchError::OutputDirMissing { .. })));
    assert_eq!(harness.codec.load_count().await, 0);

    let event = rx.recv().await.expect("expected a failure event");
    assert!(matches!(event, BatchEvent::Failed { .. }));
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn test_corrupt_middle_file_does_not_abort_batch() {
    let harness = TestHarness::new();
    let inputs = vec![
        harness.wav("one.wav"),
        harness.corrupt("two.wav").await,
        harness.wav("three.wav"),
    ];

    let (result, events) = harness.run(&inputs, &OutputParams::default()).await;
    let result = result.unwrap();

    assert_eq!(result.status, BatchStatus::Completed { failures: 1 });
    assert_eq!(result.outcomes.len(), 3);
    assert!(result.outcomes[0].is_success());
    assert_eq!(result.outcomes[1].error_kind(), Some(ErrorKind::Load));
    assert!(result.outcomes[2].is_success());
    assert!(!harness.output_dir.path().join("two.mp3").exists());

    let file_failures: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            BatchEvent::FileFailed(f) => Some(f),
            _ => None,
        })
        .collect();
    assert_eq!(file_failures.len(), 1);
    assert_eq!(file_failures[0].input_path, inputs[1]);
    assert!(matches!(
        events.last(),
        Some(BatchEvent::Completed { succeeded: 2, failed: 1, .. })
    ));
}

#[tokio::test]
async fn test_unsupported_format_fails_every_file() {
    let harness = TestHarness::new();
    let inputs = vec![harness.wav("a.wav"), harness.wav("b.wav")];
    let params = OutputParams::default().with_format("opus");

    let (result, events) = harness.run(&inputs, &params).await;
    let result = result.unwrap();

    assert_eq!(result.status, BatchStatus::AllFailed);
    assert!(result
        .failed()
        .all(|f| f.error_kind == ErrorKind::UnsupportedFormat));
    assert_eq!(harness.codec.load_count().await, 0);
    assert!(matches!(events.last(), Some(BatchEvent::Failed { .. })));
}

#[tokio::test]
async fn test_missing_input_is_reported_per_file() {
    let harness = TestHarness::new();
    let missing = harness.input_dir.path().join("ghost.wav");
    let inputs = vec![missing.clone(), harness.wav("real.wav")];

    let (result, _) = harness.run(&inputs, &OutputParams::default()).await;
    let result = result.unwrap();

    assert_eq!(result.status, BatchStatus::Completed { failures: 1 });
    match &result.outcomes[0] {
        ConversionOutcome::Failure(failed) => {
            assert_eq!(failed.error_kind, ErrorKind::NotFound);
            assert_eq!(failed.input_path, missing);
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_codec_panic_is_contained() {
    let harness = TestHarness::new();
    let bomb = harness.wav("bomb.wav");
    harness.codec.panic_on_load_for(&bomb).await;
    let inputs = vec![bomb, harness.wav("fine.wav")];

    let (result, _) = harness.run(&inputs, &OutputParams::default()).await;
    let result = result.unwrap();

    assert_eq!(result.outcomes[0].error_kind(), Some(ErrorKind::Unexpected));
    assert!(result.outcomes[1].is_success());
}

// =============================================================================
// Progress and Concurrency
// =============================================================================

#[tokio::test]
async fn test_progress_reaches_total_once_and_increases() {
    let harness = TestHarness::new();
    harness
        .codec
        .set_export_delay(Duration::from_millis(5))
        .await;

    let mut inputs: Vec<PathBuf> = (0..7).map(|i| harness.wav(&format!("f{i}.wav"))).collect();
    inputs.push(harness.corrupt("bad1.wav").await);
    inputs.push(harness.corrupt("bad2.wav").await);
    let n = inputs.len();

    let (result, events) = harness.run(&inputs, &OutputParams::default()).await;
    let result = result.unwrap();

    assert_eq!(result.total(), n);
    assert_eq!(result.failed().count(), 2);

    let counts = progress_counts(&events);
    assert_eq!(counts.len(), n);
    let expected: Vec<(usize, usize)> = (1..=n).map(|c| (c, n)).collect();
    assert_eq!(counts, expected);
}

#[tokio::test]
async fn test_default_pool_never_exceeds_max_workers() {
    let harness = TestHarness::new();
    harness
        .codec
        .set_export_delay(Duration::from_millis(40))
        .await;

    let inputs: Vec<PathBuf> = (0..12).map(|i| harness.wav(&format!("w{i}.wav"))).collect();

    let (result, _) = harness.run(&inputs, &OutputParams::default()).await;
    assert_eq!(result.unwrap().succeeded().count(), 12);

    let peak = harness.codec.max_concurrent_exports();
    assert!(peak <= MAX_WORKERS, "peak {} exceeded {}", peak, MAX_WORKERS);
    assert!(peak > 1, "expected conversions to overlap");
}

#[tokio::test]
async fn test_single_worker_runs_sequentially() {
    let harness = TestHarness::with_config(BatchConfig::default().with_max_workers(1));
    harness
        .codec
        .set_export_delay(Duration::from_millis(10))
        .await;

    let inputs: Vec<PathBuf> = (0..4).map(|i| harness.wav(&format!("s{i}.wav"))).collect();

    let (result, _) = harness.run(&inputs, &OutputParams::default()).await;
    assert_eq!(result.unwrap().succeeded().count(), 4);
    assert_eq!(harness.codec.max_concurrent_exports(), 1);
}

#[tokio::test]
async fn test_rerun_overwrites_with_identical_bytes() {
    let harness = TestHarness::new();
    let inputs = vec![harness.wav("same.wav")];
    let output = harness.output_dir.path().join("same.mp3");

    let (first, _) = harness.run(&inputs, &OutputParams::default()).await;
    assert!(first.unwrap().outcomes[0].is_success());
    let first_bytes = std::fs::read(&output).unwrap();

    let (second, _) = harness.run(&inputs, &OutputParams::default()).await;
    assert!(second.unwrap().outcomes[0].is_success());
    assert_eq!(std::fs::read(&output).unwrap(), first_bytes);
}
