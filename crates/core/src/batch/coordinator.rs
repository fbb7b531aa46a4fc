//! Batch coordinator implementation.

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::codec::MediaCodec;
use crate::converter::{AudioConverter, ConversionError, ConversionOutcome, OutputParams};
use crate::metrics::{BATCHES_TOTAL, BATCH_SIZE, CONVERSIONS_IN_FLIGHT};

use super::config::BatchConfig;
use super::error::BatchError;
use super::types::{BatchEvent, BatchResult, BatchStatus, ProgressTracker};

/// Optional event channel. Sending never blocks and a dropped receiver is ignored.
struct EventSink(Option<mpsc::UnboundedSender<BatchEvent>>);

impl EventSink {
    fn send(&self, event: BatchEvent) {
        if let Some(tx) = &self.0 {
            let _ = tx.send(event);
        }
    }
}

/// Fails unless `output_dir` exists and is a directory.
pub async fn check_output_dir(output_dir: &Path) -> Result<(), BatchError> {
    match tokio::fs::metadata(output_dir).await {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        _ => Err(BatchError::OutputDirMissing {
            path: output_dir.to_path_buf(),
        }),
    }
}

/// Runs many conversions with shared parameters on a bounded worker pool.
pub struct BatchCoordinator<M: MediaCodec> {
    config: BatchConfig,
    converter: Arc<AudioConverter<M>>,
    semaphore: Arc<Semaphore>,
}

impl<M: MediaCodec + 'static> BatchCoordinator<M> {
    /// Creates a coordinator converting through `codec`.
    pub fn new(config: BatchConfig, codec: M) -> Self {
        Self::with_converter(config, AudioConverter::new(codec))
    }

    pub fn with_converter(config: BatchConfig, converter: AudioConverter<M>) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.worker_count()));
        Self {
            config,
            converter: Arc::new(converter),
            semaphore,
        }
    }

    /// Converts every input into `output_dir`.
    ///
    /// Each file becomes `output_dir/<stem>.<format>`. Per-file failures are
    /// reported in the result and as events; only a missing output directory
    /// fails the call. Returns after every scheduled file has finished.
    pub async fn run_batch(
        &self,
        inputs: &[PathBuf],
        output_dir: &Path,
        params: &OutputParams,
        events: Option<mpsc::UnboundedSender<BatchEvent>>,
    ) -> Result<BatchResult, BatchError> {
        let events = EventSink(events);
        let batch_id = Uuid::new_v4();
        let started_at = Utc::now();

        if let Err(err) = check_output_dir(output_dir).await {
            tracing::error!("Batch {} not started: {}", batch_id, err);
            BATCHES_TOTAL
                .with_label_values(&["output_dir_missing"])
                .inc();
            events.send(BatchEvent::Failed {
                message: err.to_string(),
            });
            return Err(err);
        }

        let total = inputs.len();
        tracing::info!(
            "Starting batch {}: {} file(s) to {} into {} with {} worker(s)",
            batch_id,
            total,
            params.format,
            output_dir.display(),
            self.config.worker_count()
        );
        BATCH_SIZE.observe(total as f64);
        events.send(BatchEvent::Started { batch_id, total });

        let mut tasks = JoinSet::new();
        for (index, input) in inputs.iter().enumerate() {
            let request = params.request_for(input, output_dir);
            let converter = Arc::clone(&self.converter);
            let semaphore = Arc::clone(&self.semaphore);

            tasks.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => {
                        CONVERSIONS_IN_FLIGHT.inc();
                        let outcome = converter.convert(&request).await;
                        CONVERSIONS_IN_FLIGHT.dec();
                        outcome
                    }
                    Err(_) => ConversionOutcome::failure(
                        &request.input_path,
                        &ConversionError::unexpected("worker pool closed"),
                    ),
                };
                (index, outcome)
            });
        }

        let tracker = ProgressTracker::new(total);
        let mut slots: Vec<Option<ConversionOutcome>> = (0..total).map(|_| None).collect();
        let mut lost_tasks = Vec::new();

        while let Some(joined) = tasks.join_next().await {
            let progress = tracker.record_completion();
            match joined {
                Ok((index, outcome)) => {
                    if let ConversionOutcome::Failure(failed) = &outcome {
                        events.send(BatchEvent::FileFailed(failed.clone()));
                    }
                    slots[index] = Some(outcome);
                }
                Err(join_err) => {
                    tracing::error!(
                        "Conversion task in batch {} did not finish: {}",
                        batch_id,
                        join_err
                    );
                    lost_tasks.push(join_err.to_string());
                }
            }
            tracing::debug!("Batch {}: {}", batch_id, progress);
            events.send(BatchEvent::Progress(progress));
        }

        // Tasks that died before reporting leave empty slots.
        let mut lost_tasks = lost_tasks.into_iter();
        let outcomes: Vec<ConversionOutcome> = slots
            .into_iter()
            .zip(inputs)
            .map(|(slot, input)| {
                slot.unwrap_or_else(|| {
                    let reason = lost_tasks
                        .next()
                        .unwrap_or_else(|| "conversion task lost".to_string());
                    let outcome =
                        ConversionOutcome::failure(input, &ConversionError::unexpected(reason));
                    if let ConversionOutcome::Failure(failed) = &outcome {
                        events.send(BatchEvent::FileFailed(failed.clone()));
                    }
                    outcome
                })
            })
            .collect();

        let failures = outcomes.iter().filter(|o| !o.is_success()).count();
        let status = BatchStatus::from_counts(total, failures);
        BATCHES_TOTAL.with_label_values(&[status.as_str()]).inc();

        match status {
            BatchStatus::AllFailed => {
                tracing::error!("Batch {}: all {} conversion(s) failed", batch_id, total);
                events.send(BatchEvent::Failed {
                    message: format!("All {} conversions failed.", total),
                });
            }
            BatchStatus::Completed { failures } => {
                if failures == 0 {
                    tracing::info!("Batch {}: conversion completed successfully", batch_id);
                } else {
                    tracing::warn!(
                        "Batch {}: completed with {} of {} file(s) failed",
                        batch_id,
                        failures,
                        total
                    );
                }
                events.send(BatchEvent::Completed {
                    batch_id,
                    succeeded: total - failures,
                    failed: failures,
                });
            }
        }

        Ok(BatchResult {
            batch_id,
            started_at,
            finished_at: Utc::now(),
            status,
            outcomes,
        })
    }
}
