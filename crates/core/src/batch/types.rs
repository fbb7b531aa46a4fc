//! Types for the batch module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

use crate::converter::{ConversionOutcome, ConvertedFile, FailedFile};

/// Completed versus total files of a running batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
}

impl BatchProgress {
    /// Whole-number percentage, 100 for an empty batch.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        (self.completed.min(self.total) * 100 / self.total) as u8
    }
}

impl fmt::Display for BatchProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Processed {} of {} files.", self.completed, self.total)
    }
}

/// Completion counter for one batch.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    completed: AtomicUsize,
    total: usize,
}

impl ProgressTracker {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total,
        }
    }

    /// Counts one finished file and returns the resulting progress.
    pub(crate) fn record_completion(&self) -> BatchProgress {
        let completed = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        BatchProgress {
            completed,
            total: self.total,
        }
    }
}

/// Events posted to the host while a batch runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BatchEvent {
    /// Work was scheduled.
    Started { batch_id: Uuid, total: usize },
    /// A file finished, successfully or not.
    Progress(BatchProgress),
    /// A file failed; posted just before its progress event.
    FileFailed(FailedFile),
    /// The batch finished with at least one success, or was empty.
    Completed {
        batch_id: Uuid,
        succeeded: usize,
        failed: usize,
    },
    /// The batch could not run, or every file failed. Always the last event.
    Failed { message: String },
}

/// Terminal status of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchStatus {
    /// Zero or more files failed, but not all of them.
    Completed { failures: usize },
    /// Every file in a non-empty batch failed.
    AllFailed,
}

impl BatchStatus {
    pub fn from_counts(total: usize, failures: usize) -> Self {
        if total > 0 && failures == total {
            Self::AllFailed
        } else {
            Self::Completed { failures }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed { .. } => "completed",
            Self::AllFailed => "all_failed",
        }
    }
}

/// Everything a finished batch produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub batch_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub status: BatchStatus,
    /// One outcome per input, in submission order.
    pub outcomes: Vec<ConversionOutcome>,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &ConvertedFile> {
        self.outcomes.iter().filter_map(|o| match o {
            ConversionOutcome::Success(file) => Some(file),
            ConversionOutcome::Failure(_) => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = &FailedFile> {
        self.outcomes.iter().filter_map(|o| match o {
            ConversionOutcome::Failure(file) => Some(file),
            ConversionOutcome::Success(_) => None,
        })
    }

    pub fn is_all_failed(&self) -> bool {
        self.status == BatchStatus::AllFailed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::ErrorKind;
    use std::path::PathBuf;

    #[test]
    fn test_progress_label_and_percent() {
        let progress = BatchProgress {
            completed: 1,
            total: 2,
        };
        assert_eq!(progress.to_string(), "Processed 1 of 2 files.");
        assert_eq!(progress.percent(), 50);

        let empty = BatchProgress {
            completed: 0,
            total: 0,
        };
        assert_eq!(empty.percent(), 100);

        let third = BatchProgress {
            completed: 1,
            total: 3,
        };
        assert_eq!(third.percent(), 33);
    }

    #[test]
    fn test_tracker_counts_each_completion_once() {
        let tracker = ProgressTracker::new(3);
        assert_eq!(tracker.record_completion().completed, 1);
        assert_eq!(tracker.record_completion().completed, 2);
        assert_eq!(
            tracker.record_completion(),
            BatchProgress {
                completed: 3,
                total: 3
            }
        );
    }

    #[test]
    fn test_status_from_counts() {
        assert_eq!(
            BatchStatus::from_counts(0, 0),
            BatchStatus::Completed { failures: 0 }
        );
        assert_eq!(
            BatchStatus::from_counts(3, 1),
            BatchStatus::Completed { failures: 1 }
        );
        assert_eq!(BatchStatus::from_counts(2, 2), BatchStatus::AllFailed);
    }

    #[test]
    fn test_event_serialization() {
        let event = BatchEvent::Progress(BatchProgress {
            completed: 2,
            total: 5,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "progress");
        assert_eq!(json["completed"], 2);

        let event = BatchEvent::FileFailed(FailedFile {
            input_path: PathBuf::from("/in/b.wav"),
            error_kind: ErrorKind::Load,
            message: "boom".to_string(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "file_failed");
        assert_eq!(json["error_kind"], "load");
    }
}
