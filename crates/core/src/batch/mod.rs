//! Batch module: many files, shared parameters, bounded parallelism.
//!
//! [`BatchCoordinator`] validates the output directory, derives one
//! [`ConversionRequest`](crate::converter::ConversionRequest) per input and
//! runs them on at most [`BatchConfig::max_workers`] workers. While it runs,
//! the host receives [`BatchEvent`]s on an unbounded channel:
//!
//! ```text
//! Started -> (FileFailed? Progress)* -> Completed | Failed
//! ```
//!
//! Progress counts rise by one per finished file. The final
//! [`BatchResult`] lists outcomes in the order inputs were given.

mod config;
mod coordinator;
mod error;
mod types;

pub use config::{BatchConfig, MAX_WORKERS};
pub use coordinator::{check_output_dir, BatchCoordinator};
pub use error::BatchError;
pub use types::{BatchEvent, BatchProgress, BatchResult, BatchStatus};
