//! Prometheus metrics for the conversion engine.
//!
//! This module provides metrics for:
//! - Conversions (results, durations by output format)
//! - Batches (terminal status, size)
//! - Analysis probes

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Conversion Metrics
// =============================================================================

/// Conversions total by result.
pub static CONVERSIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("batchconv_conversions_total", "Total file conversions"),
        &["result"], // "success" or an error kind label
    )
    .unwrap()
});

/// Conversion duration in seconds.
pub static CONVERSION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "batchconv_conversion_duration_seconds",
            "Duration of file conversions",
        )
        .buckets(vec![0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0, 300.0, 900.0]),
        &["format"],
    )
    .unwrap()
});

/// Conversions currently holding a worker slot.
pub static CONVERSIONS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "batchconv_conversions_in_flight",
        "Number of conversions currently running",
    )
    .unwrap()
});

// =============================================================================
// Batch Metrics
// =============================================================================

/// Batches total by terminal status.
pub static BATCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("batchconv_batches_total", "Total batches run"),
        &["status"], // "completed", "all_failed", "output_dir_missing"
    )
    .unwrap()
});

/// Files per batch.
pub static BATCH_SIZE: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("batchconv_batch_size", "Number of files per batch")
            .buckets(vec![1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0, 500.0]),
    )
    .unwrap()
});

// =============================================================================
// Analysis Metrics
// =============================================================================

/// Analyses total by result.
pub static ANALYSES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("batchconv_analyses_total", "Total audio analyses"),
        &["result"], // "success", "not_found", "invalid_format", "failed"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CONVERSIONS_TOTAL.clone()),
        Box::new(CONVERSION_DURATION.clone()),
        Box::new(CONVERSIONS_IN_FLIGHT.clone()),
        Box::new(BATCHES_TOTAL.clone()),
        Box::new(BATCH_SIZE.clone()),
        Box::new(ANALYSES_TOTAL.clone()),
    ]
}
