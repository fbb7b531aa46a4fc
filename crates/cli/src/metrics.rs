//! Prometheus text exposition of the core metrics.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use prometheus::{Encoder, Registry, TextEncoder};

/// Registry holding every core metric.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    for metric in batchconv_core::metrics::all_metrics() {
        if let Err(e) = registry.register(metric) {
            tracing::warn!("Failed to register metric: {}", e);
        }
    }
    registry
});

/// Encode all metrics in Prometheus text format.
pub fn encode_metrics() -> Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&REGISTRY.gather(), &mut buffer)
        .context("Failed to encode metrics")?;
    String::from_utf8(buffer).context("Metrics output was not UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use batchconv_core::metrics::CONVERSIONS_TOTAL;

    #[test]
    fn test_encode_metrics() {
        CONVERSIONS_TOTAL.with_label_values(&["success"]).inc();

        let text = encode_metrics().unwrap();
        assert!(text.contains("batchconv_conversions_total"));
    }
}
