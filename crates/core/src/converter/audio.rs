//! Single-file conversion pipeline.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use super::error::ConversionError;
use super::types::{ConversionOutcome, ConversionRequest, ConvertedFile};
use crate::codec::{CodecError, ExportOptions, MediaCodec};
use crate::metrics::{CONVERSIONS_TOTAL, CONVERSION_DURATION};

/// Converts one file per request by delegating to a [`MediaCodec`].
///
/// The converter has no notion of concurrency; the batch coordinator decides
/// how many conversions run at once.
pub struct AudioConverter<M: MediaCodec> {
    codec: Arc<M>,
}

impl<M: MediaCodec> AudioConverter<M> {
    /// Creates a converter that owns its codec.
    pub fn new(codec: M) -> Self {
        Self::with_shared_codec(Arc::new(codec))
    }

    /// Creates a converter over a shared codec.
    pub fn with_shared_codec(codec: Arc<M>) -> Self {
        Self { codec }
    }

    /// Converts one file and reports the result as an outcome. Never fails.
    ///
    /// A panic inside the codec is caught here and reported as an
    /// unexpected failure.
    pub async fn convert(&self, request: &ConversionRequest) -> ConversionOutcome {
        let start = Instant::now();

        let result = AssertUnwindSafe(self.try_convert(request))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                let err = ConversionError::unexpected(panic_message(panic.as_ref()));
                tracing::error!(
                    "Unexpected error during conversion of {} to {}: {}",
                    request.input_path.display(),
                    request.output_format,
                    err
                );
                Err(err)
            });

        let format_label = request
            .target_format()
            .map(|f| f.extension())
            .unwrap_or("unsupported");
        CONVERSION_DURATION
            .with_label_values(&[format_label])
            .observe(start.elapsed().as_secs_f64());

        match result {
            Ok(file) => {
                CONVERSIONS_TOTAL.with_label_values(&["success"]).inc();
                ConversionOutcome::Success(file)
            }
            Err(err) => {
                CONVERSIONS_TOTAL
                    .with_label_values(&[err.kind().as_str()])
                    .inc();
                ConversionOutcome::failure(&request.input_path, &err)
            }
        }
    }

    /// Converts one file, propagating the typed error.
    pub async fn try_convert(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConvertedFile, ConversionError> {
        let result = self.run(request).await;
        if let Err(ref err) = result {
            tracing::error!(
                "Conversion of {} to {} failed: {}",
                request.input_path.display(),
                request.output_format,
                err
            );
        }
        result
    }

    async fn run(&self, request: &ConversionRequest) -> Result<ConvertedFile, ConversionError> {
        let start = Instant::now();
        let input = &request.input_path;

        match tokio::fs::try_exists(input).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(ConversionError::NotFound {
                    path: input.clone(),
                })
            }
            Err(e) => {
                return Err(ConversionError::unexpected(format!(
                    "could not check input file {}: {}",
                    input.display(),
                    e
                )))
            }
        }

        let format = request.target_format()?;

        tracing::info!("Loading file: {}", input.display());
        let mut audio = self
            .codec
            .load(input)
            .await
            .map_err(|source| ConversionError::Load {
                path: input.clone(),
                source,
            })?;

        if let Some(rate) = request.sample_rate {
            audio.set_sample_rate(rate);
        }
        if let Some(channels) = request.channels {
            audio.set_channel_count(channels);
        }

        let options = ExportOptions::for_format(format, &request.bitrate);
        self.codec
            .export(&audio, &request.output_path, format, &options)
            .await
            .map_err(|source| ConversionError::Export {
                path: request.output_path.clone(),
                source,
            })?;

        let output_size_bytes = tokio::fs::metadata(&request.output_path)
            .await
            .map_err(|_| ConversionError::Export {
                path: request.output_path.clone(),
                source: CodecError::OutputMissing {
                    path: request.output_path.clone(),
                },
            })?
            .len();

        tracing::info!(
            "Successfully exported file: {}",
            request.output_path.display()
        );

        Ok(ConvertedFile {
            input_path: input.clone(),
            output_path: request.output_path.clone(),
            output_size_bytes,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "codec panicked".to_string()
    }
}
