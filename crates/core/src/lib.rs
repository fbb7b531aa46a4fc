pub mod analyzer;
pub mod batch;
pub mod codec;
pub mod config;
pub mod converter;
pub mod formats;
pub mod metrics;
pub mod testing;

pub use analyzer::{AnalysisError, AudioAnalyzer, AudioProperties};
pub use batch::{
    BatchConfig, BatchCoordinator, BatchError, BatchEvent, BatchProgress, BatchResult,
    BatchStatus, MAX_WORKERS,
};
pub use codec::{CodecConfig, CodecError, FfmpegCodec, MediaCodec};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, LoggingConfig,
};
pub use converter::{
    AudioConverter, ConversionError, ConversionOutcome, ConversionRequest, ErrorKind,
    OutputParams,
};
pub use formats::{ChannelLayout, InputFormat, OutputFormat};
