mod logging;
mod metrics;
mod render;

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use batchconv_core::batch::check_output_dir;
use batchconv_core::{
    load_config_or_default, validate_config, AudioAnalyzer, BatchCoordinator, BatchError,
    BatchEvent, ChannelLayout, Config, FfmpegCodec, InputFormat, MediaCodec,
};

#[derive(Parser)]
#[command(
    name = "batchconv",
    version,
    about = "Batch convert audio and video files to audio"
)]
struct Cli {
    /// Configuration file (TOML); BATCHCONV_* environment variables override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Also write log records to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert files into an output directory
    Convert(ConvertArgs),

    /// Show channel count, sample width, frame rate and duration of a WAV file
    Analyze {
        /// WAV file to inspect
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported formats and parameter choices
    Formats,
}

#[derive(Args)]
struct ConvertArgs {
    /// Input files; one argument may hold several paths separated by ';'
    inputs: Vec<String>,

    /// Directory converted files are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format (mp3, wav, flac, ogg, aac, m4a)
    #[arg(short, long)]
    format: Option<String>,

    /// Bitrate for mp3 output (64k, 128k, 192k, 256k, 320k)
    #[arg(short, long)]
    bitrate: Option<String>,

    /// Output sample rate in Hz (22050, 44100, 48000)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Output channels (1 or 2)
    #[arg(long)]
    channels: Option<u8>,

    /// Number of parallel conversions
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Print the batch result as JSON
    #[arg(long)]
    json: bool,

    /// Print Prometheus metrics after the batch
    #[arg(long)]
    metrics: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the command succeeded.
async fn run(cli: Cli) -> Result<bool> {
    let mut config =
        load_config_or_default(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Command::Convert(args) = &cli.command {
        apply_overrides(&mut config, args)?;
    }
    validate_config(&config).context("Configuration validation failed")?;

    logging::init(&config.logging, cli.verbose)?;

    match cli.command {
        Command::Convert(args) => convert(config, args).await,
        Command::Analyze { file, json } => analyze(&file, json).await,
        Command::Formats => {
            println!("{}", render::formats_table());
            Ok(true)
        }
    }
}

/// Applies command-line flags on top of the loaded configuration.
fn apply_overrides(config: &mut Config, args: &ConvertArgs) -> Result<()> {
    if let Some(format) = &args.format {
        config.output.format = format.to_lowercase();
    }
    if let Some(bitrate) = &args.bitrate {
        config.output.bitrate = bitrate.clone();
    }
    if let Some(rate) = args.sample_rate {
        config.output.sample_rate =
            Some(NonZeroU32::new(rate).context("Sample rate must be greater than zero")?);
    }
    if let Some(channels) = args.channels {
        config.output.channels =
            Some(ChannelLayout::try_from(channels).map_err(anyhow::Error::msg)?);
    }
    if let Some(jobs) = args.jobs {
        config.batch.max_workers = jobs;
    }
    Ok(())
}

/// Expands `;`-separated arguments into paths, dropping empty entries.
fn split_inputs(raw: &[String]) -> Vec<PathBuf> {
    raw.iter()
        .flat_map(|arg| arg.split(';'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Separates inputs with a supported extension from the rest.
fn partition_supported(inputs: Vec<PathBuf>) -> (Vec<PathBuf>, Vec<PathBuf>) {
    inputs
        .into_iter()
        .partition(|path| InputFormat::from_path(path).is_some())
}

async fn convert(config: Config, args: ConvertArgs) -> Result<bool> {
    let inputs = split_inputs(&args.inputs);
    let output_dir = match args.output_dir {
        Some(dir) if !inputs.is_empty() => dir,
        _ => bail!("Please specify both input files and an output directory."),
    };

    let (inputs, skipped) = partition_supported(inputs);
    for path in &skipped {
        warn!("Skipping unsupported input file: {}", path.display());
        eprintln!("Skipping {}: unsupported input format", path.display());
    }
    if inputs.is_empty() {
        bail!("None of the input files has a supported format.");
    }

    if let Err(e) = check_output_dir(&output_dir).await {
        error!("Batch not started: {}", e);
        if args.json {
            print_batch_error(&e, true);
        } else {
            render::batch_event(&BatchEvent::Failed {
                message: e.to_string(),
            })
            .print();
        }
        return Ok(false);
    }

    let codec = FfmpegCodec::new(config.codec.clone());
    codec
        .validate()
        .await
        .context("FFmpeg is required for conversion")?;
    info!("Using codec: {}", codec.name());

    let coordinator = BatchCoordinator::new(config.batch.clone(), codec);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let quiet = args.json;
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if !quiet {
                render::batch_event(&event).print();
            }
        }
    });

    let result = coordinator
        .run_batch(&inputs, &output_dir, &config.output, Some(tx))
        .await;
    printer.await.context("Progress printer stopped unexpectedly")?;

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            print_batch_error(&e, args.json);
            return Ok(false);
        }
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize batch result")?
        );
    }
    if args.metrics {
        print!("{}", metrics::encode_metrics()?);
    }

    Ok(!result.is_all_failed())
}

fn print_batch_error(e: &BatchError, json: bool) {
    if json {
        println!("{}", serde_json::json!({ "error": e.to_string() }));
    }
}

async fn analyze(file: &Path, json: bool) -> Result<bool> {
    match AudioAnalyzer::new().analyze(file).await {
        Ok(props) => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&props).context("Failed to serialize properties")?
                );
            } else {
                println!("{}", render::audio_properties(&props));
            }
            Ok(true)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Ok(false)
        }
    }
}
