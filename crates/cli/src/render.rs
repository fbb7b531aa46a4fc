//! Terminal rendering of batch events, analysis results and format tables.

use batchconv_core::formats::{
    BITRATE_CHOICES, CHANNEL_CHOICES, SAMPLE_RATE_CHOICES, SUPPORTED_INPUT_FORMATS,
    SUPPORTED_OUTPUT_FORMATS,
};
use batchconv_core::{AudioProperties, BatchEvent};

/// A line for stdout or stderr.
#[derive(Debug, PartialEq, Eq)]
pub enum Line {
    Out(String),
    Err(String),
}

impl Line {
    pub fn print(&self) {
        match self {
            Line::Out(text) => println!("{}", text),
            Line::Err(text) => eprintln!("{}", text),
        }
    }
}

pub fn batch_event(event: &BatchEvent) -> Line {
    match event {
        BatchEvent::Started { total, .. } => Line::Out(format!("Converting {} file(s)...", total)),
        BatchEvent::Progress(progress) => {
            Line::Out(format!("[{:>3}%] {}", progress.percent(), progress))
        }
        BatchEvent::FileFailed(failed) => Line::Err(format!(
            "Error converting {}: {}",
            failed.input_path.display(),
            failed.message
        )),
        BatchEvent::Completed { failed: 0, .. } => {
            Line::Out("Batch conversion completed successfully.".to_string())
        }
        BatchEvent::Completed {
            succeeded, failed, ..
        } => Line::Out(format!(
            "Batch conversion completed: {} converted, {} failed.",
            succeeded, failed
        )),
        BatchEvent::Failed { message } => Line::Err(format!("Batch conversion failed: {}", message)),
    }
}

pub fn audio_properties(props: &AudioProperties) -> String {
    format!(
        "Channels: {}\nSample Width (bits): {}\nFrame Rate (Hz): {}\nDuration (s): {:.2}",
        props.channel_count, props.sample_width_bits, props.frame_rate_hz, props.duration_seconds
    )
}

pub fn formats_table() -> String {
    let sample_rates: Vec<String> = SAMPLE_RATE_CHOICES.iter().map(u32::to_string).collect();
    let channels: Vec<String> = CHANNEL_CHOICES.iter().map(u8::to_string).collect();
    format!(
        "Input formats:  {}\nOutput formats: {}\nBitrates (mp3): {}\nSample rates:   {}\nChannels:       {}",
        SUPPORTED_INPUT_FORMATS.join(", "),
        SUPPORTED_OUTPUT_FORMATS.join(", "),
        BITRATE_CHOICES.join(", "),
        sample_rates.join(", "),
        channels.join(", ")
    )
}
