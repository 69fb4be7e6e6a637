use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, ValueEnum};
use ctc_forced_aligner::{
    AlignProgress, AlignerConfig, AlignmentError, AlignmentRequest, ForcedAlignerBuilder,
};
use indicatif::{ProgressBar, ProgressStyle};

#[path = "align/audio_input.rs"]
mod audio_input;
#[path = "align/report_formatter.rs"]
mod report_formatter;

use report_formatter::AlignmentReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One pretty-printed report with metadata and every segment.
    Json,
    /// One JSON object per segment, one per line.
    Jsonl,
}

#[derive(Debug, Parser)]
#[command(name = "align")]
#[command(about = "Align a transcript to an audio file with a CTC acoustic model")]
struct Args {
    /// FLAC or WAV file; multi-channel audio is down-mixed to mono.
    #[arg(long)]
    audio: PathBuf,
    #[arg(long, conflicts_with = "text_file", required_unless_present = "text_file")]
    text: Option<String>,
    #[arg(long)]
    text_file: Option<PathBuf>,
    #[arg(long, default_value = "en")]
    language: String,
    /// Emit one segment per character instead of per word.
    #[arg(long)]
    letter_wise: bool,
    #[arg(long, env = "CTC_ALIGNER_MODEL_DIR")]
    model_dir: Option<String>,
    #[arg(long, env = "CTC_ALIGNER_DEVICE")]
    device: Option<String>,
    /// JSON file with aligner settings; flags override it.
    #[arg(long, env = "CTC_ALIGNER_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();
    let config = load_config(&args)?;
    let text = match (&args.text, &args.text_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .map_err(|err| format!("Failed to read transcript '{}': {err}", path.display()))?,
        (None, None) => return Err("one of --text or --text-file is required".to_string()),
    };
    let (sample_rate_hz, samples) = audio_input::read_mono(&args.audio)?;

    let aligner = ForcedAlignerBuilder::new(config)
        .build()
        .map_err(|err| format!("Failed to build aligner: {err}"))?;
    let request = AlignmentRequest {
        text,
        samples,
        sample_rate_hz,
        language_code: args.language.clone(),
        letter_wise: args.letter_wise,
    };

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} speech ranges {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    progress.set_message("loading model...");
    let result = aligner.align_with_progress(&request, |update: AlignProgress| {
        progress.set_length(update.total_ranges as u64);
        progress.set_position(update.completed_ranges as u64);
        progress.set_message("");
    });
    let segments = match result {
        Ok(segments) => segments,
        Err(err @ AlignmentError::Infeasible { .. }) => {
            progress.abandon_with_message("alignment failed");
            return Err(format!(
                "{err}; the audio is too short for this transcript, shorten the text or check the audio"
            ));
        }
        Err(err) => {
            progress.abandon_with_message("alignment failed");
            return Err(format!("Alignment failed: {err}"));
        }
    };
    progress.finish_with_message("alignment complete");

    let report = AlignmentReport {
        generated_at: Utc::now().to_rfc3339(),
        audio: args.audio.display().to_string(),
        language: args.language,
        sample_rate_hz,
        letter_wise: args.letter_wise,
        segments,
    };
    match args.format {
        OutputFormat::Json => report_formatter::write_report(args.out.as_deref(), &report),
        OutputFormat::Jsonl => report_formatter::write_segments(args.out.as_deref(), &report),
    }
}

fn load_config(args: &Args) -> Result<AlignerConfig, String> {
    let mut config = match &args.config {
        Some(path) => AlignerConfig::load(Path::new(path))
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => AlignerConfig::default(),
    };
    if let Some(model_dir) = &args.model_dir {
        config.model_dir = model_dir.clone();
    }
    if let Some(device) = &args.device {
        config.device = device.clone();
    }
    Ok(config)
}
