//! Recognize command - extract fields from a single ID card image.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use idcard_core::{Recognition, RecognitionStatus};

use super::output::{format_fields, OutputFormat};
use super::{build_recognizer, is_supported_image, load_config};

/// Arguments for the recognize command.
#[derive(Args)]
pub struct RecognizeArgs {
    /// Input image
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Show recognition confidence
    #[arg(long)]
    show_confidence: bool,
}

pub async fn run(args: RecognizeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    if !is_supported_image(&args.input) {
        anyhow::bail!("Unsupported file format: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Loading OCR models...");
    pb.set_position(10);
    let recognizer = build_recognizer(&config, args.model_dir.as_deref())?;

    pb.set_message("Reading image...");
    pb.set_position(30);
    let bytes = fs::read(&args.input)?;

    pb.set_message("Recognizing...");
    pb.set_position(50);
    let recognition = recognizer.recognize_bytes(&bytes)?;

    pb.finish_and_clear();

    report_status(&recognition);

    let confidence = args.show_confidence.then_some(recognition.confidence);
    let output = format_fields(&recognition.fields, confidence, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output.trim_end());
    }

    if args.show_confidence {
        eprintln!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            recognition.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Tell the user when the card was only partially recognized.
pub fn report_status(recognition: &Recognition) {
    match recognition.status() {
        RecognitionStatus::Complete => {}
        status @ (RecognitionStatus::MissingIdNumber | RecognitionStatus::NoText) => {
            eprintln!("{} {}", style("⚠").yellow(), status.message());
        }
    }
}
