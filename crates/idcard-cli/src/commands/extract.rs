//! Extract command - run field extraction over OCR fragments stored as JSON.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use idcard_core::{Fragment, Recognition};

use super::output::{format_fields, OutputFormat};
use super::recognize::report_status;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// JSON file with an array of fragments, or `-` for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show mean fragment confidence
    #[arg(long)]
    show_confidence: bool,
}

pub async fn run(args: ExtractArgs) -> anyhow::Result<()> {
    let content = if args.input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        if !args.input.exists() {
            anyhow::bail!("Input file not found: {}", args.input.display());
        }
        fs::read_to_string(&args.input)?
    };

    let fragments: Vec<Fragment> = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid fragment JSON: {}", e))?;

    info!("Extracting fields from {} fragments", fragments.len());

    let recognition = Recognition::from_fragments(fragments);
    report_status(&recognition);

    let confidence = args.show_confidence.then_some(recognition.confidence);
    let output = format_fields(&recognition.fields, confidence, args.format)?;
    println!("{}", output.trim_end());

    Ok(())
}
