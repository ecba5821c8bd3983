//! Batch processing command for multiple ID card images.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use idcard_core::{FieldKey, IdCardRecognizer, Recognition};

use super::output::{format_fields, OutputFormat};
use super::{build_recognizer, is_supported_image, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    recognition: Option<Recognition>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported_image(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    // One engine instance serves every file.
    let recognizer = build_recognizer(&config, args.model_dir.as_deref())?;

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = process_single_file(&path, &recognizer);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(recognition) => {
                if !recognition.status().is_success() {
                    warn!("{}: {}", path.display(), recognition.status().message());
                }
                results.push(ProcessResult {
                    path,
                    recognition: Some(recognition),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        recognition: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    for result in &results {
        let Some(recognition) = &result.recognition else {
            continue;
        };
        let content = format_fields(&recognition.fields, Some(recognition.confidence), args.format)?;

        match &args.output_dir {
            Some(output_dir) => {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("idcard");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));
                fs::write(&output_path, content)?;
                debug!("Wrote output to {}", output_path.display());
            }
            None => println!("{}: {}", result.path.display(), content.trim_end()),
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let complete = results
        .iter()
        .filter(|r| r.recognition.as_ref().is_some_and(|rec| rec.status().is_success()))
        .count();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let incomplete = results.len() - complete - failed.len();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} complete, {} incomplete, {} failed",
        style(complete).green(),
        style(incomplete).yellow(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(path: &Path, recognizer: &IdCardRecognizer) -> anyhow::Result<Recognition> {
    let bytes = fs::read(path)?;
    Ok(recognizer.recognize_bytes(&bytes)?)
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["filename", "status"];
    header.extend(FieldKey::ALL.iter().map(|k| k.as_str()));
    header.extend(["confidence", "processing_time_ms", "error"]);
    wtr.write_record(&header)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let mut record = vec![filename];
        match &result.recognition {
            Some(recognition) => {
                let status = serde_json::to_value(recognition.status())?;
                record.push(status.as_str().unwrap_or_default().to_string());
                record.extend(
                    FieldKey::ALL
                        .iter()
                        .map(|k| recognition.fields.get(*k).unwrap_or_default().to_string()),
                );
                record.push(format!("{:.2}", recognition.confidence));
                record.push(result.processing_time_ms.to_string());
                record.push(String::new());
            }
            None => {
                record.push("error".to_string());
                record.extend(FieldKey::ALL.iter().map(|_| String::new()));
                record.push(String::new());
                record.push(result.processing_time_ms.to_string());
                record.push(result.error.clone().unwrap_or_default());
            }
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use idcard_core::Fragment;

    #[test]
    fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");

        let results = vec![
            ProcessResult {
                path: PathBuf::from("cards/a.png"),
                recognition: Some(Recognition::from_fragments(vec![
                    Fragment::new("张三").with_score(1.0),
                    Fragment::new("110101199001011234").with_score(0.5),
                ])),
                error: None,
                processing_time_ms: 12,
            },
            ProcessResult {
                path: PathBuf::from("cards/b.png"),
                recognition: None,
                error: Some("image error".to_string()),
                processing_time_ms: 3,
            },
        ];

        write_summary(&path, &results).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(
            lines[0],
            "filename,status,id_number,name,sex,ethnicity,birth_date,address,confidence,processing_time_ms,error"
        );
        assert_eq!(lines[1], "a.png,complete,110101199001011234,张三,,,,,0.75,12,");
        assert_eq!(lines[2], "b.png,error,,,,,,,,3,image error");
    }
}
