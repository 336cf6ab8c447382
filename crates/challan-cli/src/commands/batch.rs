//! Batch processing command for multiple receipt files.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use challan_core::{ExtractionResult, ReceiptKind, RecordBatch};

use super::config::load_config;
use crate::input::{is_supported, read_document, Kind};
use crate::output::{format_table, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Receipt layout shared by every input
    #[arg(short, long, value_enum)]
    kind: Kind,

    /// Output file (default: from configuration, extracted_data.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from the output file extension, else CSV)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Expand patterns; each pattern's matches come back sorted
    let mut seen = HashSet::new();
    let mut files: Vec<PathBuf> = Vec::new();
    for pattern in &args.inputs {
        for path in glob(pattern)?.filter_map(|r| r.ok()) {
            if !is_supported(&path, &config.pdf) {
                debug!("Skipping unsupported file {}", path.display());
                continue;
            }
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }

    if files.is_empty() {
        anyhow::bail!(
            "No matching files found for pattern: {}",
            args.inputs.join(" ")
        );
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let kind = ReceiptKind::from(args.kind);
    let mut batch = RecordBatch::from_config(kind, &config.extraction)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    for path in &files {
        let source = path.display().to_string();
        match read_document(path, &config.pdf) {
            Ok(text) => {
                batch.process(source, &text);
            }
            Err(e) => {
                batch.record_failure(source, e);
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    let batch = batch.finish();

    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        batch.results().len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(batch.success_count()).green(),
        style(batch.failure_count()).red()
    );

    let warnings: Vec<(&str, &String)> = batch
        .results()
        .iter()
        .filter_map(|r| match r {
            ExtractionResult::Extracted { source, warnings, .. } => Some((source.as_str(), warnings)),
            ExtractionResult::Failed { .. } => None,
        })
        .flat_map(|(source, warnings)| warnings.iter().map(move |w| (source, w)))
        .collect();

    if !warnings.is_empty() {
        println!();
        println!("{}", style("Warnings:").yellow());
        for (source, warning) in &warnings {
            println!("  - {}: {}", source, warning);
        }
    }

    let failures = batch.failures();
    if !failures.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for (source, message) in &failures {
            println!("  - {}: {}", source, message);
        }
    }

    let table = batch.to_table().map_err(|e| {
        warn!("{}", e);
        anyhow::anyhow!("No valid data could be extracted")
    })?;

    let output_path = args
        .output
        .unwrap_or_else(|| PathBuf::from(&config.output.file_name));
    let format = args
        .format
        .or_else(|| OutputFormat::from_path(&output_path))
        .unwrap_or(OutputFormat::Csv);

    let content = format_table(&table, format, config.output.decimal_places)?;
    fs::write(&output_path, content)?;

    println!();
    println!(
        "{} Output written to {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}
