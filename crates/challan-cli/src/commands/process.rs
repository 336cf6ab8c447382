//! Process command - extract data from a single receipt file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use challan_core::{extractor_for, ReceiptKind, Table};

use super::config::load_config;
use crate::input::{read_document, Kind};
use crate::output::{format_table, OutputFormat};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, or converted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Receipt layout
    #[arg(short, long, value_enum)]
    kind: Kind,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let kind = ReceiptKind::from(args.kind);
    let extractor = extractor_for(kind, &config.extraction)?;

    let text = read_document(&args.input, &config.pdf)?;
    let extraction = extractor
        .extract_from_text(&text)
        .map_err(|e| anyhow::anyhow!("{}: {}", args.input.display(), e))?;

    if !extraction.warnings.is_empty() {
        eprintln!("{}", style("Warnings:").yellow());
        for warning in &extraction.warnings {
            eprintln!("  - {}", warning);
        }
    }

    let table = Table::from_records([&extraction.record]);
    let output = format_table(&table, args.format, config.output.decimal_places)?;

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

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
