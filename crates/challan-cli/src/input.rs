//! Turning input files into receipt text.

use std::fs;
use std::path::Path;

use tracing::debug;

use challan_core::models::config::PdfConfig;
use challan_core::{PdfExtractor, ReceiptKind};

/// Receipt layout selected on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Kind {
    /// Bank payment counterfoil (fixed line positions)
    Bank,
    /// Tax department challan receipt (labelled lines)
    Tax,
}

impl From<Kind> for ReceiptKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Bank => ReceiptKind::Bank,
            Kind::Tax => ReceiptKind::Tax,
        }
    }
}

/// Lowercased file extension, empty when there is none.
pub fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Whether `path` is a file this tool can read.
pub fn is_supported(path: &Path, config: &PdfConfig) -> bool {
    match extension(path).as_str() {
        "pdf" => true,
        "txt" => config.accept_text_files,
        _ => false,
    }
}

/// Read a receipt as text.
///
/// PDFs go through text extraction; `.txt` files are taken as already converted.
pub fn read_document(path: &Path, config: &PdfConfig) -> anyhow::Result<String> {
    let extension = extension(path);

    let text = match extension.as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            PdfExtractor::new()
                .with_min_text_length(config.min_text_length)
                .text_from_bytes(&data)?
        }
        "txt" if config.accept_text_files => fs::read_to_string(path)?,
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    };

    debug!("Read {} characters from {}", text.len(), path.display());
    Ok(text)
}
