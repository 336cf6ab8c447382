//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ChallanError;
use crate::receipt::{BankLayout, DuplicatePolicy};

/// Main configuration for challan processing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallanConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Receipt extraction configuration.
    pub extraction: ExtractionConfig,

    /// Export configuration.
    pub output: OutputConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum text length to consider a PDF text-based.
    pub min_text_length: usize,

    /// Accept `.txt` files as already-converted text.
    pub accept_text_files: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            min_text_length: 50,
            accept_text_files: true,
        }
    }
}

/// Receipt extraction configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Which value survives when a tax receipt label repeats.
    pub duplicate_policy: DuplicatePolicy,

    /// Warn about bank receipt dates that do not parse.
    pub validate_dates: bool,

    /// Warn when a bank receipt total is below its itemised amounts.
    pub check_totals: bool,

    /// Line positions of the bank receipt fields.
    pub bank_layout: BankLayout,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::LastMatchWins,
            validate_dates: true,
            check_totals: true,
            bank_layout: BankLayout::default(),
        }
    }
}

/// Export configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default file written by a batch run.
    pub file_name: String,

    /// Decimal places for amount columns.
    pub decimal_places: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: "extracted_data.csv".to_string(),
            decimal_places: crate::models::table::DEFAULT_DECIMAL_PLACES,
        }
    }
}

impl ChallanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| ChallanError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ChallanError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings extraction cannot run with.
    pub fn validate(&self) -> crate::Result<()> {
        self.extraction
            .bank_layout
            .validate()
            .map_err(ChallanError::Config)?;
        if self.output.decimal_places > 10 {
            return Err(ChallanError::Config(format!(
                "decimal_places must be at most 10, got {}",
                self.output.decimal_places
            )));
        }
        Ok(())
    }
}
