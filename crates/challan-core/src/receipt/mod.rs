//! Receipt field extraction: positional (bank) and label-driven (tax).

mod bank;
pub mod rules;
mod tax;

pub use bank::{BankLayout, BankReceiptExtractor, FieldRule, TokenSelector, ValueKind};
pub use tax::{DuplicatePolicy, TaxReceiptExtractor};

use crate::error::ExtractionError;
use crate::lines::TextLineIndex;
use crate::models::config::ExtractionConfig;
use crate::models::receipt::{ReceiptKind, Record};

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// A record together with non-fatal observations about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub record: Record,
    pub warnings: Vec<String>,
}

/// Trait for receipt extraction strategies.
///
/// Implementations hold configuration only; extraction never mutates them.
pub trait ReceiptExtractor {
    /// Layout this extractor understands.
    fn kind(&self) -> ReceiptKind;

    /// Extract a record from an indexed document.
    fn extract(&self, lines: &TextLineIndex) -> Result<Extraction>;

    /// Extract a record from plain text.
    fn extract_from_text(&self, text: &str) -> Result<Extraction> {
        self.extract(&TextLineIndex::new(text))
    }
}

/// Build the extractor for `kind` from extraction settings.
pub fn extractor_for(
    kind: ReceiptKind,
    config: &ExtractionConfig,
) -> crate::Result<Box<dyn ReceiptExtractor>> {
    Ok(match kind {
        ReceiptKind::Bank => Box::new(
            BankReceiptExtractor::with_layout(config.bank_layout.clone())?
                .with_date_validation(config.validate_dates)
                .with_total_check(config.check_totals),
        ),
        ReceiptKind::Tax => {
            Box::new(TaxReceiptExtractor::new().with_duplicate_policy(config.duplicate_policy))
        }
    })
}
