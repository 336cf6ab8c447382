//! Label-driven extraction for tax department challan receipts.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::ExtractionError;
use crate::lines::TextLineIndex;
use crate::models::receipt::{ReceiptKind, Record, TaxField, TaxReceiptRecord};

use super::rules::patterns::*;
use super::{Extraction, ReceiptExtractor, Result};

/// What happens when a label is matched on more than one line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The value from the last matching line is kept.
    #[default]
    LastMatchWins,
    /// The value from the first matching line is kept.
    FirstMatchWins,
}

/// A label pattern feeding one field.
struct LabelRule {
    field: TaxField,
    pattern: &'static Regex,
}

impl LabelRule {
    fn apply(&self, line: &str) -> Option<String> {
        self.pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| clean_value(m.as_str()))
    }
}

/// Trim whitespace and any rupee sign around a value.
fn clean_value(raw: &str) -> String {
    raw.trim_matches(|c: char| c.is_whitespace() || c == RUPEE)
        .to_string()
}

/// Extractor for tax department receipts.
///
/// Every line is tested against the label rules in order; the first rule
/// matching a line claims it.
pub struct TaxReceiptExtractor {
    rules: Vec<LabelRule>,
    policy: DuplicatePolicy,
}

impl TaxReceiptExtractor {
    /// Create an extractor with the standard labels.
    pub fn new() -> Self {
        let rules = vec![
            LabelRule { field: TaxField::NatureOfPayment, pattern: &NATURE_OF_PAYMENT },
            LabelRule { field: TaxField::Amount, pattern: &AMOUNT_IN_RS },
            LabelRule { field: TaxField::ChallanNo, pattern: &CHALLAN_NO },
            LabelRule { field: TaxField::TenderDate, pattern: &TENDER_DATE },
            LabelRule { field: TaxField::Interest, pattern: &BREAKUP_INTEREST },
            LabelRule { field: TaxField::Penalty, pattern: &BREAKUP_PENALTY },
            LabelRule { field: TaxField::FeeUnderSection234E, pattern: &BREAKUP_FEE_234E },
            LabelRule { field: TaxField::Total, pattern: &BREAKUP_TOTAL },
        ];

        Self {
            rules,
            policy: DuplicatePolicy::default(),
        }
    }

    /// Set the duplicate label policy.
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    fn match_line(&self, line: &str) -> Option<(TaxField, String)> {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(line).map(|value| (rule.field, value)))
    }
}

impl Default for TaxReceiptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptExtractor for TaxReceiptExtractor {
    fn kind(&self) -> ReceiptKind {
        ReceiptKind::Tax
    }

    fn extract(&self, lines: &TextLineIndex) -> Result<Extraction> {
        debug!("Scanning {} lines for tax receipt labels", lines.len());

        let mut record = TaxReceiptRecord::new();

        for (number, line) in lines.iter().enumerate() {
            let Some((field, value)) = self.match_line(line) else {
                continue;
            };
            trace!("line {}: {} = {:?}", number, field, value);

            match self.policy {
                DuplicatePolicy::LastMatchWins => {
                    if let Some(previous) = record.insert(field, value) {
                        debug!("{} on line {} replaces {:?}", field, number, previous);
                    }
                }
                DuplicatePolicy::FirstMatchWins => {
                    if !record.contains(field) {
                        record.insert(field, value);
                    }
                }
            }
        }

        if record.is_empty() {
            return Err(ExtractionError::NotFound);
        }

        let warnings = record
            .missing()
            .into_iter()
            .map(|field| format!("Label not found: {}", field))
            .collect();

        debug!("Extracted {} of {} tax receipt fields", record.len(), TaxField::ALL.len());

        Ok(Extraction {
            record: Record::Tax(record),
            warnings,
        })
    }
}
