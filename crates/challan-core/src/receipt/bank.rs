//! Positional extraction for bank-issued tax payment counterfoils.
//!
//! Every field lives at a fixed line of the converted text. The layout is
//! data: a list of [`FieldRule`]s, one per field, evaluated in order. The
//! first rule that cannot be satisfied fails the whole document.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{ChallanError, ExtractionError};
use crate::lines::TextLineIndex;
use crate::models::receipt::{BankField, BankReceiptRecord, ReceiptKind, Record};

use super::rules::{parse_amount, parse_integer, parse_receipt_date};
use super::{Extraction, ReceiptExtractor, Result};

/// How a field's text is picked out of its line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "select", rename_all = "snake_case")]
pub enum TokenSelector {
    /// Last whitespace-delimited token.
    LastToken,
    /// Whitespace-delimited token at `position` (1-based).
    Token { position: usize },
    /// Whole line with `label` removed.
    StripLabel { label: String },
    /// Text before the first `marker`, with `label` removed if given.
    Before {
        marker: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    /// Text after the last `marker`.
    After { marker: String },
}

impl TokenSelector {
    /// Apply to `line`; `None` when the token or marker is absent.
    pub fn select(&self, line: &str) -> Option<String> {
        match self {
            Self::LastToken => line.split_whitespace().last().map(str::to_string),
            Self::Token { position } => position
                .checked_sub(1)
                .and_then(|i| line.split_whitespace().nth(i))
                .map(str::to_string),
            Self::StripLabel { label } => Some(line.trim().replace(label.as_str(), "").trim().to_string()),
            Self::Before { marker, label } => {
                let (before, _) = line.split_once(marker.as_str())?;
                let before = match label {
                    Some(label) => before.replace(label.as_str(), ""),
                    None => before.to_string(),
                };
                Some(before.trim().to_string())
            }
            Self::After { marker } => line
                .rsplit_once(marker.as_str())
                .map(|(_, after)| after.trim().to_string()),
        }
    }
}

/// Target type of a field; thousands separators are stripped for numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Text,
    Date,
    Decimal,
    Integer,
}

impl BankField {
    /// Target type fixed by the record schema.
    pub fn value_kind(self) -> ValueKind {
        match self {
            Self::ReceiptDate | Self::RealisationDate => ValueKind::Date,
            Self::NatureOfPayment | Self::DrawnOn => ValueKind::Text,
            Self::BasicTax
            | Self::Interest
            | Self::Penalty
            | Self::FeeUnderSection234E
            | Self::Total => ValueKind::Decimal,
            Self::ChallanNo | Self::ChallanSerialNo => ValueKind::Integer,
        }
    }
}

/// One field of the layout: where it lives and how to cut it out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    pub field: BankField,
    /// 0-indexed line number.
    pub line: usize,
    pub selector: TokenSelector,
}

impl FieldRule {
    pub fn new(field: BankField, line: usize, selector: TokenSelector) -> Self {
        Self {
            field,
            line,
            selector,
        }
    }

    fn evaluate(&self, lines: &TextLineIndex) -> Result<FieldValue> {
        let line = lines.line(self.line).inspect_err(|_| {
            debug!("{} expected on line {} of {}", self.field, self.line, lines.len());
        })?;

        let raw = self
            .selector
            .select(line)
            .ok_or_else(|| ExtractionError::malformed(self.field.header(), line))?;
        trace!("{} <- {:?}", self.field, raw);

        let malformed = || ExtractionError::malformed(self.field.header(), raw.as_str());
        Ok(match self.field.value_kind() {
            ValueKind::Text | ValueKind::Date => FieldValue::Text(raw.clone()),
            ValueKind::Decimal => FieldValue::Decimal(parse_amount(&raw).ok_or_else(malformed)?),
            ValueKind::Integer => FieldValue::Integer(parse_integer(&raw).ok_or_else(malformed)?),
        })
    }
}

#[derive(Debug, Clone)]
enum FieldValue {
    Text(String),
    Decimal(Decimal),
    Integer(u64),
}

/// Complete positional layout of a bank receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankLayout {
    pub rules: Vec<FieldRule>,
}

impl BankLayout {
    /// Check that every field has exactly one rule.
    pub fn validate(&self) -> std::result::Result<(), String> {
        for field in BankField::ALL {
            match self.rules.iter().filter(|r| r.field == field).count() {
                1 => {}
                0 => return Err(format!("bank layout has no rule for {}", field)),
                n => return Err(format!("bank layout has {} rules for {}", n, field)),
            }
        }
        for rule in &self.rules {
            if let TokenSelector::Token { position: 0 } = rule.selector {
                return Err(format!("token positions are 1-based ({})", rule.field));
            }
        }
        Ok(())
    }

    /// Number of lines a conforming document must have.
    pub fn required_lines(&self) -> usize {
        self.rules.iter().map(|r| r.line + 1).max().unwrap_or(0)
    }
}

impl Default for BankLayout {
    /// HDFC Bank counterfoil as produced by PDF text conversion.
    fn default() -> Self {
        use BankField::*;
        use TokenSelector::*;

        let label = |s: &str| StripLabel { label: s.to_string() };

        Self {
            rules: vec![
                FieldRule::new(ReceiptDate, 12, LastToken),
                FieldRule::new(NatureOfPayment, 7, label("Nature of Payment")),
                FieldRule::new(BasicTax, 9, label("Basic Tax")),
                FieldRule::new(Interest, 14, Token { position: 2 }),
                FieldRule::new(Penalty, 12, Token { position: 2 }),
                FieldRule::new(FeeUnderSection234E, 15, Token { position: 4 }),
                FieldRule::new(
                    Total,
                    16,
                    Before {
                        marker: "Drawn on".to_string(),
                        label: Some("TOTAL".to_string()),
                    },
                ),
                FieldRule::new(DrawnOn, 16, After { marker: "Drawn on".to_string() }),
                FieldRule::new(RealisationDate, 19, LastToken),
                FieldRule::new(ChallanNo, 10, LastToken),
                FieldRule::new(ChallanSerialNo, 13, LastToken),
            ],
        }
    }
}

/// Positional extractor for bank receipts.
pub struct BankReceiptExtractor {
    layout: BankLayout,
    /// Warn when a date field is not a calendar date.
    validate_dates: bool,
    /// Warn when the total is below the itemised amounts.
    check_totals: bool,
}

impl BankReceiptExtractor {
    /// Extractor for the default counterfoil layout.
    pub fn new() -> Self {
        Self {
            layout: BankLayout::default(),
            validate_dates: true,
            check_totals: true,
        }
    }

    /// Extractor for a custom layout.
    pub fn with_layout(layout: BankLayout) -> crate::Result<Self> {
        layout.validate().map_err(ChallanError::Config)?;
        Ok(Self {
            layout,
            ..Self::new()
        })
    }

    /// Set date validation.
    pub fn with_date_validation(mut self, validate: bool) -> Self {
        self.validate_dates = validate;
        self
    }

    /// Set the total consistency check.
    pub fn with_total_check(mut self, check: bool) -> Self {
        self.check_totals = check;
        self
    }
}

impl Default for BankReceiptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptExtractor for BankReceiptExtractor {
    fn kind(&self) -> ReceiptKind {
        ReceiptKind::Bank
    }

    fn extract(&self, lines: &TextLineIndex) -> Result<Extraction> {
        debug!("Extracting bank receipt from {} lines", lines.len());

        // A short document is out of range even when an earlier line is malformed
        let required = self.layout.required_lines();
        if lines.len() < required {
            return Err(ExtractionError::OutOfRange {
                line: required - 1,
                len: lines.len(),
            });
        }

        let mut values = HashMap::with_capacity(self.layout.rules.len());
        for rule in &self.layout.rules {
            values.insert(rule.field, rule.evaluate(lines)?);
        }

        let mut fields = Fields(values);
        let record = BankReceiptRecord {
            receipt_date: fields.text(BankField::ReceiptDate)?,
            nature_of_payment: fields.text(BankField::NatureOfPayment)?,
            basic_tax: fields.decimal(BankField::BasicTax)?,
            interest: fields.decimal(BankField::Interest)?,
            penalty: fields.decimal(BankField::Penalty)?,
            fee_under_section_234e: fields.decimal(BankField::FeeUnderSection234E)?,
            total: fields.decimal(BankField::Total)?,
            drawn_on: fields.text(BankField::DrawnOn)?,
            realisation_date: fields.text(BankField::RealisationDate)?,
            challan_no: fields.integer(BankField::ChallanNo)?,
            challan_serial_no: fields.integer(BankField::ChallanSerialNo)?,
        };

        let mut warnings = Vec::new();
        if self.validate_dates {
            for (field, value) in [
                (BankField::ReceiptDate, &record.receipt_date),
                (BankField::RealisationDate, &record.realisation_date),
            ] {
                if parse_receipt_date(value).is_none() {
                    warnings.push(format!("{} {:?} is not a recognised date", field, value));
                }
            }
        }
        if self.check_totals {
            warnings.extend(record.validate());
        }

        debug!(
            "Extracted challan {} with {} warnings",
            record.challan_no,
            warnings.len()
        );

        Ok(Extraction {
            record: Record::Bank(record),
            warnings,
        })
    }
}

/// Evaluated values keyed by field.
struct Fields(HashMap<BankField, FieldValue>);

impl Fields {
    fn take(&mut self, field: BankField) -> Result<FieldValue> {
        self.0
            .remove(&field)
            .ok_or_else(|| ExtractionError::malformed(field.header(), ""))
    }

    fn text(&mut self, field: BankField) -> Result<String> {
        match self.take(field)? {
            FieldValue::Text(s) => Ok(s),
            _ => Err(ExtractionError::malformed(field.header(), "")),
        }
    }

    fn decimal(&mut self, field: BankField) -> Result<Decimal> {
        match self.take(field)? {
            FieldValue::Decimal(d) => Ok(d),
            _ => Err(ExtractionError::malformed(field.header(), "")),
        }
    }

    fn integer(&mut self, field: BankField) -> Result<u64> {
        match self.take(field)? {
            FieldValue::Integer(n) => Ok(n),
            _ => Err(ExtractionError::malformed(field.header(), "")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    const RECEIPT: &str = "\
HDFC BANK LIMITED
Income Tax Challan Counterfoil
Taxpayer's Counterfoil
TAN : MUMA12345B
Name : ACME TRADING PRIVATE LIMITED
Assessment Year : 2021-22
Type of Payment : (200) TDS/TCS Payable by Taxpayer
Nature of Payment 92B Payment of Salaries
Amount (in words) : Rupees One Lakh Twenty Four Thousand Fifty Only
Basic Tax 1,20,000.00
BSR Code 0510308 Challan No 00457
Surcharge 0.00 Education Cess 0.00
Penalty 1,500.00 Date Of Receipt 31/03/2021
Others 0.00 Challan Serial No. 10234
Interest 2,350.50 Mode of Payment Net Banking
Fee Under Sec.234E 200.00
TOTAL 1,24,050.50 Drawn on HDFC BANK LTD
Cheque/DD No : NA
Bank Reference No : 123456789012
Payment Realisation Date 31/03/2021";

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn replace_line(text: &str, index: usize, with: &str) -> String {
        text.lines()
            .enumerate()
            .map(|(i, l)| if i == index { with } else { l })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_extract_receipt() {
        let extraction = BankReceiptExtractor::new().extract_from_text(RECEIPT).unwrap();

        assert_eq!(
            extraction.record,
            Record::Bank(BankReceiptRecord {
                receipt_date: "31/03/2021".to_string(),
                nature_of_payment: "92B Payment of Salaries".to_string(),
                basic_tax: dec("120000.00"),
                interest: dec("2350.50"),
                penalty: dec("1500.00"),
                fee_under_section_234e: dec("200.00"),
                total: dec("124050.50"),
                drawn_on: "HDFC BANK LTD".to_string(),
                realisation_date: "31/03/2021".to_string(),
                challan_no: 457,
                challan_serial_no: 10234,
            })
        );
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn test_short_document_is_out_of_range() {
        let text: String = RECEIPT.lines().take(19).collect::<Vec<_>>().join("\n");

        let err = BankReceiptExtractor::new().extract_from_text(&text).unwrap_err();
        assert_eq!(err, ExtractionError::OutOfRange { line: 19, len: 19 });

        let text: String = RECEIPT.lines().take(12).collect::<Vec<_>>().join("\n");

        let err = BankReceiptExtractor::new().extract_from_text(&text).unwrap_err();
        assert_eq!(err, ExtractionError::OutOfRange { line: 19, len: 12 });
    }

    #[test]
    fn test_short_nonconforming_document_is_out_of_range() {
        let text: String = (0..19)
            .map(|i| format!("filler line {}", i))
            .collect::<Vec<_>>()
            .join("\n");

        let err = BankReceiptExtractor::new().extract_from_text(&text).unwrap_err();
        assert_eq!(err, ExtractionError::OutOfRange { line: 19, len: 19 });
    }

    #[test]
    fn test_long_nonconforming_document_is_malformed() {
        let text: String = (0..20)
            .map(|i| format!("filler line {}", i))
            .collect::<Vec<_>>()
            .join("\n");

        let err = BankReceiptExtractor::new().extract_from_text(&text).unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedField { .. }));
    }

    #[test]
    fn test_unparseable_amount_names_field() {
        let text = replace_line(RECEIPT, 9, "Basic Tax one lakh");

        let err = BankReceiptExtractor::new().extract_from_text(&text).unwrap_err();
        assert_eq!(err, ExtractionError::malformed("Basic Tax", "one lakh"));
    }

    #[test]
    fn test_missing_token_names_field() {
        let text = replace_line(RECEIPT, 15, "Fee 200.00");

        let err = BankReceiptExtractor::new().extract_from_text(&text).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::MalformedField { ref field, .. } if field == "Fee Under Sec.234E"
        ));
    }

    #[test]
    fn test_missing_drawn_on_marker() {
        let text = replace_line(RECEIPT, 16, "TOTAL 1,24,050.50");

        let err = BankReceiptExtractor::new().extract_from_text(&text).unwrap_err();
        assert_eq!(err, ExtractionError::malformed("TOTAL", "TOTAL 1,24,050.50"));
    }

    #[test]
    fn test_date_and_total_warnings() {
        let text = replace_line(RECEIPT, 19, "Payment Realisation Date pending");
        let text = replace_line(&text, 16, "TOTAL 100.00 Drawn on HDFC BANK LTD");

        let extraction = BankReceiptExtractor::new().extract_from_text(&text).unwrap();
        assert_eq!(extraction.warnings.len(), 2);

        let quiet = BankReceiptExtractor::new()
            .with_date_validation(false)
            .with_total_check(false)
            .extract_from_text(&text)
            .unwrap();
        assert!(quiet.warnings.is_empty());
    }

    #[test]
    fn test_selectors() {
        let line = "TOTAL 1,24,050.50 Drawn on HDFC BANK LTD";

        assert_eq!(TokenSelector::LastToken.select(line).as_deref(), Some("LTD"));
        assert_eq!(
            TokenSelector::Token { position: 2 }.select(line).as_deref(),
            Some("1,24,050.50")
        );
        assert_eq!(TokenSelector::Token { position: 0 }.select(line), None);
        assert_eq!(TokenSelector::Token { position: 40 }.select(line), None);
        assert_eq!(
            TokenSelector::After { marker: "Drawn on".into() }.select(line).as_deref(),
            Some("HDFC BANK LTD")
        );
        assert_eq!(TokenSelector::LastToken.select("   "), None);
    }

    #[test]
    fn test_layout_validation() {
        assert!(BankLayout::default().validate().is_ok());
        assert_eq!(BankLayout::default().required_lines(), 20);

        let mut layout = BankLayout::default();
        layout.rules.pop();
        assert!(BankReceiptExtractor::with_layout(layout).is_err());

        let mut layout = BankLayout::default();
        layout.rules[3].selector = TokenSelector::Token { position: 0 };
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_shifted_layout_is_data() {
        let shifted = format!("Page header\n{}", RECEIPT);
        assert!(BankReceiptExtractor::new().extract_from_text(&shifted).is_err());

        let mut layout = BankLayout::default();
        for rule in &mut layout.rules {
            rule.line += 1;
        }
        let extraction = BankReceiptExtractor::with_layout(layout)
            .unwrap()
            .extract_from_text(&shifted)
            .unwrap();
        assert_eq!(extraction.record.as_bank().unwrap().challan_no, 457);
    }

    #[test]
    fn test_layout_round_trips_through_json() {
        let json = serde_json::to_string(&BankLayout::default()).unwrap();
        let layout: BankLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(layout, BankLayout::default());
    }
}
