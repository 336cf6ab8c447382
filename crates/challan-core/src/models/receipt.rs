//! Receipt record models for bank counterfoils and tax department receipts.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::table::Cell;

/// Which receipt layout a batch is processed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptKind {
    /// Bank-issued payment counterfoil (fixed line positions).
    Bank,
    /// Tax department challan receipt (labelled lines).
    Tax,
}

impl fmt::Display for ReceiptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bank => f.write_str("bank"),
            Self::Tax => f.write_str("tax"),
        }
    }
}

/// Fields of a bank receipt, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankField {
    ReceiptDate,
    NatureOfPayment,
    BasicTax,
    Interest,
    Penalty,
    #[serde(rename = "fee_under_section_234e")]
    FeeUnderSection234E,
    Total,
    DrawnOn,
    RealisationDate,
    ChallanNo,
    ChallanSerialNo,
}

impl BankField {
    pub const ALL: [BankField; 11] = [
        BankField::ReceiptDate,
        BankField::NatureOfPayment,
        BankField::BasicTax,
        BankField::Interest,
        BankField::Penalty,
        BankField::FeeUnderSection234E,
        BankField::Total,
        BankField::DrawnOn,
        BankField::RealisationDate,
        BankField::ChallanNo,
        BankField::ChallanSerialNo,
    ];

    /// Column header used on export.
    pub fn header(self) -> &'static str {
        match self {
            Self::ReceiptDate => "Date Of Receipt",
            Self::NatureOfPayment => "Nature of Payment",
            Self::BasicTax => "Basic Tax",
            Self::Interest => "Interest",
            Self::Penalty => "Penalty",
            Self::FeeUnderSection234E => "Fee Under Sec.234E",
            Self::Total => "TOTAL",
            Self::DrawnOn => "Drawn on",
            Self::RealisationDate => "Payment Realisation Date",
            Self::ChallanNo => "Challan No",
            Self::ChallanSerialNo => "Challan Serial No.",
        }
    }
}

impl fmt::Display for BankField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// A bank receipt with its fixed 11-field schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankReceiptRecord {
    #[serde(rename = "Date Of Receipt")]
    pub receipt_date: String,

    #[serde(rename = "Nature of Payment")]
    pub nature_of_payment: String,

    #[serde(rename = "Basic Tax")]
    pub basic_tax: Decimal,

    #[serde(rename = "Interest")]
    pub interest: Decimal,

    #[serde(rename = "Penalty")]
    pub penalty: Decimal,

    #[serde(rename = "Fee Under Sec.234E")]
    pub fee_under_section_234e: Decimal,

    #[serde(rename = "TOTAL")]
    pub total: Decimal,

    #[serde(rename = "Drawn on")]
    pub drawn_on: String,

    #[serde(rename = "Payment Realisation Date")]
    pub realisation_date: String,

    #[serde(rename = "Challan No")]
    pub challan_no: u64,

    #[serde(rename = "Challan Serial No.")]
    pub challan_serial_no: u64,
}

impl BankReceiptRecord {
    /// Cell for a single field.
    pub fn cell(&self, field: BankField) -> Cell {
        match field {
            BankField::ReceiptDate => Cell::Text(self.receipt_date.clone()),
            BankField::NatureOfPayment => Cell::Text(self.nature_of_payment.clone()),
            BankField::BasicTax => Cell::Decimal(self.basic_tax),
            BankField::Interest => Cell::Decimal(self.interest),
            BankField::Penalty => Cell::Decimal(self.penalty),
            BankField::FeeUnderSection234E => Cell::Decimal(self.fee_under_section_234e),
            BankField::Total => Cell::Decimal(self.total),
            BankField::DrawnOn => Cell::Text(self.drawn_on.clone()),
            BankField::RealisationDate => Cell::Text(self.realisation_date.clone()),
            BankField::ChallanNo => Cell::Integer(self.challan_no),
            BankField::ChallanSerialNo => Cell::Integer(self.challan_serial_no),
        }
    }

    /// Sum of the itemised amounts.
    pub fn component_sum(&self) -> Decimal {
        self.basic_tax + self.interest + self.penalty + self.fee_under_section_234e
    }

    /// Consistency issues (empty when the record looks sane).
    ///
    /// The printed total may include surcharge and cess lines that are not
    /// extracted, so only a total below the itemised sum is reported.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.total < self.component_sum() {
            issues.push(format!(
                "Total ({}) is below the sum of itemised amounts ({})",
                self.total,
                self.component_sum()
            ));
        }

        if self.nature_of_payment.is_empty() {
            issues.push("Missing nature of payment".to_string());
        }

        if self.drawn_on.is_empty() {
            issues.push("Missing drawing bank".to_string());
        }

        issues
    }
}

/// Labels a tax receipt may carry, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaxField {
    #[serde(rename = "Nature of Payment")]
    NatureOfPayment,
    #[serde(rename = "Amount (in Rs.)")]
    Amount,
    #[serde(rename = "Challan No.")]
    ChallanNo,
    #[serde(rename = "Tender Date")]
    TenderDate,
    #[serde(rename = "Interest")]
    Interest,
    #[serde(rename = "Penalty")]
    Penalty,
    #[serde(rename = "Fee under Section 234E")]
    FeeUnderSection234E,
    #[serde(rename = "Total (A+B+C+D+E+F)")]
    Total,
}

impl TaxField {
    pub const ALL: [TaxField; 8] = [
        TaxField::NatureOfPayment,
        TaxField::Amount,
        TaxField::ChallanNo,
        TaxField::TenderDate,
        TaxField::Interest,
        TaxField::Penalty,
        TaxField::FeeUnderSection234E,
        TaxField::Total,
    ];

    /// Column header used on export.
    pub fn header(self) -> &'static str {
        match self {
            Self::NatureOfPayment => "Nature of Payment",
            Self::Amount => "Amount (in Rs.)",
            Self::ChallanNo => "Challan No.",
            Self::TenderDate => "Tender Date",
            Self::Interest => "Interest",
            Self::Penalty => "Penalty",
            Self::FeeUnderSection234E => "Fee under Section 234E",
            Self::Total => "Total (A+B+C+D+E+F)",
        }
    }
}

impl fmt::Display for TaxField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// A tax receipt: only the labels that were found are present.
///
/// An absent label and a label with an empty value are different things;
/// the former is not in the map at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxReceiptRecord {
    fields: BTreeMap<TaxField, String>,
}

impl TaxReceiptRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, returning the one it replaced.
    pub fn insert(&mut self, field: TaxField, value: impl Into<String>) -> Option<String> {
        self.fields.insert(field, value.into())
    }

    pub fn get(&self, field: TaxField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: TaxField) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Present fields in column order.
    pub fn iter(&self) -> impl Iterator<Item = (TaxField, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Labels of the fixed set that were not found.
    pub fn missing(&self) -> Vec<TaxField> {
        TaxField::ALL
            .into_iter()
            .filter(|f| !self.contains(*f))
            .collect()
    }

    pub fn cell(&self, field: TaxField) -> Cell {
        match self.get(field) {
            Some(value) => Cell::Text(value.to_string()),
            None => Cell::Empty,
        }
    }
}

impl FromIterator<(TaxField, String)> for TaxReceiptRecord {
    fn from_iter<I: IntoIterator<Item = (TaxField, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// A successfully extracted record of either schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "fields", rename_all = "snake_case")]
pub enum Record {
    Bank(BankReceiptRecord),
    Tax(TaxReceiptRecord),
}

impl Record {
    pub fn kind(&self) -> ReceiptKind {
        match self {
            Self::Bank(_) => ReceiptKind::Bank,
            Self::Tax(_) => ReceiptKind::Tax,
        }
    }

    pub fn as_bank(&self) -> Option<&BankReceiptRecord> {
        match self {
            Self::Bank(record) => Some(record),
            Self::Tax(_) => None,
        }
    }

    pub fn as_tax(&self) -> Option<&TaxReceiptRecord> {
        match self {
            Self::Tax(record) => Some(record),
            Self::Bank(_) => None,
        }
    }
}
