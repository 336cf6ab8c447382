//! Uniform tabular view over extracted records, ready for export.

use std::collections::BTreeSet;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::receipt::{BankField, Record, TaxField};
use crate::receipt::rules::format_amount;

/// Default number of decimal places for amount columns.
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Decimal(Decimal),
    Integer(u64),
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Render the cell, amounts rounded to `decimal_places`.
    pub fn render(&self, decimal_places: u32) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Decimal(value) => format_amount(*value, decimal_places),
            Self::Integer(value) => value.to_string(),
            Self::Empty => String::new(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_DECIMAL_PLACES))
    }
}

/// A table column: a field of one of the two schemas.
///
/// Ordering follows schema declaration order, bank columns first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "field", rename_all = "snake_case")]
pub enum Column {
    Bank(BankField),
    Tax(TaxField),
}

impl Column {
    pub fn header(self) -> &'static str {
        match self {
            Self::Bank(field) => field.header(),
            Self::Tax(field) => field.header(),
        }
    }
}

impl Record {
    /// Columns this record has a value for.
    pub fn columns(&self) -> Vec<Column> {
        match self {
            Record::Bank(_) => BankField::ALL.into_iter().map(Column::Bank).collect(),
            Record::Tax(record) => record.iter().map(|(field, _)| Column::Tax(field)).collect(),
        }
    }

    /// Cell for `column`, [`Cell::Empty`] if this record lacks it.
    pub fn cell(&self, column: Column) -> Cell {
        match (self, column) {
            (Record::Bank(record), Column::Bank(field)) => record.cell(field),
            (Record::Tax(record), Column::Tax(field)) => record.cell(field),
            _ => Cell::Empty,
        }
    }
}

/// Rows of records under the union of their columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table with one row per record, in the given order.
    ///
    /// Columns are the union of fields any record produced; a record
    /// without a column gets an empty cell.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let records: Vec<&Record> = records.into_iter().collect();

        let columns: Vec<Column> = records
            .iter()
            .flat_map(|r| r.columns())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let rows = records
            .iter()
            .map(|record| columns.iter().map(|c| record.cell(*c)).collect())
            .collect();

        Self { columns, rows }
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.header()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// All rows rendered to strings.
    pub fn rendered_rows(&self, decimal_places: u32) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.render(decimal_places)).collect())
            .collect()
    }
}
