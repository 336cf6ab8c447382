//! Rendering extracted tables as CSV, JSON or a text summary.

use std::path::Path;

use serde_json::{Map, Value};

use challan_core::receipt::rules::format_indian_amount;
use challan_core::{Cell, Table};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// Format implied by an output file name, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        match crate::input::extension(path).as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            "txt" => Some(Self::Text),
            _ => None,
        }
    }
}

pub fn format_table(
    table: &Table,
    format: OutputFormat,
    decimal_places: u32,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => format_json(table, decimal_places),
        OutputFormat::Csv => format_csv(table, decimal_places),
        OutputFormat::Text => Ok(format_text(table, decimal_places)),
    }
}

fn format_csv(table: &Table, decimal_places: u32) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(table.headers())?;
    for row in table.rendered_rows(decimal_places) {
        wtr.write_record(&row)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// One object per record keyed by column header; empty cells are left out.
fn format_json(table: &Table, decimal_places: u32) -> anyhow::Result<String> {
    let headers = table.headers();

    let objects: Vec<Value> = table
        .rows
        .iter()
        .map(|row| {
            let object: Map<String, Value> = headers
                .iter()
                .zip(row)
                .filter_map(|(header, cell)| {
                    let value = match cell {
                        Cell::Empty => return None,
                        Cell::Integer(n) => Value::from(*n),
                        other => Value::String(other.render(decimal_places)),
                    };
                    Some((header.to_string(), value))
                })
                .collect();
            Value::Object(object)
        })
        .collect();

    Ok(serde_json::to_string_pretty(&objects)?)
}

fn format_text(table: &Table, decimal_places: u32) -> String {
    let headers = table.headers();
    let width = headers.iter().map(|h| h.chars().count()).max().unwrap_or(0);

    let mut output = String::new();

    for (i, row) in table.rows.iter().enumerate() {
        if table.len() > 1 {
            output.push_str(&format!("Receipt {}:\n", i + 1));
        }

        for (header, cell) in headers.iter().zip(row) {
            let value = match cell {
                Cell::Empty => continue,
                Cell::Decimal(amount) => {
                    format!("₹ {}", format_indian_amount(*amount, decimal_places))
                }
                other => other.render(decimal_places),
            };
            output.push_str(&format!("  {:<width$}  {}\n", header, value, width = width));
        }

        if i + 1 < table.len() {
            output.push('\n');
        }
    }

    output
}
