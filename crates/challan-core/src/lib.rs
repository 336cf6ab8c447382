//! Core library for tax challan receipt extraction.
//!
//! This crate provides:
//! - A line-indexed view over PDF-converted text
//! - Positional extraction for bank payment counterfoils
//! - Label-driven extraction for tax department receipts
//! - Batch processing with per-document failure isolation
//! - A uniform table model for export
//! - PDF text conversion (feature `pdf`)

pub mod batch;
pub mod error;
pub mod lines;
pub mod models;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod receipt;

pub use batch::{process_documents, CompletedBatch, ExtractionResult, RecordBatch, SourceDocument};
pub use error::{ChallanError, ExtractionError, PdfError, Result};
pub use lines::TextLineIndex;
pub use models::config::ChallanConfig;
pub use models::receipt::{
    BankField, BankReceiptRecord, ReceiptKind, Record, TaxField, TaxReceiptRecord,
};
pub use models::table::{Cell, Column, Table};
#[cfg(feature = "pdf")]
pub use pdf::{PdfExtractor, PdfProcessor, PdfType};
pub use receipt::{
    extractor_for, BankLayout, BankReceiptExtractor, DuplicatePolicy, Extraction,
    ReceiptExtractor, TaxReceiptExtractor,
};
