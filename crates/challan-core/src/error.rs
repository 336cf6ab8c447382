//! Error types for the challan-core library.

use thiserror::Error;

/// Main error type for the challan library.
#[derive(Error, Debug)]
pub enum ChallanError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Receipt extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Text extraction succeeded but produced nothing usable.
    #[error("no text could be extracted from the PDF")]
    NoText,

    /// The PDF only carries scanned images.
    #[error("PDF is image-based (scanned); OCR is not supported")]
    ImageOnly,
}

/// Errors related to receipt field extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// An expected line position is absent from the document.
    #[error("line {line} is out of range (document has {len} lines)")]
    OutOfRange { line: usize, len: usize },

    /// An expected token is missing or not parseable.
    #[error("malformed field {field}: {value:?}")]
    MalformedField { field: String, value: String },

    /// No line matched; the document is not of the expected type.
    #[error("no receipt fields found")]
    NotFound,

    /// Every document of a batch failed.
    #[error("no valid data could be extracted")]
    EmptyBatch,
}

impl ExtractionError {
    /// Build a [`ExtractionError::MalformedField`].
    pub fn malformed(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::MalformedField {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Result type for the challan library.
pub type Result<T> = std::result::Result<T, ChallanError>;
