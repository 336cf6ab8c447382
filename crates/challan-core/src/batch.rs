//! Batch processing: one extractor over many documents, failures isolated.

use std::fmt;

use tracing::{debug, info, warn};

use crate::error::ExtractionError;
use crate::lines::TextLineIndex;
use crate::models::config::ExtractionConfig;
use crate::models::receipt::{ReceiptKind, Record};
use crate::models::table::Table;
use crate::receipt::{
    extractor_for, BankReceiptExtractor, ReceiptExtractor, TaxReceiptExtractor,
};

/// A document's extracted text and the identifier it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub id: String,
    pub text: String,
}

impl SourceDocument {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Outcome for a single document of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    Extracted {
        source: String,
        record: Record,
        warnings: Vec<String>,
    },
    Failed {
        source: String,
        message: String,
    },
}

impl ExtractionResult {
    pub fn source(&self) -> &str {
        match self {
            Self::Extracted { source, .. } | Self::Failed { source, .. } => source,
        }
    }

    pub fn record(&self) -> Option<&Record> {
        match self {
            Self::Extracted { record, .. } => Some(record),
            Self::Failed { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Extracted { .. })
    }
}

/// Accumulates one result per document, in input order.
pub struct RecordBatch {
    extractor: Box<dyn ReceiptExtractor>,
    results: Vec<ExtractionResult>,
}

impl RecordBatch {
    /// Empty batch using the default extractor for `kind`.
    pub fn new(kind: ReceiptKind) -> Self {
        let extractor: Box<dyn ReceiptExtractor> = match kind {
            ReceiptKind::Bank => Box::new(BankReceiptExtractor::new()),
            ReceiptKind::Tax => Box::new(TaxReceiptExtractor::new()),
        };
        Self::with_extractor(extractor)
    }

    /// Empty batch using an extractor configured from `config`.
    pub fn from_config(kind: ReceiptKind, config: &ExtractionConfig) -> crate::Result<Self> {
        Ok(Self::with_extractor(extractor_for(kind, config)?))
    }

    pub fn with_extractor(extractor: Box<dyn ReceiptExtractor>) -> Self {
        Self {
            extractor,
            results: Vec::new(),
        }
    }

    pub fn kind(&self) -> ReceiptKind {
        self.extractor.kind()
    }

    /// Extract one document and append its outcome.
    pub fn process(&mut self, source: impl Into<String>, text: &str) -> &ExtractionResult {
        let source = source.into();
        let lines = TextLineIndex::new(text);

        let result = match self.extractor.extract(&lines) {
            Ok(extraction) => {
                for warning in &extraction.warnings {
                    debug!("{}: {}", source, warning);
                }
                info!("Extracted {} receipt from {}", self.kind(), source);
                ExtractionResult::Extracted {
                    source,
                    record: extraction.record,
                    warnings: extraction.warnings,
                }
            }
            Err(e) => {
                warn!("Failed to process {}: {}", source, e);
                ExtractionResult::Failed {
                    source,
                    message: e.to_string(),
                }
            }
        };

        self.push(result)
    }

    /// Append a failure that happened before extraction (e.g. text conversion).
    pub fn record_failure(
        &mut self,
        source: impl Into<String>,
        message: impl fmt::Display,
    ) -> &ExtractionResult {
        let source = source.into();
        warn!("Failed to process {}: {}", source, message);
        self.push(ExtractionResult::Failed {
            source,
            message: message.to_string(),
        })
    }

    fn push(&mut self, result: ExtractionResult) -> &ExtractionResult {
        self.results.push(result);
        &self.results[self.results.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Close the batch; the returned value is read-only.
    pub fn finish(self) -> CompletedBatch {
        let kind = self.kind();
        CompletedBatch {
            kind,
            results: self.results,
        }
    }
}

/// A finished batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedBatch {
    kind: ReceiptKind,
    results: Vec<ExtractionResult>,
}

impl CompletedBatch {
    pub fn kind(&self) -> ReceiptKind {
        self.kind
    }

    /// All outcomes, in input order.
    pub fn results(&self) -> &[ExtractionResult] {
        &self.results
    }

    /// Successful records with their sources, in input order.
    pub fn successes(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.results
            .iter()
            .filter_map(|r| r.record().map(|record| (r.source(), record)))
    }

    /// `(source, message)` for every failed document, in input order.
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.results
            .iter()
            .filter_map(|r| match r {
                ExtractionResult::Failed { source, message } => {
                    Some((source.as_str(), message.as_str()))
                }
                ExtractionResult::Extracted { .. } => None,
            })
            .collect()
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.results.len() - self.success_count()
    }

    /// Successful records as a uniform table.
    ///
    /// Fails with [`ExtractionError::EmptyBatch`] when nothing succeeded.
    pub fn to_table(&self) -> Result<Table, ExtractionError> {
        if self.success_count() == 0 {
            return Err(ExtractionError::EmptyBatch);
        }
        Ok(Table::from_records(self.successes().map(|(_, record)| record)))
    }
}

/// Run the default extractor for `kind` over `documents`.
pub fn process_documents<I>(kind: ReceiptKind, documents: I) -> CompletedBatch
where
    I: IntoIterator<Item = SourceDocument>,
{
    let mut batch = RecordBatch::new(kind);
    for document in documents {
        batch.process(document.id, &document.text);
    }
    batch.finish()
}
