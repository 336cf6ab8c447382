//! Line-oriented view over a document's extracted text.

use crate::error::ExtractionError;

/// Ordered, immutable lines of one document, 0-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLineIndex {
    lines: Vec<String>,
}

impl TextLineIndex {
    /// Split `text` on line boundaries (`\n`, `\r\n`).
    pub fn new(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// The `i`-th line.
    pub fn line(&self, i: usize) -> Result<&str, ExtractionError> {
        self.lines
            .get(i)
            .map(String::as_str)
            .ok_or(ExtractionError::OutOfRange {
                line: i,
                len: self.lines.len(),
            })
    }

    /// First line, in order, satisfying `predicate`.
    pub fn first_matching<P>(&self, predicate: P) -> Result<&str, ExtractionError>
    where
        P: Fn(&str) -> bool,
    {
        self.iter()
            .find(|line| predicate(line))
            .ok_or(ExtractionError::NotFound)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

impl From<&str> for TextLineIndex {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}
