//! PDF text extraction using lopdf and pdf-extract.

use lopdf::{Document, Object};
use tracing::{debug, trace};

use super::{PdfProcessor, PdfType, Result};
use crate::error::PdfError;

/// PDF text extractor using lopdf for structure and pdf-extract for text.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    min_text_length: usize,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            min_text_length: 50,
        }
    }

    /// Set the text length below which a PDF counts as having no text.
    pub fn with_min_text_length(mut self, min_text_length: usize) -> Self {
        self.min_text_length = min_text_length;
        self
    }

    /// Load, check the content type and extract the text in one step.
    ///
    /// Image-only documents are rejected since they would need OCR.
    pub fn text_from_bytes(mut self, data: &[u8]) -> Result<String> {
        self.load(data)?;
        let text = self.extract_text()?;
        match self.classify_text(&text) {
            PdfType::Text | PdfType::Hybrid => Ok(text),
            PdfType::Image => Err(PdfError::ImageOnly),
            PdfType::Empty => Err(PdfError::NoText),
        }
    }

    /// Classify the loaded document from text already extracted from it.
    fn classify_text(&self, text: &str) -> PdfType {
        let text_len = text.trim().len();
        let images = self.count_images();

        let pdf_type = PdfType::classify(text_len, images > 0, self.min_text_length);
        debug!(
            "PDF analysis: {} chars text, {} images -> {:?}",
            text_len, images, pdf_type
        );
        pdf_type
    }

    /// Count image XObjects anywhere in the document.
    fn count_images(&self) -> usize {
        let Some(doc) = self.document.as_ref() else {
            return 0;
        };

        doc.objects
            .values()
            .filter(|object| match object {
                Object::Stream(stream) => stream
                    .dict
                    .get(b"Subtype")
                    .and_then(|s| s.as_name())
                    .map(|name| name == b"Image")
                    .unwrap_or(false),
                _ => false,
            })
            .inspect(|_| trace!("Found image object"))
            .count()
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Receipts downloaded from bank portals are often encrypted with an empty password
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        self.document = Some(doc);

        let page_count = self.page_count();
        if page_count == 0 {
            self.document = None;
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn analyze(&self) -> PdfType {
        let text = self.extract_text().unwrap_or_default();
        self.classify_text(&text)
    }

    fn extract_text(&self) -> Result<String> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
        assert_eq!(extractor.count_images(), 0);
    }

    #[test]
    fn test_extract_without_document() {
        let extractor = PdfExtractor::new();
        assert!(matches!(extractor.extract_text(), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_classify_text_without_images() {
        let extractor = PdfExtractor::new().with_min_text_length(10);

        assert_eq!(extractor.classify_text("Challan No : 00457"), PdfType::Text);
        assert_eq!(extractor.classify_text("   short   "), PdfType::Empty);
        assert_eq!(extractor.classify_text(""), PdfType::Empty);
        assert_eq!(extractor.analyze(), PdfType::Empty);
    }

    #[test]
    fn test_document_without_pages() {
        use lopdf::dictionary;

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();

        let mut extractor = PdfExtractor::new();
        assert!(matches!(extractor.load(&bytes), Err(PdfError::NoPages)));
        assert_eq!(extractor.page_count(), 0);
        assert!(extractor.document.is_none());
    }

    #[test]
    fn test_load_garbage() {
        let result = PdfExtractor::new().text_from_bytes(b"not a pdf");
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }
}
