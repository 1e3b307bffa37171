use super::extension_of;
use super::traits::{ensure_exists, TextExtractor};
use crate::error::ExtractionError;
use std::path::Path;

/// Extracts the text layer of a PDF with `pdf-extract`.
///
/// Image-only scans have no text layer and come back empty; OCR is out of scope.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        if !self.supports_file_type(path) {
            return Err(ExtractionError::UnsupportedFormat(extension_of(path)));
        }
        ensure_exists(path)?;
        let bytes = std::fs::read(path).map_err(|source| ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let text = pdf_extract::extract_text_from_mem(&bytes)
            .map_err(|e| ExtractionError::Pdf(e.to_string()))?;
        tracing::debug!(path = %path.display(), chars = text.len(), "extracted pdf text layer");
        Ok(text)
    }

    fn name(&self) -> &str {
        "Pdf"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        extension_of(path) == "pdf"
    }
}
