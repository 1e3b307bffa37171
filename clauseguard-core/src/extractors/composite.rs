use super::extension_of;
use super::traits::TextExtractor;
use super::PlainTextExtractor;
use crate::error::ExtractionError;
use std::path::Path;

/// Dispatches to the first registered extractor that supports the file.
pub struct CompositeExtractor {
    extractors: Vec<Box<dyn TextExtractor>>,
}

impl CompositeExtractor {
    pub fn new(extractors: Vec<Box<dyn TextExtractor>>) -> Self {
        Self { extractors }
    }

    /// Plain text, plus PDF when built with the `pdf` feature.
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut extractors: Vec<Box<dyn TextExtractor>> = vec![Box::new(PlainTextExtractor::new())];
        #[cfg(feature = "pdf")]
        extractors.push(Box::new(super::PdfExtractor::new()));
        Self::new(extractors)
    }

    fn extractor_for(&self, path: &Path) -> Option<&dyn TextExtractor> {
        self.extractors
            .iter()
            .find(|extractor| extractor.supports_file_type(path))
            .map(|extractor| extractor.as_ref())
    }
}

impl Default for CompositeExtractor {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl TextExtractor for CompositeExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let extractor = self
            .extractor_for(path)
            .ok_or_else(|| ExtractionError::UnsupportedFormat(extension_of(path)))?;
        tracing::debug!(extractor = extractor.name(), path = %path.display(), "extracting text");
        extractor.extract(path)
    }

    fn name(&self) -> &str {
        "Composite"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        self.extractor_for(path).is_some()
    }
}
