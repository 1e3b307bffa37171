use crate::error::ExtractionError;
use std::path::Path;

/// Extracts plain text from a document file.
///
/// Implementations handle one family of formats. Everything downstream of
/// this trait only sees text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError>;

    /// Extractor name for logging
    fn name(&self) -> &str;

    /// Check if extractor supports the given file type
    fn supports_file_type(&self, path: &Path) -> bool;

    /// Degraded form of `extract`: any failure is logged and becomes "".
    fn extract_or_empty(&self, path: &Path) -> String {
        match self.extract(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(extractor = self.name(), path = %path.display(), error = %e, "text extraction failed");
                String::new()
            }
        }
    }
}

/// Shared existence check so every extractor reports missing files the same way.
pub(crate) fn ensure_exists(path: &Path) -> Result<(), ExtractionError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ExtractionError::NotFound(path.to_path_buf()))
    }
}
