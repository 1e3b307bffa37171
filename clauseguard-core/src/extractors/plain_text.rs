use super::extension_of;
use super::traits::{ensure_exists, TextExtractor};
use crate::error::ExtractionError;
use std::path::Path;

const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "text", "md"];

/// Reads UTF-8 text files as-is. Invalid UTF-8 is replaced rather than rejected,
/// since scanned-and-OCR'd text often carries stray bytes.
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        if !self.supports_file_type(path) {
            return Err(ExtractionError::UnsupportedFormat(extension_of(path)));
        }
        ensure_exists(path)?;
        let bytes = std::fs::read(path).map_err(|source| ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn name(&self) -> &str {
        "PlainText"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        SUPPORTED_EXTENSIONS.contains(&extension_of(path).as_str())
    }
}
