//! Text extraction
//!
//! Turns an input file into plain text for the analysis pipeline.
//!
//! ```text
//! File (TXT, MD, PDF)
//!     ↓
//! [Format-specific TextExtractor]
//!     ↓
//! String
//!     ↓
//! [DocumentProcessor::analyze_text]
//! ```
//!
//! ## Available extractors
//!
//! - `PlainTextExtractor` - `.txt`, `.text`, `.md`
//! - `PdfExtractor` - PDFs with a text layer, via `pdf-extract` (feature `pdf`)
//! - `CompositeExtractor` - picks the first extractor that supports the extension

pub mod composite;
pub mod plain_text;
pub mod traits;

#[cfg(feature = "pdf")]
pub mod pdf;

pub use composite::CompositeExtractor;
pub use plain_text::PlainTextExtractor;
pub use traits::TextExtractor;

#[cfg(feature = "pdf")]
pub use pdf::PdfExtractor;

use std::path::Path;

/// Lowercased file extension, or "" when there is none.
pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
