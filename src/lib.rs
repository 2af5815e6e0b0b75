//! # pdfspan
//!
//! Positioned text extraction for PDF documents.
//!
//! Every page is broken down into blocks, lines and spans. A span is a run
//! of text sharing one font, size and fill color, reported with its
//! bounding box in page coordinates (origin at the top-left corner, y
//! growing downward). The result is written as JSON.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfspan::extract_text_with_positions;
//!
//! fn main() -> pdfspan::Result<()> {
//!     // Writes reports/output.json next to the input
//!     let extraction = extract_text_with_positions("reports/q3.pdf")?;
//!
//!     for (page, span) in extraction.spans() {
//!         println!("p{} ({:.1}, {:.1}) {}", page, span.x0, span.y0, span.text);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Page → block → line → span** structure in content-stream order
//! - **Font metrics**: embedded widths, CID widths and the standard 14 fonts
//! - **Page geometry**: CropBox, inherited attributes and page rotation
//! - **Color**: gray, RGB, CMYK and separation fills packed as `0xRRGGBB`

pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{sniff_bytes, sniff_path, PdfVersion};
pub use error::{Error, Result};
pub use model::{
    Block, Extraction, ImageBlock, Matrix, PageRecord, Rect, StructuredPage, StyledSpan,
    TextBlock, TextLine, TextSpan,
};
pub use parser::{ErrorMode, ExtractOptions, PageGeometry, PageSelection, PdfExtractor};
pub use render::JsonFormat;

use std::path::{Path, PathBuf};

/// File name of the JSON written next to the input.
pub const OUTPUT_FILE_NAME: &str = "output.json";

/// Extract positioned text and write it to `output.json` beside the input.
///
/// The JSON is pretty-printed with two-space indentation and keeps
/// non-ASCII characters as-is. An existing `output.json` is replaced.
///
/// # Example
///
/// ```no_run
/// use pdfspan::extract_text_with_positions;
///
/// let extraction = extract_text_with_positions("test.pdf").unwrap();
/// println!("Pages: {}", extraction.page_count());
/// ```
pub fn extract_text_with_positions<P: AsRef<Path>>(path: P) -> Result<Extraction> {
    let path = path.as_ref();
    extract_to(path, default_output_path(path), &ExtractOptions::default())
}

/// Extract positioned text and write it to `output`.
///
/// Nothing is written when extraction fails.
///
/// # Example
///
/// ```no_run
/// use pdfspan::{extract_to, ExtractOptions, PageSelection};
///
/// let options = ExtractOptions::new()
///     .compact()
///     .with_pages(PageSelection::parse("1-3").unwrap());
/// extract_to("document.pdf", "spans.json", &options).unwrap();
/// ```
pub fn extract_to<P: AsRef<Path>, Q: AsRef<Path>>(
    path: P,
    output: Q,
    options: &ExtractOptions,
) -> Result<Extraction> {
    let extraction = extract_file(path, options)?;
    render::write_json(&extraction, output, options.json_format)?;
    Ok(extraction)
}

/// Extract positioned text from a PDF file without writing anything.
pub fn extract_file<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<Extraction> {
    let extractor = PdfExtractor::open_with_options(path, options.clone())?;
    extractor.extract()
}

/// Extract positioned text from an in-memory PDF.
///
/// # Example
///
/// ```no_run
/// use pdfspan::{extract_bytes, ExtractOptions};
///
/// let data = std::fs::read("document.pdf").unwrap();
/// let extraction = extract_bytes(&data, &ExtractOptions::default()).unwrap();
/// ```
pub fn extract_bytes(data: &[u8], options: &ExtractOptions) -> Result<Extraction> {
    let extractor = PdfExtractor::from_bytes_with_options(data, options.clone())?;
    extractor.extract()
}

/// `output.json` in the directory of `input`.
///
/// An input without a directory component maps to `output.json` in the
/// working directory.
pub fn default_output_path<P: AsRef<Path>>(input: P) -> PathBuf {
    match input.as_ref().parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(OUTPUT_FILE_NAME),
        _ => PathBuf::from(OUTPUT_FILE_NAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path("docs/report.pdf"),
            PathBuf::from("docs/output.json")
        );
        assert_eq!(default_output_path("test.pdf"), PathBuf::from("output.json"));
        assert_eq!(
            default_output_path("/tmp/a/b.pdf"),
            PathBuf::from("/tmp/a/output.json")
        );
    }

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_extract_bytes_empty_data() {
        let result = extract_bytes(&[], &ExtractOptions::default());
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_extract_bytes_too_short() {
        let result = extract_bytes(b"%PDF", &ExtractOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_bytes_header_only() {
        // Valid header, no document behind it
        let result = extract_bytes(b"%PDF-1.7\n%%EOF", &ExtractOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = extract_file(dir.path().join("nope.pdf"), &ExtractOptions::default());
        match result {
            Err(Error::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected NotFound, got {:?}", other.map(|e| e.page_count())),
        }
    }

    #[test]
    fn test_missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let result = extract_text_with_positions(dir.path().join("missing.pdf"));
        assert!(result.is_err());
        assert!(!dir.path().join(OUTPUT_FILE_NAME).exists());
    }
}
