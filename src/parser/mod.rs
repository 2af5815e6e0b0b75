//! PDF parsing module.
//!
//! Pages are read with lopdf, their content streams interpreted into
//! positioned glyphs, and the glyphs grouped into blocks, lines and spans.

mod color;
mod content;
mod font;
mod inline_image;
mod layout;
mod objects;
mod options;
mod page_geometry;
mod pdf_parser;
mod standard_fonts;

pub use font::strip_subset_tag;
pub use options::{ErrorMode, ExtractOptions, PageSelection};
pub use page_geometry::PageGeometry;
pub use pdf_parser::PdfExtractor;
