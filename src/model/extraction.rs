//! The extraction result: pages and their text spans.
//!
//! These types are the JSON schema of `output.json`; field order and
//! names are part of the output format.

use serde::{Deserialize, Serialize};

use super::Rect;
use crate::error::Result;
use crate::render::{self, JsonFormat};

/// Result of extracting a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Pages in document order.
    pub pages: Vec<PageRecord>,
}

impl Extraction {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages in the result.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get a page by its page number (1-indexed).
    pub fn page(&self, page_number: u32) -> Option<&PageRecord> {
        self.pages.iter().find(|p| p.page_number == page_number)
    }

    /// Total number of spans over all pages.
    pub fn span_count(&self) -> usize {
        self.pages.iter().map(|p| p.texts.len()).sum()
    }

    /// Iterate over every span with its page number.
    pub fn spans(&self) -> impl Iterator<Item = (u32, &TextSpan)> {
        self.pages
            .iter()
            .flat_map(|p| p.texts.iter().map(move |t| (p.page_number, t)))
    }

    /// Serialize in the `output.json` layout.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(self, format)
    }

    /// Parse a previously written `output.json`.
    pub fn from_json(json: &str) -> Result<Self> {
        render::from_json(json)
    }
}

/// One page of the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Visible page width in points
    pub width: f64,

    /// Visible page height in points
    pub height: f64,

    /// Spans in block, line, span order
    pub texts: Vec<TextSpan>,
}

impl PageRecord {
    /// Create a page record with no spans.
    pub fn new(page_number: u32, width: f64, height: f64) -> Self {
        Self {
            page_number,
            width,
            height,
            texts: Vec::new(),
        }
    }

    /// Concatenated text of the page's spans.
    pub fn plain_text(&self) -> String {
        self.texts.iter().map(|t| t.text.as_str()).collect()
    }
}

/// A run of text sharing one font, size and color within a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    pub text: String,
    /// Left edge
    pub x0: f64,
    /// Top edge (origin top-left)
    pub y0: f64,
    /// Right edge
    pub x1: f64,
    /// Bottom edge
    pub y1: f64,
    /// Font name with any subset tag removed
    pub font: String,
    /// Effective font size in points
    pub size: f64,
    /// Fill color packed as 0xRRGGBB
    pub color: u32,
}

impl TextSpan {
    /// Bounding box of the span.
    pub fn bbox(&self) -> Rect {
        Rect {
            x0: self.x0,
            y0: self.y0,
            x1: self.x1,
            y1: self.y1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str) -> TextSpan {
        TextSpan {
            text: text.to_string(),
            x0: 1.0,
            y0: 2.0,
            x1: 3.0,
            y1: 4.0,
            font: "Helvetica".to_string(),
            size: 12.0,
            color: 0,
        }
    }

    #[test]
    fn test_extraction_lookup() {
        let mut first = PageRecord::new(1, 612.0, 792.0);
        first.texts.push(span("Hello"));
        first.texts.push(span(" there"));
        let second = PageRecord::new(2, 612.0, 792.0);
        let extraction = Extraction {
            pages: vec![first, second],
        };

        assert_eq!(extraction.page_count(), 2);
        assert_eq!(extraction.span_count(), 2);
        assert_eq!(extraction.page(1).unwrap().plain_text(), "Hello there");
        assert!(extraction.page(2).unwrap().texts.is_empty());
        assert!(extraction.page(3).is_none());
        assert!(extraction.spans().all(|(page, _)| page == 1));
    }

    #[test]
    fn test_span_field_order() {
        let json = serde_json::to_string(&span("x")).unwrap();
        assert_eq!(
            json,
            r#"{"text":"x","x0":1.0,"y0":2.0,"x1":3.0,"y1":4.0,"font":"Helvetica","size":12.0,"color":0}"#
        );
    }

    #[test]
    fn test_span_bbox() {
        assert_eq!(span("x").bbox(), Rect::new(1.0, 2.0, 3.0, 4.0));
    }
}
