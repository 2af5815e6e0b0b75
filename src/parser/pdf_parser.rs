//! PDF text extractor using lopdf.

use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};

use crate::detect::{sniff_bytes, sniff_path};
use crate::error::{Error, Result};
use crate::model::{Extraction, PageRecord, StructuredPage};

use super::content::{FontMap, Interpreter, Resources};
use super::layout::PageBuilder;
use super::objects::get;
use super::options::{ErrorMode, ExtractOptions};
use super::page_geometry::{inherited, PageGeometry};

/// Positioned text extractor over one PDF document.
pub struct PdfExtractor {
    doc: LopdfDocument,
    options: ExtractOptions,
}

impl PdfExtractor {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ExtractOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Self> {
        let path = path.as_ref();

        // Verify it's a PDF before handing it to lopdf
        let version = sniff_path(path)?;
        log::debug!("Opening {} (PDF {})", path.display(), version);

        let doc = LopdfDocument::load(path)?;
        Ok(Self { doc, options })
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ExtractOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ExtractOptions) -> Result<Self> {
        sniff_bytes(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self { doc, options })
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Extract every selected page, in page order.
    pub fn extract(&self) -> Result<Extraction> {
        let mut extraction = Extraction::new();

        for (page_number, page_id) in self.doc.get_pages() {
            if !self.options.pages.includes(page_number) {
                continue;
            }

            match self.page_record(page_number, page_id) {
                Ok(record) => extraction.pages.push(record),
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!("Failed to read page {}: {}", page_number, e);
                    extraction.pages.push(PageRecord::new(page_number, 0.0, 0.0));
                }
                Err(e) => return Err(e),
            }
        }

        log::debug!(
            "Extracted {} spans from {} pages",
            extraction.span_count(),
            extraction.page_count()
        );
        Ok(extraction)
    }

    /// Extract a single page (1-indexed).
    pub fn extract_page(&self, page_number: u32) -> Result<PageRecord> {
        let page_id = self.page_id(page_number)?;
        self.page_record(page_number, page_id)
    }

    /// The block/line/span tree of a single page (1-indexed).
    pub fn structured_page(&self, page_number: u32) -> Result<StructuredPage> {
        let page_id = self.page_id(page_number)?;
        let geometry = PageGeometry::read(&self.doc, page_id)?;
        self.render_page(page_id, &geometry)
    }

    fn page_id(&self, page_number: u32) -> Result<ObjectId> {
        let pages = self.doc.get_pages();
        pages
            .get(&page_number)
            .copied()
            .ok_or(Error::PageOutOfRange(page_number, pages.len() as u32))
    }

    fn page_record(&self, page_number: u32, page_id: ObjectId) -> Result<PageRecord> {
        let geometry = PageGeometry::read(&self.doc, page_id)?;
        let mut record = PageRecord::new(page_number, geometry.width(), geometry.height());

        match self.render_page(page_id, &geometry) {
            Ok(page) => record.texts = page.to_text_spans(),
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                log::warn!("Skipping text on page {}: {}", page_number, e);
            }
            Err(e) => return Err(e),
        }

        log::debug!("Page {}: {} spans", page_number, record.texts.len());
        Ok(record)
    }

    /// Run the page's content through the interpreter.
    fn render_page(&self, page_id: ObjectId, geometry: &PageGeometry) -> Result<StructuredPage> {
        let doc = &self.doc;
        let page = doc
            .get_dictionary(page_id)
            .map_err(|e| Error::Corrupted(format!("page object {:?}: {}", page_id, e)))?;

        let content = page_content(doc, page)?;
        // /Resources is inherited whole from the nearest ancestor that has one
        let resources = match inherited(doc, page, b"Resources") {
            Some(Object::Dictionary(dict)) => Resources::from_dict(doc, dict),
            _ => Resources::new(None, FontMap::new()),
        };

        let mut builder = PageBuilder::new();
        Interpreter::new(doc, &mut builder, geometry.matrix()).run(&content, &resources)?;
        Ok(builder.finish())
    }
}

/// Concatenated, decoded /Contents of a page. A page without contents is blank.
fn page_content(doc: &LopdfDocument, page: &Dictionary) -> Result<Vec<u8>> {
    match get(doc, page, b"Contents") {
        None | Some(Object::Null) => Ok(Vec::new()),
        Some(Object::Stream(stream)) => Ok(stream_bytes(stream)),
        Some(Object::Array(parts)) => {
            let mut content = Vec::new();
            for part in parts {
                if let Object::Reference(id) = part {
                    if let Ok(Object::Stream(stream)) = doc.get_object(*id) {
                        content.extend_from_slice(&stream_bytes(stream));
                        content.push(b'\n');
                    }
                }
            }
            Ok(content)
        }
        Some(_) => Err(Error::Corrupted("invalid page /Contents".to_string())),
    }
}

fn stream_bytes(stream: &Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::dictionary;

    fn one_page_pdf(ops: Vec<Operation>, extra_contents: bool) -> Vec<u8> {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let content = Content { operations: ops }.encode().unwrap();
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let contents: Object = if extra_contents {
            let tail = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 10.into()]),
                    Operation::new("Td", vec![72.into(), 300.into()]),
                    Operation::new("Tj", vec![Object::string_literal("tail")]),
                    Operation::new("ET", vec![]),
                ],
            };
            let tail_id = doc.add_object(Stream::new(dictionary! {}, tail.encode().unwrap()));
            vec![content_id.into(), tail_id.into()].into()
        } else {
            content_id.into()
        };
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => contents,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    fn hello_ops() -> Vec<Operation> {
        vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 10.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal("Hello")]),
            Operation::new("ET", vec![]),
        ]
    }

    #[test]
    fn test_inherited_resources_and_media_box() {
        let data = one_page_pdf(hello_ops(), false);
        let extractor = PdfExtractor::from_bytes(&data).unwrap();
        assert_eq!(extractor.page_count(), 1);

        let page = extractor.extract_page(1).unwrap();
        assert_eq!((page.width, page.height), (612.0, 792.0));
        assert_eq!(page.texts.len(), 1);
        let span = &page.texts[0];
        assert_eq!(span.text, "Hello");
        assert_eq!(span.font, "Courier");
        assert!((span.x1 - span.x0 - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_content_array_is_concatenated() {
        let data = one_page_pdf(hello_ops(), true);
        let extractor = PdfExtractor::from_bytes(&data).unwrap();
        let page = extractor.extract_page(1).unwrap();
        let texts: Vec<_> = page.texts.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello", "tail"]);
    }

    #[test]
    fn test_page_out_of_range() {
        let data = one_page_pdf(hello_ops(), false);
        let extractor = PdfExtractor::from_bytes(&data).unwrap();
        assert!(matches!(
            extractor.extract_page(2),
            Err(Error::PageOutOfRange(2, 1))
        ));
        assert!(matches!(
            extractor.structured_page(0),
            Err(Error::PageOutOfRange(0, 1))
        ));
    }

    #[test]
    fn test_not_a_pdf() {
        assert!(matches!(
            PdfExtractor::from_bytes(b"hello world"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_structured_page_tree() {
        let data = one_page_pdf(hello_ops(), true);
        let extractor = PdfExtractor::from_bytes(&data).unwrap();
        let page = extractor.structured_page(1).unwrap();
        // 400pt apart: separate blocks
        assert_eq!(page.blocks.len(), 2);
        assert_eq!(page.to_text_spans().len(), 2);
    }
}
