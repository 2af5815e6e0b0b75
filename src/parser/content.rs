//! Content stream interpretation.
//!
//! Walks the operators of a page (and of any form XObjects it paints),
//! tracking the graphics and text state needed to place every glyph, and
//! feeds glyphs and images to a [`PageBuilder`]. Path construction and
//! painting operators do not affect text extraction and are skipped.

use std::collections::HashMap;
use std::rc::Rc;

use lopdf::content::Content;
use lopdf::{Dictionary, Document as LopdfDocument, Object, Stream};

use crate::error::{Error, Result};
use crate::model::{Matrix, Rect};

use super::color::{Color, ColorSpace};
use super::font::FontInfo;
use super::inline_image::{split_inline_images, Segment};
use super::layout::{Glyph, PageBuilder};
use super::objects::{get, get_dict, number, numbers, operand_numbers, resolve};

/// Nesting limit for form XObjects; also guards against reference cycles.
const MAX_FORM_DEPTH: usize = 8;

const UNIT_SQUARE: Rect = Rect {
    x0: 0.0,
    y0: 0.0,
    x1: 1.0,
    y1: 1.0,
};

pub type FontMap<'a> = HashMap<Vec<u8>, Rc<FontInfo<'a>>>;

/// Prepare fonts from `(resource name, font dictionary)` pairs.
pub fn load_fonts<'a, I>(doc: &'a LopdfDocument, fonts: I) -> FontMap<'a>
where
    I: IntoIterator<Item = (Vec<u8>, &'a Dictionary)>,
{
    fonts
        .into_iter()
        .map(|(name, dict)| {
            let font = FontInfo::load(doc, &name, dict);
            (name, Rc::new(font))
        })
        .collect()
}

/// Resources visible to one content stream.
#[derive(Debug, Clone)]
pub struct Resources<'a> {
    pub dict: Option<&'a Dictionary>,
    pub fonts: Rc<FontMap<'a>>,
}

impl<'a> Resources<'a> {
    pub fn new(dict: Option<&'a Dictionary>, fonts: FontMap<'a>) -> Self {
        Self {
            dict,
            fonts: Rc::new(fonts),
        }
    }

    /// Resources of a page or form XObject, reading fonts from its /Font entry.
    pub fn from_dict(doc: &'a LopdfDocument, dict: &'a Dictionary) -> Self {
        let fonts = get_dict(doc, dict, b"Font")
            .map(|fonts| {
                fonts
                    .iter()
                    .filter_map(|(name, obj)| match resolve(doc, obj) {
                        Object::Dictionary(font) => Some((name.clone(), font)),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        Self::new(Some(dict), load_fonts(doc, fonts))
    }

    fn xobject(&self, doc: &'a LopdfDocument, name: &[u8]) -> Option<&'a Stream> {
        let xobjects = get_dict(doc, self.dict?, b"XObject")?;
        match get(doc, xobjects, name)? {
            Object::Stream(stream) => Some(stream),
            _ => None,
        }
    }
}

/// Text state parameters; saved and restored with the graphics state.
#[derive(Debug, Clone)]
struct TextState<'a> {
    font: Option<Rc<FontInfo<'a>>>,
    size: f64,
    char_spacing: f64,
    word_spacing: f64,
    h_scale: f64,
    leading: f64,
    rise: f64,
}

impl Default for TextState<'_> {
    fn default() -> Self {
        Self {
            font: None,
            size: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scale: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
struct GraphicsState<'a> {
    ctm: Matrix,
    fill: Color,
    fill_space: ColorSpace,
    text: TextState<'a>,
}

/// Interpreter for the content streams of one page.
pub struct Interpreter<'a, 'b> {
    doc: &'a LopdfDocument,
    builder: &'b mut PageBuilder,
    state: GraphicsState<'a>,
    stack: Vec<GraphicsState<'a>>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    depth: usize,
}

impl<'a, 'b> Interpreter<'a, 'b> {
    /// Start with `base` as the CTM, mapping user space to page coordinates.
    pub fn new(doc: &'a LopdfDocument, builder: &'b mut PageBuilder, base: Matrix) -> Self {
        Self {
            doc,
            builder,
            state: GraphicsState {
                ctm: base,
                fill: Color::default(),
                fill_space: ColorSpace::default(),
                text: TextState::default(),
            },
            stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            depth: 0,
        }
    }

    /// Interpret one content stream.
    pub fn run(&mut self, content: &[u8], resources: &Resources<'a>) -> Result<()> {
        for segment in split_inline_images(content)? {
            match segment {
                Segment::Operators(bytes) => {
                    let content =
                        Content::decode(bytes).map_err(|e| Error::PdfParse(e.to_string()))?;
                    for op in &content.operations {
                        self.apply(&op.operator, &op.operands, resources)?;
                    }
                }
                Segment::InlineImage => self.push_image(),
            }
        }
        Ok(())
    }

    fn apply(&mut self, operator: &str, operands: &[Object], resources: &Resources<'a>) -> Result<()> {
        match operator {
            // Graphics state
            "q" => self.stack.push(self.state.clone()),
            "Q" => match self.stack.pop() {
                Some(saved) => self.state = saved,
                None => log::trace!("Unbalanced Q operator ignored"),
            },
            "cm" => {
                if let Some(m) = Matrix::from_slice(&operand_numbers(operands)) {
                    self.state.ctm = m.concat(&self.state.ctm);
                }
            }

            // Fill color
            "g" => self.set_fill(ColorSpace::DeviceGray, operands),
            "rg" => self.set_fill(ColorSpace::DeviceRgb, operands),
            "k" => self.set_fill(ColorSpace::DeviceCmyk, operands),
            "cs" => {
                if let Some(Object::Name(name)) = operands.first() {
                    let space = ColorSpace::resolve(self.doc, resources.dict, name);
                    self.state.fill_space = space;
                    self.state.fill = space.initial_color();
                }
            }
            "sc" | "scn" => {
                if let Some(color) = self.state.fill_space.color(&operand_numbers(operands)) {
                    self.state.fill = color;
                }
            }

            // Text objects
            "BT" => {
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => {}

            // Text state
            "Tc" => set_number(&mut self.state.text.char_spacing, operands),
            "Tw" => set_number(&mut self.state.text.word_spacing, operands),
            "Tz" => {
                if let Some(scale) = operands.first().and_then(number) {
                    self.state.text.h_scale = scale / 100.0;
                }
            }
            "TL" => set_number(&mut self.state.text.leading, operands),
            "Ts" => set_number(&mut self.state.text.rise, operands),
            "Tf" => self.set_font(operands, resources),

            // Text positioning
            "Td" => {
                if let [tx, ty, ..] = operand_numbers(operands)[..] {
                    self.move_line(tx, ty);
                }
            }
            "TD" => {
                if let [tx, ty, ..] = operand_numbers(operands)[..] {
                    self.state.text.leading = -ty;
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_slice(&operand_numbers(operands)) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(),

            // Text showing
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => self.show(bytes),
                            other => {
                                if let Some(adjust) = number(other) {
                                    self.kern(adjust);
                                }
                            }
                        }
                    }
                }
            }
            "'" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(bytes);
                }
            }
            "\"" => {
                if let [aw, ac, Object::String(bytes, _)] = operands {
                    self.state.text.word_spacing = number(aw).unwrap_or(0.0);
                    self.state.text.char_spacing = number(ac).unwrap_or(0.0);
                    self.next_line();
                    self.show(bytes);
                }
            }

            // External objects
            "Do" => {
                if let Some(Object::Name(name)) = operands.first() {
                    self.paint_xobject(name, resources)?;
                }
            }

            _ => {}
        }
        Ok(())
    }

    /// Images occupy the unit square of user space.
    fn push_image(&mut self) {
        self.builder.push_image(UNIT_SQUARE.transform(&self.state.ctm));
    }

    fn set_fill(&mut self, space: ColorSpace, operands: &[Object]) {
        if let Some(color) = space.color(&operand_numbers(operands)) {
            self.state.fill_space = space;
            self.state.fill = color;
        }
    }

    fn set_font(&mut self, operands: &[Object], resources: &Resources<'a>) {
        let [Object::Name(name), size] = operands else {
            return;
        };
        let font = resources.fonts.get(name).cloned().unwrap_or_else(|| {
            log::warn!(
                "Font /{} not found in resources",
                String::from_utf8_lossy(name)
            );
            Rc::new(FontInfo::fallback(name))
        });
        self.state.text.font = Some(font);
        self.state.text.size = number(size).unwrap_or(0.0);
    }

    fn move_line(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Matrix::translation(tx, ty).concat(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.state.text.leading;
        self.move_line(0.0, -leading);
    }

    /// TJ adjustment, in thousandths of text space.
    fn kern(&mut self, adjust: f64) {
        let text = &self.state.text;
        let tx = -adjust / 1000.0 * text.size * text.h_scale;
        self.text_matrix = Matrix::translation(tx, 0.0).concat(&self.text_matrix);
    }

    /// Place every glyph of a string operand and advance the text matrix.
    fn show(&mut self, bytes: &[u8]) {
        let Some(font) = self.state.text.font.clone() else {
            log::trace!("Text shown before any Tf; skipped");
            return;
        };
        let text = &self.state.text;
        let ctm = self.state.ctm;
        let color = self.state.fill.packed();
        let encoding = font.dict.and_then(|d| d.get_font_encoding(self.doc).ok());
        let font_matrix = Matrix::new(text.size * text.h_scale, 0.0, 0.0, text.size, 0.0, text.rise);

        for code in font.split_codes(bytes) {
            let decoded = match &encoding {
                Some(enc) => {
                    LopdfDocument::decode_text(enc, code).unwrap_or_else(|_| decode_fallback(code))
                }
                None => decode_fallback(code),
            };

            let user = self.text_matrix.concat(&ctm);
            let trm = font_matrix.concat(&user);
            let width = font.advance(code);

            self.builder.push_glyph(Glyph {
                text: decoded,
                bbox: Rect::new(0.0, font.descent, width, font.ascent).transform(&trm),
                origin: trm.transform_point(0.0, 0.0),
                end: trm.transform_point(width, 0.0),
                dir: unit(trm.a, trm.b),
                font: font.name.clone(),
                size: text.size * user.vertical_scale(),
                color,
            });

            let mut tx = width * text.size + text.char_spacing;
            if font.is_word_space(code) {
                tx += text.word_spacing;
            }
            self.text_matrix = Matrix::translation(tx * text.h_scale, 0.0).concat(&self.text_matrix);
        }
    }

    fn paint_xobject(&mut self, name: &[u8], resources: &Resources<'a>) -> Result<()> {
        let doc = self.doc;
        let Some(stream) = resources.xobject(doc, name) else {
            log::trace!("XObject /{} not found", String::from_utf8_lossy(name));
            return Ok(());
        };

        match get(doc, &stream.dict, b"Subtype").and_then(|o| o.as_name().ok()) {
            Some(b"Image") => {
                self.push_image();
                Ok(())
            }
            Some(b"Form") => self.paint_form(stream, resources),
            _ => {
                log::trace!("XObject /{} has no known subtype", String::from_utf8_lossy(name));
                Ok(())
            }
        }
    }

    fn paint_form(&mut self, stream: &'a Stream, resources: &Resources<'a>) -> Result<()> {
        if self.depth >= MAX_FORM_DEPTH {
            log::warn!("Form XObjects nested deeper than {}; skipped", MAX_FORM_DEPTH);
            return Ok(());
        }

        let doc = self.doc;
        let content = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());
        let form_resources = match get_dict(doc, &stream.dict, b"Resources") {
            Some(dict) => Resources::from_dict(doc, dict),
            None => resources.clone(),
        };

        let saved = self.state.clone();
        let (text_matrix, line_matrix) = (self.text_matrix, self.line_matrix);
        if let Some(m) = get(doc, &stream.dict, b"Matrix")
            .and_then(|m| numbers(doc, m))
            .and_then(|m| Matrix::from_slice(&m))
        {
            self.state.ctm = m.concat(&self.state.ctm);
        }

        self.depth += 1;
        let result = self.run(&content, &form_resources);
        self.depth -= 1;

        self.state = saved;
        self.text_matrix = text_matrix;
        self.line_matrix = line_matrix;
        result
    }
}

fn set_number(target: &mut f64, operands: &[Object]) {
    if let Some(value) = operands.first().and_then(number) {
        *target = value;
    }
}

fn unit(x: f64, y: f64) -> (f64, f64) {
    let len = x.hypot(y);
    if len > 0.0 {
        (x / len, y / len)
    } else {
        (1.0, 0.0)
    }
}

/// Decode a character code when the font offers no usable encoding.
///
/// Single bytes are read as Latin-1. Wider codes are glyph ids with no
/// Unicode meaning and become U+FFFD.
fn decode_fallback(code: &[u8]) -> String {
    match code {
        [byte] => char::from(*byte).to_string(),
        _ => char::REPLACEMENT_CHARACTER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StructuredPage;
    use lopdf::content::Operation;
    use lopdf::dictionary;

    fn helvetica(doc: &mut LopdfDocument) -> lopdf::ObjectId {
        doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        })
    }

    fn run(doc: &LopdfDocument, resources: &Resources<'_>, ops: Vec<Operation>) -> StructuredPage {
        let content = Content { operations: ops }.encode().unwrap();
        let mut builder = PageBuilder::new();
        let base = Matrix::new(1.0, 0.0, 0.0, -1.0, 0.0, 792.0);
        Interpreter::new(doc, &mut builder, base)
            .run(&content, resources)
            .unwrap();
        builder.finish()
    }

    fn page_resources<'a>(doc: &'a LopdfDocument, font_id: lopdf::ObjectId) -> Resources<'a> {
        let font = doc.get_dictionary(font_id).unwrap();
        Resources::new(None, load_fonts(doc, vec![(b"F1".to_vec(), font)]))
    }

    fn op(operator: &str, operands: Vec<Object>) -> Operation {
        Operation::new(operator, operands)
    }

    #[test]
    fn test_single_span_geometry() {
        let mut doc = LopdfDocument::with_version("1.5");
        let font_id = helvetica(&mut doc);
        let resources = page_resources(&doc, font_id);

        let page = run(
            &doc,
            &resources,
            vec![
                op("BT", vec![]),
                op("Tf", vec!["F1".into(), 12.into()]),
                op("Td", vec![72.into(), 720.into()]),
                op("Tj", vec![Object::string_literal("Hello")]),
                op("ET", vec![]),
            ],
        );

        let spans = page.to_text_spans();
        assert_eq!(spans.len(), 1);
        let span = &spans[0];
        assert_eq!(span.text, "Hello");
        assert_eq!(span.font, "Helvetica");
        assert!((span.size - 12.0).abs() < 1e-9);
        assert!((span.x0 - 72.0).abs() < 1e-6);
        assert!((span.x1 - (72.0 + 2.278 * 12.0)).abs() < 1e-6);
        assert!((span.y0 - (72.0 - 0.718 * 12.0)).abs() < 1e-6);
        assert!((span.y1 - (72.0 + 0.207 * 12.0)).abs() < 1e-6);
        assert_eq!(span.color, 0);
    }

    #[test]
    fn test_color_and_state_restore() {
        let mut doc = LopdfDocument::with_version("1.5");
        let font_id = helvetica(&mut doc);
        let resources = page_resources(&doc, font_id);

        let page = run(
            &doc,
            &resources,
            vec![
                op("q", vec![]),
                op("rg", vec![1.into(), 0.into(), 0.into()]),
                op("BT", vec![]),
                op("Tf", vec!["F1".into(), 10.into()]),
                op("Td", vec![72.into(), 700.into()]),
                op("Tj", vec![Object::string_literal("red")]),
                op("ET", vec![]),
                op("Q", vec![]),
                op("BT", vec![]),
                op("Tf", vec!["F1".into(), 10.into()]),
                op("Td", vec![72.into(), 688.into()]),
                op("Tj", vec![Object::string_literal("black")]),
                op("ET", vec![]),
            ],
        );

        let spans = page.to_text_spans();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].color, 0xFF0000);
        assert_eq!(spans[1].color, 0x000000);
    }

    #[test]
    fn test_tj_kerning_and_word_spacing() {
        let mut doc = LopdfDocument::with_version("1.5");
        let font_id = helvetica(&mut doc);
        let resources = page_resources(&doc, font_id);

        let page = run(
            &doc,
            &resources,
            vec![
                op("BT", vec![]),
                op("Tf", vec!["F1".into(), 10.into()]),
                op("Tw", vec![5.into()]),
                op("Td", vec![100.into(), 700.into()]),
                op(
                    "TJ",
                    vec![Object::Array(vec![
                        Object::string_literal("A "),
                        (-1000).into(),
                        Object::string_literal("B"),
                    ])],
                ),
                op("ET", vec![]),
            ],
        );

        let spans = page.to_text_spans();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "A B");
        // A (6.67) + space (2.78 + 5 word spacing) + kern 10 + B (6.67)
        let expected = 100.0 + 6.67 + 2.78 + 5.0 + 10.0 + 6.67;
        assert!((spans[0].x1 - expected).abs() < 1e-6);
    }

    #[test]
    fn test_scaled_text_matrix_size() {
        let mut doc = LopdfDocument::with_version("1.5");
        let font_id = helvetica(&mut doc);
        let resources = page_resources(&doc, font_id);

        let page = run(
            &doc,
            &resources,
            vec![
                op("BT", vec![]),
                op("Tf", vec!["F1".into(), 1.into()]),
                op(
                    "Tm",
                    vec![18.into(), 0.into(), 0.into(), 18.into(), 50.into(), 500.into()],
                ),
                op("Tj", vec![Object::string_literal("Big")]),
                op("ET", vec![]),
            ],
        );

        let spans = page.to_text_spans();
        assert!((spans[0].size - 18.0).abs() < 1e-9);
        assert!((spans[0].x0 - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_leading_and_next_line() {
        let mut doc = LopdfDocument::with_version("1.5");
        let font_id = helvetica(&mut doc);
        let resources = page_resources(&doc, font_id);

        let page = run(
            &doc,
            &resources,
            vec![
                op("BT", vec![]),
                op("Tf", vec!["F1".into(), 10.into()]),
                op("TD", vec![72.into(), (-12).into()]),
                op("Td", vec![0.into(), 712.into()]),
                op("Tj", vec![Object::string_literal("one")]),
                op("'", vec![Object::string_literal("two")]),
                op("ET", vec![]),
            ],
        );

        let blocks: Vec<_> = page.text_blocks().collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines.len(), 2);
        assert_eq!(blocks[0].lines[1].text(), "two");
        let one = &blocks[0].lines[0].spans[0];
        let two = &blocks[0].lines[1].spans[0];
        assert!((two.bbox.y0 - one.bbox.y0 - 12.0).abs() < 1e-6);
        assert!((two.bbox.x0 - 72.0).abs() < 1e-6);
    }

    #[test]
    fn test_image_and_form_xobjects() {
        let mut doc = LopdfDocument::with_version("1.5");
        let font_id = helvetica(&mut doc);
        let image_id = doc.add_object(lopdf::Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 1,
                "Height" => 1,
            },
            vec![0],
        ));
        let form_content = Content {
            operations: vec![
                op("BT", vec![]),
                op("Tf", vec!["F1".into(), 10.into()]),
                op("Tj", vec![Object::string_literal("inside")]),
                op("ET", vec![]),
            ],
        }
        .encode()
        .unwrap();
        let form_id = doc.add_object(lopdf::Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => vec![0.into(), 0.into(), 100.into(), 100.into()],
                "Matrix" => vec![1.into(), 0.into(), 0.into(), 1.into(), 200.into(), 300.into()],
                "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            },
            form_content,
        ));
        let resources_dict = dictionary! {
            "XObject" => dictionary! { "Im1" => image_id, "Fm1" => form_id },
        };
        let resources = Resources::new(Some(&resources_dict), FontMap::new());

        let page = run(
            &doc,
            &resources,
            vec![
                op("q", vec![]),
                op("cm", vec![50.into(), 0.into(), 0.into(), 40.into(), 10.into(), 20.into()]),
                op("Do", vec!["Im1".into()]),
                op("Q", vec![]),
                op("Do", vec!["Fm1".into()]),
            ],
        );

        assert_eq!(page.blocks.len(), 2);
        assert_eq!(page.blocks[0].bbox(), Rect::new(10.0, 732.0, 60.0, 772.0));
        let spans = page.to_text_spans();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "inside");
        assert!((spans[0].x0 - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_after_inline_image() {
        let mut doc = LopdfDocument::with_version("1.5");
        let font_id = helvetica(&mut doc);
        let resources = page_resources(&doc, font_id);

        let mut content = b"q 20 0 0 10 100 200 cm BI /W 1 /H 1 /BPC 8 /CS /G ID ".to_vec();
        content.extend_from_slice(&[0xFF]);
        content.extend_from_slice(b" EI Q BT /F1 12 Tf 72 720 Td (Hello) Tj ET");

        let mut builder = PageBuilder::new();
        let base = Matrix::new(1.0, 0.0, 0.0, -1.0, 0.0, 792.0);
        Interpreter::new(&doc, &mut builder, base)
            .run(&content, &resources)
            .unwrap();
        let page = builder.finish();

        assert_eq!(page.blocks.len(), 2);
        assert_eq!(page.blocks[0].bbox(), Rect::new(100.0, 582.0, 120.0, 592.0));
        let spans = page.to_text_spans();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Hello");
    }

    #[test]
    fn test_missing_font_uses_fallback() {
        let doc = LopdfDocument::with_version("1.5");
        let resources = Resources::new(None, FontMap::new());

        let page = run(
            &doc,
            &resources,
            vec![
                op("BT", vec![]),
                op("Tf", vec!["F7".into(), 10.into()]),
                op("Tj", vec![Object::string_literal("ab")]),
                op("ET", vec![]),
            ],
        );

        let spans = page.to_text_spans();
        assert_eq!(spans[0].text, "ab");
        assert_eq!(spans[0].font, "F7");
        assert!((spans[0].x1 - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_without_font_is_skipped() {
        let doc = LopdfDocument::with_version("1.5");
        let resources = Resources::new(None, FontMap::new());
        let page = run(
            &doc,
            &resources,
            vec![
                op("BT", vec![]),
                op("Tj", vec![Object::string_literal("x")]),
                op("ET", vec![]),
            ],
        );
        assert!(page.blocks.is_empty());
    }

    #[test]
    fn test_decode_fallback() {
        assert_eq!(decode_fallback(b"A"), "A");
        assert_eq!(decode_fallback(&[0xE9]), "\u{e9}");
        assert_eq!(decode_fallback(&[0, 5]), "\u{FFFD}");
    }
}
