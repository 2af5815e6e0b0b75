//! Font resources: names, glyph widths and vertical metrics.
//!
//! Widths come from /Widths (simple fonts), /W and /DW (CID fonts under a
//! Type0 font) or the built-in standard font tables. Vertical metrics come
//! from the /FontDescriptor, falling back to the standard tables and then
//! to 750/-250.

use std::collections::HashMap;

use lopdf::{Dictionary, Document as LopdfDocument, Object};

use super::objects::{get, get_dict, number, numbers, resolve};
use super::standard_fonts;

const DEFAULT_ASCENT: f64 = 750.0;
const DEFAULT_DESCENT: f64 = -250.0;
const DEFAULT_WIDTH: f64 = 600.0;
const DEFAULT_CID_WIDTH: f64 = 1000.0;

/// How character codes are laid out in a string operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontKind {
    /// One byte per code (Type1, TrueType, MMType1)
    Simple,
    /// Two bytes per code (Type0 / composite)
    Composite,
    /// Glyph procedures with their own /FontMatrix
    Type3,
}

#[derive(Debug, Clone)]
enum Widths {
    Simple {
        first_char: u32,
        widths: Vec<f64>,
        missing: f64,
    },
    Cid {
        /// Entries from `c [w1 w2 ...]`
        widths: HashMap<u32, f64>,
        /// Entries from `c_first c_last w`, kept as ranges
        ranges: Vec<(u32, u32, f64)>,
        default: f64,
    },
}

/// A font resource prepared for glyph layout.
#[derive(Debug, Clone)]
pub struct FontInfo<'a> {
    /// Display name: /BaseFont without subset tag
    pub name: String,
    pub kind: FontKind,
    /// Font dictionary, used for text decoding
    pub dict: Option<&'a Dictionary>,
    widths: Widths,
    /// Converts width units to text space (1/1000 except for Type3)
    width_scale: f64,
    /// Ascent in text space units for a 1pt font
    pub ascent: f64,
    /// Descent in text space units for a 1pt font (negative)
    pub descent: f64,
}

impl<'a> FontInfo<'a> {
    /// Prepare a font from its resource dictionary.
    pub fn load(doc: &'a LopdfDocument, resource_name: &[u8], dict: &'a Dictionary) -> Self {
        let subtype = get(doc, dict, b"Subtype").and_then(|o| o.as_name().ok());
        let kind = match subtype {
            Some(b"Type0") => FontKind::Composite,
            Some(b"Type3") => FontKind::Type3,
            _ => FontKind::Simple,
        };

        let base_font = get(doc, dict, b"BaseFont")
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).into_owned());
        let name = match &base_font {
            Some(base) => strip_subset_tag(base).to_string(),
            None => String::from_utf8_lossy(resource_name).into_owned(),
        };
        let builtin = base_font
            .as_deref()
            .and_then(|b| standard_fonts::lookup(strip_subset_tag(b)));

        // Composite fonts keep widths and descriptor on the descendant.
        let metrics_dict = match kind {
            FontKind::Composite => descendant_font(doc, dict).unwrap_or(dict),
            _ => dict,
        };
        let descriptor = get_dict(doc, metrics_dict, b"FontDescriptor");
        let descriptor_number =
            |key: &[u8]| descriptor.and_then(|d| get(doc, d, key)).and_then(number);

        let widths = match kind {
            FontKind::Composite => {
                let (widths, ranges) = get(doc, metrics_dict, b"W")
                    .map(|w| parse_cid_widths(doc, w))
                    .unwrap_or_default();
                Widths::Cid {
                    widths,
                    ranges,
                    default: get(doc, metrics_dict, b"DW")
                        .and_then(number)
                        .unwrap_or(DEFAULT_CID_WIDTH),
                }
            }
            _ => {
                let explicit = get(doc, dict, b"Widths").and_then(|w| numbers(doc, w));
                let missing = descriptor_number(b"MissingWidth");
                match (explicit, builtin) {
                    (Some(widths), _) => Widths::Simple {
                        first_char: get(doc, dict, b"FirstChar")
                            .and_then(number)
                            .map(|v| v as u32)
                            .unwrap_or(0),
                        widths,
                        missing: missing.unwrap_or(0.0),
                    },
                    (None, Some(builtin)) => Widths::Simple {
                        first_char: 0,
                        widths: builtin.widths.iter().map(|&w| f64::from(w)).collect(),
                        missing: missing.unwrap_or(DEFAULT_WIDTH),
                    },
                    (None, None) => Widths::Simple {
                        first_char: 0,
                        widths: Vec::new(),
                        missing: missing.unwrap_or(DEFAULT_WIDTH),
                    },
                }
            }
        };

        // Type3 glyph space maps to text space through /FontMatrix
        let font_matrix = match kind {
            FontKind::Type3 => get(doc, dict, b"FontMatrix").and_then(|m| numbers(doc, m)),
            _ => None,
        };
        let matrix_scale = |index: usize| {
            font_matrix
                .as_ref()
                .and_then(|m| m.get(index).copied())
                .map(f64::abs)
                .filter(|v| *v > 0.0)
                .unwrap_or(0.001)
        };
        let width_scale = matrix_scale(0);
        let height_scale = matrix_scale(3);

        let (ascent, descent) = match (
            descriptor_number(b"Ascent"),
            descriptor_number(b"Descent"),
            builtin,
        ) {
            (Some(a), Some(d), _) if a > d => (a * height_scale, d * height_scale),
            (_, _, Some(builtin)) => (
                f64::from(builtin.ascent) / 1000.0,
                f64::from(builtin.descent) / 1000.0,
            ),
            _ => (DEFAULT_ASCENT / 1000.0, DEFAULT_DESCENT / 1000.0),
        };

        Self {
            name,
            kind,
            dict: Some(dict),
            widths,
            width_scale,
            ascent,
            descent,
        }
    }

    /// Stand-in for a font name that is missing from the resources.
    pub fn fallback(resource_name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(resource_name).into_owned(),
            kind: FontKind::Simple,
            dict: None,
            widths: Widths::Simple {
                first_char: 0,
                widths: Vec::new(),
                missing: DEFAULT_WIDTH,
            },
            width_scale: 0.001,
            ascent: DEFAULT_ASCENT / 1000.0,
            descent: DEFAULT_DESCENT / 1000.0,
        }
    }

    /// Split a string operand into per-glyph character codes.
    pub fn split_codes<'b>(&self, bytes: &'b [u8]) -> impl Iterator<Item = &'b [u8]> {
        let width = match self.kind {
            FontKind::Composite => 2,
            FontKind::Simple | FontKind::Type3 => 1,
        };
        bytes.chunks(width)
    }

    /// Glyph advance for `code` in text space units of a 1pt font.
    pub fn advance(&self, code: &[u8]) -> f64 {
        let code = code_value(code);
        let width = match &self.widths {
            Widths::Simple {
                first_char,
                widths,
                missing,
            } => code
                .checked_sub(*first_char)
                .and_then(|i| widths.get(i as usize))
                .copied()
                .unwrap_or(*missing),
            Widths::Cid {
                widths,
                ranges,
                default,
            } => widths
                .get(&code)
                .copied()
                .or_else(|| {
                    ranges
                        .iter()
                        .find(|(first, last, _)| (*first..=*last).contains(&code))
                        .map(|(_, _, width)| *width)
                })
                .unwrap_or(*default),
        };
        width * self.width_scale
    }

    /// Word spacing applies only to the single-byte code 32.
    pub fn is_word_space(&self, code: &[u8]) -> bool {
        code == [32]
    }
}

fn code_value(code: &[u8]) -> u32 {
    code.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

/// Remove a six-letter subset prefix such as `ABCDEF+`.
pub fn strip_subset_tag(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest))
            if tag.len() == 6 && tag.bytes().all(|b| b.is_ascii_uppercase()) && !rest.is_empty() =>
        {
            rest
        }
        _ => name,
    }
}

fn descendant_font<'a>(doc: &'a LopdfDocument, dict: &'a Dictionary) -> Option<&'a Dictionary> {
    match get(doc, dict, b"DescendantFonts")? {
        Object::Array(items) => items
            .first()
            .map(|o| resolve(doc, o))
            .and_then(|o| o.as_dict().ok()),
        _ => None,
    }
}

type CidWidths = (HashMap<u32, f64>, Vec<(u32, u32, f64)>);

/// Parse a CID /W array: `c [w1 w2 ...]` or `c_first c_last w`.
fn parse_cid_widths(doc: &LopdfDocument, w: &Object) -> CidWidths {
    let mut widths = HashMap::new();
    let mut ranges = Vec::new();
    let Object::Array(items) = w else {
        return (widths, ranges);
    };

    let mut i = 0;
    while i < items.len() {
        let Some(first) = number(resolve(doc, &items[i])) else {
            break;
        };
        let first = first as u32;
        match items.get(i + 1).map(|o| resolve(doc, o)) {
            Some(Object::Array(list)) => {
                for (offset, item) in list.iter().enumerate() {
                    let cid = u32::try_from(offset)
                        .ok()
                        .and_then(|offset| first.checked_add(offset));
                    if let (Some(cid), Some(width)) = (cid, number(resolve(doc, item))) {
                        widths.insert(cid, width);
                    }
                }
                i += 2;
            }
            Some(last) => {
                let (Some(last), Some(width)) = (
                    number(last),
                    items.get(i + 2).and_then(|o| number(resolve(doc, o))),
                ) else {
                    break;
                };
                ranges.push((first, last as u32, width));
                i += 3;
            }
            None => break,
        }
    }

    (widths, ranges)
}
