//! Assembly of glyphs into spans, lines and blocks.
//!
//! Glyphs arrive in content-stream order and are never reordered. Each
//! glyph either continues the current span, starts a new span on the same
//! line, starts a new line in the same block, or starts a new block.

use crate::model::{Block, ImageBlock, Rect, StructuredPage, StyledSpan, TextBlock, TextLine};

/// Baseline offset, as a fraction of the font size, tolerated within a line.
const LINE_TOLERANCE: f64 = 0.5;
/// Backward movement, in ems, still treated as the same line (kerning, overstrike).
const MAX_BACKTRACK: f64 = 0.5;
/// Forward gap, in ems, beyond which a new line starts.
const MAX_GAP: f64 = 3.0;
/// Baseline distance, in ems, beyond which a new block starts.
const BLOCK_GAP: f64 = 2.0;

/// One positioned glyph in top-left page coordinates.
#[derive(Debug, Clone)]
pub struct Glyph {
    /// Decoded text; may be empty for unmapped codes
    pub text: String,
    pub bbox: Rect,
    /// Baseline start point
    pub origin: (f64, f64),
    /// Baseline end point (origin plus glyph width)
    pub end: (f64, f64),
    /// Unit vector along the baseline
    pub dir: (f64, f64),
    pub font: String,
    pub size: f64,
    pub color: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    SameLine,
    NewLine,
    NewBlock,
}

/// Where the previous glyph left off.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    end: (f64, f64),
    dir: (f64, f64),
    size: f64,
    line_origin: (f64, f64),
}

impl Cursor {
    fn place(&self, glyph: &Glyph) -> Placement {
        let em = self.size.max(glyph.size).max(f64::EPSILON);
        let (along, across) = project(self.dir, self.end, glyph.origin);
        let parallel = self.dir.0 * glyph.dir.0 + self.dir.1 * glyph.dir.1 > 0.99;

        if parallel
            && across.abs() <= LINE_TOLERANCE * em
            && along >= -MAX_BACKTRACK * em
            && along <= MAX_GAP * em
        {
            return Placement::SameLine;
        }

        let (_, baseline_distance) = project(self.dir, self.line_origin, glyph.origin);
        if !parallel || baseline_distance.abs() > BLOCK_GAP * em {
            Placement::NewBlock
        } else {
            Placement::NewLine
        }
    }
}

/// Offset of `to` from `from`, split into components along and across `dir`.
fn project(dir: (f64, f64), from: (f64, f64), to: (f64, f64)) -> (f64, f64) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    (dx * dir.0 + dy * dir.1, dy * dir.0 - dx * dir.1)
}

/// Collects glyphs and images for one page.
#[derive(Debug, Default)]
pub struct PageBuilder {
    blocks: Vec<Block>,
    lines: Vec<TextLine>,
    spans: Vec<StyledSpan>,
    span: Option<StyledSpan>,
    cursor: Option<Cursor>,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the next glyph in content-stream order.
    pub fn push_glyph(&mut self, glyph: Glyph) {
        let placement = self
            .cursor
            .map(|c| c.place(&glyph))
            .unwrap_or(Placement::NewBlock);

        match placement {
            Placement::NewBlock => self.flush_block(),
            Placement::NewLine => self.flush_line(),
            Placement::SameLine => {
                if !self.span.as_ref().is_some_and(|s| same_style(s, &glyph)) {
                    self.flush_span();
                }
            }
        }

        let line_origin = match (placement, self.cursor) {
            (Placement::SameLine, Some(c)) => c.line_origin,
            _ => glyph.origin,
        };
        self.cursor = Some(Cursor {
            end: glyph.end,
            dir: glyph.dir,
            size: glyph.size,
            line_origin,
        });

        match &mut self.span {
            Some(span) => {
                span.text.push_str(&glyph.text);
                span.bbox = span.bbox.union(&glyph.bbox);
            }
            None => {
                self.span = Some(StyledSpan {
                    text: glyph.text,
                    bbox: glyph.bbox,
                    font: glyph.font,
                    size: glyph.size,
                    color: glyph.color,
                });
            }
        }
    }

    /// Add an image. Images always sit in a block of their own.
    pub fn push_image(&mut self, bbox: Rect) {
        self.flush_block();
        self.blocks.push(Block::Image(ImageBlock { bbox }));
        self.cursor = None;
    }

    pub fn finish(mut self) -> StructuredPage {
        self.flush_block();
        StructuredPage {
            blocks: self.blocks,
        }
    }

    fn flush_span(&mut self) {
        if let Some(span) = self.span.take() {
            self.spans.push(span);
        }
    }

    fn flush_line(&mut self) {
        self.flush_span();
        if !self.spans.is_empty() {
            self.lines.push(TextLine {
                spans: std::mem::take(&mut self.spans),
            });
        }
    }

    fn flush_block(&mut self) {
        self.flush_line();
        if !self.lines.is_empty() {
            self.blocks.push(Block::Text(TextBlock {
                lines: std::mem::take(&mut self.lines),
            }));
        }
    }
}

fn same_style(span: &StyledSpan, glyph: &Glyph) -> bool {
    span.font == glyph.font && (span.size - glyph.size).abs() < 1e-3 && span.color == glyph.color
}
