//! Structured page content: blocks, lines and spans.

use super::{Rect, TextSpan};

/// The content tree of one page, in content-stream order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredPage {
    pub blocks: Vec<Block>,
}

impl StructuredPage {
    /// Text blocks only, skipping images.
    pub fn text_blocks(&self) -> impl Iterator<Item = &TextBlock> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Text(t) => Some(t),
            Block::Image(_) => None,
        })
    }

    /// Flatten text blocks into output spans, block then line then span.
    pub fn to_text_spans(&self) -> Vec<TextSpan> {
        self.text_blocks()
            .flat_map(|b| b.lines.iter())
            .flat_map(|l| l.spans.iter())
            .map(StyledSpan::to_text_span)
            .collect()
    }
}

/// A region of page content.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(TextBlock),
    Image(ImageBlock),
}

impl Block {
    pub fn bbox(&self) -> Rect {
        match self {
            Block::Text(t) => t.bbox(),
            Block::Image(i) => i.bbox,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Block::Text(_))
    }
}

/// A placed image (XObject or inline). Carries no text.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlock {
    pub bbox: Rect,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
}

impl TextBlock {
    pub fn bbox(&self) -> Rect {
        union_all(self.lines.iter().map(TextLine::bbox))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLine {
    pub spans: Vec<StyledSpan>,
}

impl TextLine {
    pub fn bbox(&self) -> Rect {
        union_all(self.spans.iter().map(|s| s.bbox))
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A span as assembled from glyphs, before flattening to [`TextSpan`].
#[derive(Debug, Clone, PartialEq)]
pub struct StyledSpan {
    pub text: String,
    pub bbox: Rect,
    pub font: String,
    pub size: f64,
    pub color: u32,
}

impl StyledSpan {
    pub fn to_text_span(&self) -> TextSpan {
        TextSpan {
            text: self.text.clone(),
            x0: self.bbox.x0,
            y0: self.bbox.y0,
            x1: self.bbox.x1,
            y1: self.bbox.y1,
            font: self.font.clone(),
            size: self.size,
            color: self.color,
        }
    }
}

fn union_all(mut rects: impl Iterator<Item = Rect>) -> Rect {
    let first = rects.next().unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));
    rects.fold(first, |acc, r| acc.union(&r))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled(text: &str, x0: f64) -> StyledSpan {
        StyledSpan {
            text: text.to_string(),
            bbox: Rect::new(x0, 10.0, x0 + 5.0, 20.0),
            font: "Courier".to_string(),
            size: 10.0,
            color: 0xFF0000,
        }
    }

    #[test]
    fn test_flatten_skips_images() {
        let page = StructuredPage {
            blocks: vec![
                Block::Image(ImageBlock {
                    bbox: Rect::new(0.0, 0.0, 100.0, 100.0),
                }),
                Block::Text(TextBlock {
                    lines: vec![
                        TextLine {
                            spans: vec![styled("a", 0.0), styled("b", 5.0)],
                        },
                        TextLine {
                            spans: vec![styled("c", 0.0)],
                        },
                    ],
                }),
            ],
        };

        let spans = page.to_text_spans();
        let texts: Vec<_> = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert_eq!(spans[1].x0, 5.0);
        assert_eq!(spans[1].color, 0xFF0000);
        assert_eq!(page.text_blocks().count(), 1);
        assert_eq!(page.blocks[1].bbox(), Rect::new(0.0, 10.0, 10.0, 20.0));
    }

    #[test]
    fn test_line_text() {
        let line = TextLine {
            spans: vec![styled("foo", 0.0), styled("bar", 5.0)],
        };
        assert_eq!(line.text(), "foobar");
    }
}
