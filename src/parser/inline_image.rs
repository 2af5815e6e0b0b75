//! Inline image handling.
//!
//! The bytes between `ID` and `EI` are raw image data, which lopdf's
//! content decoder cannot step over. Content is therefore split around
//! every `BI ... ID <data> EI` sequence before decoding, and each inline
//! image is reported as a separate segment.

use crate::error::{Error, Result};

/// A piece of a content stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    /// Operators without inline image data, ready for `Content::decode`
    Operators(&'a [u8]),
    /// One complete `BI ... EI` sequence
    InlineImage,
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b'\0' | b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn is_regular(b: u8) -> bool {
    !is_whitespace(b) && !is_delimiter(b)
}

/// Split `content` at inline images.
///
/// Strings, comments and names are skipped while scanning, so a `BI`
/// inside them does not start an image.
pub(crate) fn split_inline_images(content: &[u8]) -> Result<Vec<Segment<'_>>> {
    let mut segments = Vec::new();
    let mut scanner = Scanner::new(content);
    let mut segment_start = 0;

    while let Some((start, end)) = scanner.next_keyword() {
        if &content[start..end] != b"BI" {
            continue;
        }
        if start > segment_start {
            segments.push(Segment::Operators(&content[segment_start..start]));
        }
        scanner.skip_inline_image()?;
        segments.push(Segment::InlineImage);
        segment_start = scanner.pos;
    }

    if segment_start < content.len() {
        segments.push(Segment::Operators(&content[segment_start..]));
    }
    Ok(segments)
}

struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Advance to the next bare keyword or number and return its span.
    fn next_keyword(&mut self) -> Option<(usize, usize)> {
        while let Some(b) = self.peek() {
            match b {
                b'%' => self.skip_comment(),
                b'(' => self.skip_literal_string(),
                b'<' => {
                    if self.input.get(self.pos + 1) == Some(&b'<') {
                        self.pos += 2;
                    } else {
                        self.skip_hex_string();
                    }
                }
                b'/' => {
                    self.pos += 1;
                    self.skip_regular();
                }
                _ if is_regular(b) => {
                    let start = self.pos;
                    self.skip_regular();
                    return Some((start, self.pos));
                }
                _ => self.pos += 1,
            }
        }
        None
    }

    fn skip_regular(&mut self) {
        while self.peek().is_some_and(is_regular) {
            self.pos += 1;
        }
    }

    fn skip_comment(&mut self) {
        while let Some(b) = self.peek() {
            if b == b'\n' || b == b'\r' {
                break;
            }
            self.pos += 1;
        }
    }

    fn skip_literal_string(&mut self) {
        let mut depth = 0usize;
        while let Some(b) = self.peek() {
            self.pos += 1;
            match b {
                b'\\' => self.pos += 1,
                b'(' => depth += 1,
                b')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    fn skip_hex_string(&mut self) {
        while let Some(b) = self.peek() {
            self.pos += 1;
            if b == b'>' {
                return;
            }
        }
    }

    /// Consume an inline image after its `BI` keyword, through `EI`.
    fn skip_inline_image(&mut self) -> Result<()> {
        loop {
            let Some((start, end)) = self.next_keyword() else {
                return Err(Error::Corrupted("inline image without ID".to_string()));
            };
            if &self.input[start..end] == b"ID" {
                break;
            }
        }

        // A single whitespace byte separates ID from the data
        if self.peek().is_some_and(is_whitespace) {
            self.pos += 1;
        }

        let data_start = self.pos;
        let input = self.input;
        while self.pos + 1 < input.len() {
            let at = self.pos;
            let after = input.get(at + 2).copied();
            if &input[at..at + 2] == b"EI"
                && (at == data_start || is_whitespace(input[at - 1]))
                && after.map_or(true, |b| !is_regular(b))
            {
                self.pos = at + 2;
                return Ok(());
            }
            self.pos += 1;
        }

        Err(Error::Corrupted("inline image without EI".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(segment: &Segment<'_>) -> String {
        match segment {
            Segment::Operators(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Segment::InlineImage => "<image>".to_string(),
        }
    }

    #[test]
    fn test_no_inline_images() {
        let content = b"BT /F1 12 Tf (Hello) Tj ET";
        let segments = split_inline_images(content).unwrap();
        assert_eq!(segments, vec![Segment::Operators(content)]);
    }

    #[test]
    fn test_binary_data_is_skipped() {
        let mut content = b"q 10 0 0 10 0 0 cm BI /W 2 /H 1 /BPC 8 /CS /G ID ".to_vec();
        content.extend_from_slice(&[0xFF, b'(', 0x00]);
        content.extend_from_slice(b" EI Q BT (after) Tj ET");

        let segments = split_inline_images(&content).unwrap();
        let parts: Vec<_> = segments.iter().map(text).collect();
        assert_eq!(
            parts,
            vec!["q 10 0 0 10 0 0 cm ", "<image>", " Q BT (after) Tj ET"]
        );
    }

    #[test]
    fn test_ei_inside_data_needs_delimiters() {
        let content = b"BI /W 4 /H 1 ID xEIx EI 1 g";
        let segments = split_inline_images(content).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(text(&segments[1]), " 1 g");
    }

    #[test]
    fn test_bi_in_strings_and_names() {
        let content = b"BT (BI) Tj /BI 1 Tf % BI\nET";
        let segments = split_inline_images(content).unwrap();
        assert_eq!(segments, vec![Segment::Operators(content)]);
    }

    #[test]
    fn test_consecutive_images() {
        let content = b"BI /W 1 ID a EI BI /W 1 ID b EI";
        let segments = split_inline_images(content).unwrap();
        let parts: Vec<_> = segments.iter().map(text).collect();
        assert_eq!(parts, vec!["<image>", " ", "<image>"]);
    }

    #[test]
    fn test_unterminated_image() {
        assert!(matches!(
            split_inline_images(b"BI /W 1 /H 1"),
            Err(Error::Corrupted(_))
        ));
        assert!(matches!(
            split_inline_images(b"BI /W 1 ID abc"),
            Err(Error::Corrupted(_))
        ));
    }
}
