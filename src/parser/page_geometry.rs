//! Visible page area and the transform into top-left page coordinates.

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{Matrix, Rect};

use super::objects::{get, number, numbers, resolve};

/// US Letter, used when no MediaBox can be found.
const LETTER: Rect = Rect {
    x0: 0.0,
    y0: 0.0,
    x1: 612.0,
    y1: 792.0,
};

/// Parent chain depth beyond which the page tree is considered cyclic.
const MAX_TREE_DEPTH: usize = 32;

/// Visible area of a page and its rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Visible rectangle in default user space (CropBox within MediaBox)
    pub visible: Rect,
    /// Clockwise rotation: 0, 90, 180 or 270
    pub rotation: u16,
}

impl PageGeometry {
    pub fn new(visible: Rect, rotation: i64) -> Self {
        let rotation = match rotation.rem_euclid(360) {
            r @ (90 | 180 | 270) => r as u16,
            _ => 0,
        };
        Self { visible, rotation }
    }

    /// Read MediaBox, CropBox and Rotate, following inheritance.
    pub fn read(doc: &LopdfDocument, page_id: ObjectId) -> Result<Self> {
        let page = doc
            .get_dictionary(page_id)
            .map_err(|e| Error::Corrupted(format!("page object {:?}: {}", page_id, e)))?;

        let media = inherited(doc, page, b"MediaBox")
            .and_then(|o| rect(doc, o))
            .unwrap_or_else(|| {
                log::warn!("Page {:?} has no usable MediaBox, assuming Letter", page_id);
                LETTER
            });
        let visible = inherited(doc, page, b"CropBox")
            .and_then(|o| rect(doc, o))
            .and_then(|crop| crop.intersect(&media))
            .unwrap_or(media);
        let rotation = inherited(doc, page, b"Rotate")
            .and_then(number)
            .map(|r| r as i64)
            .unwrap_or(0);

        Ok(Self::new(visible, rotation))
    }

    /// Visible width after rotation.
    pub fn width(&self) -> f64 {
        match self.rotation {
            90 | 270 => self.visible.height(),
            _ => self.visible.width(),
        }
    }

    /// Visible height after rotation.
    pub fn height(&self) -> f64 {
        match self.rotation {
            90 | 270 => self.visible.width(),
            _ => self.visible.height(),
        }
    }

    /// Map default user space (origin bottom-left) to the rotated page
    /// with origin at its top-left corner.
    pub fn matrix(&self) -> Matrix {
        let Rect { x0, y0, x1, y1 } = self.visible;
        match self.rotation {
            90 => Matrix::new(0.0, 1.0, 1.0, 0.0, -y0, -x0),
            180 => Matrix::new(-1.0, 0.0, 0.0, 1.0, x1, -y0),
            270 => Matrix::new(0.0, -1.0, -1.0, 0.0, y1, x1),
            _ => Matrix::new(1.0, 0.0, 0.0, -1.0, -x0, y1),
        }
    }
}

/// Look `key` up on the page, then on its ancestors.
pub(crate) fn inherited<'a>(
    doc: &'a LopdfDocument,
    page: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node = page;
    for _ in 0..MAX_TREE_DEPTH {
        if let Some(value) = get(doc, node, key) {
            return Some(value);
        }
        node = match node.get(b"Parent").ok().map(|p| resolve(doc, p)) {
            Some(Object::Dictionary(parent)) => parent,
            _ => return None,
        };
    }
    None
}

fn rect(doc: &LopdfDocument, obj: &Object) -> Option<Rect> {
    match numbers(doc, obj)?.as_slice() {
        [a, b, c, d] => Some(Rect::new(*a, *b, *c, *d)),
        _ => None,
    }
}
