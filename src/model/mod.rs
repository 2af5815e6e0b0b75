//! Document model types for extracted text.
//!
//! [`Extraction`] is the serialized result written to `output.json`.
//! [`StructuredPage`] is the richer block/line/span tree it is flattened
//! from, and the geometry types are shared by both.

mod extraction;
mod geometry;
mod structured;

pub use extraction::{Extraction, PageRecord, TextSpan};
pub use geometry::{Matrix, Rect};
pub use structured::{Block, ImageBlock, StructuredPage, StyledSpan, TextBlock, TextLine};
