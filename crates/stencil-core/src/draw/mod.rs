//! Value types of the drawing contract.
//!
//! Drawing contexts receive screen-space geometry from
//! [`crate::geometry`] together with the pen and text values defined here.

mod stroke;
mod text;

pub use stroke::{Stroke, StrokeCap, StrokeJoin, StrokeStyle};
pub use text::{FontSpec, HorizontalAlign, TextStyle, VerticalAlign};
