//! Pure math/data for drawing & units in Easel.
//!
//! This crate contains the geometry primitives, color definitions, affine
//! transforms, and alignment anchors used throughout the Easel framework.

mod alignment;
mod color;
mod geometry;
mod transform;

pub use alignment::*;
pub use color::*;
pub use geometry::*;
pub use transform::*;

pub mod prelude {
    pub use crate::alignment::Alignment;
    pub use crate::color::Color;
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::transform::Transform;
}
