//! Immediate-mode drawing for Easel.
//!
//! [`Canvas`] owns the drawing style (color, line width, font size,
//! anti-aliasing, affine transform) and forwards primitives to a pluggable
//! [`CanvasBackend`]. Style attributes apply at call time; rebinding a canvas
//! to a new backend replays the current style so visual state survives a
//! resize or feature toggle. [`RasterBackend`] is the bundled software
//! implementation used for offscreen canvases, tests, and framebuffer
//! presentation.

mod backend;
mod canvas;
mod font5x7;
mod image;
mod raster;
mod raster_backend;
mod typeface;

pub use backend::CanvasBackend;
pub use canvas::Canvas;
pub use image::Image;
pub use raster::Raster;
pub use raster_backend::RasterBackend;
pub use typeface::Typeface;
