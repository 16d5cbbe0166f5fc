use easel_graphics::{Color, Point, Transform};

use crate::image::Image;
use crate::raster::Raster;
use crate::typeface::Typeface;

/// The platform seam of the drawing pipeline (the drawing-surface
/// implementation a [`crate::Canvas`] forwards to).
///
/// Style setters are only invoked when the canvas-side value actually
/// changed; backends may treat them as cheap assignments. All primitive calls
/// observe the most recently set style and transform — immediate-mode
/// semantics, nothing is deferred to a flush.
///
/// Coordinates are in canvas space; backends apply the current transform.
/// Image blits transform their anchor point and scale but do not rotate the
/// pixel grid.
pub trait CanvasBackend: Send {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn set_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f32);
    fn set_font_size(&mut self, size: f32);
    fn set_anti_alias(&mut self, enabled: bool);
    fn set_transform(&mut self, transform: Transform);
    fn set_typeface(&mut self, typeface: Typeface);

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32);
    fn draw_circle(&mut self, x: f32, y: f32, radius: f32);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32);
    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn draw_polygon(&mut self, points: &[Point]);
    fn fill_polygon(&mut self, points: &[Point]);
    fn draw_raster(&mut self, x: f32, y: f32, raster: &Raster, alpha: u8);
    fn draw_text(&mut self, x: f32, y: f32, text: &str);

    fn text_width(&self, text: &str) -> f32;
    fn text_height(&self, text: &str) -> f32;

    /// Fills the whole surface with the current color.
    fn fill(&mut self);

    /// Untransformed pixel read; transparent outside the surface.
    fn pixel(&self, x: i32, y: i32) -> Color;
    /// Untransformed pixel write; ignored outside the surface.
    fn set_pixel(&mut self, x: i32, y: i32, color: Color);

    /// An immutable copy of the current contents.
    fn snapshot(&self) -> Image;

    /// Direct raster access, if this backend is raster-backed. Used for
    /// whole-canvas copies (background repaint).
    fn raster(&self) -> Option<&Raster> {
        None
    }
}
