use easel_graphics::{Alignment, Color, Point, Transform};

use crate::backend::CanvasBackend;
use crate::image::Image;
use crate::typeface::Typeface;

/// Stateful drawing surface handed to scene code each frame.
///
/// The canvas owns the authoritative style state (color, line width, font
/// size, anti-aliasing, typeface, transform) and forwards a setter to the
/// backend only when the value actually changed. Rebinding to a new backend
/// with [`Canvas::set_backend`] replays the full style state, so visual
/// attributes survive a resize or surface recreation.
///
/// Drawing calls are immediate-mode: each observes the style and transform
/// in effect at call time. Malformed geometry (non-positive sizes, empty
/// text, degenerate polygons) is a guarded no-op, never an error.
pub struct Canvas {
    backend: Box<dyn CanvasBackend>,
    color: Color,
    line_width: f32,
    font_size: f32,
    anti_alias: bool,
    typeface: Typeface,
    transform: Transform,
    saved: Vec<Transform>,
}

impl Canvas {
    pub fn new(backend: Box<dyn CanvasBackend>) -> Self {
        let mut canvas = Self {
            backend,
            color: Color::BLACK,
            line_width: 1.0,
            font_size: 16.0,
            anti_alias: false,
            typeface: Typeface::unavailable(),
            transform: Transform::IDENTITY,
            saved: Vec::new(),
        };
        canvas.replay_style();
        canvas
    }

    /// Rebinds this canvas to a new backend, replaying the current style so
    /// the surface swap is invisible to drawing code. Returns the previous
    /// backend.
    pub fn set_backend(&mut self, backend: Box<dyn CanvasBackend>) -> Box<dyn CanvasBackend> {
        let old = std::mem::replace(&mut self.backend, backend);
        log::debug!(
            "canvas rebound: {}x{} -> {}x{}",
            old.width(),
            old.height(),
            self.backend.width(),
            self.backend.height()
        );
        self.replay_style();
        old
    }

    fn replay_style(&mut self) {
        self.backend.set_color(self.color);
        self.backend.set_line_width(self.line_width);
        self.backend.set_font_size(self.font_size);
        self.backend.set_anti_alias(self.anti_alias);
        self.backend.set_typeface(self.typeface.clone());
        self.backend.set_transform(self.transform);
    }

    pub fn width(&self) -> u32 {
        self.backend.width()
    }

    pub fn height(&self) -> u32 {
        self.backend.height()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        if self.color != color {
            self.color = color;
            self.backend.set_color(color);
        }
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    /// # Panics
    ///
    /// Panics if `width` is negative.
    pub fn set_line_width(&mut self, width: f32) {
        assert!(width >= 0.0, "line width must not be negative");
        if self.line_width != width {
            self.line_width = width;
            self.backend.set_line_width(width);
        }
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// # Panics
    ///
    /// Panics if `size` is not positive.
    pub fn set_font_size(&mut self, size: f32) {
        assert!(size > 0.0, "font size must be positive");
        if self.font_size != size {
            self.font_size = size;
            self.backend.set_font_size(size);
        }
    }

    pub fn anti_alias(&self) -> bool {
        self.anti_alias
    }

    pub fn set_anti_alias(&mut self, enabled: bool) {
        if self.anti_alias != enabled {
            self.anti_alias = enabled;
            self.backend.set_anti_alias(enabled);
        }
    }

    pub fn typeface(&self) -> &Typeface {
        &self.typeface
    }

    pub fn set_typeface(&mut self, typeface: Typeface) {
        if self.typeface != typeface {
            self.typeface = typeface.clone();
            self.backend.set_typeface(typeface);
        }
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        if self.transform != transform {
            self.transform = transform;
            self.backend.set_transform(transform);
        }
    }

    /// Saves the current transform and seeds a new one from an element pose.
    ///
    /// Pinned elements position in canvas space, so their pose replaces the
    /// current transform; unpinned poses compose with it. Paired with
    /// [`Canvas::pop_world`] around each element's draw call.
    pub fn push_world(&mut self, pinned: bool, x: f32, y: f32, angle_rad: f32) {
        self.saved.push(self.transform);
        let base = if pinned {
            Transform::IDENTITY
        } else {
            self.transform
        };
        self.set_transform(base.translated(x, y).rotated(angle_rad));
    }

    /// Restores the transform saved by the matching [`Canvas::push_world`].
    /// A no-op when the stack is empty.
    pub fn pop_world(&mut self) {
        if let Some(previous) = self.saved.pop() {
            self.set_transform(previous);
        }
    }

    /// Fills the whole surface with the current color, ignoring the
    /// transform.
    pub fn fill(&mut self) {
        self.backend.fill();
    }

    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.backend.draw_line(x1, y1, x2, y2);
    }

    pub fn draw_circle(&mut self, x: f32, y: f32, radius: f32) {
        if radius > 0.0 {
            self.backend.draw_circle(x, y, radius);
        }
    }

    pub fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        if radius > 0.0 {
            self.backend.fill_circle(x, y, radius);
        }
    }

    pub fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.backend.draw_rect(x, y, width, height);
        }
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.backend.fill_rect(x, y, width, height);
        }
    }

    pub fn draw_rect_aligned(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        alignment: Alignment,
    ) {
        self.draw_rect(
            alignment.align_x(x, width),
            alignment.align_y(y, height),
            width,
            height,
        );
    }

    pub fn fill_rect_aligned(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        alignment: Alignment,
    ) {
        self.fill_rect(
            alignment.align_x(x, width),
            alignment.align_y(y, height),
            width,
            height,
        );
    }

    pub fn draw_polygon(&mut self, points: &[Point]) {
        if points.len() >= 3 {
            self.backend.draw_polygon(points);
        }
    }

    pub fn fill_polygon(&mut self, points: &[Point]) {
        if points.len() >= 3 {
            self.backend.fill_polygon(points);
        }
    }

    pub fn draw_image(&mut self, x: f32, y: f32, image: &Image) {
        self.draw_image_with_alpha(x, y, image, 255);
    }

    pub fn draw_image_with_alpha(&mut self, x: f32, y: f32, image: &Image, alpha: u8) {
        if alpha > 0 {
            self.backend.draw_raster(x, y, image.raster(), alpha);
        }
    }

    /// Draws `image` with its anchor at `(x, y)` per `alignment`. A 10×10
    /// image centered at (50, 50) lands its top-left corner at (45, 45).
    pub fn draw_image_aligned(&mut self, x: f32, y: f32, image: &Image, alignment: Alignment) {
        self.draw_image(
            alignment.align_x(x, image.width() as f32),
            alignment.align_y(y, image.height() as f32),
            image,
        );
    }

    pub fn draw_text(&mut self, x: f32, y: f32, text: &str) {
        if !text.is_empty() {
            self.backend.draw_text(x, y, text);
        }
    }

    pub fn draw_text_aligned(&mut self, x: f32, y: f32, text: &str, alignment: Alignment) {
        if text.is_empty() {
            return;
        }
        let width = self.backend.text_width(text);
        let height = self.backend.text_height(text);
        self.backend.draw_text(
            alignment.align_x(x, width),
            alignment.align_y(y, height),
            text,
        );
    }

    pub fn text_width(&self, text: &str) -> f32 {
        if text.is_empty() {
            0.0
        } else {
            self.backend.text_width(text)
        }
    }

    pub fn text_height(&self, text: &str) -> f32 {
        if text.is_empty() {
            0.0
        } else {
            self.backend.text_height(text)
        }
    }

    /// Copies another canvas's contents onto this one at `(x, y)`. Uses the
    /// source's raster directly when it is raster-backed, otherwise goes
    /// through a snapshot.
    pub fn draw_canvas(&mut self, x: f32, y: f32, other: &Canvas) {
        if let Some(raster) = other.backend.raster() {
            self.backend.draw_raster(x, y, raster, 255);
        } else {
            let image = other.snapshot();
            self.draw_image(x, y, &image);
        }
    }

    /// Untransformed pixel read; transparent outside the surface.
    pub fn pixel(&self, x: i32, y: i32) -> Color {
        self.backend.pixel(x, y)
    }

    /// Untransformed pixel write; ignored outside the surface.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.backend.set_pixel(x, y, color);
    }

    /// Replaces the connected region of `old` pixels reachable from
    /// `(x, y)` with `new`. A no-op when the start pixel is out of bounds,
    /// not `old`, or when `old == new`.
    pub fn flood_fill(&mut self, x: i32, y: i32, old: Color, new: Color) {
        if old == new {
            return;
        }
        let width = self.width() as i32;
        let height = self.height() as i32;
        if x < 0 || y < 0 || x >= width || y >= height {
            return;
        }
        if self.backend.pixel(x, y) != old {
            return;
        }
        let mut stack = vec![(x, y)];
        while let Some((px, py)) = stack.pop() {
            if px < 0 || py < 0 || px >= width || py >= height {
                continue;
            }
            if self.backend.pixel(px, py) != old {
                continue;
            }
            self.backend.set_pixel(px, py, new);
            stack.push((px + 1, py));
            stack.push((px - 1, py));
            stack.push((px, py + 1));
            stack.push((px, py - 1));
        }
    }

    /// An immutable copy of the current contents, decoupled from future
    /// drawing.
    pub fn snapshot(&self) -> Image {
        self.backend.snapshot()
    }

    /// Direct access to the backing raster, when the backend is
    /// raster-backed. Presentation surfaces use this to avoid a copy.
    pub fn raster(&self) -> Option<&crate::raster::Raster> {
        self.backend.raster()
    }
}

#[cfg(test)]
#[path = "tests/canvas_tests.rs"]
mod tests;
