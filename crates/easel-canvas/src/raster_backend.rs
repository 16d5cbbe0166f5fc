use easel_graphics::{Color, Point, Transform};
use rusttype::{point, Scale};

use crate::backend::CanvasBackend;
use crate::font5x7;
use crate::image::Image;
use crate::raster::Raster;
use crate::typeface::Typeface;

/// Software rasterizer over an RGBA8 [`Raster`].
///
/// Shapes are transformed per point and filled with even-odd scanlines using
/// pixel-center sampling, so axis-aligned integer rectangles cover exactly
/// their stated pixel area. Anti-aliasing smooths circle and ring edges by
/// one pixel of coverage; polygon edges stay hard.
pub struct RasterBackend {
    raster: Raster,
    color: Color,
    line_width: f32,
    font_size: f32,
    anti_alias: bool,
    transform: Transform,
    typeface: Typeface,
}

impl RasterBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_raster(Raster::new(width, height))
    }

    pub fn from_raster(raster: Raster) -> Self {
        Self {
            raster,
            color: Color::BLACK,
            line_width: 1.0,
            font_size: 16.0,
            anti_alias: false,
            transform: Transform::IDENTITY,
            typeface: Typeface::unavailable(),
        }
    }

    pub fn into_raster(self) -> Raster {
        self.raster
    }

    fn tp(&self, x: f32, y: f32) -> Point {
        self.transform.apply(Point::new(x, y))
    }

    fn device_line_width(&self) -> f32 {
        // Width 0 draws hairlines independent of the transform.
        if self.line_width == 0.0 {
            1.0
        } else {
            self.transform.apply_distance(self.line_width).max(1.0)
        }
    }

    fn fill_polygon_device(&mut self, pts: &[Point], color: Color) {
        if pts.len() < 3 || color.is_transparent() {
            return;
        }
        let min_y = pts.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = pts.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        let y0 = (min_y - 0.5).ceil().max(0.0) as i32;
        let y1 = (max_y + 0.5).floor().min(self.raster.height() as f32) as i32;
        let mut crossings: Vec<f32> = Vec::new();
        for py in y0..y1 {
            let sample_y = py as f32 + 0.5;
            crossings.clear();
            for i in 0..pts.len() {
                let a = pts[i];
                let b = pts[(i + 1) % pts.len()];
                if (a.y <= sample_y && b.y > sample_y) || (b.y <= sample_y && a.y > sample_y) {
                    let t = (sample_y - a.y) / (b.y - a.y);
                    crossings.push(a.x + t * (b.x - a.x));
                }
            }
            crossings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            for span in crossings.chunks_exact(2) {
                let mut px = (span[0] - 0.5).ceil() as i32;
                while (px as f32 + 0.5) < span[1] {
                    self.raster.blend(px, py, color);
                    px += 1;
                }
            }
        }
    }

    /// Blends `color` over every pixel whose distance to `center` satisfies
    /// the ring `[inner, outer]`, with one pixel of edge coverage when
    /// anti-aliasing is on. `inner < 0` degenerates into a filled disc.
    fn fill_ring_device(&mut self, center: Point, inner: f32, outer: f32, color: Color) {
        if color.is_transparent() || outer <= 0.0 {
            return;
        }
        let x0 = (center.x - outer - 1.0).floor().max(0.0) as i32;
        let x1 = (center.x + outer + 1.0).ceil().min(self.raster.width() as f32) as i32;
        let y0 = (center.y - outer - 1.0).floor().max(0.0) as i32;
        let y1 = (center.y + outer + 1.0).ceil().min(self.raster.height() as f32) as i32;
        for py in y0..y1 {
            for px in x0..x1 {
                let dist = Point::new(px as f32 + 0.5, py as f32 + 0.5).distance_to(center);
                let coverage = if self.anti_alias {
                    let outer_cov = (outer - dist + 0.5).clamp(0.0, 1.0);
                    let inner_cov = (dist - inner + 0.5).clamp(0.0, 1.0);
                    outer_cov * inner_cov
                } else if dist <= outer && dist >= inner {
                    1.0
                } else {
                    0.0
                };
                if coverage > 0.0 {
                    let alpha = (color.a as f32 * coverage).round() as u8;
                    self.raster.blend(px, py, color.with_alpha(alpha));
                }
            }
        }
    }

    fn hairline_device(&mut self, a: Point, b: Point, color: Color) {
        let mut x0 = a.x.round() as i32;
        let mut y0 = a.y.round() as i32;
        let x1 = b.x.round() as i32;
        let y1 = b.y.round() as i32;
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.raster.blend(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn stroke_segment_device(&mut self, a: Point, b: Point, width: f32, color: Color) {
        if width <= 1.5 {
            self.hairline_device(a, b, color);
            return;
        }
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len == 0.0 {
            self.fill_ring_device(a, -1.0, width / 2.0, color);
            return;
        }
        let nx = -dy / len * width / 2.0;
        let ny = dx / len * width / 2.0;
        let quad = [
            Point::new(a.x + nx, a.y + ny),
            Point::new(b.x + nx, b.y + ny),
            Point::new(b.x - nx, b.y - ny),
            Point::new(a.x - nx, a.y - ny),
        ];
        self.fill_polygon_device(&quad, color);
    }

    fn stroke_path_device(&mut self, pts: &[Point], close: bool) {
        if pts.len() < 2 {
            return;
        }
        let width = self.device_line_width();
        let color = self.color;
        let segments = if close { pts.len() } else { pts.len() - 1 };
        for i in 0..segments {
            let a = pts[i];
            let b = pts[(i + 1) % pts.len()];
            self.stroke_segment_device(a, b, width, color);
        }
    }

    fn rect_corners(&self, x: f32, y: f32, width: f32, height: f32) -> [Point; 4] {
        [
            self.tp(x, y),
            self.tp(x + width, y),
            self.tp(x + width, y + height),
            self.tp(x, y + height),
        ]
    }

    fn bitmap_scale(&self) -> i32 {
        let device_size = self.transform.apply_distance(self.font_size);
        ((device_size / font5x7::CELL_HEIGHT as f32).round() as i32).max(1)
    }

    fn draw_text_bitmap(&mut self, x: f32, y: f32, text: &str) {
        let anchor = self.tp(x, y);
        let scale = self.bitmap_scale();
        let color = self.color;
        let mut pen_x = anchor.x.round() as i32;
        let pen_y = anchor.y.round() as i32;
        for ch in text.chars() {
            let glyph = font5x7::glyph(ch);
            for col in 0..font5x7::GLYPH_WIDTH {
                let bits = glyph[col as usize];
                for row in 0..font5x7::GLYPH_HEIGHT {
                    if bits & (1u8 << row) == 0 {
                        continue;
                    }
                    let base_x = pen_x + col as i32 * scale;
                    let base_y = pen_y + row as i32 * scale;
                    for oy in 0..scale {
                        for ox in 0..scale {
                            self.raster.blend(base_x + ox, base_y + oy, color);
                        }
                    }
                }
            }
            pen_x += font5x7::GLYPH_ADVANCE as i32 * scale;
        }
    }

    fn draw_text_typeface(&mut self, x: f32, y: f32, text: &str) {
        let anchor = self.tp(x, y);
        let device_size = self.transform.apply_distance(self.font_size);
        let color = self.color;
        let Some(font) = self.typeface.font().cloned() else {
            return;
        };
        let scale = Scale::uniform(device_size);
        let v_metrics = font.v_metrics(scale);
        let glyphs: Vec<_> = font.layout(text, scale, point(0.0, v_metrics.ascent)).collect();
        for glyph in glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, coverage| {
                    if coverage <= 0.0 {
                        return;
                    }
                    let px = anchor.x.round() as i32 + bb.min.x + gx as i32;
                    let py = anchor.y.round() as i32 + bb.min.y + gy as i32;
                    let alpha = (color.a as f32 * coverage).round() as u8;
                    self.raster.blend(px, py, color.with_alpha(alpha));
                });
            }
        }
    }
}

impl CanvasBackend for RasterBackend {
    fn width(&self) -> u32 {
        self.raster.width()
    }

    fn height(&self) -> u32 {
        self.raster.height()
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    fn set_anti_alias(&mut self, enabled: bool) {
        self.anti_alias = enabled;
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn set_typeface(&mut self, typeface: Typeface) {
        self.typeface = typeface;
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let a = self.tp(x1, y1);
        let b = self.tp(x2, y2);
        let width = self.device_line_width();
        let color = self.color;
        self.stroke_segment_device(a, b, width, color);
    }

    fn draw_circle(&mut self, x: f32, y: f32, radius: f32) {
        let center = self.tp(x, y);
        let r = self.transform.apply_distance(radius);
        let half = self.device_line_width() / 2.0;
        let color = self.color;
        self.fill_ring_device(center, (r - half).max(0.0), r + half, color);
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        let center = self.tp(x, y);
        let r = self.transform.apply_distance(radius);
        let color = self.color;
        self.fill_ring_device(center, -1.0, r, color);
    }

    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let corners = self.rect_corners(x, y, width, height);
        self.stroke_path_device(&corners, true);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let corners = self.rect_corners(x, y, width, height);
        let color = self.color;
        self.fill_polygon_device(&corners, color);
    }

    fn draw_polygon(&mut self, points: &[Point]) {
        let device: Vec<Point> = points.iter().map(|p| self.transform.apply(*p)).collect();
        self.stroke_path_device(&device, true);
    }

    fn fill_polygon(&mut self, points: &[Point]) {
        let device: Vec<Point> = points.iter().map(|p| self.transform.apply(*p)).collect();
        let color = self.color;
        self.fill_polygon_device(&device, color);
    }

    fn draw_raster(&mut self, x: f32, y: f32, raster: &Raster, alpha: u8) {
        if alpha == 0 {
            return;
        }
        let anchor = self.tp(x, y);
        let scale = self.transform.scale;
        let ax = anchor.x.round() as i32;
        let ay = anchor.y.round() as i32;
        if (scale - 1.0).abs() < 1e-6 {
            self.raster.blit(ax, ay, raster, alpha);
            return;
        }
        let dw = ((raster.width() as f32 * scale).round() as i32).max(1);
        let dh = ((raster.height() as f32 * scale).round() as i32).max(1);
        for dy in 0..dh {
            for dx in 0..dw {
                let sx = ((dx as f32 + 0.5) / scale) as i32;
                let sy = ((dy as f32 + 0.5) / scale) as i32;
                let mut color = raster.get(sx, sy);
                if alpha < 255 {
                    color.a = ((color.a as u16 * alpha as u16) / 255) as u8;
                }
                self.raster.blend(ax + dx, ay + dy, color);
            }
        }
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str) {
        if self.typeface.is_available() {
            self.draw_text_typeface(x, y, text);
        } else {
            self.draw_text_bitmap(x, y, text);
        }
    }

    fn text_width(&self, text: &str) -> f32 {
        if let Some(font) = self.typeface.font() {
            let scale = Scale::uniform(self.font_size);
            font.layout(text, scale, point(0.0, 0.0))
                .map(|g| g.unpositioned().h_metrics().advance_width)
                .sum()
        } else {
            let per_glyph = font5x7::GLYPH_ADVANCE as f32 * self.canvas_bitmap_scale();
            text.chars().count() as f32 * per_glyph
        }
    }

    fn text_height(&self, text: &str) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        if let Some(font) = self.typeface.font() {
            let metrics = font.v_metrics(Scale::uniform(self.font_size));
            metrics.ascent - metrics.descent
        } else {
            font5x7::CELL_HEIGHT as f32 * self.canvas_bitmap_scale()
        }
    }

    fn fill(&mut self) {
        self.raster.fill(self.color);
    }

    fn pixel(&self, x: i32, y: i32) -> Color {
        self.raster.get(x, y)
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.raster.set(x, y, color);
    }

    fn snapshot(&self) -> Image {
        Image::from_raster(self.raster.clone())
    }

    fn raster(&self) -> Option<&Raster> {
        Some(&self.raster)
    }
}

impl RasterBackend {
    /// Bitmap-font scale in canvas space, used for measurement (alignment
    /// happens before the transform applies).
    fn canvas_bitmap_scale(&self) -> f32 {
        ((self.font_size / font5x7::CELL_HEIGHT as f32).round()).max(1.0)
    }
}

#[cfg(test)]
#[path = "tests/raster_backend_tests.rs"]
mod tests;
