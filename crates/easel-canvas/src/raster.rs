use easel_graphics::Color;

/// An RGBA8 pixel grid. The interchange type between canvases, images, and
/// presentation surfaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Creates a transparent raster.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0, "raster width must be positive");
        assert!(height > 0, "raster height must be positive");
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Raw RGBA bytes in row-major order, the layout framebuffer surfaces
    /// expect.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the pixel color, or transparent outside the raster.
    pub fn get(&self, x: i32, y: i32) -> Color {
        if !self.contains(x, y) {
            return Color::TRANSPARENT;
        }
        let i = self.index(x as u32, y as u32);
        Color::rgba(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        )
    }

    /// Overwrites the pixel; silently ignored outside the raster.
    pub fn set(&mut self, x: i32, y: i32, color: Color) {
        if !self.contains(x, y) {
            return;
        }
        let i = self.index(x as u32, y as u32);
        self.pixels[i] = color.r;
        self.pixels[i + 1] = color.g;
        self.pixels[i + 2] = color.b;
        self.pixels[i + 3] = color.a;
    }

    /// Source-over blends `color` onto the pixel; ignored outside the raster.
    pub fn blend(&mut self, x: i32, y: i32, color: Color) {
        if color.is_transparent() || !self.contains(x, y) {
            return;
        }
        if color.is_opaque() {
            self.set(x, y, color);
        } else {
            let dst = self.get(x, y);
            self.set(x, y, dst.blend(color));
        }
    }

    /// Fills every pixel with `color`, replacing existing content.
    pub fn fill(&mut self, color: Color) {
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk[0] = color.r;
            chunk[1] = color.g;
            chunk[2] = color.b;
            chunk[3] = color.a;
        }
    }

    /// Blends `src` onto this raster with its top-left corner at `(x, y)`,
    /// modulated by `alpha`. Clipped to the destination bounds.
    pub fn blit(&mut self, x: i32, y: i32, src: &Raster, alpha: u8) {
        if alpha == 0 {
            return;
        }
        for sy in 0..src.height as i32 {
            for sx in 0..src.width as i32 {
                let mut color = src.get(sx, sy);
                if alpha < 255 {
                    color.a = ((color.a as u16 * alpha as u16) / 255) as u8;
                }
                self.blend(x + sx, y + sy, color);
            }
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 4) as usize
    }
}

#[cfg(test)]
#[path = "tests/raster_tests.rs"]
mod tests;
