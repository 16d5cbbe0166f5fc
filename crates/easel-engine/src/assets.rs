use std::fs;

use easel_canvas::{Image, Raster, Typeface};
use easel_graphics::Color;
use once_cell::sync::Lazy;

/// The process-wide fallback image, built once and cloned on every failed
/// load. Clones are cheap (shared raster).
static DEFAULT_IMAGE: Lazy<Image> = Lazy::new(|| Image::placeholder(64, 64));

/// The documented fallback for images that failed to load.
pub fn default_image() -> Image {
    DEFAULT_IMAGE.clone()
}

/// Resolves an identifier to a decoded image. Implementations never fail the
/// caller: a missing or undecodable resource degrades to a documented
/// fallback value.
pub trait ImageLoader: Send {
    fn load_image(&mut self, path: &str) -> Image;
}

/// Resolves an identifier to a typeface, or the unavailable sentinel. Like
/// image loading, this never fails the caller; text drawn with the sentinel
/// falls back to the built-in bitmap font.
pub trait TypefaceLoader: Send {
    fn load_typeface(&mut self, path: &str) -> Typeface;
}

/// Filesystem-backed image loader. Decodes netpbm (P3/P6) files; anything
/// else degrades to [`default_image`] with a warning.
pub struct FsImageLoader;

impl ImageLoader for FsImageLoader {
    fn load_image(&mut self, path: &str) -> Image {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!("image {path:?} unreadable ({err}), using fallback");
                return default_image();
            }
        };
        match decode_ppm(&bytes) {
            Some(raster) => Image::from_raster(raster),
            None => {
                log::warn!("image {path:?} undecodable, using fallback");
                default_image()
            }
        }
    }
}

/// Filesystem-backed typeface loader over any format rusttype understands.
pub struct FsTypefaceLoader;

impl TypefaceLoader for FsTypefaceLoader {
    fn load_typeface(&mut self, path: &str) -> Typeface {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!("typeface {path:?} unreadable ({err}), using sentinel");
                return Typeface::unavailable();
            }
        };
        match Typeface::from_bytes(path, bytes) {
            Some(typeface) => typeface,
            None => {
                log::warn!("typeface {path:?} unparsable, using sentinel");
                Typeface::unavailable()
            }
        }
    }
}

/// Decodes a netpbm image (binary P6 or ascii P3, max value 255).
fn decode_ppm(bytes: &[u8]) -> Option<Raster> {
    let mut cursor = PpmCursor::new(bytes);
    let magic = cursor.token()?;
    let binary = match magic.as_str() {
        "P6" => true,
        "P3" => false,
        _ => return None,
    };
    let width: u32 = cursor.token()?.parse().ok()?;
    let height: u32 = cursor.token()?.parse().ok()?;
    let max_value: u32 = cursor.token()?.parse().ok()?;
    if width == 0 || height == 0 || max_value == 0 || max_value > 255 {
        return None;
    }
    let mut raster = Raster::new(width, height);
    if binary {
        // A single whitespace byte separates the header from the raster.
        let data = cursor.rest_after_single_whitespace()?;
        let needed = (width * height * 3) as usize;
        if data.len() < needed {
            return None;
        }
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let i = ((y as u32 * width + x as u32) * 3) as usize;
                raster.set(x, y, Color::rgb(data[i], data[i + 1], data[i + 2]));
            }
        }
    } else {
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let r: u8 = cursor.token()?.parse().ok()?;
                let g: u8 = cursor.token()?.parse().ok()?;
                let b: u8 = cursor.token()?.parse().ok()?;
                raster.set(x, y, Color::rgb(r, g, b));
            }
        }
    }
    Some(raster)
}

/// Token reader over a netpbm header: whitespace-delimited, `#` starts a
/// comment running to end of line.
struct PpmCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> PpmCursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn token(&mut self) -> Option<String> {
        self.skip_whitespace_and_comments();
        let start = self.pos;
        while self.pos < self.bytes.len() && !self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        String::from_utf8(self.bytes[start..self.pos].to_vec()).ok()
    }

    fn skip_whitespace_and_comments(&mut self) {
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if b == b'#' {
                while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    fn rest_after_single_whitespace(&mut self) -> Option<&'a [u8]> {
        if self.pos >= self.bytes.len() || !self.bytes[self.pos].is_ascii_whitespace() {
            return None;
        }
        Some(&self.bytes[self.pos + 1..])
    }
}

#[cfg(test)]
#[path = "tests/assets_tests.rs"]
mod tests;
