use std::sync::{Arc, Mutex};

use easel_canvas::{CanvasBackend, Image, Raster, Typeface};
use easel_graphics::{Color, Point, Transform};

/// One recorded drawing call, with the color that was current when it was
/// made. Style setters are not recorded.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Fill(Color),
    Line(Color),
    Circle(Color),
    FillCircle(Color),
    Rect(Color),
    FillRect(Color),
    Polygon(Color),
    FillPolygon(Color),
    Raster(Color),
    Text(String),
}

/// Canvas backend that records drawing calls instead of rasterizing.
///
/// Useful for order assertions where pixel output would be overkill. Pixel
/// reads always return the transparent sentinel and snapshots are blank.
pub struct RecordingBackend {
    width: u32,
    height: u32,
    color: Color,
    calls: Arc<Mutex<Vec<DrawCall>>>,
}

impl RecordingBackend {
    pub fn new(width: u32, height: u32) -> (Self, Arc<Mutex<Vec<DrawCall>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (Self::with_log(width, height, calls.clone()), calls)
    }

    /// A backend appending to an existing call log. Lets several backends
    /// (say, across a surface recreation) share one log.
    pub fn with_log(width: u32, height: u32, calls: Arc<Mutex<Vec<DrawCall>>>) -> Self {
        Self {
            width,
            height,
            color: Color::BLACK,
            calls,
        }
    }

    fn record(&mut self, call: DrawCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl CanvasBackend for RecordingBackend {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn set_line_width(&mut self, _width: f32) {}

    fn set_font_size(&mut self, _size: f32) {}

    fn set_anti_alias(&mut self, _enabled: bool) {}

    fn set_transform(&mut self, _transform: Transform) {}

    fn set_typeface(&mut self, _typeface: Typeface) {}

    fn draw_line(&mut self, _x1: f32, _y1: f32, _x2: f32, _y2: f32) {
        let color = self.color;
        self.record(DrawCall::Line(color));
    }

    fn draw_circle(&mut self, _x: f32, _y: f32, _radius: f32) {
        let color = self.color;
        self.record(DrawCall::Circle(color));
    }

    fn fill_circle(&mut self, _x: f32, _y: f32, _radius: f32) {
        let color = self.color;
        self.record(DrawCall::FillCircle(color));
    }

    fn draw_rect(&mut self, _x: f32, _y: f32, _width: f32, _height: f32) {
        let color = self.color;
        self.record(DrawCall::Rect(color));
    }

    fn fill_rect(&mut self, _x: f32, _y: f32, _width: f32, _height: f32) {
        let color = self.color;
        self.record(DrawCall::FillRect(color));
    }

    fn draw_polygon(&mut self, _points: &[Point]) {
        let color = self.color;
        self.record(DrawCall::Polygon(color));
    }

    fn fill_polygon(&mut self, _points: &[Point]) {
        let color = self.color;
        self.record(DrawCall::FillPolygon(color));
    }

    fn draw_raster(&mut self, _x: f32, _y: f32, _raster: &Raster, _alpha: u8) {
        let color = self.color;
        self.record(DrawCall::Raster(color));
    }

    fn draw_text(&mut self, _x: f32, _y: f32, text: &str) {
        self.record(DrawCall::Text(text.to_owned()));
    }

    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * 6.0
    }

    fn text_height(&self, _text: &str) -> f32 {
        8.0
    }

    fn fill(&mut self) {
        let color = self.color;
        self.record(DrawCall::Fill(color));
    }

    fn pixel(&self, _x: i32, _y: i32) -> Color {
        Color::TRANSPARENT
    }

    fn set_pixel(&mut self, _x: i32, _y: i32, _color: Color) {}

    fn snapshot(&self) -> Image {
        Image::from_raster(Raster::new(self.width, self.height))
    }
}
