use std::sync::Arc;

use easel_graphics::Color;

use crate::raster::Raster;

/// An immutable raster with cheap clones. Snapshots and loaded resources are
/// decoupled from any canvas they came from or get drawn onto.
#[derive(Clone, Debug)]
pub struct Image {
    raster: Arc<Raster>,
}

impl Image {
    pub fn from_raster(raster: Raster) -> Self {
        Self {
            raster: Arc::new(raster),
        }
    }

    /// The built-in fallback image: a magenta/dark checkerboard, the
    /// documented sentinel for resources that failed to load.
    pub fn placeholder(width: u32, height: u32) -> Self {
        let mut raster = Raster::new(width.max(1), height.max(1));
        let magenta = Color::rgb(255, 0, 255);
        let dark = Color::rgb(32, 32, 32);
        for y in 0..raster.height() as i32 {
            for x in 0..raster.width() as i32 {
                let cell = ((x / 8) + (y / 8)) % 2 == 0;
                raster.set(x, y, if cell { magenta } else { dark });
            }
        }
        Self::from_raster(raster)
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn pixel(&self, x: i32, y: i32) -> Color {
        self.raster.get(x, y)
    }
}
