use std::error::Error;
use std::fmt;

use easel_canvas::{Canvas, CanvasBackend};

/// Behavioral features of a view. `Fullscreen` and `DoubleBuffered` require
/// recreating the platform surface when toggled; `Scrollable` only switches
/// pointer-drag coalescing on the view's event queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewFeature {
    Fullscreen,
    DoubleBuffered,
    Scrollable,
}

impl ViewFeature {
    const fn bit(self) -> u8 {
        match self {
            Self::Fullscreen => 1,
            Self::DoubleBuffered => 2,
            Self::Scrollable => 4,
        }
    }

    /// True when toggling this feature tears down and recreates the backing
    /// surface.
    pub fn requires_recreation(self) -> bool {
        matches!(self, Self::Fullscreen | Self::DoubleBuffered)
    }
}

/// Set of [`ViewFeature`]s, stored as a bitset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeatureSet(u8);

impl FeatureSet {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn with(mut self, feature: ViewFeature) -> Self {
        self.insert(feature);
        self
    }

    pub fn insert(&mut self, feature: ViewFeature) {
        self.0 |= feature.bit();
    }

    pub fn remove(&mut self, feature: ViewFeature) {
        self.0 &= !feature.bit();
    }

    pub fn contains(self, feature: ViewFeature) -> bool {
        self.0 & feature.bit() != 0
    }
}

/// Lifecycle of a view's backing surface.
///
/// `Recreating` is observable only from within a feature toggle; callers see
/// the transition through [`crate::View::surface_generation`]. `Failed` and
/// `Closed` are terminal: ticks on such a view are no-ops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceState {
    Active,
    Recreating,
    Failed,
    Closed,
}

#[derive(Debug)]
pub enum SurfaceError {
    /// The provider could not create a surface for the requested geometry
    /// and feature set.
    Creation(String),
    /// Presenting a finished frame failed.
    Present(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Creation(reason) => write!(f, "surface creation failed: {reason}"),
            Self::Present(reason) => write!(f, "surface present failed: {reason}"),
        }
    }
}

impl Error for SurfaceError {}

/// A platform presentation target. The core never knows whether this is a
/// window, a framebuffer, or a test double.
pub trait Surface: Send {
    fn size(&self) -> (u32, u32);

    /// Whether the surface is worth drawing to. Views skip their whole tick
    /// body while this reports false (minimized or hidden windows).
    fn is_visible(&self) -> bool;

    fn set_title(&mut self, title: &str);

    /// Creates the drawing target for this surface. Called once per surface
    /// lifetime; the view owns the returned backend through its foreground
    /// canvas.
    fn create_backend(&mut self) -> Box<dyn CanvasBackend>;

    /// Presents a finished frame. `frame` is the view's foreground canvas.
    fn present(&mut self, frame: &Canvas) -> Result<(), SurfaceError>;
}

/// Creates surfaces on demand: once at view construction and again on every
/// feature toggle that requires recreation.
pub trait SurfaceProvider: Send {
    fn create(
        &mut self,
        width: u32,
        height: u32,
        features: &FeatureSet,
    ) -> Result<Box<dyn Surface>, SurfaceError>;
}

#[cfg(test)]
#[path = "tests/surface_tests.rs"]
mod tests;
