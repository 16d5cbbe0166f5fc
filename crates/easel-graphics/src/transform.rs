use crate::geometry::Point;

/// An affine transform restricted to translation, rotation, and uniform
/// scale.
///
/// The restriction keeps the inverse trivial and guarantees that circles map
/// to circles, which the drawing backends rely on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub tx: f32,
    pub ty: f32,
    /// Rotation in radians, counter-clockwise.
    pub rotation: f32,
    /// Uniform scale factor; always positive.
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        tx: 0.0,
        ty: 0.0,
        rotation: 0.0,
        scale: 1.0,
    };

    pub fn translation(tx: f32, ty: f32) -> Self {
        Self {
            tx,
            ty,
            ..Self::IDENTITY
        }
    }

    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    /// Returns this transform followed by a translation in local coordinates.
    pub fn translated(self, dx: f32, dy: f32) -> Self {
        let (sin, cos) = self.rotation.sin_cos();
        Self {
            tx: self.tx + self.scale * (dx * cos - dy * sin),
            ty: self.ty + self.scale * (dx * sin + dy * cos),
            ..self
        }
    }

    /// Returns this transform followed by a rotation.
    pub fn rotated(self, angle_rad: f32) -> Self {
        Self {
            rotation: self.rotation + angle_rad,
            ..self
        }
    }

    /// Returns this transform followed by a uniform scale.
    ///
    /// # Panics
    ///
    /// Panics if `factor` is not positive.
    pub fn scaled(self, factor: f32) -> Self {
        assert!(factor > 0.0, "scale factor must be positive");
        Self {
            scale: self.scale * factor,
            ..self
        }
    }

    /// Maps a point from local coordinates to device coordinates.
    pub fn apply(self, point: Point) -> Point {
        let (sin, cos) = self.rotation.sin_cos();
        Point {
            x: self.tx + self.scale * (point.x * cos - point.y * sin),
            y: self.ty + self.scale * (point.x * sin + point.y * cos),
        }
    }

    /// Maps a distance (radius, line width) to device coordinates.
    pub fn apply_distance(self, distance: f32) -> f32 {
        distance * self.scale
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
#[path = "tests/transform_tests.rs"]
mod tests;
