/// Anchor-based alignment for positioning primitives relative to a point.
///
/// Alignment is purely a coordinate translation: given the anchor point and
/// the measured size of a primitive, it yields the top-left coordinate the
/// anchor-less drawing call expects. It is never a style attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Alignment {
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Alignment {
    /// Returns the top-left x for a primitive of `width` anchored at `x`.
    pub fn align_x(self, x: f32, width: f32) -> f32 {
        match self.horizontal() {
            Bias::Near => x,
            Bias::Middle => x - width / 2.0,
            Bias::Far => x - width,
        }
    }

    /// Returns the top-left y for a primitive of `height` anchored at `y`.
    pub fn align_y(self, y: f32, height: f32) -> f32 {
        match self.vertical() {
            Bias::Near => y,
            Bias::Middle => y - height / 2.0,
            Bias::Far => y - height,
        }
    }

    fn horizontal(self) -> Bias {
        match self {
            Self::TopLeft | Self::Left | Self::BottomLeft => Bias::Near,
            Self::Top | Self::Center | Self::Bottom => Bias::Middle,
            Self::TopRight | Self::Right | Self::BottomRight => Bias::Far,
        }
    }

    fn vertical(self) -> Bias {
        match self {
            Self::TopLeft | Self::Top | Self::TopRight => Bias::Near,
            Self::Left | Self::Center | Self::Right => Bias::Middle,
            Self::BottomLeft | Self::Bottom | Self::BottomRight => Bias::Far,
        }
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::TopLeft
    }
}

#[derive(Clone, Copy)]
enum Bias {
    Near,
    Middle,
    Far,
}

#[cfg(test)]
#[path = "tests/alignment_tests.rs"]
mod tests;
