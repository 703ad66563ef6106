/// Drawable surface size in physical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Height over width, or `None` for a degenerate (minimized) surface.
    ///
    /// Orthographic cameras scale their vertical extent by this value.
    #[inline]
    pub fn aspect(self) -> Option<f32> {
        self.is_valid().then(|| self.height / self.width)
    }
}
