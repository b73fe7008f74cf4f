/// A closed scalar range `[min, max]`.
///
/// Used for a ray's accepted hit distances, for bounding-box slabs and for
/// clamping color channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// The unit range used to clip color channels.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };

    /// Contains nothing, since `min > max`.
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// `min <= x <= max`. NaN is never contained.
    #[inline]
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// `min < x < max`. NaN and the endpoints are never surrounded.
    #[inline]
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Clamp into the range. NaN maps to `min`.
    #[inline]
    pub fn clamp(&self, x: f32) -> f32 {
        if x > self.max {
            self.max
        } else if x >= self.min {
            x
        } else {
            self.min
        }
    }

    /// Grow by `delta / 2` on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        let padding = delta * 0.5;
        Interval::new(self.min - padding, self.max + padding)
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}
