use crate::{Interval, Vec3};

/// Default lower bound for primary rays, keeps hits from starting on the eye.
pub const DEFAULT_RAY_MIN: f32 = 0.0001;

/// A ray in 3D space bounded to the parametric range `[min, max]`.
///
/// Intersection routines only accept hits with `min <= t <= max`, and the
/// closest-hit scan narrows `max` as nearer hits are found.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub min: f32,
    pub max: f32,
}

impl Ray {
    /// Create a new ray covering `[DEFAULT_RAY_MIN, f32::MAX]`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self::with_bounds(origin, direction, DEFAULT_RAY_MIN, f32::MAX)
    }

    /// Create a ray with explicit parametric bounds.
    pub fn with_bounds(origin: Vec3, direction: Vec3, min: f32, max: f32) -> Self {
        debug_assert!(min < max, "ray bounds must satisfy min < max ({min} >= {max})");
        Self {
            origin,
            direction,
            min,
            max,
        }
    }

    /// The accepted parametric range as an interval.
    #[inline]
    pub fn interval(&self) -> Interval {
        Interval::new(self.min, self.max)
    }

    /// Point at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
