//! Point and directional lights.

use crate::material::Color;
use prism_math::Vec3;

/// Distance used to place a directional light "at infinity".
///
/// Shadow rays toward a directional light are bounded by this length.
pub const DIRECTIONAL_LIGHT_DISTANCE: f32 = 1.0e6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Point,
    Directional,
}

/// A light source.
///
/// `origin` is only meaningful for point lights and `direction` (the way the
/// light travels) only for directional ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub origin: Vec3,
    pub direction: Vec3,
    pub color: Color,
    pub intensity: f32,
}

impl Light {
    pub fn point(origin: Vec3, intensity: f32, color: Color) -> Self {
        Self {
            kind: LightKind::Point,
            origin,
            direction: Vec3::ZERO,
            color,
            intensity,
        }
    }

    pub fn directional(direction: Vec3, intensity: f32, color: Color) -> Self {
        Self {
            kind: LightKind::Directional,
            origin: Vec3::ZERO,
            direction: direction.normalize_or_zero(),
            color,
            intensity,
        }
    }

    /// Un-normalized vector from `target` to the light.
    ///
    /// Its length is the distance to the light, which bounds the shadow ray.
    pub fn direction_to_light(&self, target: Vec3) -> Vec3 {
        match self.kind {
            LightKind::Point => self.origin - target,
            LightKind::Directional => -self.direction * DIRECTIONAL_LIGHT_DISTANCE,
        }
    }

    /// Incident radiance at `target`.
    ///
    /// Point lights fall off with the inverse square of the distance;
    /// directional lights are constant.
    pub fn radiance(&self, target: Vec3) -> Color {
        match self.kind {
            LightKind::Point => {
                let distance_squared = (self.origin - target).length_squared();
                self.color * self.intensity / distance_squared
            }
            LightKind::Directional => self.color * self.intensity,
        }
    }
}
