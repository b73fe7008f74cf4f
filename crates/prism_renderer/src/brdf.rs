//! Reflectance terms used by the materials.
//!
//! All direction arguments are unit vectors pointing away from the surface:
//! `l` toward the light, `v` toward the viewer.

use crate::material::Color;
use prism_math::Vec3;
use std::f32::consts::PI;

/// Lambert diffuse: `kd * cd / pi`.
#[inline]
pub fn lambert(kd: f32, cd: Color) -> Color {
    cd * kd / PI
}

/// Lambert diffuse with a per-channel reflection coefficient.
#[inline]
pub fn lambert_color(kd: Color, cd: Color) -> Color {
    cd * kd / PI
}

/// Phong specular lobe, replicated across all three channels.
///
/// Reflects `l` about `n` and raises the clamped `r . v` cosine to `exponent`.
pub fn phong(ks: f32, exponent: f32, l: Vec3, v: Vec3, n: Vec3) -> Color {
    let r = 2.0 * n.dot(l) * n - l;
    let cos_alpha = r.dot(v).max(0.0);
    Color::splat(ks * cos_alpha.powf(exponent))
}

/// Schlick's approximation of the Fresnel reflectance.
///
/// Equals `f0` at normal incidence and tends to white at grazing angles.
pub fn fresnel_schlick(h: Vec3, v: Vec3, f0: Color) -> Color {
    let cos_theta = h.dot(v).max(0.0);
    f0 + (Color::ONE - f0) * (1.0 - cos_theta).powi(5)
}

/// Trowbridge-Reitz (GGX) normal distribution with `alpha = roughness^2`.
pub fn normal_distribution_ggx(n: Vec3, h: Vec3, roughness: f32) -> f32 {
    let alpha = roughness * roughness;
    let alpha2 = alpha * alpha;
    let n_dot_h = n.dot(h).max(0.0);

    let denom = n_dot_h * n_dot_h * (alpha2 - 1.0) + 1.0;
    alpha2 / (PI * denom * denom)
}

/// Schlick-GGX masking for one direction, direct-lighting remap of `k`.
pub fn geometry_schlick_ggx(n: Vec3, x: Vec3, roughness: f32) -> f32 {
    let n_dot_x = n.dot(x).max(0.0);
    let alpha = roughness * roughness;
    let k = (alpha + 1.0) * (alpha + 1.0) / 8.0;

    n_dot_x / (n_dot_x * (1.0 - k) + k)
}

/// Smith shadowing-masking: Schlick-GGX for the view and light directions.
pub fn geometry_smith(n: Vec3, v: Vec3, l: Vec3, roughness: f32) -> f32 {
    geometry_schlick_ggx(n, v, roughness) * geometry_schlick_ggx(n, l, roughness)
}
