//! Surface materials.
//!
//! The set of material kinds is closed, so they are a single enum dispatched
//! by [`Material::shade`]. Materials live in the scene and primitives refer
//! to them by index.

use crate::brdf;
use crate::hittable::HitRecord;
use prism_core::MaterialDesc;
use prism_math::Vec3;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Lowest roughness accepted by the Cook-Torrance material.
///
/// Below this `alpha^2` underflows against one in f32 and the GGX term
/// divides by zero at the highlight peak.
pub const MIN_ROUGHNESS: f32 = 0.05;

/// Base reflectivity used for every dielectric.
pub const DIELECTRIC_F0: f32 = 0.04;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Returns a fixed color regardless of lighting. Useful for debugging.
    SolidColor { color: Color },

    /// Ideal diffuse surface.
    Lambert { color: Color, reflectance: f32 },

    /// Diffuse surface with a Phong highlight.
    LambertPhong {
        color: Color,
        kd: f32,
        ks: f32,
        exponent: f32,
    },

    /// Microfacet surface: GGX distribution, Schlick Fresnel, Smith masking.
    CookTorrance {
        albedo: Color,
        metal: bool,
        roughness: f32,
    },
}

impl Material {
    pub fn solid_color(color: Color) -> Self {
        Material::SolidColor { color }
    }

    pub fn lambert(color: Color, reflectance: f32) -> Self {
        Material::Lambert { color, reflectance }
    }

    pub fn lambert_phong(color: Color, kd: f32, ks: f32, exponent: f32) -> Self {
        Material::LambertPhong {
            color,
            kd,
            ks,
            exponent,
        }
    }

    /// Cook-Torrance material. Roughness is clamped to `[MIN_ROUGHNESS, 1]`.
    pub fn cook_torrance(albedo: Color, metal: bool, roughness: f32) -> Self {
        Material::CookTorrance {
            albedo,
            metal,
            roughness: roughness.clamp(MIN_ROUGHNESS, 1.0),
        }
    }

    /// Reflected color for one light sample.
    ///
    /// `to_light` is the unit direction from the hit point toward the light
    /// and `view_dir` the direction the primary ray traveled (camera to
    /// surface). Neither the light radiance nor the cosine term is applied.
    pub fn shade(&self, hit: &HitRecord, to_light: Vec3, view_dir: Vec3) -> Color {
        let n = hit.normal;
        let l = to_light;
        let v = -view_dir;

        match *self {
            Material::SolidColor { color } => color,
            Material::Lambert { color, reflectance } => brdf::lambert(reflectance, color),
            Material::LambertPhong {
                color,
                kd,
                ks,
                exponent,
            } => brdf::lambert(kd, color) + brdf::phong(ks, exponent, l, v, n),
            Material::CookTorrance {
                albedo,
                metal,
                roughness,
            } => cook_torrance(albedo, metal, roughness, n, l, v),
        }
    }
}

fn cook_torrance(albedo: Color, metal: bool, roughness: f32, n: Vec3, l: Vec3, v: Vec3) -> Color {
    let f0 = if metal {
        albedo
    } else {
        Color::splat(DIELECTRIC_F0)
    };

    let h = (l + v).normalize_or_zero();
    let f = brdf::fresnel_schlick(h, v, f0);
    let d = brdf::normal_distribution_ggx(n, h, roughness);
    let g = brdf::geometry_smith(n, v, l, roughness);

    let denom = 4.0 * n.dot(v).max(0.0) * n.dot(l).max(0.0);
    let specular = if denom > 0.0 {
        f * (d * g / denom)
    } else {
        Color::ZERO
    };

    // Conductors have no diffuse lobe; dielectrics keep what Fresnel didn't reflect
    let kd = if metal { Color::ZERO } else { Color::ONE - f };
    brdf::lambert_color(kd, albedo) + specular
}

impl From<&MaterialDesc> for Material {
    fn from(desc: &MaterialDesc) -> Self {
        match *desc {
            MaterialDesc::SolidColor { color } => Material::solid_color(color),
            MaterialDesc::Lambert { color, reflectance } => Material::lambert(color, reflectance),
            MaterialDesc::LambertPhong {
                color,
                kd,
                ks,
                exponent,
            } => Material::lambert_phong(color, kd, ks, exponent),
            MaterialDesc::CookTorrance {
                albedo,
                metal,
                roughness,
            } => Material::cook_torrance(albedo, metal, roughness),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn hit_facing_up() -> HitRecord {
        let mut rec = HitRecord::default();
        rec.set(1.0, Vec3::ZERO, Vec3::Y, 0);
        rec
    }

    #[test]
    fn test_solid_color_ignores_lighting() {
        let mat = Material::solid_color(Color::new(0.1, 0.2, 0.3));
        let rec = hit_facing_up();

        assert_eq!(mat.shade(&rec, Vec3::Y, Vec3::NEG_Y), Color::new(0.1, 0.2, 0.3));
        assert_eq!(mat.shade(&rec, Vec3::X, Vec3::Z), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_lambert_is_view_independent() {
        let mat = Material::lambert(Color::new(0.5, 0.5, 1.0), 1.0);
        let rec = hit_facing_up();
        let l = Vec3::new(0.3, 1.0, 0.0).normalize();

        let a = mat.shade(&rec, l, Vec3::NEG_Y);
        let b = mat.shade(&rec, l, Vec3::new(1.0, -1.0, 0.0).normalize());
        assert_eq!(a, b);
        assert!((a - Color::new(0.5, 0.5, 1.0) / PI).length() < 1e-6);
    }

    #[test]
    fn test_lambert_phong_adds_highlight() {
        let mat = Material::lambert_phong(Color::ONE, 1.0, 0.5, 10.0);
        let rec = hit_facing_up();
        let l = Vec3::new(1.0, 1.0, 0.0).normalize();

        // Viewer on the mirror side: the ray travels toward the surface
        let mirror_view = Vec3::new(1.0, -1.0, 0.0).normalize();
        let lit = mat.shade(&rec, l, mirror_view);
        let diffuse = brdf::lambert(1.0, Color::ONE);

        assert!((lit - (diffuse + Color::splat(0.5))).length() < 1e-4);
    }

    #[test]
    fn test_cook_torrance_metal_has_no_diffuse() {
        let rec = hit_facing_up();
        let l = Vec3::new(0.5, 1.0, 0.0).normalize();
        // Far away from the reflection direction
        let view_dir = Vec3::new(-0.9, -0.1, 0.0).normalize();

        let metal = Material::cook_torrance(Color::new(0.972, 0.960, 0.915), true, 0.1);
        let plastic = Material::cook_torrance(Color::splat(0.75), false, 0.1);

        let m = metal.shade(&rec, l, view_dir);
        let p = plastic.shade(&rec, l, view_dir);

        // The smooth metal is nearly black off-specular, the plastic keeps its diffuse
        assert!(m.max_element() < 0.05, "metal {:?}", m);
        assert!(p.min_element() > 0.15, "plastic {:?}", p);
    }

    #[test]
    fn test_cook_torrance_is_finite_at_grazing() {
        let rec = hit_facing_up();
        let mat = Material::cook_torrance(Color::ONE, true, 0.0);

        // Light below the horizon and a grazing view
        let c = mat.shade(&rec, Vec3::NEG_Y, Vec3::X);
        assert!(c.is_finite());
        let c = mat.shade(&rec, Vec3::Y, Vec3::NEG_Y);
        assert!(c.is_finite());
    }

    #[test]
    fn test_cook_torrance_roughness_is_clamped() {
        match Material::cook_torrance(Color::ONE, false, 0.0) {
            Material::CookTorrance { roughness, .. } => assert_eq!(roughness, MIN_ROUGHNESS),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_from_description() {
        let desc = MaterialDesc::CookTorrance {
            albedo: Color::splat(0.75),
            metal: false,
            roughness: 0.6,
        };
        assert_eq!(Material::from(&desc), Material::cook_torrance(Color::splat(0.75), false, 0.6));

        let desc = MaterialDesc::Lambert {
            color: Color::ONE,
            reflectance: 0.5,
        };
        assert_eq!(Material::from(&desc), Material::lambert(Color::ONE, 0.5));
    }
}
