//! Hittable trait and HitRecord for ray-object intersection.

use prism_math::{Ray, Vec3};

/// Record of a ray-object intersection.
///
/// Starts out as "no hit" with `t = +inf`; intersection routines overwrite
/// it only when they find a hit inside the ray's `[min, max]` range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Whether anything was hit
    pub did_hit: bool,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// World-space point of intersection
    pub point: Vec3,
    /// Unit surface normal at the intersection
    pub normal: Vec3,
    /// Index into the scene's material list
    pub material_index: usize,
}

impl Default for HitRecord {
    fn default() -> Self {
        Self {
            did_hit: false,
            t: f32::INFINITY,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            material_index: 0,
        }
    }
}

impl HitRecord {
    /// Fill in the record for a hit.
    #[inline]
    pub(crate) fn set(&mut self, t: f32, point: Vec3, normal: Vec3, material_index: usize) {
        self.did_hit = true;
        self.t = t;
        self.point = point;
        self.normal = normal;
        self.material_index = material_index;
    }
}

/// Trait for objects that can be hit by rays.
///
/// Both queries only accept hits with `ray.min <= t <= ray.max`.
pub trait Hittable: Send + Sync {
    /// Closest-hit query. Fills in `rec` and returns true on a hit.
    fn hit(&self, ray: &Ray, rec: &mut HitRecord) -> bool;

    /// Any-hit (shadow) query. Stops at the first valid intersection.
    fn hit_any(&self, ray: &Ray) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_no_hit() {
        let rec = HitRecord::default();

        assert!(!rec.did_hit);
        assert_eq!(rec.t, f32::INFINITY);
    }

    #[test]
    fn test_set_marks_hit() {
        let mut rec = HitRecord::default();
        rec.set(2.0, Vec3::new(0.0, 0.0, 2.0), Vec3::NEG_Z, 3);

        assert!(rec.did_hit);
        assert_eq!(rec.t, 2.0);
        assert_eq!(rec.point, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(rec.material_index, 3);
    }
}
