//! Infinite plane primitive.

use crate::hittable::{HitRecord, Hittable};
use prism_math::{Ray, Vec3};

/// Denominators below this are treated as a ray parallel to the plane.
pub const PLANE_PARALLEL_EPSILON: f32 = 1e-7;

/// An infinite plane through `origin` with a fixed unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub origin: Vec3,
    pub normal: Vec3,
    pub material_index: usize,
}

impl Plane {
    /// Create a new plane. The normal is normalized.
    pub fn new(origin: Vec3, normal: Vec3, material_index: usize) -> Self {
        Self {
            origin,
            normal: normal.normalize(),
            material_index,
        }
    }
}

/// Ray-plane test: `t = ((origin - ray.origin) . n) / (ray.direction . n)`.
///
/// Parallel rays are rejected explicitly before dividing, and the hit must
/// lie strictly inside `(ray.min, ray.max)`.
pub fn hit_test_plane(plane: &Plane, ray: &Ray, rec: &mut HitRecord, ignore_hit_record: bool) -> bool {
    let denom = ray.direction.dot(plane.normal);
    if denom.abs() < PLANE_PARALLEL_EPSILON {
        return false;
    }

    let t = (plane.origin - ray.origin).dot(plane.normal) / denom;
    if !ray.interval().surrounds(t) {
        return false;
    }

    if !ignore_hit_record {
        rec.set(t, ray.at(t), plane.normal, plane.material_index);
    }
    true
}

impl Hittable for Plane {
    fn hit(&self, ray: &Ray, rec: &mut HitRecord) -> bool {
        hit_test_plane(self, ray, rec, false)
    }

    fn hit_any(&self, ray: &Ray) -> bool {
        hit_test_plane(self, ray, &mut HitRecord::default(), true)
    }
}
