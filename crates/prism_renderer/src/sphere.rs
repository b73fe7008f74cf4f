//! Sphere primitive for ray tracing.

use crate::hittable::{HitRecord, Hittable};
use prism_math::{Ray, Vec3};

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material_index: usize,
}

impl Sphere {
    /// Create a new sphere. The radius must be positive.
    pub fn new(center: Vec3, radius: f32, material_index: usize) -> Self {
        debug_assert!(radius > 0.0, "sphere radius must be positive, got {radius}");
        Self {
            center,
            radius,
            material_index,
        }
    }
}

/// Analytic ray-sphere test.
///
/// Solves `a*t^2 + b*t + c = 0` and takes the smaller root in
/// `[ray.min, ray.max]`, falling back to the larger one. A zero or negative
/// discriminant is a miss. `rec` is left untouched when
/// `ignore_hit_record` is set.
pub fn hit_test_sphere(sphere: &Sphere, ray: &Ray, rec: &mut HitRecord, ignore_hit_record: bool) -> bool {
    let oc = ray.origin - sphere.center;
    let a = ray.direction.dot(ray.direction);
    let b = 2.0 * ray.direction.dot(oc);
    let c = oc.dot(oc) - sphere.radius * sphere.radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant <= 0.0 {
        return false;
    }

    let sqrtd = discriminant.sqrt();
    let range = ray.interval();

    // Find the nearest root in the acceptable range
    let mut t = (-b - sqrtd) / (2.0 * a);
    if !range.contains(t) {
        t = (-b + sqrtd) / (2.0 * a);
        if !range.contains(t) {
            return false;
        }
    }

    if !ignore_hit_record {
        let point = ray.at(t);
        let normal = (point - sphere.center) / sphere.radius;
        rec.set(t, point, normal, sphere.material_index);
    }
    true
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, rec: &mut HitRecord) -> bool {
        hit_test_sphere(self, ray, rec, false)
    }

    fn hit_any(&self, ray: &Ray) -> bool {
        hit_test_sphere(self, ray, &mut HitRecord::default(), true)
    }
}
