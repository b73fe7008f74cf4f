//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::hittable::{HitRecord, Hittable};
use prism_core::CullModeDesc;
use prism_math::{Ray, Vec3};

/// Determinants below this are treated as a ray parallel to the triangle.
pub const TRIANGLE_PARALLEL_EPSILON: f32 = 1e-7;

/// Which side of a triangle is discarded by the detailed query.
///
/// The front face is the side the normal points out of.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CullMode {
    /// Discard hits where the ray arrives against the normal (`n . d < 0`)
    FrontFace,
    /// Discard hits where the ray arrives along the normal (`n . d > 0`)
    #[default]
    BackFace,
    /// Only discard exactly perpendicular incidence
    None,
}

impl CullMode {
    /// Swap front and back culling.
    ///
    /// Shadow queries run from the lit point toward the light, which reverses
    /// which side of a triangle counts as facing.
    pub fn inverted(self) -> Self {
        match self {
            CullMode::FrontFace => CullMode::BackFace,
            CullMode::BackFace => CullMode::FrontFace,
            CullMode::None => CullMode::None,
        }
    }

    /// Whether a hit with the given `normal . direction` survives this mode.
    #[inline]
    fn accepts(self, facing: f32) -> bool {
        match self {
            CullMode::FrontFace => facing >= 0.0,
            CullMode::BackFace => facing <= 0.0,
            CullMode::None => facing != 0.0,
        }
    }
}

impl From<CullModeDesc> for CullMode {
    fn from(desc: CullModeDesc) -> Self {
        match desc {
            CullModeDesc::FrontFace => CullMode::FrontFace,
            CullModeDesc::BackFace => CullMode::BackFace,
            CullModeDesc::None => CullMode::None,
        }
    }
}

/// A triangle primitive.
///
/// Meshes build these on the fly from their transformed vertex data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Vertices
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
    /// Pre-computed face normal (unit length)
    pub normal: Vec3,
    pub cull_mode: CullMode,
    pub material_index: usize,
}

impl Triangle {
    /// Create a new triangle, taking the normal from counter-clockwise winding.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, cull_mode: CullMode, material_index: usize) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        Self::with_normal(v0, v1, v2, normal, cull_mode, material_index)
    }

    /// Create a triangle with a pre-computed normal.
    pub fn with_normal(
        v0: Vec3,
        v1: Vec3,
        v2: Vec3,
        normal: Vec3,
        cull_mode: CullMode,
        material_index: usize,
    ) -> Self {
        Self {
            v0,
            v1,
            v2,
            normal,
            cull_mode,
            material_index,
        }
    }
}

/// Parametric distance and barycentric coordinates of a ray-triangle hit.
#[derive(Debug, Clone, Copy)]
struct Barycentric {
    t: f32,
    u: f32,
    v: f32,
}

/// Möller-Trumbore: solve for `t`, `u`, `v` without culling.
///
/// Rejects near-parallel rays, hits outside the triangle
/// (`u < 0 || u > 1 || v < 0 || u + v > 1`) and `t` outside `[min, max]`.
fn moller_trumbore(triangle: &Triangle, ray: &Ray) -> Option<Barycentric> {
    let v0v1 = triangle.v1 - triangle.v0;
    let v0v2 = triangle.v2 - triangle.v0;

    let pvec = ray.direction.cross(v0v2);
    let det = v0v1.dot(pvec);

    // Ray is parallel to triangle
    if det.abs() < TRIANGLE_PARALLEL_EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let tvec = ray.origin - triangle.v0;
    let u = inv_det * tvec.dot(pvec);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(v0v1);
    let v = inv_det * ray.direction.dot(qvec);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * v0v2.dot(qvec);
    if !ray.interval().contains(t) {
        return None;
    }

    Some(Barycentric { t, u, v })
}

/// Ray-triangle test with cull-mode policy.
///
/// With `ignore_hit_record` set this is the shadow variant: the cull mode is
/// inverted and `rec` is left untouched.
pub fn hit_test_triangle(
    triangle: &Triangle,
    ray: &Ray,
    rec: &mut HitRecord,
    ignore_hit_record: bool,
) -> bool {
    let Some(hit) = moller_trumbore(triangle, ray) else {
        return false;
    };

    let cull_mode = if ignore_hit_record {
        triangle.cull_mode.inverted()
    } else {
        triangle.cull_mode
    };
    if !cull_mode.accepts(triangle.normal.dot(ray.direction)) {
        return false;
    }

    if !ignore_hit_record {
        rec.set(hit.t, ray.at(hit.t), triangle.normal, triangle.material_index);
    }
    true
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, rec: &mut HitRecord) -> bool {
        hit_test_triangle(self, ray, rec, false)
    }

    fn hit_any(&self, ray: &Ray) -> bool {
        hit_test_triangle(self, ray, &mut HitRecord::default(), true)
    }
}
