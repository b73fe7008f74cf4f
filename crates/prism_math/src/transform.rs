// Transform utilities for Mat4
//
// glam::Mat4 already provides transform_point3(), transform_vector3() and inverse();
// these cover the cases the mesh cache needs on top of that.

use crate::Aabb;
use glam::{Mat3, Mat4, Vec3};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform a surface normal with the inverse-transpose of the upper 3x3.
    ///
    /// The result is re-normalized; non-uniform scale would otherwise skew it.
    /// A zero normal stays zero.
    fn transform_normal(&self, normal: Vec3) -> Vec3;

    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform_normal(&self, normal: Vec3) -> Vec3 {
        let normal_matrix = Mat3::from_mat4(*self).inverse().transpose();
        (normal_matrix * normal).normalize_or_zero()
    }

    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        if aabb.is_empty() {
            return Aabb::EMPTY;
        }

        let lo = aabb.min_point();
        let hi = aabb.max_point();

        let corners: Vec<Vec3> = (0..8)
            .map(|i| {
                Vec3::new(
                    if i & 1 == 0 { lo.x } else { hi.x },
                    if i & 2 == 0 { lo.y } else { hi.y },
                    if i & 4 == 0 { lo.z } else { hi.z },
                )
            })
            .map(|corner| self.transform_point3(corner))
            .collect();

        Aabb::from_point_cloud(&corners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_transform_normal_ignores_translation() {
        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        let normal = mat.transform_normal(Vec3::Y);

        assert!((normal - Vec3::Y).length() < 0.001);
    }

    #[test]
    fn test_transform_normal_rotation() {
        // 90 degree rotation around Z axis
        let mat = Mat4::from_rotation_z(PI / 2.0);
        let normal = mat.transform_normal(Vec3::X);

        assert!((normal - Vec3::Y).length() < 0.001);
    }

    #[test]
    fn test_transform_normal_non_uniform_scale() {
        // Plane x + y = 0 squashed along x: the normal must stay perpendicular
        let mat = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let normal = mat.transform_normal(Vec3::new(1.0, 1.0, 0.0).normalize());
        let tangent = mat.transform_vector3(Vec3::new(1.0, -1.0, 0.0));

        assert!(normal.dot(tangent).abs() < 0.001);
        assert!((normal.length() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_transform_aabb_translation() {
        let mat = Mat4::from_translation(Vec3::new(5.0, 5.0, 5.0));
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let transformed = mat.transform_aabb(&aabb);

        assert!((transformed.min_point() - Vec3::splat(5.0)).length() < 0.001);
        assert!((transformed.max_point() - Vec3::splat(6.0)).length() < 0.001);
    }

    #[test]
    fn test_transform_aabb_rotation() {
        let mat = Mat4::from_rotation_y(PI / 2.0);
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        let transformed = mat.transform_aabb(&aabb);

        // X extent rotates onto Z
        assert!((transformed.z.size() - 2.0).abs() < 0.001);
        assert!((transformed.x.size() - 1.0).abs() < 0.001);
    }
}
