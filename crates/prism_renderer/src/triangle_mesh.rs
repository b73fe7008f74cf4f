//! Triangle meshes with a cached world-space copy.
//!
//! A mesh keeps its object-space vertex data untouched and stores the
//! transformed positions, normals and bounding box next to it. Every change
//! to the transform recomputes that cache, so ray queries never pay for the
//! transform.

use crate::hittable::{HitRecord, Hittable};
use crate::triangle::{hit_test_triangle, CullMode, Triangle};
use prism_core::{Mesh, Transform};
use prism_math::{Aabb, Mat4Ext, Quat, Ray, Vec3};

/// An indexed triangle mesh with flat normals.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    // Object space
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,

    pub cull_mode: CullMode,
    pub material_index: usize,

    transform: Transform,

    // World space cache, rebuilt by update_transforms()
    transformed_positions: Vec<Vec3>,
    transformed_normals: Vec<Vec3>,
    transformed_bounds: Aabb,
}

impl TriangleMesh {
    /// Create an empty mesh. Triangles are added with [`append_triangle`].
    ///
    /// [`append_triangle`]: TriangleMesh::append_triangle
    pub fn new(cull_mode: CullMode, material_index: usize) -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            cull_mode,
            material_index,
            transform: Transform::default(),
            transformed_positions: Vec::new(),
            transformed_normals: Vec::new(),
            transformed_bounds: Aabb::EMPTY,
        }
    }

    /// Build a mesh from ingested data. The cache is filled immediately.
    pub fn from_mesh(mesh: &Mesh, cull_mode: CullMode, material_index: usize) -> Self {
        let mut triangle_mesh = Self {
            positions: mesh.positions.clone(),
            normals: mesh.normals.clone(),
            indices: mesh.indices.clone(),
            ..Self::new(cull_mode, material_index)
        };
        triangle_mesh.update_transforms();
        triangle_mesh
    }

    /// Append a triangle in object space.
    ///
    /// Each call adds three fresh vertices. When appending many triangles,
    /// pass `ignore_transform_update = true` and call [`update_transforms`]
    /// once at the end.
    ///
    /// [`update_transforms`]: TriangleMesh::update_transforms
    pub fn append_triangle(&mut self, triangle: &Triangle, ignore_transform_update: bool) {
        let start = self.positions.len() as u32;

        self.positions.extend([triangle.v0, triangle.v1, triangle.v2]);
        self.indices.extend([start, start + 1, start + 2]);
        self.normals.push(triangle.normal);

        if !ignore_transform_update {
            self.update_transforms();
        }
    }

    /// Set the translation component. Does not accumulate.
    pub fn translate(&mut self, translation: Vec3) {
        self.transform.translation = translation;
        self.update_transforms();
    }

    /// Set the rotation to `yaw` radians around the Y axis. Does not accumulate.
    pub fn rotate_y(&mut self, yaw: f32) {
        self.transform.rotation = Quat::from_rotation_y(yaw);
        self.update_transforms();
    }

    /// Set the scale component. Does not accumulate.
    pub fn scale(&mut self, scale: Vec3) {
        self.transform.scale = scale;
        self.update_transforms();
    }

    /// Replace the whole object-to-world transform.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.update_transforms();
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Recompute the world-space positions, normals and bounding box.
    ///
    /// Positions go through the full scale-rotate-translate matrix, normals
    /// through its inverse-transpose, and the box is the bound of the
    /// transformed object-space box corners.
    pub fn update_transforms(&mut self) {
        let matrix = self.transform.to_matrix();

        self.transformed_positions.clear();
        self.transformed_positions
            .extend(self.positions.iter().map(|&p| matrix.transform_point3(p)));

        self.transformed_normals.clear();
        self.transformed_normals
            .extend(self.normals.iter().map(|&n| matrix.transform_normal(n)));

        let object_bounds = Aabb::from_point_cloud(&self.positions);
        self.transformed_bounds = matrix.transform_aabb(&object_bounds);
    }

    /// Number of triangles (index triples).
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// World-space bounding box of the mesh.
    pub fn transformed_bounds(&self) -> &Aabb {
        &self.transformed_bounds
    }

    /// World-space normals, one per triangle.
    pub fn transformed_normals(&self) -> &[Vec3] {
        &self.transformed_normals
    }

    /// Build the world-space triangle at `index`.
    ///
    /// Panics if `index >= triangle_count()`.
    pub fn triangle(&self, index: usize) -> Triangle {
        let base = index * 3;
        let v0 = self.transformed_positions[self.indices[base] as usize];
        let v1 = self.transformed_positions[self.indices[base + 1] as usize];
        let v2 = self.transformed_positions[self.indices[base + 2] as usize];

        Triangle::with_normal(
            v0,
            v1,
            v2,
            self.transformed_normals[index],
            self.cull_mode,
            self.material_index,
        )
    }
}

/// Ray-mesh test: slab test on the world box, then a linear triangle scan.
///
/// The detailed query narrows its own copy of the ray as closer triangles are
/// found; the shadow query returns at the first hit.
pub fn hit_test_triangle_mesh(
    mesh: &TriangleMesh,
    ray: &Ray,
    rec: &mut HitRecord,
    ignore_hit_record: bool,
) -> bool {
    hit_test_triangle_mesh_with(mesh, ray, rec, ignore_hit_record, hit_test_triangle)
}

fn hit_test_triangle_mesh_with<F>(
    mesh: &TriangleMesh,
    ray: &Ray,
    rec: &mut HitRecord,
    ignore_hit_record: bool,
    mut triangle_test: F,
) -> bool
where
    F: FnMut(&Triangle, &Ray, &mut HitRecord, bool) -> bool,
{
    // An empty mesh has an empty box; skip it before touching the slabs
    if mesh.is_empty() || !mesh.transformed_bounds.hit(ray) {
        return false;
    }

    let mut ray = *ray;
    let mut hit_anything = false;

    for index in 0..mesh.triangle_count() {
        let triangle = mesh.triangle(index);
        if !triangle_test(&triangle, &ray, rec, ignore_hit_record) {
            continue;
        }
        if ignore_hit_record {
            return true;
        }
        hit_anything = true;
        ray.max = rec.t;
    }

    hit_anything
}

impl Hittable for TriangleMesh {
    fn hit(&self, ray: &Ray, rec: &mut HitRecord) -> bool {
        hit_test_triangle_mesh(self, ray, rec, false)
    }

    fn hit_any(&self, ray: &Ray) -> bool {
        hit_test_triangle_mesh(self, ray, &mut HitRecord::default(), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    /// Unit quad in the z=0 plane, facing -Z, two triangles.
    fn quad(cull_mode: CullMode) -> TriangleMesh {
        let mesh = Mesh::new(
            vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
            None,
        )
        .unwrap();
        TriangleMesh::from_mesh(&mesh, cull_mode, 0)
    }

    #[test]
    fn test_from_mesh_fills_cache() {
        let mesh = quad(CullMode::BackFace);

        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.transformed_normals().len(), 2);
        assert!((mesh.transformed_normals()[0] - Vec3::NEG_Z).length() < 0.001);
        assert!(!mesh.transformed_bounds().is_empty());
    }

    #[test]
    fn test_mesh_hit_closest_triangle() {
        let mut mesh = TriangleMesh::new(CullMode::None, 3);
        let far = Triangle::new(
            Vec3::new(-1.0, -1.0, 5.0),
            Vec3::new(0.0, 1.0, 5.0),
            Vec3::new(1.0, -1.0, 5.0),
            CullMode::None,
            0,
        );
        let near = Triangle::new(
            Vec3::new(-1.0, -1.0, 2.0),
            Vec3::new(0.0, 1.0, 2.0),
            Vec3::new(1.0, -1.0, 2.0),
            CullMode::None,
            0,
        );
        // Far one first so the scan has to replace it
        mesh.append_triangle(&far, true);
        mesh.append_triangle(&near, false);

        let mut rec = HitRecord::default();
        assert!(mesh.hit(&Ray::new(Vec3::ZERO, Vec3::Z), &mut rec));
        assert!((rec.t - 2.0).abs() < 0.001);
        assert_eq!(rec.material_index, 3);
    }

    #[test]
    fn test_translate_moves_hits_and_bounds() {
        let mut mesh = quad(CullMode::BackFace);
        mesh.translate(Vec3::new(0.0, 0.0, 4.0));

        let mut rec = HitRecord::default();
        assert!(mesh.hit(&Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::Z), &mut rec));
        assert!((rec.t - 5.0).abs() < 0.001);
        assert!((mesh.transformed_bounds().z.min - 4.0).abs() < 0.01);

        // Setting the translation again replaces it
        mesh.translate(Vec3::new(0.0, 0.0, 1.0));
        let mut rec = HitRecord::default();
        assert!(mesh.hit(&Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::Z), &mut rec));
        assert!((rec.t - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_rotate_y_turns_normals() {
        let mut mesh = quad(CullMode::None);
        mesh.rotate_y(FRAC_PI_2);

        // -Z rotated a quarter turn around Y becomes -X
        for normal in mesh.transformed_normals() {
            assert!((*normal - Vec3::NEG_X).length() < 0.001);
        }
        assert!(mesh.hit_any(&Ray::new(Vec3::new(-3.0, 0.0, 0.0), Vec3::X)));
        assert!(!mesh.hit_any(&Ray::new(Vec3::new(0.0, 0.0, -3.0), Vec3::Z)));
    }

    #[test]
    fn test_scale_keeps_unit_normals() {
        let mut mesh = quad(CullMode::None);
        mesh.scale(Vec3::new(3.0, 0.5, 2.0));

        for normal in mesh.transformed_normals() {
            assert!((normal.length() - 1.0).abs() < 0.001);
        }
        assert!((mesh.transformed_bounds().x.max - 3.0).abs() < 0.01);
    }

    #[test]
    fn test_empty_mesh_never_hits() {
        let mesh = TriangleMesh::new(CullMode::None, 0);
        let mut rec = HitRecord::default();

        assert!(mesh.transformed_bounds().is_empty());
        assert!(!mesh.hit(&Ray::new(Vec3::ZERO, Vec3::Z), &mut rec));
        assert!(!mesh.hit_any(&Ray::new(Vec3::ZERO, Vec3::Z)));
    }

    #[test]
    fn test_slab_miss_skips_triangle_tests() {
        let mut mesh = quad(CullMode::None);
        mesh.translate(Vec3::new(0.0, 0.0, 5.0));

        // Parallel to the box in z but offset on a single axis (y)
        let ray = Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::Z);
        let mut calls = 0;
        let hit = hit_test_triangle_mesh_with(&mesh, &ray, &mut HitRecord::default(), false, |t, r, rec, i| {
            calls += 1;
            hit_test_triangle(t, r, rec, i)
        });

        assert!(!hit);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_slab_hit_scans_every_triangle() {
        let mesh = quad(CullMode::None);
        let ray = Ray::new(Vec3::new(0.5, -0.5, -2.0), Vec3::Z);

        let mut calls = 0;
        let hit = hit_test_triangle_mesh_with(&mesh, &ray, &mut HitRecord::default(), false, |t, r, rec, i| {
            calls += 1;
            hit_test_triangle(t, r, rec, i)
        });
        assert!(hit);
        assert_eq!(calls, 2);

        // The shadow query stops at the first hit
        let mut calls = 0;
        let hit = hit_test_triangle_mesh_with(&mesh, &ray, &mut HitRecord::default(), true, |_, _, _, _| {
            calls += 1;
            true
        });
        assert!(hit);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_mesh_respects_cull_mode() {
        // Ray travels along +Z, against the -Z normals
        let ray = Ray::new(Vec3::new(0.2, 0.2, -2.0), Vec3::Z);

        assert!(quad(CullMode::BackFace).hit(&ray, &mut HitRecord::default()));
        assert!(!quad(CullMode::FrontFace).hit(&ray, &mut HitRecord::default()));

        // Shadow query inverts it
        assert!(!quad(CullMode::BackFace).hit_any(&ray));
        assert!(quad(CullMode::FrontFace).hit_any(&ray));
    }
}
