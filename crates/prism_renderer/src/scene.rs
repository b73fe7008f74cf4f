//! Scene container and ray queries.
//!
//! The scene owns every primitive, light and material. Primitives refer to
//! materials by index into [`Scene::materials`], so a built scene can be
//! shared read-only across render threads.

use crate::camera::Camera;
use crate::hittable::{HitRecord, Hittable};
use crate::light::Light;
use crate::material::{Color, Material};
use crate::plane::Plane;
use crate::sphere::Sphere;
use crate::triangle_mesh::TriangleMesh;
use crate::triangle::CullMode;
use prism_core::{CameraDesc, CoreError, LightDesc, SceneDescription};
use prism_math::{Ray, Vec3};
use thiserror::Error;

/// Errors raised while building a scene from a description.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{primitive} {index} uses material {material}, but the scene only has {count} materials")]
    InvalidMaterialIndex {
        primitive: &'static str,
        index: usize,
        material: usize,
        count: usize,
    },

    #[error("sphere {index} has radius {radius}, but the radius must be positive")]
    InvalidSphereRadius { index: usize, radius: f32 },

    #[error("camera forward {forward} is not a usable direction")]
    InvalidCameraForward { forward: Vec3 },
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub name: String,
    camera: Camera,
    materials: Vec<Material>,
    spheres: Vec<Sphere>,
    planes: Vec<Plane>,
    meshes: Vec<TriangleMesh>,
    lights: Vec<Light>,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build a scene from a parsed description, loading any OBJ meshes it names.
    pub fn from_description(desc: &SceneDescription) -> Result<Self, SceneError> {
        let mut scene = Scene::new(desc.name.clone());
        check_camera(&desc.camera)?;
        scene.camera = Camera::from(&desc.camera);

        for material in &desc.materials {
            scene.add_material(Material::from(material));
        }
        let count = scene.materials.len();

        for (index, sphere) in desc.spheres.iter().enumerate() {
            check_material_index("sphere", index, sphere.material, count)?;
            if !(sphere.radius.is_finite() && sphere.radius > 0.0) {
                return Err(SceneError::InvalidSphereRadius {
                    index,
                    radius: sphere.radius,
                });
            }
            scene.add_sphere(sphere.center, sphere.radius, sphere.material);
        }

        for (index, plane) in desc.planes.iter().enumerate() {
            check_material_index("plane", index, plane.material, count)?;
            scene.add_plane(plane.origin, plane.normal, plane.material);
        }

        for (index, mesh_desc) in desc.meshes.iter().enumerate() {
            check_material_index("mesh", index, mesh_desc.material, count)?;
            let mesh = mesh_desc.load_mesh(desc)?;

            let mut triangle_mesh =
                TriangleMesh::from_mesh(&mesh, CullMode::from(mesh_desc.cull_mode), mesh_desc.material);
            triangle_mesh.set_transform(mesh_desc.transform());
            scene.meshes.push(triangle_mesh);
        }

        for light in &desc.lights {
            match *light {
                LightDesc::Point {
                    origin,
                    intensity,
                    color,
                } => scene.add_point_light(origin, intensity, color),
                LightDesc::Directional {
                    direction,
                    intensity,
                    color,
                } => scene.add_directional_light(direction, intensity, color),
            };
        }

        log::info!(
            "Built scene '{}': {} spheres, {} planes, {} meshes ({} triangles), {} lights, {} materials",
            scene.name,
            scene.spheres.len(),
            scene.planes.len(),
            scene.meshes.len(),
            scene.triangle_count(),
            scene.lights.len(),
            scene.materials.len()
        );

        Ok(scene)
    }

    /// Add a material and return its index.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Panics if `material_index` does not name an existing material.
    pub fn add_sphere(&mut self, center: Vec3, radius: f32, material_index: usize) -> &mut Sphere {
        self.assert_material_index(material_index);
        self.spheres.push(Sphere::new(center, radius, material_index));
        let last = self.spheres.len() - 1;
        &mut self.spheres[last]
    }

    /// Panics if `material_index` does not name an existing material.
    pub fn add_plane(&mut self, origin: Vec3, normal: Vec3, material_index: usize) -> &mut Plane {
        self.assert_material_index(material_index);
        self.planes.push(Plane::new(origin, normal, material_index));
        let last = self.planes.len() - 1;
        &mut self.planes[last]
    }

    /// Add an empty mesh to be filled through the returned reference.
    ///
    /// Panics if `material_index` does not name an existing material.
    pub fn add_triangle_mesh(&mut self, cull_mode: CullMode, material_index: usize) -> &mut TriangleMesh {
        self.assert_material_index(material_index);
        self.meshes.push(TriangleMesh::new(cull_mode, material_index));
        let last = self.meshes.len() - 1;
        &mut self.meshes[last]
    }

    pub fn add_point_light(&mut self, origin: Vec3, intensity: f32, color: Color) -> &mut Light {
        self.lights.push(Light::point(origin, intensity, color));
        let last = self.lights.len() - 1;
        &mut self.lights[last]
    }

    pub fn add_directional_light(&mut self, direction: Vec3, intensity: f32, color: Color) -> &mut Light {
        self.lights.push(Light::directional(direction, intensity, color));
        let last = self.lights.len() - 1;
        &mut self.lights[last]
    }

    fn assert_material_index(&self, material_index: usize) {
        assert!(
            material_index < self.materials.len(),
            "material index {} out of range ({} materials)",
            material_index,
            self.materials.len()
        );
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn meshes(&self) -> &[TriangleMesh] {
        &self.meshes
    }

    /// Total number of triangles across all meshes.
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(TriangleMesh::triangle_count).sum()
    }

    /// Nearest intersection along `ray`, or a record with `did_hit == false`.
    ///
    /// Every primitive is tested; the working copy of the ray is shortened
    /// to each new closest hit so farther candidates are rejected early.
    pub fn get_closest_hit(&self, ray: &Ray) -> HitRecord {
        let mut rec = HitRecord::default();
        let mut ray = *ray;

        closest_hit_in(&self.spheres, &mut ray, &mut rec);
        closest_hit_in(&self.planes, &mut ray, &mut rec);
        closest_hit_in(&self.meshes, &mut ray, &mut rec);

        rec
    }

    /// Whether anything intersects `ray` within `[ray.min, ray.max]`.
    pub fn does_hit(&self, ray: &Ray) -> bool {
        any_hit_in(&self.spheres, ray) || any_hit_in(&self.planes, ray) || any_hit_in(&self.meshes, ray)
    }
}

fn check_material_index(
    primitive: &'static str,
    index: usize,
    material: usize,
    count: usize,
) -> Result<(), SceneError> {
    if material < count {
        Ok(())
    } else {
        Err(SceneError::InvalidMaterialIndex {
            primitive,
            index,
            material,
            count,
        })
    }
}

/// `forward` is only read when no pitch or yaw is given.
fn check_camera(camera: &CameraDesc) -> Result<(), SceneError> {
    let uses_forward = camera.pitch == 0.0 && camera.yaw == 0.0;
    if uses_forward && camera.forward.try_normalize().is_none() {
        return Err(SceneError::InvalidCameraForward {
            forward: camera.forward,
        });
    }
    Ok(())
}

fn closest_hit_in<T: Hittable>(objects: &[T], ray: &mut Ray, rec: &mut HitRecord) {
    for object in objects {
        if object.hit(ray, rec) {
            ray.max = rec.t;
        }
    }
}

fn any_hit_in<T: Hittable>(objects: &[T], ray: &Ray) -> bool {
    objects.iter().any(|object| object.hit_any(ray))
}
