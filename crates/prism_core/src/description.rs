//! JSON scene descriptions.
//!
//! A description is plain data: geometry refers to materials by their index
//! in `materials`. Turning a description into something renderable (and
//! checking those indices) is the renderer's job.
//!
//! ```json
//! {
//!   "camera": { "origin": [0, 3, -9], "fov": 45 },
//!   "materials": [ { "type": "lambert", "color": [1, 1, 1] } ],
//!   "spheres": [ { "center": [0, 1, 0], "radius": 0.75, "material": 0 } ],
//!   "lights": [ { "type": "point", "origin": [0, 5, 5], "intensity": 50, "color": [1, 1, 1] } ]
//! }
//! ```

use std::path::{Path, PathBuf};

use prism_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::mesh::{load_obj, Mesh};
use crate::transform::Transform;

fn default_fov() -> f32 {
    90.0
}

fn default_one() -> f32 {
    1.0
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

fn default_forward() -> Vec3 {
    Vec3::Z
}

/// A complete scene as read from disk.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub camera: CameraDesc,

    #[serde(default)]
    pub materials: Vec<MaterialDesc>,

    #[serde(default)]
    pub spheres: Vec<SphereDesc>,

    #[serde(default)]
    pub planes: Vec<PlaneDesc>,

    #[serde(default)]
    pub meshes: Vec<MeshDesc>,

    #[serde(default)]
    pub lights: Vec<LightDesc>,

    /// Directory OBJ paths are resolved against (the scene file's folder).
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl SceneDescription {
    /// Parse a description from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a description file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut desc = Self::from_json(&json)?;
        desc.base_dir = path.parent().map(Path::to_path_buf);
        if desc.name.is_empty() {
            desc.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        Ok(desc)
    }

    /// Resolve a path from the description relative to the scene file.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Camera placement. Angles are in degrees.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CameraDesc {
    #[serde(default)]
    pub origin: Vec3,

    #[serde(default = "default_fov")]
    pub fov: f32,

    #[serde(default = "default_forward")]
    pub forward: Vec3,

    #[serde(default)]
    pub pitch: f32,

    #[serde(default)]
    pub yaw: f32,
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            fov: default_fov(),
            forward: default_forward(),
            pitch: 0.0,
            yaw: 0.0,
        }
    }
}

/// Material parameters, tagged by `type`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDesc {
    SolidColor {
        color: Vec3,
    },
    Lambert {
        color: Vec3,
        #[serde(default = "default_one")]
        reflectance: f32,
    },
    LambertPhong {
        color: Vec3,
        kd: f32,
        ks: f32,
        exponent: f32,
    },
    CookTorrance {
        albedo: Vec3,
        #[serde(default)]
        metal: bool,
        roughness: f32,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SphereDesc {
    pub center: Vec3,
    pub radius: f32,
    pub material: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaneDesc {
    pub origin: Vec3,
    pub normal: Vec3,
    pub material: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CullModeDesc {
    FrontFace,
    #[default]
    BackFace,
    None,
}

/// A triangle mesh, from an OBJ file and/or inline triangles.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MeshDesc {
    #[serde(default)]
    pub obj: Option<PathBuf>,

    /// Inline triangles, counter-clockwise winding.
    #[serde(default)]
    pub triangles: Vec<[Vec3; 3]>,

    #[serde(default)]
    pub cull_mode: CullModeDesc,

    pub material: usize,

    #[serde(default)]
    pub translation: Vec3,

    /// XYZ Euler angles in degrees.
    #[serde(default)]
    pub rotation: Vec3,

    #[serde(default = "default_scale")]
    pub scale: Vec3,
}

impl MeshDesc {
    pub fn transform(&self) -> Transform {
        Transform::from_euler_degrees(self.translation, self.rotation, self.scale)
    }

    /// Build the object-space mesh: the OBJ contents (if any) followed by
    /// the inline triangles.
    pub fn load_mesh(&self, scene: &SceneDescription) -> Result<Mesh> {
        let (mut positions, mut indices) = match &self.obj {
            Some(path) => {
                let mesh = load_obj(scene.resolve_path(path))?;
                (mesh.positions, mesh.indices)
            }
            None => (Vec::new(), Vec::new()),
        };

        for triangle in &self.triangles {
            let base = positions.len() as u32;
            positions.extend_from_slice(triangle);
            indices.extend_from_slice(&[base, base + 1, base + 2]);
        }

        Mesh::new(positions, indices, None)
    }
}

/// Light sources, tagged by `type`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightDesc {
    Point {
        origin: Vec3,
        intensity: f32,
        color: Vec3,
    },
    Directional {
        direction: Vec3,
        intensity: f32,
        color: Vec3,
    },
}
