//! Prism Core - renderer-agnostic scene data.
//!
//! This crate provides:
//!
//! - **Mesh ingestion**: `Mesh` with one normal per triangle, OBJ loading
//! - **Transforms**: `Transform` (translation, rotation, scale)
//! - **Scene descriptions**: the JSON scene format read by the viewer
//!
//! # Example
//!
//! ```ignore
//! use prism_core::{load_obj, SceneDescription};
//!
//! let mesh = load_obj("bunny.obj")?;
//! println!("Loaded {} triangles", mesh.triangle_count());
//!
//! let desc = SceneDescription::from_file("scene.json")?;
//! ```

pub mod description;
pub mod error;
pub mod mesh;
pub mod transform;

// Re-export commonly used types
pub use description::{
    CameraDesc, CullModeDesc, LightDesc, MaterialDesc, MeshDesc, PlaneDesc, SceneDescription,
    SphereDesc,
};
pub use error::{CoreError, Result};
pub use mesh::{load_obj, Mesh};
pub use transform::Transform;
