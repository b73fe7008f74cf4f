//! Prism Renderer - CPU direct-lighting ray tracer.
//!
//! Casts one primary ray per pixel into a [`Scene`] of spheres, planes and
//! triangle meshes, and shades the closest hit with every light, optionally
//! testing each light for occlusion with a shadow ray.
//!
//! # Example
//!
//! ```ignore
//! use prism_core::SceneDescription;
//! use prism_renderer::{Renderer, Scene};
//!
//! let desc = SceneDescription::from_file("scene.json")?;
//! let scene = Scene::from_description(&desc)?;
//!
//! let mut renderer = Renderer::new(640, 480);
//! renderer.render(&scene);
//! renderer.save_buffer_to_image("frame.png")?;
//! ```

pub mod brdf;
mod camera;
mod hittable;
mod light;
mod material;
mod plane;
mod renderer;
mod scene;
mod sphere;
mod triangle;
mod triangle_mesh;

pub use camera::Camera;
pub use hittable::{HitRecord, Hittable};
pub use light::{Light, LightKind, DIRECTIONAL_LIGHT_DISTANCE};
pub use material::{Color, Material, DIELECTRIC_F0, MIN_ROUGHNESS};
pub use plane::{hit_test_plane, Plane, PLANE_PARALLEL_EPSILON};
pub use renderer::{color_to_rgb8, FrameBuffer, LightingMode, Renderer, SHADOW_EPSILON};
pub use scene::{Scene, SceneError};
pub use sphere::{hit_test_sphere, Sphere};
pub use triangle::{hit_test_triangle, CullMode, Triangle, TRIANGLE_PARALLEL_EPSILON};
pub use triangle_mesh::{hit_test_triangle_mesh, TriangleMesh};

/// Re-export Vec3 and common math types from prism_math
pub use prism_math::{Aabb, Interval, Ray, Vec3};
