//! Mesh ingestion for Prism.
//!
//! A `Mesh` is the object-space triangle soup the renderer consumes:
//! vertex positions, index triples and exactly one unit normal per
//! triangle, in index order. Meshes can be built in code or loaded
//! from OBJ files.

use std::path::Path;

use prism_math::Vec3;

use crate::error::{CoreError, Result};

/// An indexed triangle mesh with flat (per-triangle) normals.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Face normals, one per triangle
    pub normals: Vec<Vec3>,
}

impl Mesh {
    /// Create a mesh from positions and index triples.
    ///
    /// When `normals` is `None` the face normals are computed from the
    /// winding order (`v0v1 x v0v2`). Supplied normals must hold exactly one
    /// entry per triangle and are re-normalized.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, normals: Option<Vec<Vec3>>) -> Result<Self> {
        Self::validate_indices(&positions, &indices)?;

        let triangle_count = indices.len() / 3;
        let normals = match normals {
            Some(normals) if normals.len() != triangle_count => {
                return Err(CoreError::NormalCount {
                    expected: triangle_count,
                    found: normals.len(),
                });
            }
            Some(normals) => normals.into_iter().map(|n| n.normalize_or_zero()).collect(),
            None => compute_face_normals(&positions, &indices),
        };

        Ok(Self {
            positions,
            indices,
            normals,
        })
    }

    /// Check the index buffer against the vertex buffer.
    fn validate_indices(positions: &[Vec3], indices: &[u32]) -> Result<()> {
        if indices.len() % 3 != 0 {
            return Err(CoreError::IndexCount(indices.len()));
        }

        let vertex_count = positions.len();
        for (i, &index) in indices.iter().enumerate() {
            if index as usize >= vertex_count {
                return Err(CoreError::IndexOutOfRange {
                    triangle: i / 3,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Check if the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Compute one unit normal per triangle from counter-clockwise winding.
///
/// Degenerate triangles get a zero normal, which no ray can ever hit.
pub fn compute_face_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    indices
        .chunks_exact(3)
        .enumerate()
        .map(|(i, face)| {
            let p0 = positions[face[0] as usize];
            let p1 = positions[face[1] as usize];
            let p2 = positions[face[2] as usize];

            let normal = (p1 - p0).cross(p2 - p0).normalize_or_zero();
            if normal == Vec3::ZERO {
                log::warn!("Triangle {} is degenerate, it will never be hit", i);
            }
            normal
        })
        .collect()
}

/// Load an OBJ file into a single mesh.
///
/// Faces are triangulated and every model in the file is merged into one
/// index space. Vertex normals stored in the file are ignored in favour of
/// face normals.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        },
    )
    .map_err(|source| CoreError::Obj {
        path: path.to_path_buf(),
        source,
    })?;

    if models.is_empty() {
        return Err(CoreError::EmptyObj(path.to_path_buf()));
    }

    let mut positions = Vec::new();
    let mut indices = Vec::new();

    for model in &models {
        let base = positions.len() as u32;
        positions.extend(
            model
                .mesh
                .positions
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0], p[1], p[2])),
        );
        indices.extend(model.mesh.indices.iter().map(|i| base + i));
    }

    let mesh = Mesh::new(positions, indices, None)?;
    log::info!(
        "Loaded {:?}: {} models, {} vertices, {} triangles",
        path,
        models.len(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}
