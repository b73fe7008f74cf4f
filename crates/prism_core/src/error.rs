//! Error types for scene data loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while ingesting meshes or scene descriptions.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse OBJ file {path}: {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("OBJ file {0} contains no models")]
    EmptyObj(PathBuf),

    #[error("invalid scene description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("index count {0} is not a multiple of 3")]
    IndexCount(usize),

    #[error("triangle {triangle} references vertex {index}, but only {vertex_count} vertices exist")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("expected {expected} triangle normals, found {found}")]
    NormalCount { expected: usize, found: usize },
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
