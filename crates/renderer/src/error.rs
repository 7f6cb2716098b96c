//! Errors raised while constructing or driving GPU resources.

use std::path::PathBuf;

use asset::ObjError;
use thiserror::Error;

use crate::resource::ResourceKind;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("{kind:?} does not support `{op}`")]
    Unsupported { kind: ResourceKind, op: &'static str },

    #[error("{kind:?} has no attribute named '{name}'")]
    UnknownAttribute { kind: ResourceKind, name: String },

    #[error("attribute '{name}' expects {expected}, got {found}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("shader program '{label}' failed to build: {message}")]
    Shader { label: String, message: String },

    #[error("failed to load mesh {}", path.display())]
    Mesh {
        path: PathBuf,
        #[source]
        source: ObjError,
    },

    #[error("mesh '{label}' has no triangles to draw")]
    EmptyMesh { label: String },

    #[error("failed to load texture {}: {message}", path.display())]
    Texture { path: PathBuf, message: String },

    #[error("texture '{label}' has inconsistent dimensions or data")]
    InvalidTexture { label: String },

    #[error("{count} textures requested, at most {max} supported")]
    TooManyTextures { count: usize, max: usize },
}
