//! OBJ loading: a counting pass followed by an assembling pass over the same source.

use std::path::Path;

use crate::{
    assemble::{LoadOptions, assemble_obj},
    error::ObjResult,
    mesh::MeshData,
    scan::scan_obj,
    source::{FileSource, ObjSource, StrSource},
};

/// Load a triangulated OBJ mesh into single-index vertex/index buffers.
pub fn load_obj<S: ObjSource>(source: &S, options: LoadOptions) -> ObjResult<MeshData> {
    let counts = scan_obj(source)?;
    let mesh = assemble_obj(source, counts, options)?;
    log::info!(
        "Loaded mesh '{}': {} vertices, {} triangles",
        source.name(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Load an OBJ mesh from a file path with default options.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> ObjResult<MeshData> {
    load_obj(&FileSource::new(path), LoadOptions::default())
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> ObjResult<MeshData> {
    load_obj(&StrSource::new(contents), LoadOptions::default())
}
