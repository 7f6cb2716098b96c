//! Asset loading/parsers (meshes, textures, shaders).
//! OBJ ingestion: two passes, counts first, then exactly-sized buffers.
//! Textures: PNG/JPEG decoded to RGBA8.

pub mod assemble;
pub mod error;
pub mod mesh;
pub mod obj;
pub mod scan;
pub mod shader;
pub mod source;
pub mod texture;

pub use assemble::{AssemblyState, LoadOptions, NormalMode, VertexAssembler};
pub use error::{Attribute, ObjError, ObjErrorKind, ObjResult};
pub use mesh::{MeshData, MeshVertex};
pub use scan::ObjCounts;
pub use source::{FileSource, ObjSource, StrSource};
