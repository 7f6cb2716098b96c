//! Renderer: explicit GPU context plus the resources drawn with it
//! (shader program, textures, OBJ models).
//! wgpu = 26.x, winit = 0.30.x

pub mod context;
pub mod error;
pub mod frame;
pub mod model;
pub mod program;
pub mod resource;
pub mod texture;

pub use context::{GpuContext, GpuInit};
pub use error::ResourceError;
pub use frame::Frame;
pub use model::{MAX_TEXTURES, MeshBuffers, Model, ModelConfig};
pub use program::{DEFAULT_SHADER, Program, ProgramConfig, UniformBlock};
pub use resource::{AttrValue, Resource, ResourceKind, destroy_all, enable_all};
pub use texture::GpuTexture;
