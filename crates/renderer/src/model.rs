//! Textured, indexed mesh loaded from an OBJ file.

use std::path::PathBuf;

use asset::{
    FileSource, LoadOptions, MeshData,
    obj::load_obj,
    texture::{TextureData, TextureLoadOptions},
};
use wgpu::{BindGroup, Buffer, BufferUsages, IndexFormat, RenderPass, util::DeviceExt};

use crate::{
    context::GpuContext,
    error::ResourceError,
    program::Program,
    resource::{AttrValue, Resource, ResourceKind},
    texture::{GpuTexture, create_sampler},
};

/// Texture channels a model can bind (`texture1`, `texture2` in the shader).
pub const MAX_TEXTURES: usize = 2;

const TEST_TEXTURE_SIZE: u32 = 64;

/// Vertex and index buffers of one mesh.
pub struct MeshBuffers {
    vertex_buf: Buffer,
    index_buf: Buffer,
    vertex_count: u32,
    index_count: u32,
}

impl MeshBuffers {
    pub fn upload(ctx: &GpuContext, mesh: &MeshData, label: &str) -> Result<Self, ResourceError> {
        if !mesh.is_valid() {
            return Err(ResourceError::EmptyMesh {
                label: label.to_owned(),
            });
        }

        let vertex_buf = ctx
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(mesh.as_floats()),
                usage: BufferUsages::VERTEX,
            });
        let index_buf = ctx
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: BufferUsages::INDEX,
            });

        Ok(Self {
            vertex_buf,
            index_buf,
            vertex_count: mesh.vertex_count() as u32,
            index_count: mesh.index_count() as u32,
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct ModelConfig {
    pub label: String,
    pub mesh: PathBuf,
    /// Up to [`MAX_TEXTURES`] images; a checkerboard is used when empty.
    pub textures: Vec<PathBuf>,
    pub load: LoadOptions,
    pub texture_options: TextureLoadOptions,
}

pub struct Model {
    label: String,
    buffers: MeshBuffers,
    textures: Vec<GpuTexture>,
    bind_group: BindGroup,
}

impl Model {
    /// Load the mesh and its textures. Any failure means nothing is created.
    pub fn new(ctx: &GpuContext, program: &Program, config: &ModelConfig) -> Result<Self, ResourceError> {
        if config.textures.len() > MAX_TEXTURES {
            return Err(ResourceError::TooManyTextures {
                count: config.textures.len(),
                max: MAX_TEXTURES,
            });
        }

        let mesh = load_obj(&FileSource::new(&config.mesh), config.load).map_err(|source| {
            log::error!("Model '{}' construction failed: {}", config.label, source);
            ResourceError::Mesh {
                path: config.mesh.clone(),
                source,
            }
        })?;
        let buffers = MeshBuffers::upload(ctx, &mesh, &config.label)?;

        let mut textures = Vec::with_capacity(MAX_TEXTURES);
        for path in &config.textures {
            let data = TextureData::load(path, config.texture_options).map_err(|e| {
                ResourceError::Texture {
                    path: path.clone(),
                    message: format!("{e:#}"),
                }
            })?;
            textures.push(GpuTexture::new(ctx, &data, &path.display().to_string())?);
        }
        if textures.is_empty() {
            log::info!("Model '{}' has no texture, using checkerboard", config.label);
            let data = TextureData::create_test_texture(TEST_TEXTURE_SIZE);
            textures.push(GpuTexture::new(ctx, &data, "checkerboard")?);
        }

        let sampler = create_sampler(ctx);
        let first = &textures[0];
        let second = textures.get(1).unwrap_or(first);
        let bind_group = ctx.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Texture BG"),
            layout: program.texture_layout(),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(first.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(second.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Ok(Self {
            label: config.label.clone(),
            buffers,
            textures,
            bind_group,
        })
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

impl Resource for Model {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Model
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn get(&self, attr: &str) -> Option<AttrValue> {
        match attr {
            "vertices" => Some(AttrValue::Int(self.buffers.vertex_count as i32)),
            "elements" => Some(AttrValue::Int(self.buffers.index_count as i32)),
            "textures" => Some(AttrValue::Int(self.textures.len() as i32)),
            _ => None,
        }
    }

    /// Bind textures and buffers, then draw.
    fn enable(&self, pass: &mut RenderPass<'_>) -> Result<(), ResourceError> {
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.buffers.vertex_buf.slice(..));
        pass.set_index_buffer(self.buffers.index_buf.slice(..), IndexFormat::Uint32);
        pass.draw_indexed(0..self.buffers.index_count, 0, 0..1);
        Ok(())
    }
}
