//! Shader program: WGSL module, pipeline and named uniforms.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::{
    BindGroup, BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType,
    BlendState, Buffer, BufferBindingType, BufferUsages, ColorTargetState, ColorWrites,
    DepthBiasState, DepthStencilState, FragmentState, PipelineLayoutDescriptor, RenderPass,
    RenderPipeline, RenderPipelineDescriptor, SamplerBindingType, ShaderModuleDescriptor,
    ShaderSource, ShaderStages, TextureSampleType, TextureViewDimension, VertexAttribute,
    VertexBufferLayout, VertexState, VertexStepMode, util::DeviceExt,
};

use asset::MeshVertex;

use crate::{
    context::{DEPTH_FORMAT, GpuContext},
    error::ResourceError,
    resource::{AttrValue, Resource, ResourceKind},
};

/// Built-in shader matching [`UniformBlock`] and the interleaved vertex layout.
pub const DEFAULT_SHADER: &str = include_str!("shaders/model.wgsl");

const VERTEX_ATTRIBUTES: [VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

/// `[x,y,z | nx,ny,nz | u,v]`, 32 bytes per vertex.
pub fn vertex_layout() -> VertexBufferLayout<'static> {
    VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshVertex>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

#[derive(Clone, Debug)]
pub struct ProgramConfig {
    pub label: String,
    /// WGSL source with `vs_main` and `fs_main` entry points.
    pub source: String,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            label: "model".to_owned(),
            source: DEFAULT_SHADER.to_owned(),
        }
    }
}

/// GPU layout of the uniform block (16-byte aligned).
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct UniformsRaw {
    projection: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    mix: f32,
    texture_count: i32,
    _pad: [u32; 2],
}

/// CPU copy of the program uniforms, addressed by name.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformBlock {
    pub projection: Mat4,
    pub view: Mat4,
    pub model: Mat4,
    pub mix: f32,
    pub texture_count: i32,
}

impl Default for UniformBlock {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            model: Mat4::IDENTITY,
            mix: 0.0,
            texture_count: 1,
        }
    }
}

impl UniformBlock {
    pub const NAMES: [&'static str; 5] = ["projection", "view", "model", "mix", "texture_count"];

    pub fn get(&self, name: &str) -> Option<AttrValue> {
        match name {
            "projection" => Some(AttrValue::Mat4(self.projection)),
            "view" => Some(AttrValue::Mat4(self.view)),
            "model" => Some(AttrValue::Mat4(self.model)),
            "mix" => Some(AttrValue::Float(self.mix)),
            "texture_count" => Some(AttrValue::Int(self.texture_count)),
            _ => None,
        }
    }

    pub fn set(&mut self, name: &str, value: AttrValue) -> Result<(), ResourceError> {
        let mismatch = |expected| ResourceError::TypeMismatch {
            name: name.to_owned(),
            expected,
            found: value.type_name(),
        };
        match name {
            "projection" | "view" | "model" => {
                let AttrValue::Mat4(m) = value else {
                    return Err(mismatch("mat4"));
                };
                match name {
                    "projection" => self.projection = m,
                    "view" => self.view = m,
                    _ => self.model = m,
                }
            }
            "mix" => {
                let AttrValue::Float(f) = value else {
                    return Err(mismatch("float"));
                };
                self.mix = f;
            }
            "texture_count" => {
                self.texture_count = value.as_int().ok_or_else(|| mismatch("int"))?;
            }
            _ => {
                return Err(ResourceError::UnknownAttribute {
                    kind: ResourceKind::Program,
                    name: name.to_owned(),
                });
            }
        }
        Ok(())
    }

    fn raw(&self) -> UniformsRaw {
        UniformsRaw {
            projection: self.projection.to_cols_array_2d(),
            view: self.view.to_cols_array_2d(),
            model: self.model.to_cols_array_2d(),
            mix: self.mix,
            texture_count: self.texture_count,
            _pad: [0; 2],
        }
    }
}

pub struct Program {
    label: String,
    pipeline: RenderPipeline,
    uniforms: UniformBlock,
    uniform_buf: Buffer,
    uniform_bg: BindGroup,
    texture_bgl: BindGroupLayout,
}

impl Program {
    /// Compile the shader and build the pipeline. Shader and pipeline
    /// validation errors are returned rather than raised by the device.
    pub fn new(ctx: &GpuContext, config: &ProgramConfig) -> Result<Self, ResourceError> {
        let device = ctx.device();
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some(&config.label),
            source: ShaderSource::Wgsl(config.source.as_str().into()),
        });

        let uniform_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Uniform BGL"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX_FRAGMENT,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<UniformsRaw>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let texture_entry = |binding| BindGroupLayoutEntry {
            binding,
            visibility: ShaderStages::FRAGMENT,
            ty: BindingType::Texture {
                sample_type: TextureSampleType::Float { filterable: true },
                view_dimension: TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let texture_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Texture BGL"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                BindGroupLayoutEntry {
                    binding: 2,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let uniforms = UniformBlock::default();
        let uniform_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform UBO"),
            contents: bytemuck::bytes_of(&uniforms.raw()),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let uniform_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform BG"),
            layout: &uniform_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buf.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Program PipelineLayout"),
            bind_group_layouts: &[&uniform_bgl, &texture_bgl],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(&config.label),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(ColorTargetState {
                    format: ctx.surface_format(),
                    blend: Some(BlendState::REPLACE),
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            log::error!("Program '{}' failed to build: {}", config.label, err);
            return Err(ResourceError::Shader {
                label: config.label.clone(),
                message: err.to_string(),
            });
        }

        log::info!("Program '{}' ready", config.label);
        Ok(Self {
            label: config.label.clone(),
            pipeline,
            uniforms,
            uniform_buf,
            uniform_bg,
            texture_bgl,
        })
    }

    /// Layout models use for their texture bind group (group 1).
    pub fn texture_layout(&self) -> &BindGroupLayout {
        &self.texture_bgl
    }
}

impl Resource for Program {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Program
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn get(&self, attr: &str) -> Option<AttrValue> {
        self.uniforms.get(attr)
    }

    fn set(&mut self, ctx: &GpuContext, attr: &str, value: AttrValue) -> Result<(), ResourceError> {
        if let Err(e) = self.uniforms.set(attr, value) {
            log::error!("Program '{}': {}", self.label, e);
            return Err(e);
        }
        ctx.queue()
            .write_buffer(&self.uniform_buf, 0, bytemuck::bytes_of(&self.uniforms.raw()));
        Ok(())
    }

    fn enable(&self, pass: &mut RenderPass<'_>) -> Result<(), ResourceError> {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bg, &[]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_raw_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<UniformsRaw>() % 16, 0);
        assert_eq!(std::mem::size_of::<UniformsRaw>(), 3 * 64 + 16);
    }

    #[test]
    fn set_and_get_by_name() {
        let mut u = UniformBlock::default();
        let m = Mat4::from_rotation_y(0.5);
        u.set("model", AttrValue::Mat4(m)).unwrap();
        u.set("mix", AttrValue::Float(0.2)).unwrap();
        u.set("texture_count", AttrValue::Bool(true)).unwrap();
        assert_eq!(u.get("model"), Some(AttrValue::Mat4(m)));
        assert_eq!(u.get("mix"), Some(AttrValue::Float(0.2)));
        assert_eq!(u.get("texture_count"), Some(AttrValue::Int(1)));
        assert_eq!(u.get("projection"), Some(AttrValue::Mat4(Mat4::IDENTITY)));
        for name in UniformBlock::NAMES {
            assert!(u.get(name).is_some(), "{name}");
        }
    }

    #[test]
    fn rejects_unknown_names_and_wrong_types() {
        let mut u = UniformBlock::default();
        assert!(matches!(
            u.set("ourColor", AttrValue::Float(1.0)),
            Err(ResourceError::UnknownAttribute { .. })
        ));
        assert!(matches!(
            u.set("view", AttrValue::Int(3)),
            Err(ResourceError::TypeMismatch { expected: "mat4", found: "int", .. })
        ));
        assert!(matches!(
            u.set("mix", AttrValue::Mat4(Mat4::IDENTITY)),
            Err(ResourceError::TypeMismatch { .. })
        ));
        assert_eq!(u, UniformBlock::default());
        assert!(u.get("ourColor").is_none());
    }

    #[test]
    fn vertex_layout_matches_mesh_vertex() {
        let layout = vertex_layout();
        assert_eq!(layout.array_stride, 32);
        let offsets: Vec<u64> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
    }
}
