//! RGBA8 textures uploaded to the GPU.

use asset::texture::TextureData;
use wgpu::{
    AddressMode, Extent3d, FilterMode, Origin3d, Sampler, SamplerDescriptor, TexelCopyBufferLayout,
    TexelCopyTextureInfo, Texture, TextureAspect, TextureDescriptor, TextureDimension,
    TextureFormat, TextureUsages, TextureView, TextureViewDescriptor,
};

use crate::{
    context::GpuContext,
    error::ResourceError,
    resource::{AttrValue, Resource, ResourceKind},
};

pub struct GpuTexture {
    label: String,
    #[allow(dead_code)]
    texture: Texture,
    view: TextureView,
    width: u32,
    height: u32,
}

impl GpuTexture {
    pub fn new(ctx: &GpuContext, data: &TextureData, label: &str) -> Result<Self, ResourceError> {
        if !data.is_valid() {
            return Err(ResourceError::InvalidTexture {
                label: label.to_owned(),
            });
        }

        let size = Extent3d {
            width: data.width,
            height: data.height,
            depth_or_array_layers: 1,
        };
        let texture = ctx.device().create_texture(&TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8UnormSrgb,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });
        ctx.queue().write_texture(
            TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: Origin3d::ZERO,
                aspect: TextureAspect::All,
            },
            &data.data,
            TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(data.bytes_per_pixel() * data.width),
                rows_per_image: Some(data.height),
            },
            size,
        );
        let view = texture.create_view(&TextureViewDescriptor::default());

        log::debug!("Uploaded texture '{}' {}x{}", label, data.width, data.height);
        Ok(Self {
            label: label.to_owned(),
            texture,
            view,
            width: data.width,
            height: data.height,
        })
    }

    pub fn view(&self) -> &TextureView {
        &self.view
    }
}

/// Repeat addressing, linear filtering.
pub fn create_sampler(ctx: &GpuContext) -> Sampler {
    ctx.device().create_sampler(&SamplerDescriptor {
        label: Some("Texture Sampler"),
        address_mode_u: AddressMode::Repeat,
        address_mode_v: AddressMode::Repeat,
        address_mode_w: AddressMode::Repeat,
        mag_filter: FilterMode::Linear,
        min_filter: FilterMode::Linear,
        ..Default::default()
    })
}

impl Resource for GpuTexture {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Texture
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn get(&self, attr: &str) -> Option<AttrValue> {
        match attr {
            "width" => Some(AttrValue::Int(self.width as i32)),
            "height" => Some(AttrValue::Int(self.height as i32)),
            _ => None,
        }
    }
}
