//! One presented frame: acquire, clear, record, present.

use wgpu::{
    CommandEncoder, CommandEncoderDescriptor, LoadOp, Operations, RenderPass,
    RenderPassColorAttachment, RenderPassDepthStencilAttachment, RenderPassDescriptor, StoreOp,
    SurfaceError, SurfaceTexture, TextureView,
};

use crate::context::GpuContext;

pub struct Frame {
    surface_texture: SurfaceTexture,
    view: TextureView,
    encoder: CommandEncoder,
}

impl Frame {
    /// Acquire the next surface texture. Returns `Ok(None)` when the frame
    /// should be skipped (surface lost/outdated and reconfigured, or timeout).
    pub fn begin(ctx: &mut GpuContext) -> Result<Option<Self>, SurfaceError> {
        let surface_texture = match ctx.surface().get_current_texture() {
            Ok(t) => t,
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                ctx.recreate_surface();
                return Ok(None);
            }
            Err(SurfaceError::Timeout) => {
                log::warn!("Surface timeout, skipping frame");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let view = surface_texture.texture.create_view(&Default::default());
        let encoder = ctx
            .device()
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("MainEncoder"),
            });

        Ok(Some(Self {
            surface_texture,
            view,
            encoder,
        }))
    }

    /// Begin the main pass, clearing colour and depth.
    pub fn render_pass(&mut self, ctx: &GpuContext) -> RenderPass<'_> {
        self.encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("MainPass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: &self.view,
                depth_slice: None,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Clear(ctx.clear_color()),
                    store: StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                view: ctx.depth_view(),
                depth_ops: Some(Operations {
                    load: LoadOp::Clear(1.0),
                    store: StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        })
    }

    /// Submit recorded work and present.
    pub fn present(self, ctx: &GpuContext) {
        ctx.queue().submit(Some(self.encoder.finish()));
        self.surface_texture.present();
    }
}
