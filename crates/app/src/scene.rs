//! Demo scene: one textured model spinning in front of the camera.

use anyhow::{Context, Result, bail};
use corelib::{
    Vec3,
    camera::{Camera, Projection},
    transform::Transform,
    vec3,
};
use platform::{AppWindow, Scene};
use renderer::{
    AttrValue, DEFAULT_SHADER, GpuContext, Model, Program, ProgramConfig, Resource, destroy_all,
    enable_all,
};

use crate::config::AppConfig;

const MIX: f32 = 0.2;
const SPIN_AXIS: Vec3 = vec3(0.5, 1.0, 0.0);

struct Resources {
    program: Program,
    model: Model,
}

pub struct DemoScene {
    config: AppConfig,
    camera: Camera,
    resources: Option<Resources>,
    time: f32,
    fps_frames: u32,
    fps_time: f32,
}

impl DemoScene {
    pub fn new(config: AppConfig) -> Self {
        let camera = Camera::new(
            vec3(0.0, 0.0, 3.0),
            Vec3::ZERO,
            Projection::Perspective {
                fov_y_rad: 45f32.to_radians(),
                z_near: 0.1,
                z_far: 100.0,
            },
            config.width as f32 / config.height as f32,
        );
        Self {
            config,
            camera,
            resources: None,
            time: 0.0,
            fps_frames: 0,
            fps_time: 0.0,
        }
    }

    fn track_fps(&mut self, dt: f32) {
        self.fps_frames += 1;
        self.fps_time += dt;
        if self.fps_time >= 1.0 {
            log::info!("FPS: {:.1}", self.fps_frames as f32 / self.fps_time);
            self.fps_frames = 0;
            self.fps_time = 0.0;
        }
    }
}

/// Model matrix after `time` seconds of spinning.
fn model_matrix(time: f32) -> corelib::Mat4 {
    Transform::identity()
        .with_axis_angle(SPIN_AXIS, time)
        .matrix()
}

impl Scene for DemoScene {
    fn init(&mut self, ctx: &GpuContext, window: &AppWindow) -> Result<()> {
        let source = match self.config.shader_path() {
            Some(path) => asset::shader::load_shader_source(&path)?,
            None => DEFAULT_SHADER.to_owned(),
        };
        let mut program = Program::new(
            ctx,
            &ProgramConfig {
                label: "model".to_owned(),
                source,
            },
        )
        .context("Failed to create shader program")?;

        let model_config = self.config.model_config();
        let model = Model::new(ctx, &program, &model_config)
            .with_context(|| format!("Failed to load model {}", model_config.mesh.display()))?;

        program.set(ctx, "mix", AttrValue::Float(MIX))?;
        program.set(
            ctx,
            "texture_count",
            AttrValue::Int(model.texture_count() as i32),
        )?;

        let Some(AttrValue::Int(w)) = window.get("width") else {
            bail!("Window '{}' reports no width", window.label());
        };
        let Some(AttrValue::Int(h)) = window.get("height") else {
            bail!("Window '{}' reports no height", window.label());
        };
        self.resized(w.max(1) as u32, h.max(1) as u32);

        log::info!(
            "Scene ready: {} vertices, {} indices, {} texture(s)",
            model.get("vertices").and_then(|v| v.as_int()).unwrap_or(0),
            model.get("elements").and_then(|v| v.as_int()).unwrap_or(0),
            model.texture_count()
        );
        self.resources = Some(Resources { program, model });
        Ok(())
    }

    fn frame(&mut self, ctx: &GpuContext, pass: &mut wgpu::RenderPass<'_>, dt: f32) -> Result<()> {
        self.time += dt;
        if self.config.show_fps {
            self.track_fps(dt);
        }
        let Some(res) = self.resources.as_mut() else {
            return Ok(());
        };

        res.program
            .set(ctx, "projection", AttrValue::Mat4(self.camera.proj()))?;
        res.program
            .set(ctx, "view", AttrValue::Mat4(self.camera.view()))?;
        res.program
            .set(ctx, "model", AttrValue::Mat4(model_matrix(self.time)))?;

        let draw_order: [&dyn Resource; 2] = [&res.program, &res.model];
        enable_all(&draw_order, pass)?;
        Ok(())
    }

    fn resized(&mut self, width: u32, height: u32) {
        self.camera = self.camera.with_aspect(width as f32 / height.max(1) as f32);
    }

    fn shutdown(&mut self) {
        if let Some(Resources { program, model }) = self.resources.take() {
            destroy_all(vec![Box::new(model), Box::new(program)]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::Mat4;

    #[test]
    fn model_starts_unrotated_and_spins() {
        assert!(model_matrix(0.0).abs_diff_eq(Mat4::IDENTITY, 1e-6));
        assert!(!model_matrix(1.0).abs_diff_eq(Mat4::IDENTITY, 1e-3));
        // The spin axis is left in place by the rotation.
        let axis = SPIN_AXIS.normalize();
        let moved = model_matrix(2.5).transform_vector3(axis);
        assert!(moved.abs_diff_eq(axis, 1e-5));
    }

    #[test]
    fn resize_updates_camera_aspect() {
        let mut scene = DemoScene::new(AppConfig::default());
        assert!((scene.camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        scene.resized(1000, 500);
        assert!((scene.camera.aspect - 2.0).abs() < 1e-6);
    }
}
