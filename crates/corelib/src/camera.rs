use crate::{Mat4, Vec3};

/// How the camera maps view space to clip space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    /// Clip space equals view space; handy for geometry authored in NDC.
    Identity,
    Perspective {
        fov_y_rad: f32,
        z_near: f32,
        z_far: f32,
    },
}

/// Look-at camera (right-handed).
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub projection: Projection,
    pub aspect: f32,
}

impl Camera {
    pub fn new(eye: Vec3, target: Vec3, projection: Projection, aspect: f32) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            projection,
            aspect,
        }
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Projection with depth in [0, 1], as wgpu expects.
    pub fn proj(&self) -> Mat4 {
        match self.projection {
            Projection::Identity => Mat4::IDENTITY,
            Projection::Perspective {
                fov_y_rad,
                z_near,
                z_far,
            } => Mat4::perspective_rh(fov_y_rad, self.aspect.max(1e-6), z_near, z_far),
        }
    }

    #[inline]
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }
}
