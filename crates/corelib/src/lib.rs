//! Core types: math re-exports, Transform, Camera.

pub use glam::{Mat4, Quat, Vec3, vec3};

pub mod camera;
pub mod transform;
