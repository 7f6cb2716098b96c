//! Uniform lifecycle for every GPU-facing object (window, program, texture, model).
//!
//! Construction is done by each type's fallible `new`; destruction is `Drop`.
//! Attribute access and activation go through [`Resource`].

use glam::Mat4;
use wgpu::RenderPass;

use crate::{context::GpuContext, error::ResourceError};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResourceKind {
    Window,
    Program,
    Texture,
    Model,
}

/// Value read from or written to a named attribute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Mat4(Mat4),
}

impl AttrValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            AttrValue::Bool(_) => "bool",
            AttrValue::Int(_) => "int",
            AttrValue::Float(_) => "float",
            AttrValue::Mat4(_) => "mat4",
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match *self {
            AttrValue::Int(v) => Some(v),
            AttrValue::Bool(b) => Some(b as i32),
            _ => None,
        }
    }
}

pub trait Resource {
    fn kind(&self) -> ResourceKind;

    fn label(&self) -> &str;

    fn get(&self, attr: &str) -> Option<AttrValue> {
        let _ = attr;
        None
    }

    fn set(&mut self, ctx: &GpuContext, attr: &str, value: AttrValue) -> Result<(), ResourceError> {
        let _ = (ctx, attr, value);
        Err(ResourceError::Unsupported {
            kind: self.kind(),
            op: "set",
        })
    }

    /// Make the resource active for the draw being recorded.
    fn enable(&self, pass: &mut RenderPass<'_>) -> Result<(), ResourceError> {
        let _ = pass;
        Ok(())
    }

    /// Whether the resource is done and may be released.
    fn should_close(&self) -> bool {
        false
    }
}

/// Enable resources in order. Order matters: a program must be enabled before
/// the models drawn with it. Stops at the first failure.
pub fn enable_all(resources: &[&dyn Resource], pass: &mut RenderPass<'_>) -> Result<(), ResourceError> {
    for resource in resources {
        resource.enable(pass)?;
    }
    Ok(())
}

/// Release resources in the given order.
pub fn destroy_all(resources: Vec<Box<dyn Resource>>) {
    for resource in resources {
        log::info!("Releasing {:?} '{}'", resource.kind(), resource.label());
        drop(resource);
    }
}
