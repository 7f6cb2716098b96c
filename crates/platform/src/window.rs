//! The application window as a [`Resource`].

use std::sync::Arc;

use anyhow::{Context, Result};
use renderer::{AttrValue, Resource, ResourceKind};
use winit::{dpi::PhysicalSize, event_loop::ActiveEventLoop, window::Window};

use crate::PlatformConfig;

pub struct AppWindow {
    window: Arc<Window>,
    title: String,
    close_requested: bool,
}

impl AppWindow {
    pub fn new(event_loop: &ActiveEventLoop, config: &PlatformConfig) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(config.width, config.height));
        let window = event_loop
            .create_window(attrs)
            .context("Failed to create window")?;

        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        Ok(Self {
            window: Arc::new(window),
            title: config.title.clone(),
            close_requested: false,
        })
    }

    pub fn handle(&self) -> Arc<Window> {
        self.window.clone()
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    pub fn size(&self) -> (u32, u32) {
        let PhysicalSize { width, height } = self.window.inner_size();
        (width, height)
    }
}

impl Resource for AppWindow {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Window
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn get(&self, attr: &str) -> Option<AttrValue> {
        let (w, h) = self.size();
        match attr {
            "width" => Some(AttrValue::Int(w as i32)),
            "height" => Some(AttrValue::Int(h as i32)),
            _ => None,
        }
    }

    fn should_close(&self) -> bool {
        self.close_requested
    }
}
