//! Command-line configuration.
//! Flags use the `--flag=value` form; bad values warn and fall back to defaults.

use std::path::{Path, PathBuf};

use asset::{LoadOptions, NormalMode, texture::TextureLoadOptions};
use platform::PlatformConfig;
use renderer::{GpuInit, ModelConfig};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub backends: wgpu::Backends,
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub assets: PathBuf,
    pub model: String,
    pub textures: Vec<String>,
    /// Shader file under `assets/shaders`; the built-in one when `None`.
    pub shader: Option<String>,
    pub normals: NormalMode,
    pub flip_textures: bool,
    pub show_fps: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            width: 800,
            height: 600,
            title: "tawy".to_owned(),
            assets: PathBuf::from("res"),
            model: "cube.obj".to_owned(),
            textures: Vec::new(),
            shader: None,
            normals: NormalMode::Reserved,
            flip_textures: true,
            show_fps: false,
        }
    }
}

fn parse_backend(val: &str) -> wgpu::Backends {
    match val.to_ascii_lowercase().as_str() {
        "auto" => wgpu::Backends::all(),
        "vulkan" | "vk" => wgpu::Backends::VULKAN,
        "dx12" | "d3d12" => wgpu::Backends::DX12,
        "metal" | "mtl" => wgpu::Backends::METAL,
        "gl" | "opengl" | "gles" => wgpu::Backends::GL,
        other => {
            log::warn!("Unknown backend '{}', falling back to auto.", other);
            wgpu::Backends::all()
        }
    }
}

fn parse_dimension(flag: &str, val: &str) -> Option<u32> {
    match val.parse::<u32>() {
        Ok(v) if v > 0 => Some(v),
        _ => {
            log::warn!("Ignoring {}={}: expected a positive integer", flag, val);
            None
        }
    }
}

fn parse_bool(val: &str) -> bool {
    matches!(val.to_ascii_lowercase().as_str(), "1" | "true" | "on" | "yes")
}

impl AppConfig {
    /// Parse flags from an argument list (without the program name).
    pub fn from_args<I, A>(args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        let mut cfg = Self::default();
        for arg in args {
            let arg = arg.as_ref();
            if let Some(v) = arg.strip_prefix("--gpu-backend=") {
                cfg.backends = parse_backend(v);
            } else if let Some(v) = arg.strip_prefix("--size=") {
                match v.split_once('x').or_else(|| v.split_once('X')) {
                    Some((w, h)) => {
                        if let (Some(w), Some(h)) =
                            (parse_dimension("--size", w), parse_dimension("--size", h))
                        {
                            cfg.width = w;
                            cfg.height = h;
                        }
                    }
                    None => log::warn!("Ignoring --size={}: expected WxH", v),
                }
            } else if let Some(v) = arg.strip_prefix("--width=") {
                if let Some(w) = parse_dimension("--width", v) {
                    cfg.width = w;
                }
            } else if let Some(v) = arg.strip_prefix("--height=") {
                if let Some(h) = parse_dimension("--height", v) {
                    cfg.height = h;
                }
            } else if let Some(v) = arg.strip_prefix("--title=") {
                cfg.title = v.to_owned();
            } else if let Some(v) = arg.strip_prefix("--assets=") {
                cfg.assets = PathBuf::from(v);
            } else if let Some(v) = arg.strip_prefix("--model=") {
                cfg.model = v.to_owned();
            } else if let Some(v) = arg.strip_prefix("--texture=") {
                cfg.textures.push(v.to_owned());
            } else if let Some(v) = arg.strip_prefix("--shader=") {
                cfg.shader = Some(v.to_owned());
            } else if let Some(v) = arg.strip_prefix("--normals=") {
                cfg.normals = match v.to_ascii_lowercase().as_str() {
                    "reserved" => NormalMode::Reserved,
                    "file" => NormalMode::FromFile,
                    other => {
                        log::warn!("Unknown normal mode '{}', keeping reserved.", other);
                        NormalMode::Reserved
                    }
                };
            } else if arg == "--no-flip" {
                cfg.flip_textures = false;
            } else if arg == "--show-fps" {
                cfg.show_fps = true;
            } else if let Some(v) = arg.strip_prefix("--show-fps=") {
                cfg.show_fps = parse_bool(v);
            } else {
                log::warn!("Unrecognized argument '{}'", arg);
            }
        }
        cfg
    }

    pub fn platform(&self) -> PlatformConfig {
        PlatformConfig {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
            gpu: GpuInit {
                backends: self.backends,
                ..GpuInit::default()
            },
        }
    }

    pub fn model_config(&self) -> ModelConfig {
        let dir = |sub: &str, name: &str| -> PathBuf { self.assets.join(sub).join(name) };
        ModelConfig {
            label: Path::new(&self.model)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.model.clone()),
            mesh: dir("models", &self.model),
            textures: self.textures.iter().map(|t| dir("textures", t)).collect(),
            load: LoadOptions {
                normals: self.normals,
            },
            texture_options: TextureLoadOptions {
                flip_vertically: self.flip_textures,
            },
        }
    }

    pub fn shader_path(&self) -> Option<PathBuf> {
        self.shader
            .as_ref()
            .map(|name| self.assets.join("shaders").join(name))
    }
}
