//! Shader source loading.

use std::path::Path;

use anyhow::{Context, Result, bail};

/// Read a WGSL source file.
pub fn load_shader_source(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read shader: {}", path.display()))?;
    if source.trim().is_empty() {
        bail!("Shader file is empty: {}", path.display());
    }
    log::debug!("Read shader {} ({} bytes)", path.display(), source.len());
    Ok(source)
}
