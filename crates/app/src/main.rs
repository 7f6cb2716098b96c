//! Entry point for tawy: a spinning OBJ model in a window.

mod config;
mod scene;

use anyhow::Result;

use crate::{config::AppConfig, scene::DemoScene};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_args(std::env::args().skip(1));
    log::info!(
        "Starting tawy. Backend: {:?}, window_size={}x{}, model={}",
        config.backends,
        config.width,
        config.height,
        config.model
    );

    let platform = config.platform();
    platform::run(platform, DemoScene::new(config))
}
