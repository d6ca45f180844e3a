pub mod app;
pub mod appearance;
pub mod camera;
pub mod camera_controller;
pub mod color;
pub mod config;
pub mod content;
pub mod lighting;
pub mod pipeline;
pub mod platform;
pub mod renderer;
pub mod scene;
pub mod viewer;

use std::path::PathBuf;

use tracing::info;

use config::ViewerConfig;

/// Run the mesh viewer, opening each of `files` in order once the window is
/// ready.
pub fn meshview_main(files: Vec<PathBuf>) -> anyhow::Result<()> {
    let config = ViewerConfig::default();
    info!("starting {} with {} file(s)", config.window_title, files.len());

    app::run(config, files)
}
