use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use roost::{
    assets::ModelLoader,
    config::{EditorConfig, DEFAULT_CONFIG_FILE},
    gfx::scene::Scene,
    logging, persistence,
};

/// Interactive 3D scene editor.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Scene file to open (defaults to the configured scene file)
    scene: Option<PathBuf>,

    /// Editor configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let args = Args::parse();

    let config = EditorConfig::load_or_default(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;

    let scene_file = args
        .scene
        .unwrap_or_else(|| config.paths.scene_file.clone());

    // A missing file starts an empty scene that is created on first save.
    let scene = if scene_file.exists() {
        let loaded = persistence::load_scene(&scene_file, &mut ModelLoader)
            .with_context(|| format!("Failed to open scene {}", scene_file.display()))?;
        if loaded.skipped > 0 {
            log::warn!("{} scene entries could not be loaded", loaded.skipped);
        }
        loaded.scene
    } else {
        log::warn!(
            "Scene file {} not found, starting with an empty scene",
            scene_file.display()
        );
        Scene::new()
    };

    roost::app::run(config, scene, scene_file)
}
