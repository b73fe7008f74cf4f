mod cli;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use prism_core::SceneDescription;
use prism_renderer::{LightingMode, Renderer, Scene};

use crate::cli::Args;

/// Scene rendered when no `--scene` is given.
const REFERENCE_SCENE: &str = include_str!("../scenes/reference.json");

fn load_scene(path: Option<&Path>) -> Result<Scene> {
    let desc = match path {
        Some(path) => SceneDescription::from_file(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => {
            log::info!("No scene given, using the built-in reference scene");
            SceneDescription::from_json(REFERENCE_SCENE).context("Built-in reference scene is invalid")?
        }
    };

    Ok(Scene::from_description(&desc)?)
}

/// `render.png` becomes `render_observed_area.png` and so on.
fn output_path_for_mode(output: &Path, mode: LightingMode) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "render".to_string());
    let suffix = match mode {
        LightingMode::ObservedArea => "observed_area",
        LightingMode::Radiance => "radiance",
        LightingMode::Brdf => "brdf",
        LightingMode::Combined => "combined",
    };

    let mut name = format!("{}_{}", stem, suffix);
    if let Some(ext) = output.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    output.with_file_name(name)
}

fn render_and_save(renderer: &mut Renderer, scene: &Scene, output: &Path) -> Result<()> {
    let start = Instant::now();
    renderer.render(scene);
    log::info!(
        "Rendered {}x{} in {} mode in {:.2?}",
        renderer.width(),
        renderer.height(),
        renderer.lighting_mode(),
        start.elapsed()
    );

    renderer
        .save_buffer_to_image(output)
        .with_context(|| format!("Failed to save {}", output.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    log::info!("Starting Prism");
    ensure!(
        args.width > 0 && args.height > 0,
        "Image size must be non-zero, got {}x{}",
        args.width,
        args.height
    );

    let scene = load_scene(args.scene.as_deref())?;

    let mut renderer = Renderer::new(args.width, args.height);
    renderer.set_shadows_enabled(!args.no_shadows);

    if args.all_modes {
        renderer.set_lighting_mode(LightingMode::ObservedArea);
        for i in 0..LightingMode::ALL.len() {
            if i > 0 {
                renderer.cycle_lighting_mode();
            }
            let output = output_path_for_mode(&args.output, renderer.lighting_mode());
            render_and_save(&mut renderer, &scene, &output)?;
        }
    } else {
        renderer.set_lighting_mode(args.mode.into());
        render_and_save(&mut renderer, &scene, &args.output)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_scene_builds() {
        let scene = load_scene(None).unwrap();

        assert_eq!(scene.planes().len(), 5);
        assert_eq!(scene.spheres().len(), 6);
        assert_eq!(scene.meshes().len(), 3);
        assert_eq!(scene.triangle_count(), 3);
        assert_eq!(scene.lights().len(), 3);
        assert_eq!(scene.materials().len(), 8);
    }

    #[test]
    fn test_reference_scene_renders_something() {
        let scene = load_scene(None).unwrap();
        let mut renderer = Renderer::new(32, 24);
        renderer.render(&scene);

        assert!(renderer.buffer().pixels().iter().any(|p| *p != [0, 0, 0]));
    }

    #[test]
    fn test_output_path_for_mode() {
        assert_eq!(
            output_path_for_mode(Path::new("out/render.png"), LightingMode::ObservedArea),
            PathBuf::from("out/render_observed_area.png")
        );
        assert_eq!(
            output_path_for_mode(Path::new("frame"), LightingMode::Brdf),
            PathBuf::from("frame_brdf")
        );
    }

    #[test]
    fn test_missing_scene_file_is_an_error() {
        let err = load_scene(Some(Path::new("/nonexistent/prism/scene.json"))).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load scene"));
    }
}
