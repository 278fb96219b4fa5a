//! Headless frame loop over a CGJ scene.
//!
//! Usage: cgj_demo [scene.json] [frames]
//!
//! Without a scene file the built-in bowling alley is used. Set `RUST_LOG=debug`
//! to see every draw call.

use std::env;

use anyhow::{Context, Result};
use cgj_core::{load_scene, LoadedScene, Matrix4, SceneDescription, Vector4};

const BUILTIN_SCENE: &str = include_str!("../scenes/bowling.json");
const DEFAULT_FRAMES: usize = 120;

/// Seconds per simulated frame
const FRAME_TIME: f32 = 1.0 / 60.0;

fn load(path: Option<&str>) -> Result<LoadedScene> {
    match path {
        Some(path) => load_scene(path).with_context(|| format!("Failed to load scene {}", path)),
        None => {
            log::info!("No scene given, using the built-in bowling alley");
            let desc = SceneDescription::from_json_str(BUILTIN_SCENE).context("Built-in scene is invalid")?;
            Ok(LoadedScene::from_description(&desc)?)
        }
    }
}

/// Clip-space w of the model's origin. Positive when it lies in front of the camera.
fn clip_w(view_projection: Matrix4, model: Matrix4) -> f32 {
    (view_projection * model * Vector4::point(0.0, 0.0, 0.0)).w
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let frames = match args.get(2) {
        Some(n) => n.parse::<usize>().with_context(|| format!("Invalid frame count '{}'", n))?,
        None => DEFAULT_FRAMES,
    };

    let mut scene = load(args.get(1).map(String::as_str))?;
    log::info!(
        "Running '{}' for {} frames ({} nodes, {} animators)",
        scene.name,
        frames,
        scene.graph.len(),
        scene.animators.len()
    );

    let mut draw_calls = 0;
    let mut contacts = 0;
    for frame in 0..frames {
        for animator in &mut scene.animators {
            animator.animate(&mut scene.graph)?;
        }
        scene.graph.update();
        scene.camera.orbit(1.0, 0.0);

        let view_projection = scene.camera.view_projection_matrix();
        let items = scene.graph.draw_list()?;
        for item in &items {
            log::debug!(
                "frame {:>4}: draw '{}' with '{}' at {} (clip w {:.3})",
                frame,
                item.mesh.name,
                item.shader.name,
                item.model_matrix.translation(),
                clip_w(view_projection, item.model_matrix)
            );
        }
        draw_calls += items.len();

        for (a, b) in scene.graph.overlapping_colliders()? {
            log::debug!(
                "frame {:>4}: '{}' touches '{}'",
                frame,
                scene.graph.node(a)?.name,
                scene.graph.node(b)?.name
            );
            contacts += 1;
        }
    }

    let still_running = scene.animators.iter().filter(|a| a.is_running()).count();
    log::info!(
        "Done: {} draw calls, {} collider contacts, {} animations still running",
        draw_calls,
        contacts,
        still_running
    );

    for id in scene.graph.pre_order() {
        let node = scene.graph.node(id)?;
        log::info!("  {:<12} {}", node.name, scene.graph.world_position(id)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgj_core::MatrixFactory;

    #[test]
    fn test_clip_w_of_model_origin() {
        assert_eq!(clip_w(Matrix4::IDENTITY, Matrix4::IDENTITY), 1.0);

        let projection = MatrixFactory::perspective(45.0, 4.0 / 3.0, 0.5, 100.0);
        let model = MatrixFactory::translate(0.0, 0.0, -5.0);
        assert!((clip_w(projection, model) - 5.0).abs() < 1e-5);

        let behind = MatrixFactory::translate(0.0, 0.0, 5.0);
        assert!(clip_w(projection, behind) < 0.0);
    }
}
