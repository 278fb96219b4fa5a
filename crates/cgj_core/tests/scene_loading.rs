//! Loading scene descriptions from disk.

use std::path::PathBuf;

use cgj_core::{load_scene, LoadError, Projection, SceneDescription, Vector3};

fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("data").join(name)
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_load_tangram() {
    init_logger();
    let mut scene = load_scene(data_path("tangram.json")).unwrap();
    assert_eq!(scene.name, "tangram");
    assert_eq!(scene.graph.len(), 6);
    assert_eq!(scene.animators.len(), 1);
    assert_eq!(scene.camera.projection(), Projection::Perspective);

    scene.graph.update();
    let position = |scene: &cgj_core::LoadedScene, name: &str| {
        let id = scene.graph.find(name).unwrap();
        scene.graph.world_position(id).unwrap()
    };
    assert_eq!(position(&scene, "big-triangle"), Vector3::new(0.0, 0.2, -2.0));
    assert_eq!(position(&scene, "square"), Vector3::new(2.0, 0.2, 0.0));
    assert_eq!(position(&scene, "parallelogram"), Vector3::new(0.0, 0.2, 2.0));
}

#[test]
fn test_tangram_draw_list() {
    init_logger();
    let mut scene = load_scene(data_path("tangram.json")).unwrap();
    scene.graph.update();

    let items = scene.graph.draw_list().unwrap();
    let names: Vec<&str> = items.iter().map(|item| item.mesh.name.as_str()).collect();
    assert_eq!(names, vec!["plane", "triangle", "square", "parallelogram"]);

    let shaders: Vec<&str> = items.iter().map(|item| item.shader.name.as_str()).collect();
    assert_eq!(shaders, vec!["flat", "flat", "lit", "flat"]);
    assert_eq!(items[1].texture.as_ref().map(|t| t.name.as_str()), Some("paper"));
    assert!(items[0].texture.is_none());
}

#[test]
fn test_tangram_animation_runs_to_target() {
    init_logger();
    let mut scene = load_scene(data_path("tangram.json")).unwrap();
    let mut frames = 0;
    while scene.animators[0].animate(&mut scene.graph).unwrap() {
        frames += 1;
    }
    assert_eq!(frames, 3);

    scene.graph.update();
    let id = scene.graph.find("big-triangle").unwrap();
    assert_eq!(scene.graph.world_position(id).unwrap(), Vector3::new(4.0, 0.2, -2.0));
}

#[test]
fn test_description_roundtrips_through_json() {
    let json = std::fs::read_to_string(data_path("tangram.json")).unwrap();
    let desc = SceneDescription::from_json_str(&json).unwrap();
    let again = SceneDescription::from_json_str(&desc.to_json_string().unwrap()).unwrap();
    assert_eq!(desc, again);
}

#[test]
fn test_missing_file() {
    assert!(matches!(load_scene(data_path("missing.json")), Err(LoadError::Io(_))));
}
