//! End-to-end transform propagation through the public API.

use std::sync::Arc;

use cgj_core::{Component, Matrix4, Mesh, NodeId, Quaternion, RigidBody, SceneError, SceneGraph, ShaderProgram, Vector3};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_translation_chain() {
    init_logger();
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let child = graph.create_child(root, "child").unwrap();
    let grandchild = graph.create_child(child, "grandchild").unwrap();
    for id in [root, child, grandchild] {
        graph.node_mut(id).unwrap().set_position(Vector3::new(1.0, 0.0, 0.0));
    }

    let order = graph.update();
    assert_eq!(order, vec![root, child, grandchild]);
    assert_eq!(graph.world_position(grandchild).unwrap(), Vector3::new(3.0, 0.0, 0.0));
}

#[test]
fn test_world_matrices_match_glam() {
    init_logger();
    let transforms = [
        (Vector3::new(1.0, 2.0, 3.0), 30.0, Vector3::new(0.0, 1.0, 0.0), Vector3::new(1.0, 2.0, 1.0)),
        (Vector3::new(-4.0, 0.5, 0.0), 75.0, Vector3::new(1.0, 1.0, 0.0), Vector3::splat(0.5)),
        (Vector3::new(0.0, 0.0, -2.0), -120.0, Vector3::new(0.2, -0.3, 0.9), Vector3::new(3.0, 1.0, 1.0)),
    ];

    let mut graph = SceneGraph::new();
    let mut parent = graph.root();
    let mut expected = glam::Mat4::IDENTITY;
    let mut ids: Vec<(NodeId, glam::Mat4)> = Vec::new();

    for (i, (position, angle, axis, scale)) in transforms.iter().enumerate() {
        let id = graph.create_child(parent, format!("n{}", i)).unwrap();
        let node = graph.node_mut(id).unwrap();
        node.set_position(*position);
        node.set_rotation(Quaternion::from_angle_axis(*angle, *axis));
        node.set_scale(*scale);

        let local = glam::Mat4::from_scale_rotation_translation(
            (*scale).into(),
            glam::Quat::from_axis_angle(glam::Vec3::from(axis.normalize()), angle.to_radians()),
            (*position).into(),
        );
        expected = expected * local;
        ids.push((id, expected));
        parent = id;
    }

    graph.update();
    for (id, world) in ids {
        assert_eq!(graph.world_matrix(id).unwrap(), Matrix4::from(world));
    }
}

#[test]
fn test_reparent_moves_subtree() {
    init_logger();
    let mut graph = SceneGraph::new();
    let left = graph.create_node("left");
    let right = graph.create_node("right");
    let item = graph.create_child(left, "item").unwrap();
    graph.node_mut(left).unwrap().set_position(Vector3::new(-5.0, 0.0, 0.0));
    graph.node_mut(right).unwrap().set_position(Vector3::new(5.0, 0.0, 0.0));
    graph.node_mut(item).unwrap().set_position(Vector3::new(0.0, 1.0, 0.0));
    graph.update();
    assert_eq!(graph.world_position(item).unwrap(), Vector3::new(-5.0, 1.0, 0.0));

    graph.set_parent(item, right).unwrap();
    assert_eq!(graph.world_position(item), Err(SceneError::StaleWorldMatrix(item)));
    assert_eq!(graph.compute_world_matrix(item).unwrap().translation(), Vector3::new(5.0, 1.0, 0.0));

    graph.update();
    assert_eq!(graph.world_position(item).unwrap(), Vector3::new(5.0, 1.0, 0.0));
    assert_eq!(graph.pre_order(), vec![graph.root(), left, right, item]);
}

#[test]
fn test_frame_loop_with_forces_and_draws() {
    init_logger();
    let mut graph = SceneGraph::new();
    let shader = Arc::new(ShaderProgram::new("basic"));
    let sphere = Arc::new(Mesh::new("sphere"));
    graph.node_mut(graph.root()).unwrap().set_shader(Some(shader));

    let ball = graph.create_node("ball");
    graph.node_mut(ball).unwrap().set_mesh(Some(sphere));
    graph.add_component(ball, Component::RigidBody(RigidBody::new(7.0))).unwrap();

    for frame in 0..3 {
        graph.add_force(ball, Vector3::new(0.0, 0.0, -1.0)).unwrap();
        graph.node_mut(ball).unwrap().set_position(Vector3::new(0.0, 0.0, -(frame as f32)));
        graph.update();

        let items = graph.draw_list().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].model_matrix.translation(), Vector3::new(0.0, 0.0, -(frame as f32)));
    }

    let body = graph.rigid_body_mut(ball).unwrap().unwrap();
    assert_eq!(body.take_forces().len(), 3);
}
