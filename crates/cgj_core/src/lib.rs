//! CGJ Core - scene graph and scene description for the CGJ engine.
//!
//! This crate provides:
//!
//! - **Scene graph**: an arena of nodes with local transforms, world-matrix
//!   propagation and inherited mesh/shader resolution
//! - **Components**: rigid bodies, box colliders and collision listeners
//! - **Animation**: per-node tweening of position, rotation and scale
//! - **Camera**: free-look and orbit camera with both projections
//! - **Scene descriptions**: JSON files describing a scene to load
//!
//! # Example
//!
//! ```ignore
//! use cgj_core::{SceneGraph, Vector3};
//!
//! let mut graph = SceneGraph::new();
//! let table = graph.create_node("table");
//! graph.node_mut(table)?.set_position(Vector3::new(0.0, 1.0, 0.0));
//! graph.update();
//! println!("{}", graph.world_position(table)?);
//! ```

pub mod animator;
pub mod camera;
pub mod component;
pub mod description;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use animator::Animator;
pub use camera::{Camera, CameraSettings, CameraUniform, Movement, Projection};
pub use component::{Aabb, BoxCollider, CollisionListener, Component, ComponentId, ComponentKind, RigidBody};
pub use description::{load_scene, LoadError, LoadResult, LoadedScene, NodeDescription, SceneDescription};
pub use resources::{Material, Mesh, ResourceRegistry, ShaderProgram, Texture};
pub use scene::{DrawItem, NodeId, SceneError, SceneGraph, SceneNode, SceneResult};

// Re-export math types
pub use cgj_math::{Matrix4, MatrixFactory, Quaternion, Vector3, Vector4};
