//! JSON scene descriptions.
//!
//! A description lists nodes by name, in parent-before-child order, with
//! their transforms, resource names, components and animation targets.
//! Resources are interned in a [`ResourceRegistry`] so nodes naming the same
//! mesh or shader share it.
//!
//! ```json
//! {
//!   "name": "bowling",
//!   "shader": "basic",
//!   "nodes": [
//!     { "name": "ground", "mesh": "cube", "scale": [10, 0.1, 10] },
//!     { "name": "pin", "parent": "ground", "position": [0, 1, 0],
//!       "rotation": { "angle": 90, "axis": [0, 1, 0] } }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use cgj_math::{MathError, Quaternion, Vector3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animator::{Animator, DEFAULT_RATE};
use crate::camera::{Camera, CameraSettings};
use crate::component::{BoxCollider, Component, RigidBody};
use crate::resources::{Material, Mesh, ResourceRegistry};
use crate::scene::{NodeId, SceneError, SceneGraph};

/// Errors that can occur while loading a scene description.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("node '{node}' refers to unknown parent '{parent}'")]
    UnknownParent { node: String, parent: String },

    #[error("math error: {0}")]
    Math(#[from] MathError),

    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Rotation of `angle` degrees about `axis`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationDescription {
    pub angle: f32,
    pub axis: [f32; 3],
}

impl RotationDescription {
    /// Fails on a zero-length axis.
    pub fn to_quaternion(&self) -> LoadResult<Quaternion> {
        Ok(Quaternion::try_from_angle_axis(self.angle, Vector3::from(self.axis))?)
    }
}

/// Targets an animator drives the node towards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationDescription {
    pub translation: Option<[f32; 3]>,
    pub rotation: Option<RotationDescription>,
    pub scale: Option<[f32; 3]>,

    /// Progress per frame
    pub rate: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    pub name: String,

    /// Parent node name; the root when absent
    #[serde(default)]
    pub parent: Option<String>,

    #[serde(default)]
    pub position: [f32; 3],

    #[serde(default)]
    pub rotation: Option<RotationDescription>,

    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],

    #[serde(default)]
    pub mesh: Option<String>,
    #[serde(default)]
    pub shader: Option<String>,
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub material: Option<String>,

    /// Rigid body mass
    #[serde(default)]
    pub mass: Option<f32>,

    /// Box collider half extents
    #[serde(default)]
    pub collider: Option<[f32; 3]>,

    #[serde(default)]
    pub animation: Option<AnimationDescription>,
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl NodeDescription {
    /// Node under the root with an identity transform and no resources.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            position: [0.0; 3],
            rotation: None,
            scale: unit_scale(),
            mesh: None,
            shader: None,
            texture: None,
            material: None,
            mass: None,
            collider: None,
            animation: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub name: String,
    pub camera: CameraSettings,

    /// Shader bound on the root and inherited by every node
    pub shader: Option<String>,

    /// Meshes with explicit parameters; others are created on first use
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,

    pub nodes: Vec<NodeDescription>,
}

impl SceneDescription {
    /// Parse a description from JSON text.
    pub fn from_json_str(json: &str) -> LoadResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON description from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> LoadResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Pretty-printed JSON, readable by [`Self::from_json_str`].
    pub fn to_json_string(&self) -> LoadResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Everything a frame loop needs to run a described scene.
#[derive(Debug)]
pub struct LoadedScene {
    pub name: String,
    pub graph: SceneGraph,
    pub camera: Camera,
    pub animators: Vec<Animator>,
    pub resources: ResourceRegistry,
}

impl LoadedScene {
    /// Build the graph, camera and animators a description names. Each animator has
    /// its targets set but has not stepped yet.
    pub fn from_description(desc: &SceneDescription) -> LoadResult<Self> {
        let mut resources = ResourceRegistry::new();
        let (graph, ids) = build_graph(desc, &mut resources)?;

        let mut animators = Vec::new();
        for node in &desc.nodes {
            let (Some(animation), Some(&id)) = (&node.animation, ids.get(&node.name)) else {
                continue;
            };
            let mut animator = Animator::with_rate(id, animation.rate.unwrap_or(DEFAULT_RATE));
            if let Some(target) = animation.translation {
                animator.set_translation(&graph, Vector3::from(target))?;
            }
            if let Some(rotation) = &animation.rotation {
                animator.set_rotation(&graph, rotation.to_quaternion()?)?;
            }
            if let Some(target) = animation.scale {
                animator.set_scale(&graph, Vector3::from(target))?;
            }
            animators.push(animator);
        }

        Ok(Self {
            name: desc.name.clone(),
            graph,
            camera: Camera::new(desc.camera),
            animators,
            resources,
        })
    }
}

impl SceneGraph {
    /// Build a graph from a description, interning its resources.
    pub fn from_description(desc: &SceneDescription, resources: &mut ResourceRegistry) -> LoadResult<Self> {
        Ok(build_graph(desc, resources)?.0)
    }
}

fn build_graph(
    desc: &SceneDescription,
    resources: &mut ResourceRegistry,
) -> LoadResult<(SceneGraph, HashMap<String, NodeId>)> {
    for mesh in &desc.meshes {
        resources.insert_mesh(mesh.clone());
    }
    for material in &desc.materials {
        resources.insert_material(material.clone());
    }

    let mut graph = SceneGraph::new();
    let root = graph.root();
    if let Some(shader) = &desc.shader {
        graph.node_mut(root)?.set_shader(Some(resources.shader(shader)));
    }

    let mut ids: HashMap<String, NodeId> = HashMap::new();
    ids.insert("root".to_string(), root);

    for node_desc in &desc.nodes {
        let parent = match &node_desc.parent {
            Some(name) => *ids.get(name).ok_or_else(|| LoadError::UnknownParent {
                node: node_desc.name.clone(),
                parent: name.clone(),
            })?,
            None => root,
        };

        let id = graph.create_child(parent, node_desc.name.clone())?;
        if ids.insert(node_desc.name.clone(), id).is_some() {
            log::warn!("Duplicate node name '{}'; later references resolve to the last one", node_desc.name);
        }

        let node = graph.node_mut(id)?;
        node.set_position(Vector3::from(node_desc.position));
        node.set_scale(Vector3::from(node_desc.scale));
        if let Some(rotation) = &node_desc.rotation {
            node.set_rotation(rotation.to_quaternion()?);
        }

        node.set_mesh(node_desc.mesh.as_deref().map(|name| resources.mesh(name)));
        node.set_shader(node_desc.shader.as_deref().map(|name| resources.shader(name)));
        node.set_texture(node_desc.texture.as_deref().map(|name| resources.texture(name)));
        node.set_material(node_desc.material.as_deref().map(|name| resources.material(name)));

        if let Some(mass) = node_desc.mass {
            node.add_component(Component::RigidBody(RigidBody::new(mass)));
        }
        if let Some(half_extents) = node_desc.collider {
            node.add_component(Component::Collider(BoxCollider::new(Vector3::from(half_extents))));
        }
    }

    log::debug!(
        "Built scene '{}': {} nodes, {} meshes, {} shaders",
        desc.name,
        graph.len(),
        resources.mesh_count(),
        resources.shader_count()
    );
    Ok((graph, ids))
}

/// Load a JSON scene description from disk.
///
/// # Example
///
/// ```ignore
/// use cgj_core::load_scene;
///
/// let mut scene = load_scene("scenes/bowling.json")?;
/// scene.graph.update();
/// println!("{} draw items", scene.graph.draw_list()?.len());
/// ```
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<LoadedScene> {
    let path = path.as_ref();
    log::info!("Loading scene description {}", path.display());

    let desc = SceneDescription::from_file(path)?;
    let scene = LoadedScene::from_description(&desc)?;

    log::info!(
        "Loaded scene '{}': {} nodes, {} animators",
        scene.name,
        scene.graph.len(),
        scene.animators.len()
    );
    Ok(scene)
}
