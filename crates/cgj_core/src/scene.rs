//! Scene graph and transform propagation.
//!
//! Nodes live in an arena owned by [`SceneGraph`] and are addressed by
//! [`NodeId`]. Each node stores a local transform (position, rotation,
//! scale and an extra base matrix). [`SceneGraph::update`] walks the tree in
//! pre-order and composes world matrices:
//!
//! ```text
//! world(root)  = local(root)
//! world(child) = world(parent) * local(child)
//! ```
//!
//! Any change to a node's transform, resources or parent marks it dirty. A
//! dirty node (or one below a dirty ancestor) refuses to hand out its cached
//! world matrix until the next update.

use std::sync::Arc;

use cgj_math::{MathError, Matrix4, MatrixFactory, Quaternion, Vector3};
use thiserror::Error;

use crate::component::{Aabb, Component, ComponentId, ComponentKind, RigidBody};
use crate::resources::{Material, Mesh, ShaderProgram, Texture};

/// Errors raised by scene graph operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("node {0:?} does not exist")]
    NodeNotFound(NodeId),

    #[error("world matrix of node {0:?} is stale; call update() first")]
    StaleWorldMatrix(NodeId),

    #[error("node {0:?} has a mesh but no shader on itself or any ancestor")]
    MissingShader(NodeId),

    #[error("cannot parent node {node:?} under its own descendant {parent:?}")]
    CycleDetected { node: NodeId, parent: NodeId },

    #[error("the root node cannot be reparented")]
    RootReparent,

    #[error("math error: {0}")]
    Math(#[from] MathError),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Handle to a node in a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Mesh and shader a node draws with after inheritance from its ancestors.
#[derive(Debug, Clone, Default)]
struct Resolved {
    mesh: Option<Arc<Mesh>>,
    shader: Option<Arc<ShaderProgram>>,
}

/// A node in the scene graph.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Node name, used for lookups and logging
    pub name: String,

    parent: Option<NodeId>,
    children: Vec<NodeId>,

    position: Vector3,
    rotation: Quaternion,
    scale: Vector3,

    /// Extra matrix applied before position/rotation/scale
    base_matrix: Matrix4,

    world_matrix: Matrix4,
    dirty: bool,

    mesh: Option<Arc<Mesh>>,
    shader: Option<Arc<ShaderProgram>>,
    texture: Option<Arc<Texture>>,
    material: Option<Arc<Material>>,
    resolved: Resolved,

    components: Vec<Component>,
}

impl SceneNode {
    fn new(name: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            parent,
            children: Vec::new(),
            position: Vector3::ZERO,
            rotation: Quaternion::IDENTITY,
            scale: Vector3::ONE,
            base_matrix: Matrix4::IDENTITY,
            world_matrix: Matrix4::IDENTITY,
            dirty: true,
            mesh: None,
            shader: None,
            texture: None,
            material: None,
            resolved: Resolved::default(),
            components: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn rotation(&self) -> Quaternion {
        self.rotation
    }

    pub fn scale(&self) -> Vector3 {
        self.scale
    }

    pub fn base_matrix(&self) -> Matrix4 {
        self.base_matrix
    }

    /// True when the node changed since the last [`SceneGraph::update`].
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
        self.dirty = true;
    }

    pub fn set_rotation(&mut self, rotation: Quaternion) {
        self.rotation = rotation;
        self.dirty = true;
    }

    pub fn set_scale(&mut self, scale: Vector3) {
        self.scale = scale;
        self.dirty = true;
    }

    /// Replace the base matrix the position/rotation/scale are applied on.
    pub fn set_local_matrix(&mut self, matrix: Matrix4) {
        self.base_matrix = matrix;
        self.dirty = true;
    }

    /// `base * T(position) * R(rotation) * S(scale)`
    pub fn local_matrix(&self) -> Matrix4 {
        self.base_matrix
            * MatrixFactory::translate_vec(self.position)
            * self.rotation.to_matrix()
            * MatrixFactory::scale_vec(self.scale)
    }

    pub fn mesh(&self) -> Option<&Arc<Mesh>> {
        self.mesh.as_ref()
    }

    pub fn shader(&self) -> Option<&Arc<ShaderProgram>> {
        self.shader.as_ref()
    }

    pub fn texture(&self) -> Option<&Arc<Texture>> {
        self.texture.as_ref()
    }

    pub fn material(&self) -> Option<&Arc<Material>> {
        self.material.as_ref()
    }

    /// Mesh after inheritance, as of the last update.
    pub fn resolved_mesh(&self) -> Option<&Arc<Mesh>> {
        self.resolved.mesh.as_ref()
    }

    /// Shader after inheritance, as of the last update.
    pub fn resolved_shader(&self) -> Option<&Arc<ShaderProgram>> {
        self.resolved.shader.as_ref()
    }

    pub fn set_mesh(&mut self, mesh: Option<Arc<Mesh>>) {
        self.mesh = mesh;
        self.dirty = true;
    }

    pub fn set_shader(&mut self, shader: Option<Arc<ShaderProgram>>) {
        self.shader = shader;
        self.dirty = true;
    }

    pub fn set_texture(&mut self, texture: Option<Arc<Texture>>) {
        self.texture = texture;
    }

    pub fn set_material(&mut self, material: Option<Arc<Material>>) {
        self.material = material;
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Attach a component.
    ///
    /// Colliders are wired to every collision listener already on the node,
    /// and listeners added later are wired to every existing collider.
    pub fn add_component(&mut self, component: Component) -> ComponentId {
        let id = ComponentId(self.components.len());
        let kind = component.kind();
        let listens = component.listens_for_collisions();
        self.components.push(component);

        if kind == ComponentKind::Collider {
            let listeners: Vec<ComponentId> = self
                .components
                .iter()
                .enumerate()
                .filter(|(_, c)| c.listens_for_collisions())
                .map(|(i, _)| ComponentId(i))
                .collect();
            if let Some(collider) = self.components[id.0].as_collider_mut() {
                for listener in listeners {
                    collider.add_listener(listener);
                }
            }
        } else if listens {
            for component in &mut self.components {
                if let Some(collider) = component.as_collider_mut() {
                    collider.add_listener(id);
                }
            }
        }

        log::debug!("Node '{}': added {:?} component {:?}", self.name, kind, id);
        id
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.0)
    }

    pub fn has_component(&self, kind: ComponentKind) -> bool {
        self.components.iter().any(|c| c.kind() == kind)
    }

    /// First rigid body on the node.
    pub fn rigid_body(&self) -> Option<&RigidBody> {
        self.components.iter().find_map(|c| match c {
            Component::RigidBody(body) => Some(body),
            _ => None,
        })
    }

    pub fn rigid_body_mut(&mut self) -> Option<&mut RigidBody> {
        self.components.iter_mut().find_map(|c| match c {
            Component::RigidBody(body) => Some(body),
            _ => None,
        })
    }

    /// Push a force onto the node's rigid body. Returns `false` when the node
    /// has none.
    pub fn add_force(&mut self, force: Vector3) -> bool {
        match self.rigid_body_mut() {
            Some(body) => {
                body.add_force(force);
                true
            }
            None => {
                log::warn!("Node '{}' has no rigid body; force dropped", self.name);
                false
            }
        }
    }
}

/// One entry of a frame's draw list.
#[derive(Debug, Clone)]
pub struct DrawItem {
    pub node: NodeId,
    pub mesh: Arc<Mesh>,
    pub shader: Arc<ShaderProgram>,
    pub texture: Option<Arc<Texture>>,
    pub material: Option<Arc<Material>>,

    /// World matrix uploaded as the `ModelMatrix` uniform
    pub model_matrix: Matrix4,
}

/// Tree of [`SceneNode`]s with a single root.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    root: NodeId,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph holding only a root node named "root".
    pub fn new() -> Self {
        Self {
            nodes: vec![SceneNode::new("root", None)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> SceneResult<&SceneNode> {
        self.nodes.get(id.0).ok_or(SceneError::NodeNotFound(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> SceneResult<&mut SceneNode> {
        self.nodes.get_mut(id.0).ok_or(SceneError::NodeNotFound(id))
    }

    /// Create a node as a child of the root.
    pub fn create_node(&mut self, name: impl Into<String>) -> NodeId {
        let root = self.root;
        self.insert_child(root, name.into())
    }

    /// Create a node under `parent`.
    pub fn create_child(&mut self, parent: NodeId, name: impl Into<String>) -> SceneResult<NodeId> {
        self.node(parent)?;
        Ok(self.insert_child(parent, name.into()))
    }

    fn insert_child(&mut self, parent: NodeId, name: String) -> NodeId {
        let id = NodeId(self.nodes.len());
        log::debug!("Creating node '{}' ({:?}) under {:?}", name, id, parent);
        self.nodes.push(SceneNode::new(name, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn parent(&self, id: NodeId) -> SceneResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> SceneResult<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    /// First node with the given name, in pre-order.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.pre_order()
            .into_iter()
            .find(|id| self.nodes[id.0].name == name)
    }

    /// All nodes, parents before children, siblings in insertion order.
    pub fn pre_order(&self) -> Vec<NodeId> {
        self.pre_order_from(self.root)
    }

    /// Subtree of `start` in pre-order. Empty if `start` does not exist.
    pub fn pre_order_from(&self, start: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        if !self.contains(start) {
            return order;
        }

        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            order.push(id);
            // Reverse so the first child is visited first.
            stack.extend(self.nodes[id.0].children.iter().rev());
        }
        order
    }

    /// True when `node` is `ancestor` or lies below it.
    pub fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id.0).and_then(|n| n.parent);
        }
        false
    }

    /// Move `node` (with its subtree) under `parent`.
    pub fn set_parent(&mut self, node: NodeId, parent: NodeId) -> SceneResult<()> {
        self.node(node)?;
        self.node(parent)?;
        if node == self.root {
            return Err(SceneError::RootReparent);
        }
        if self.is_descendant_of(parent, node) {
            return Err(SceneError::CycleDetected { node, parent });
        }

        if let Some(old) = self.nodes[node.0].parent {
            self.nodes[old.0].children.retain(|&c| c != node);
        }
        self.nodes[parent.0].children.push(node);
        let moved = &mut self.nodes[node.0];
        moved.parent = Some(parent);
        moved.dirty = true;
        log::debug!("Reparented '{}' under {:?}", moved.name, parent);
        Ok(())
    }

    pub fn add_component(&mut self, id: NodeId, component: Component) -> SceneResult<ComponentId> {
        Ok(self.node_mut(id)?.add_component(component))
    }

    pub fn rigid_body(&self, id: NodeId) -> SceneResult<Option<&RigidBody>> {
        Ok(self.node(id)?.rigid_body())
    }

    pub fn rigid_body_mut(&mut self, id: NodeId) -> SceneResult<Option<&mut RigidBody>> {
        Ok(self.node_mut(id)?.rigid_body_mut())
    }

    pub fn add_force(&mut self, id: NodeId, force: Vector3) -> SceneResult<bool> {
        Ok(self.node_mut(id)?.add_force(force))
    }

    /// Recompute every world matrix and resolved resource in pre-order.
    /// Returns the visit order.
    pub fn update(&mut self) -> Vec<NodeId> {
        let order = self.pre_order();
        for &id in &order {
            let (parent_world, inherited) = match self.nodes[id.0].parent {
                Some(parent) => {
                    let p = &self.nodes[parent.0];
                    (p.world_matrix, p.resolved.clone())
                }
                None => (Matrix4::IDENTITY, Resolved::default()),
            };

            let node = &mut self.nodes[id.0];
            node.world_matrix = parent_world * node.local_matrix();
            node.resolved = Resolved {
                mesh: node.mesh.clone().or(inherited.mesh),
                shader: node.shader.clone().or(inherited.shader),
            };
            node.dirty = false;
        }
        log::trace!("Updated {} scene nodes", order.len());
        order
    }

    fn first_dirty_on_path(&self, id: NodeId) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            let n = &self.nodes[node.0];
            if n.dirty {
                return Some(node);
            }
            current = n.parent;
        }
        None
    }

    /// Cached world matrix from the last update.
    pub fn world_matrix(&self, id: NodeId) -> SceneResult<Matrix4> {
        let node = self.node(id)?;
        if self.first_dirty_on_path(id).is_some() {
            return Err(SceneError::StaleWorldMatrix(id));
        }
        Ok(node.world_matrix)
    }

    /// World matrix computed from the current local transforms, whether or
    /// not the graph has been updated.
    pub fn compute_world_matrix(&self, id: NodeId) -> SceneResult<Matrix4> {
        let mut chain = vec![self.node(id)?];
        while let Some(parent) = chain[chain.len() - 1].parent {
            chain.push(self.node(parent)?);
        }

        // Fold from the root down.
        Ok(chain
            .iter()
            .rev()
            .fold(Matrix4::IDENTITY, |world, node| world * node.local_matrix()))
    }

    pub fn world_position(&self, id: NodeId) -> SceneResult<Vector3> {
        Ok(self.world_matrix(id)?.translation())
    }

    /// Nodes carrying their own mesh, in pre-order, with inherited shaders
    /// resolved.
    pub fn draw_list(&self) -> SceneResult<Vec<DrawItem>> {
        let mut items = Vec::new();
        for id in self.pre_order() {
            let node = &self.nodes[id.0];
            let Some(mesh) = node.mesh.clone() else {
                continue;
            };
            let model_matrix = self.world_matrix(id)?;
            let shader = node
                .resolved
                .shader
                .clone()
                .ok_or(SceneError::MissingShader(id))?;

            items.push(DrawItem {
                node: id,
                mesh,
                shader,
                texture: node.texture.clone(),
                material: node.material.clone(),
                model_matrix,
            });
        }
        Ok(items)
    }

    /// Pairs of nodes whose box colliders overlap in world space.
    pub fn overlapping_colliders(&self) -> SceneResult<Vec<(NodeId, NodeId)>> {
        let mut bounds: Vec<(NodeId, Aabb)> = Vec::new();
        for id in self.pre_order() {
            let node = &self.nodes[id.0];
            for component in &node.components {
                if let Component::Collider(collider) = component {
                    bounds.push((id, collider.world_bounds(&self.world_matrix(id)?)));
                }
            }
        }

        let mut pairs = Vec::new();
        for (i, (a, box_a)) in bounds.iter().enumerate() {
            for (b, box_b) in &bounds[i + 1..] {
                if a != b && box_a.overlaps(box_b) {
                    pairs.push((*a, *b));
                }
            }
        }
        Ok(pairs)
    }
}
