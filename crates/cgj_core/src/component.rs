//! Scene node components.
//!
//! A node carries a list of components. Each component has an explicit
//! [`ComponentKind`]; capabilities (e.g. "receives collision events") are
//! answered from the kind, never by inspecting concrete types at run time.

use cgj_math::{Matrix4, Vector3};

/// Discriminant of a [`Component`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    RigidBody,
    Collider,
    CollisionListener,
}

/// Index of a component within its node's component list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub usize);

#[derive(Debug, Clone)]
pub enum Component {
    RigidBody(RigidBody),
    Collider(BoxCollider),
    CollisionListener(CollisionListener),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::RigidBody(_) => ComponentKind::RigidBody,
            Component::Collider(_) => ComponentKind::Collider,
            Component::CollisionListener(_) => ComponentKind::CollisionListener,
        }
    }

    /// Rigid bodies react to collisions as well as plain listeners.
    pub fn listens_for_collisions(&self) -> bool {
        matches!(
            self.kind(),
            ComponentKind::RigidBody | ComponentKind::CollisionListener
        )
    }

    pub fn as_collider_mut(&mut self) -> Option<&mut BoxCollider> {
        match self {
            Component::Collider(collider) => Some(collider),
            _ => None,
        }
    }
}

/// Mass and accumulated forces for a node.
///
/// This only stores state; integrating forces into motion is up to the
/// physics system driving the scene.
#[derive(Debug, Clone, Default)]
pub struct RigidBody {
    /// Zero mass marks a static body
    pub mass: f32,
    pub bounciness: f32,
    pub velocity: Vector3,
    forces: Vec<Vector3>,
}

impl RigidBody {
    pub fn new(mass: f32) -> Self {
        Self {
            mass,
            ..Default::default()
        }
    }

    pub fn is_static(&self) -> bool {
        self.mass <= 0.0
    }

    pub fn add_force(&mut self, force: Vector3) {
        self.forces.push(force);
    }

    pub fn pending_forces(&self) -> &[Vector3] {
        &self.forces
    }

    /// Drain the forces accumulated since the last call.
    pub fn take_forces(&mut self) -> Vec<Vector3> {
        std::mem::take(&mut self.forces)
    }
}

/// Marker for a component that wants collision notifications.
#[derive(Debug, Clone, Default)]
pub struct CollisionListener {
    pub name: String,
}

impl CollisionListener {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Axis-aligned box collider centered on the node origin.
#[derive(Debug, Clone)]
pub struct BoxCollider {
    pub half_extents: Vector3,
    listeners: Vec<ComponentId>,
}

impl BoxCollider {
    pub fn new(half_extents: Vector3) -> Self {
        Self {
            half_extents,
            listeners: Vec::new(),
        }
    }

    /// Components on the same node notified by this collider.
    pub fn listeners(&self) -> &[ComponentId] {
        &self.listeners
    }

    pub(crate) fn add_listener(&mut self, listener: ComponentId) {
        if !self.listeners.contains(&listener) {
            self.listeners.push(listener);
        }
    }

    /// World-space bounds of the box under `world_matrix`.
    pub fn world_bounds(&self, world_matrix: &Matrix4) -> Aabb {
        Aabb::from_points(-self.half_extents, self.half_extents).transform(world_matrix)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3,
    pub max: Vector3,
}

impl Aabb {
    /// Box spanning two corner points in any order.
    pub fn from_points(a: Vector3, b: Vector3) -> Self {
        Self {
            min: Vector3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Vector3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    pub fn center(&self) -> Vector3 {
        (self.min + self.max) * 0.5
    }

    /// Touching boxes count as overlapping.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Bounds of the 8 transformed corners.
    pub fn transform(&self, matrix: &Matrix4) -> Aabb {
        let (lo, hi) = (self.min, self.max);
        let corners = [
            Vector3::new(lo.x, lo.y, lo.z),
            Vector3::new(hi.x, lo.y, lo.z),
            Vector3::new(lo.x, hi.y, lo.z),
            Vector3::new(hi.x, hi.y, lo.z),
            Vector3::new(lo.x, lo.y, hi.z),
            Vector3::new(hi.x, lo.y, hi.z),
            Vector3::new(lo.x, hi.y, hi.z),
            Vector3::new(hi.x, hi.y, hi.z),
        ];

        let first = matrix.transform_point(corners[0]);
        let mut bounds = Aabb::from_points(first, first);
        for corner in &corners[1..] {
            let p = matrix.transform_point(*corner);
            bounds.min = Vector3::new(bounds.min.x.min(p.x), bounds.min.y.min(p.y), bounds.min.z.min(p.z));
            bounds.max = Vector3::new(bounds.max.x.max(p.x), bounds.max.y.max(p.y), bounds.max.z.max(p.z));
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgj_math::MatrixFactory;

    #[test]
    fn test_component_kinds_and_capabilities() {
        let body = Component::RigidBody(RigidBody::new(1.0));
        let collider = Component::Collider(BoxCollider::new(Vector3::ONE));
        let listener = Component::CollisionListener(CollisionListener::new("score"));

        assert_eq!(body.kind(), ComponentKind::RigidBody);
        assert!(body.listens_for_collisions());
        assert!(!collider.listens_for_collisions());
        assert!(listener.listens_for_collisions());
    }

    #[test]
    fn test_rigid_body_force_accumulation() {
        let mut body = RigidBody::new(2.0);
        body.add_force(Vector3::new(0.0, -9.8, 0.0));
        body.add_force(Vector3::X);
        assert_eq!(body.pending_forces().len(), 2);
        assert_eq!(body.take_forces().len(), 2);
        assert!(body.pending_forces().is_empty());
        assert!(RigidBody::new(0.0).is_static());
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::from_points(Vector3::ZERO, Vector3::ONE);
        let b = Aabb::from_points(Vector3::splat(0.5), Vector3::splat(2.0));
        let c = Aabb::from_points(Vector3::splat(3.0), Vector3::splat(4.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert_eq!(a.center(), Vector3::splat(0.5));
    }

    #[test]
    fn test_collider_world_bounds() {
        let collider = BoxCollider::new(Vector3::new(1.0, 0.5, 2.0));
        let world = MatrixFactory::translate(10.0, 0.0, 0.0) * MatrixFactory::rotate_y(90.0);
        let bounds = collider.world_bounds(&world);
        // A quarter turn about Y swaps the X and Z extents.
        assert_eq!(bounds.min, Vector3::new(8.0, -0.5, -1.0));
        assert_eq!(bounds.max, Vector3::new(12.0, 0.5, 1.0));
    }
}
