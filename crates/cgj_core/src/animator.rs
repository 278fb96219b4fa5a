//! Keyframe-free tweening of a node's transform.
//!
//! An [`Animator`] drives one node from its current position, rotation and
//! scale towards targets set with `set_*`. Every call to [`Animator::animate`]
//! advances progress by `rate` and writes the interpolated values back into
//! the node. Positions and scales are lerped; rotations use the quaternion
//! lerp.

use cgj_math::{Quaternion, Vector3};

use crate::scene::{NodeId, SceneGraph, SceneNode, SceneResult};

/// Progress step per frame when none is given.
pub const DEFAULT_RATE: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Track<T> {
    from: T,
    to: T,
}

impl<T: Copy + PartialEq> Track<T> {
    /// Start a track towards `to`. A running track that is sent back to its
    /// own origin is flipped instead so the motion reverses in place.
    fn retarget(previous: Option<Track<T>>, current: T, to: T, running: bool) -> (Track<T>, bool) {
        match previous {
            Some(track) if running && track.from == to => (
                Track {
                    from: track.to,
                    to,
                },
                true,
            ),
            _ => (Track { from: current, to }, false),
        }
    }

    /// Continue from `current`, or hold there when `freeze` is set.
    fn resume_from(self, current: T, freeze: bool) -> Track<T> {
        Track {
            from: current,
            to: if freeze { current } else { self.to },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Translation,
    Rotation,
    Scale,
}

#[derive(Debug, Clone)]
pub struct Animator {
    node: NodeId,
    rate: f32,
    progress: f32,
    translation: Option<Track<Vector3>>,
    rotation: Option<Track<Quaternion>>,
    scale: Option<Track<Vector3>>,
}

impl Animator {
    /// Idle animator for `node` stepping at [`DEFAULT_RATE`].
    pub fn new(node: NodeId) -> Self {
        Self::with_rate(node, DEFAULT_RATE)
    }

    /// Non-positive rates are raised to `f32::EPSILON`.
    pub fn with_rate(node: NodeId, rate: f32) -> Self {
        Self {
            node,
            rate: rate.max(f32::EPSILON),
            progress: 1.0,
            translation: None,
            rotation: None,
            scale: None,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Fraction of the current animation done, in [0, 1].
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_running(&self) -> bool {
        self.progress < 1.0
    }

    fn restart(&mut self, reversed: bool) {
        self.progress = if reversed { 1.0 - self.progress } else { 0.0 };
    }

    /// Progress is shared, so the channels not being retargeted restart from
    /// the node's current values. A reversal would jump them, so they hold.
    fn reseat_others(&mut self, node: &SceneNode, except: Channel, reversed: bool) {
        if except != Channel::Translation {
            self.translation = self.translation.map(|t| t.resume_from(node.position(), reversed));
        }
        if except != Channel::Rotation {
            self.rotation = self.rotation.map(|t| t.resume_from(node.rotation(), reversed));
        }
        if except != Channel::Scale {
            self.scale = self.scale.map(|t| t.resume_from(node.scale(), reversed));
        }
    }

    /// Animate the node's position towards `target`.
    pub fn set_translation(&mut self, graph: &SceneGraph, target: Vector3) -> SceneResult<()> {
        let node = graph.node(self.node)?;
        let (track, reversed) = Track::retarget(self.translation, node.position(), target, self.is_running());
        self.reseat_others(node, Channel::Translation, reversed);
        self.translation = Some(track);
        self.restart(reversed);
        Ok(())
    }

    /// Animate the node's rotation towards `target`.
    pub fn set_rotation(&mut self, graph: &SceneGraph, target: Quaternion) -> SceneResult<()> {
        let node = graph.node(self.node)?;
        let (track, reversed) = Track::retarget(self.rotation, node.rotation(), target, self.is_running());
        self.reseat_others(node, Channel::Rotation, reversed);
        self.rotation = Some(track);
        self.restart(reversed);
        Ok(())
    }

    /// Animate the node's scale towards `target`.
    pub fn set_scale(&mut self, graph: &SceneGraph, target: Vector3) -> SceneResult<()> {
        let node = graph.node(self.node)?;
        let (track, reversed) = Track::retarget(self.scale, node.scale(), target, self.is_running());
        self.reseat_others(node, Channel::Scale, reversed);
        self.scale = Some(track);
        self.restart(reversed);
        Ok(())
    }

    /// Advance one step. Returns `true` while the animation is still running.
    pub fn animate(&mut self, graph: &mut SceneGraph) -> SceneResult<bool> {
        if !self.is_running() {
            return Ok(false);
        }

        self.progress = (self.progress + self.rate).min(1.0);
        let k = self.progress;
        let node = graph.node_mut(self.node)?;

        if let Some(track) = self.translation {
            node.set_position(track.from.lerp(track.to, k));
        }
        if let Some(track) = self.rotation {
            node.set_rotation(track.from.lerp(&track.to, k));
        }
        if let Some(track) = self.scale {
            node.set_scale(track.from.lerp(track.to, k));
        }

        if !self.is_running() {
            log::debug!("Animation of '{}' finished", node.name);
        }
        Ok(self.is_running())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (SceneGraph, NodeId) {
        let mut graph = SceneGraph::new();
        let id = graph.create_node("pin");
        (graph, id)
    }

    #[test]
    fn test_idle_animator_does_nothing() {
        let (mut graph, id) = setup();
        let mut animator = Animator::new(id);
        assert!(!animator.is_running());
        assert!(!animator.animate(&mut graph).unwrap());
        assert_eq!(graph.node(id).unwrap().position(), Vector3::ZERO);
    }

    #[test]
    fn test_translation_reaches_target() {
        let (mut graph, id) = setup();
        let mut animator = Animator::with_rate(id, 0.25);
        animator.set_translation(&graph, Vector3::new(4.0, 0.0, 0.0)).unwrap();

        assert!(animator.animate(&mut graph).unwrap());
        assert_eq!(graph.node(id).unwrap().position(), Vector3::new(1.0, 0.0, 0.0));

        while animator.animate(&mut graph).unwrap() {}
        assert_eq!(graph.node(id).unwrap().position(), Vector3::new(4.0, 0.0, 0.0));
        assert_eq!(animator.progress(), 1.0);
    }

    #[test]
    fn test_rotation_and_scale_channels() {
        let (mut graph, id) = setup();
        let target = Quaternion::from_angle_axis(90.0, Vector3::Y);
        let mut animator = Animator::with_rate(id, 0.5);
        animator.set_rotation(&graph, target).unwrap();
        animator.set_scale(&graph, Vector3::splat(3.0)).unwrap();

        animator.animate(&mut graph).unwrap();
        assert_eq!(graph.node(id).unwrap().scale(), Vector3::splat(2.0));
        animator.animate(&mut graph).unwrap();

        let node = graph.node(id).unwrap();
        assert_eq!(node.rotation(), target);
        assert_eq!(node.scale(), Vector3::splat(3.0));
        // Untouched channel keeps its value.
        assert_eq!(node.position(), Vector3::ZERO);
    }

    #[test]
    fn test_reversal_mid_animation() {
        let (mut graph, id) = setup();
        let mut animator = Animator::with_rate(id, 0.25);
        animator.set_translation(&graph, Vector3::new(4.0, 0.0, 0.0)).unwrap();
        animator.animate(&mut graph).unwrap();

        // Send it back home after a quarter of the way.
        animator.set_translation(&graph, Vector3::ZERO).unwrap();
        assert_eq!(animator.progress(), 0.75);
        animator.animate(&mut graph).unwrap();
        assert!(!animator.is_running());
        assert_eq!(graph.node(id).unwrap().position(), Vector3::ZERO);
    }

    #[test]
    fn test_new_target_mid_animation_starts_from_current() {
        let (mut graph, id) = setup();
        let mut animator = Animator::with_rate(id, 0.5);
        animator.set_translation(&graph, Vector3::new(2.0, 0.0, 0.0)).unwrap();
        animator.animate(&mut graph).unwrap();

        animator.set_translation(&graph, Vector3::new(1.0, 2.0, 0.0)).unwrap();
        assert_eq!(animator.progress(), 0.0);
        animator.animate(&mut graph).unwrap();
        assert_eq!(graph.node(id).unwrap().position(), Vector3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_finished_channel_stays_put_when_another_is_set() {
        let (mut graph, id) = setup();
        let target = Quaternion::from_angle_axis(90.0, Vector3::Y);
        let mut animator = Animator::with_rate(id, 0.5);
        animator.set_rotation(&graph, target).unwrap();
        while animator.animate(&mut graph).unwrap() {}

        animator.set_translation(&graph, Vector3::new(4.0, 0.0, 0.0)).unwrap();
        animator.animate(&mut graph).unwrap();

        let node = graph.node(id).unwrap();
        assert_eq!(node.rotation(), target);
        assert_eq!(node.position(), Vector3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_running_channel_continues_when_another_is_set() {
        let (mut graph, id) = setup();
        let mut animator = Animator::with_rate(id, 0.5);
        animator.set_translation(&graph, Vector3::new(2.0, 0.0, 0.0)).unwrap();
        animator.animate(&mut graph).unwrap();

        animator.set_scale(&graph, Vector3::splat(3.0)).unwrap();
        animator.animate(&mut graph).unwrap();

        let node = graph.node(id).unwrap();
        assert_eq!(node.position(), Vector3::new(1.5, 0.0, 0.0));
        assert_eq!(node.scale(), Vector3::splat(2.0));

        while animator.animate(&mut graph).unwrap() {}
        assert_eq!(graph.node(id).unwrap().position(), Vector3::new(2.0, 0.0, 0.0));
    }
}
