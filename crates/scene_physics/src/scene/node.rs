//! Scene nodes
//!
//! The movable-object abstraction the physics layer works against: a local
//! transform, a cached world transform, a local bounding box and the
//! animators driving the node.

use super::{Animator, NodeUpdate, SelectorId};
use crate::foundation::math::{Mat4, Quat, Transform, Vec3};
use crate::geometry::AABB;

/// A node in the scene arena
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Debug name
    pub name: String,

    /// Local transform (position, rotation, scale)
    pub transform: Transform,

    /// Bounding box in the node's local space
    pub bounding_box: AABB,

    /// World transform, `None` until the scene computed it
    absolute: Option<Mat4>,

    /// Collision geometry of this node, owned by the scene's selector arena
    selector: Option<SelectorId>,

    /// Animators run in order every scene tick
    animators: Vec<Animator>,
}

impl SceneNode {
    /// Create a node at the origin with a unit bounding box
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity(),
            bounding_box: AABB::from_center_extents(Vec3::zeros(), Vec3::new(0.5, 0.5, 0.5)),
            absolute: None,
            selector: None,
            animators: Vec::new(),
        }
    }

    /// Builder: set the local transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Builder: set the position only
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Builder: set the local bounding box
    pub fn with_bounding_box(mut self, bounding_box: AABB) -> Self {
        self.bounding_box = bounding_box;
        self
    }

    /// Builder: append an animator
    pub fn with_animator(mut self, animator: impl Into<Animator>) -> Self {
        self.animators.push(animator.into());
        self
    }

    /// Current position
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Move the node; the world transform follows on the next scene update
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    /// Current rotation
    pub fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    /// Set the rotation
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.transform.rotation = rotation;
    }

    /// World transform, `None` when the node was never placed in the scene
    pub fn absolute_transform(&self) -> Option<&Mat4> {
        self.absolute.as_ref()
    }

    /// Bounding box transformed into world space
    pub fn transformed_bounding_box(&self) -> Option<AABB> {
        self.absolute.as_ref().map(|matrix| self.bounding_box.transformed(matrix))
    }

    /// Collision selector assigned to this node
    pub fn selector(&self) -> Option<SelectorId> {
        self.selector
    }

    /// Animators attached to this node
    pub fn animators(&self) -> &[Animator] {
        &self.animators
    }

    /// Mutable access to the animators (e.g. to steer a velocity animator)
    pub fn animators_mut(&mut self) -> &mut Vec<Animator> {
        &mut self.animators
    }

    /// Attach another animator
    pub fn add_animator(&mut self, animator: impl Into<Animator>) {
        self.animators.push(animator.into());
    }

    pub(crate) fn set_selector(&mut self, selector: Option<SelectorId>) {
        self.selector = selector;
    }

    pub(crate) fn take_animators(&mut self) -> Vec<Animator> {
        std::mem::take(&mut self.animators)
    }

    pub(crate) fn restore_animators(&mut self, mut animators: Vec<Animator>) {
        // Animators attached while the node was animating run after the old ones
        animators.append(&mut self.animators);
        self.animators = animators;
    }

    /// Recompute the world transform from the local one
    pub(crate) fn update_absolute_transform(&mut self) {
        self.absolute = Some(self.transform.to_matrix());
    }

    /// Apply an animator's output and refresh the world transform
    pub(crate) fn apply(&mut self, update: NodeUpdate) {
        if let Some(position) = update.position {
            self.transform.position = position;
        }
        if let Some(rotation) = update.rotation {
            self.transform.rotation = rotation;
        }
        if update.position.is_some() || update.rotation.is_some() {
            self.update_absolute_transform();
        }
    }
}
