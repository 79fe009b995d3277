//! Node animators
//!
//! Animators are a closed set of kinds. Higher layers ask for a specific
//! kind through the typed accessors (`as_collision_response` etc.) instead
//! of matching type names.

use super::{NodeId, SceneManager};
use crate::foundation::math::{Quat, Vec3};
use crate::physics::CollisionResponseAnimator;

/// Changes an animator wants written back to its node
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodeUpdate {
    /// New position
    pub position: Option<Vec3>,
    /// New rotation
    pub rotation: Option<Quat>,
}

/// Every animator kind a node can carry
#[derive(Debug, Clone)]
pub enum Animator {
    /// Moves the node through the world with collision and gravity
    CollisionResponse(CollisionResponseAnimator),
    /// Moves the node by a constant velocity
    Velocity(VelocityAnimator),
}

impl Animator {
    /// Advance the animator to `time_ms` and report what changes on `node`
    pub fn animate(&mut self, node: NodeId, scene: &SceneManager, time_ms: u64) -> NodeUpdate {
        match self {
            Self::CollisionResponse(animator) => animator.animate(node, scene, time_ms),
            Self::Velocity(animator) => animator.animate(node, scene, time_ms),
        }
    }

    /// The collision-response animator, if this is one
    pub fn as_collision_response(&self) -> Option<&CollisionResponseAnimator> {
        match self {
            Self::CollisionResponse(animator) => Some(animator),
            _ => None,
        }
    }

    /// Mutable collision-response animator, if this is one
    pub fn as_collision_response_mut(&mut self) -> Option<&mut CollisionResponseAnimator> {
        match self {
            Self::CollisionResponse(animator) => Some(animator),
            _ => None,
        }
    }

    /// The velocity animator, if this is one
    pub fn as_velocity(&self) -> Option<&VelocityAnimator> {
        match self {
            Self::Velocity(animator) => Some(animator),
            _ => None,
        }
    }

    /// Mutable velocity animator, if this is one
    pub fn as_velocity_mut(&mut self) -> Option<&mut VelocityAnimator> {
        match self {
            Self::Velocity(animator) => Some(animator),
            _ => None,
        }
    }

    /// Called on the copy when its node was cloned
    pub(crate) fn on_node_cloned(&mut self) {
        match self {
            Self::CollisionResponse(animator) => animator.reset(),
            Self::Velocity(animator) => animator.reset(),
        }
    }
}

impl From<CollisionResponseAnimator> for Animator {
    fn from(animator: CollisionResponseAnimator) -> Self {
        Self::CollisionResponse(animator)
    }
}

impl From<VelocityAnimator> for Animator {
    fn from(animator: VelocityAnimator) -> Self {
        Self::Velocity(animator)
    }
}

/// Moves its node by a constant velocity (units per second)
///
/// Stands in for player input: it moves the node freely, and a
/// collision-response animator placed after it turns that movement into
/// a collision-corrected one.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityAnimator {
    velocity: Vec3,
    last_time_ms: Option<u64>,
}

impl VelocityAnimator {
    /// Create an animator moving at `velocity` units per second
    pub fn new(velocity: Vec3) -> Self {
        Self { velocity, last_time_ms: None }
    }

    /// Current velocity
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Change the velocity from the next tick on
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Forget the last tick time; the next tick only records the time
    pub fn reset(&mut self) {
        self.last_time_ms = None;
    }

    fn animate(&mut self, node: NodeId, scene: &SceneManager, time_ms: u64) -> NodeUpdate {
        let Some(last_time_ms) = self.last_time_ms.replace(time_ms) else {
            return NodeUpdate::default();
        };
        let Some(node) = scene.node(node) else {
            return NodeUpdate::default();
        };

        let dt = time_ms.saturating_sub(last_time_ms) as f32 / 1000.0;
        if dt <= 0.0 {
            return NodeUpdate::default();
        }

        NodeUpdate {
            position: Some(node.position() + self.velocity * dt),
            rotation: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneNode;
    use approx::assert_relative_eq;

    #[test]
    fn test_velocity_animator_integrates_elapsed_time() {
        let mut scene = SceneManager::new();
        let id = scene.add_node(SceneNode::new("mover"));
        let mut animator = VelocityAnimator::new(Vec3::new(10.0, 0.0, 0.0));

        // First tick only records the time
        assert_eq!(animator.animate(id, &scene, 1000), NodeUpdate::default());

        let update = animator.animate(id, &scene, 1500);
        assert_relative_eq!(update.position.unwrap(), Vec3::new(5.0, 0.0, 0.0), epsilon = 1e-6);

        // No elapsed time, no movement
        assert_eq!(animator.animate(id, &scene, 1500), NodeUpdate::default());
    }

    #[test]
    fn test_typed_accessors() {
        let mut animator = Animator::from(VelocityAnimator::new(Vec3::x()));

        assert!(animator.as_collision_response().is_none());
        animator.as_velocity_mut().unwrap().set_velocity(Vec3::y());
        assert_eq!(animator.as_velocity().unwrap().velocity(), Vec3::y());
    }
}
