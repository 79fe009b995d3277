//! Physics: world collision for moving scene nodes
//!
//! - [`TriangleSelector`] family: candidate triangles per query
//! - [`SceneCollisionManager`]: swept ellipsoid collide-and-slide, line picks
//! - [`CollisionResponseAnimator`]: per-tick gravity, jumping and sliding for a node

mod collision_manager;
mod collision_response;
mod selector;

#[cfg(test)]
mod tests;

pub use collision_manager::{
    default_sliding_speed, CollisionResult, EllipsoidSweep, SceneCollisionManager, SLIDING_SPEED_FACTOR,
};
pub use collision_response::{CollisionResponseAnimator, MAX_FALL_RAMP_SECS};
pub use selector::{
    BoundingBoxTriangleSelector, LineHit, MeshTriangleSelector, MetaTriangleSelector, OctreeTriangleSelector,
    TriangleQuery, TriangleSelector,
};
