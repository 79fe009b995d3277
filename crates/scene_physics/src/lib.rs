//! # Scene Physics
//!
//! Collision for frame-stepped 3D scenes: a moving ellipsoid slides along
//! triangle geometry, stands on floors, falls off ledges and jumps.
//!
//! ## Features
//!
//! - **Swept ellipsoid solver**: recursive collide-and-slide in ellipsoid space
//! - **Triangle selectors**: flat meshes, octrees, bounding-box proxies and
//!   composites, all answering "which triangles are near this box?"
//! - **Octree**: spatial index over static triangle soups
//! - **Collision-response animator**: gravity, falling, jumping and ground
//!   inclination for a scene node, driven one tick at a time
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_physics::prelude::*;
//!
//! let mut scene = SceneManager::new();
//! let floor = Triangle::new(
//!     Vec3::new(-1000.0, 0.0, -1000.0),
//!     Vec3::new(-1000.0, 0.0, 1000.0),
//!     Vec3::new(1000.0, 0.0, -1000.0),
//! );
//! let world = scene.add_selector(Box::new(MeshTriangleSelector::new(None, vec![floor])));
//!
//! let player = scene.add_node(
//!     SceneNode::new("player")
//!         .with_position(Vec3::new(0.0, 100.0, 0.0))
//!         .with_animator(CollisionResponseAnimator::new(world)),
//! );
//!
//! for tick in 0..100u64 {
//!     scene.animate(tick * 16);
//! }
//! assert!(!scene.collision_response(player).unwrap().is_falling());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod geometry;
pub mod physics;
pub mod scene;
pub mod spatial;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{CollisionResponseConfig, Config, ConfigError, PhysicsConfig},
        foundation::math::{Mat4, Quat, Transform, Vec3},
        geometry::{IndexedMesh, Line3, Triangle, AABB},
        physics::{
            BoundingBoxTriangleSelector, CollisionResponseAnimator, CollisionResult, EllipsoidSweep,
            MeshTriangleSelector, MetaTriangleSelector, OctreeTriangleSelector, SceneCollisionManager,
            TriangleQuery, TriangleSelector,
        },
        scene::{Animator, NodeId, SceneError, SceneManager, SceneNode, SelectorId, VelocityAnimator},
        spatial::{OctreeConfig, TriangleOctree},
    };
}
