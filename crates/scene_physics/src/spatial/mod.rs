//! Spatial partitioning data structures
//!
//! Provides bounded-candidate triangle queries over large static meshes so
//! the per-tick collision query stays cheap.

mod octree;

pub use octree::{OctreeConfig, OctreeNode, TriangleOctree};
