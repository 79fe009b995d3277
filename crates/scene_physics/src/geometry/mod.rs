//! Geometric primitives
//!
//! Foundation for the selectors, the octree and the sweep solver.
//!
//! - [`AABB`] - query regions and bounding volumes
//! - [`Plane`] - signed distance, facing and line crossing
//! - [`Triangle`] - the unit of world geometry
//! - [`Line3`] - finite segments for line-of-sight queries
//! - [`IndexedMesh`] - triangle soup built from index buffers

mod aabb;
mod line;
mod mesh;
mod plane;
mod triangle;

pub use aabb::AABB;
pub use line::Line3;
pub use mesh::IndexedMesh;
pub use plane::Plane;
pub use triangle::{Triangle, TriangleTransform};
