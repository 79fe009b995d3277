//! Triangle selectors
//!
//! A triangle selector answers "which triangles might touch this box" for
//! one piece of collision geometry. Variants:
//!
//! - [`MeshTriangleSelector`] - flat triangle array for small meshes
//! - [`OctreeTriangleSelector`] - octree-pruned queries for large static worlds
//! - [`BoundingBoxTriangleSelector`] - the 12 faces of a node's bounding box
//! - [`MetaTriangleSelector`] - fans a query out to other selectors
//!
//! Triangles are stored in the local space of the node a selector belongs
//! to and come out of every query in world space, optionally multiplied
//! through an extra transform supplied with the query.

mod bounding_box;
mod meta;
mod mesh;
mod octree;

pub use bounding_box::BoundingBoxTriangleSelector;
pub use meta::MetaTriangleSelector;
pub use mesh::MeshTriangleSelector;
pub use octree::OctreeTriangleSelector;

use crate::foundation::math::{Mat4, Vec3};
use crate::geometry::{Line3, Triangle, TriangleTransform, AABB};
use crate::scene::{NodeId, SceneManager};

/// Per-query parameters shared by every selector call
///
/// The node to exclude travels with the query, so one body's self-exclusion
/// can never leak into another body's query.
#[derive(Debug, Clone, Copy)]
pub struct TriangleQuery<'a> {
    /// Scene used to resolve node transforms and child selectors
    pub scene: &'a SceneManager,

    /// Extra transform applied after the node's world transform
    pub transform: Option<&'a Mat4>,

    /// Node whose geometry is skipped entirely
    pub exclude: Option<NodeId>,
}

impl<'a> TriangleQuery<'a> {
    /// Query in world space without exclusion
    pub fn new(scene: &'a SceneManager) -> Self {
        Self { scene, transform: None, exclude: None }
    }

    /// Builder: multiply results through `transform`
    pub fn with_transform(mut self, transform: &'a Mat4) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Builder: skip geometry belonging to `node`
    pub fn excluding(mut self, node: Option<NodeId>) -> Self {
        self.exclude = node;
        self
    }
}

/// Nearest hit of a line query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineHit {
    /// Intersection point
    pub point: Vec3,
    /// Triangle that was hit, in query output space
    pub triangle: Triangle,
}

/// Source of candidate triangles for collision queries
///
/// Implementations must be conservative: a box query may report extra
/// triangles but never omit one whose bounds touch the box. A selector with
/// no triangles, or whose node has no world transform yet, reports nothing.
pub trait TriangleSelector: Send + Sync + std::fmt::Debug {
    /// Number of triangles this selector can report
    fn triangle_count(&self, scene: &SceneManager) -> usize;

    /// Append every triangle to `out`
    fn all_triangles(&self, query: &TriangleQuery<'_>, out: &mut Vec<Triangle>);

    /// Append the triangles that may touch `aabb` (world space) to `out`
    ///
    /// Small selectors skip the culling and report everything.
    fn triangles_in_box(&self, aabb: &AABB, query: &TriangleQuery<'_>, out: &mut Vec<Triangle>) {
        let _ = aabb;
        self.all_triangles(query, out);
    }

    /// Nearest point where `line` hits a triangle, within the segment
    ///
    /// With `ignore_back_faces`, triangles facing along the line are skipped.
    fn collision_point_with_line(
        &self,
        line: &Line3,
        ignore_back_faces: bool,
        query: &TriangleQuery<'_>,
    ) -> Option<LineHit> {
        let mut candidates = Vec::new();
        self.triangles_in_box(&line.bounding_box(), query, &mut candidates);

        let direction = line.vector();
        let length_squared = line.length_squared();
        let mut nearest: Option<(f32, LineHit)> = None;

        for triangle in candidates {
            if ignore_back_faces && !triangle.is_front_facing(&direction) {
                continue;
            }
            let Some(point) = triangle.intersection_with_line(&line.start, &direction) else {
                continue;
            };

            let to_start = (point - line.start).magnitude_squared();
            let to_end = (point - line.end).magnitude_squared();
            if to_start >= length_squared || to_end >= length_squared {
                continue;
            }

            if nearest.map_or(true, |(best, _)| to_start < best) {
                nearest = Some((to_start, LineHit { point, triangle }));
            }
        }

        nearest.map(|(_, hit)| hit)
    }

    /// Node this selector belongs to, `None` for containers and world-space soups
    fn node(&self) -> Option<NodeId>;

    /// Copy of this selector bound to `node`, sharing the triangle buffers
    fn clone_for_node(&self, node: NodeId) -> Box<dyn TriangleSelector>;

    /// Downcast to a meta selector
    fn as_meta_mut(&mut self) -> Option<&mut MetaTriangleSelector> {
        None
    }
}

/// World transform of a selector's node and the transform its output goes through
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolvedTransform {
    pub world: Mat4,
    pub output: TriangleTransform,
}

/// Resolve where a selector's local triangles end up for this query
///
/// `None` means the selector reports nothing: its node is excluded, gone,
/// or not placed in the scene yet.
pub(crate) fn resolve_transform(node: Option<NodeId>, query: &TriangleQuery<'_>) -> Option<ResolvedTransform> {
    let world = match node {
        Some(id) => {
            if query.exclude == Some(id) {
                return None;
            }
            *query.scene.node(id)?.absolute_transform()?
        }
        None => Mat4::identity(),
    };

    let output = match query.transform {
        Some(transform) => transform * world,
        None => world,
    };

    Some(ResolvedTransform { world, output: TriangleTransform::from_matrix(output) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use crate::scene::SceneNode;
    use approx::assert_relative_eq;

    fn wall() -> Vec<Triangle> {
        // Two facing triangles in the plane z = 5, normal -Z
        vec![
            Triangle::new(Vec3::new(-5.0, -5.0, 5.0), Vec3::new(-5.0, 5.0, 5.0), Vec3::new(5.0, -5.0, 5.0)),
            Triangle::new(Vec3::new(5.0, -5.0, 5.0), Vec3::new(-5.0, 5.0, 5.0), Vec3::new(5.0, 5.0, 5.0)),
        ]
    }

    #[test]
    fn test_line_query_finds_nearest_hit_within_segment() {
        let scene = SceneManager::new();
        let mut triangles = wall();
        // A second wall further along the line
        triangles.extend(wall().iter().map(|tri| tri.translated(&Vec3::new(0.0, 0.0, 3.0))));
        let selector = MeshTriangleSelector::new(None, triangles);
        let query = TriangleQuery::new(&scene);

        let hit = selector
            .collision_point_with_line(&Line3::new(Vec3::new(1.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 20.0)), true, &query)
            .expect("line crosses both walls");
        assert_relative_eq!(hit.point, Vec3::new(1.0, 1.0, 5.0), epsilon = 1e-5);

        // Segment stops short of the wall
        let short = Line3::new(Vec3::new(1.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 4.0));
        assert!(selector.collision_point_with_line(&short, true, &query).is_none());
    }

    #[test]
    fn test_line_query_respects_back_faces() {
        let scene = SceneManager::new();
        let selector = MeshTriangleSelector::new(None, wall());
        let query = TriangleQuery::new(&scene);
        // Travels along the wall normal, hitting the back side
        let from_behind = Line3::new(Vec3::new(1.0, 1.0, 10.0), Vec3::new(1.0, 1.0, 0.0));

        assert!(selector.collision_point_with_line(&from_behind, true, &query).is_none());
        assert!(selector.collision_point_with_line(&from_behind, false, &query).is_some());
    }

    #[test]
    fn test_resolve_transform_cases() {
        let mut scene = SceneManager::new();
        let node = scene.add_node(SceneNode::new("n").with_transform(Transform::from_position(Vec3::new(0.0, 2.0, 0.0))));

        // Not placed yet
        assert!(resolve_transform(Some(node), &TriangleQuery::new(&scene)).is_none());

        scene.update_absolute_transforms();
        let resolved = resolve_transform(Some(node), &TriangleQuery::new(&scene)).unwrap();
        assert_eq!(resolved.output, TriangleTransform::Translation(Vec3::new(0.0, 2.0, 0.0)));

        let excluded = TriangleQuery::new(&scene).excluding(Some(node));
        assert!(resolve_transform(Some(node), &excluded).is_none());

        let resolved = resolve_transform(None, &TriangleQuery::new(&scene)).unwrap();
        assert_eq!(resolved.output, TriangleTransform::Identity);
    }
}
