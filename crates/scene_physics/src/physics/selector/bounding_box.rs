//! Bounding-box proxy selector
//!
//! Coarse collision for nodes without a usable mesh: the faces of the
//! node's current bounding box, two triangles per face, all facing out.

use super::{resolve_transform, TriangleQuery, TriangleSelector};
use crate::geometry::{Triangle, AABB};
use crate::scene::{NodeId, SceneManager};

/// Corner indices (see [`AABB::corners`]) of each face, walking around the face
const FACES: [[usize; 4]; 6] = [
    [0, 2, 6, 4], // -X
    [1, 3, 7, 5], // +X
    [0, 1, 5, 4], // -Y
    [2, 3, 7, 6], // +Y
    [0, 1, 3, 2], // -Z
    [4, 5, 7, 6], // +Z
];

/// Reports the 12 triangles of its node's bounding box
///
/// The box is read from the node on every query, so it follows the node's
/// current bounds.
#[derive(Debug, Clone)]
pub struct BoundingBoxTriangleSelector {
    node: NodeId,
}

impl BoundingBoxTriangleSelector {
    /// Selector for `node`'s bounding box
    pub fn new(node: NodeId) -> Self {
        Self { node }
    }
}

/// The 12 outward-facing triangles covering `aabb`
fn box_triangles(aabb: &AABB) -> [Triangle; 12] {
    let corners = aabb.corners();
    let center = aabb.center();
    let mut triangles = [Triangle::new(center, center, center); 12];

    for (face, indices) in FACES.iter().enumerate() {
        let [a, b, c, d] = indices.map(|i| corners[i]);
        let face_center = (a + b + c + d) * 0.25;

        let first = Triangle::new(a, b, c);
        let outward = first.raw_normal().dot(&(face_center - center)) >= 0.0;

        let (first, second) = if outward {
            (first, Triangle::new(a, c, d))
        } else {
            (Triangle::new(a, c, b), Triangle::new(a, d, c))
        };
        triangles[face * 2] = first;
        triangles[face * 2 + 1] = second;
    }

    triangles
}

impl TriangleSelector for BoundingBoxTriangleSelector {
    fn triangle_count(&self, _scene: &SceneManager) -> usize {
        12
    }

    fn all_triangles(&self, query: &TriangleQuery<'_>, out: &mut Vec<Triangle>) {
        let Some(node) = query.scene.node(self.node) else {
            return;
        };
        let Some(resolved) = resolve_transform(Some(self.node), query) else {
            return;
        };

        out.extend(box_triangles(&node.bounding_box).iter().map(|tri| resolved.output.apply(tri)));
    }

    fn node(&self) -> Option<NodeId> {
        Some(self.node)
    }

    fn clone_for_node(&self, node: NodeId) -> Box<dyn TriangleSelector> {
        Box::new(Self { node })
    }
}
