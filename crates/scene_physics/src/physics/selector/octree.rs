//! Octree-accelerated selector for large static meshes

use std::sync::Arc;

use super::{resolve_transform, TriangleQuery, TriangleSelector};
use crate::geometry::{IndexedMesh, Triangle, AABB};
use crate::scene::{NodeId, SceneManager};
use crate::spatial::{OctreeConfig, TriangleOctree};

/// Selector answering box queries through a [`TriangleOctree`]
#[derive(Debug, Clone)]
pub struct OctreeTriangleSelector {
    /// Tree over the local-space triangles, shared between clones
    octree: Arc<TriangleOctree>,

    node: Option<NodeId>,
}

impl OctreeTriangleSelector {
    /// Build the tree over `triangles`
    pub fn new(node: Option<NodeId>, triangles: Vec<Triangle>, config: &OctreeConfig) -> Self {
        Self {
            octree: Arc::new(TriangleOctree::build(triangles, config)),
            node,
        }
    }

    /// Build the tree over an imported mesh
    pub fn from_mesh(node: Option<NodeId>, mesh: &IndexedMesh, config: &OctreeConfig) -> Self {
        Self::new(node, mesh.triangles.clone(), config)
    }

    /// The underlying tree
    pub fn octree(&self) -> &TriangleOctree {
        &self.octree
    }
}

impl TriangleSelector for OctreeTriangleSelector {
    fn triangle_count(&self, _scene: &SceneManager) -> usize {
        self.octree.triangle_count()
    }

    fn all_triangles(&self, query: &TriangleQuery<'_>, out: &mut Vec<Triangle>) {
        let Some(resolved) = resolve_transform(self.node, query) else {
            return;
        };
        self.octree.query_all(&resolved.output, out);
    }

    fn triangles_in_box(&self, aabb: &AABB, query: &TriangleQuery<'_>, out: &mut Vec<Triangle>) {
        let Some(resolved) = resolve_transform(self.node, query) else {
            return;
        };

        // The tree lives in local space; a singular world transform cannot be
        // inverted, so nothing gets pruned
        match resolved.world.try_inverse() {
            Some(inverse) => self.octree.query_box(&aabb.transformed(&inverse), &resolved.output, out),
            None => self.octree.query_all(&resolved.output, out),
        }
    }

    fn node(&self) -> Option<NodeId> {
        self.node
    }

    fn clone_for_node(&self, node: NodeId) -> Box<dyn TriangleSelector> {
        Box::new(Self { octree: Arc::clone(&self.octree), node: Some(node) })
    }
}
