//! Flat triangle-array selector

use std::sync::Arc;

use super::{resolve_transform, TriangleQuery, TriangleSelector};
use crate::geometry::{IndexedMesh, Triangle};
use crate::scene::{NodeId, SceneManager};

/// Reports every triangle of a small mesh, no spatial culling
#[derive(Debug, Clone)]
pub struct MeshTriangleSelector {
    /// Local-space triangles, shared between clones
    triangles: Arc<[Triangle]>,

    node: Option<NodeId>,
}

impl MeshTriangleSelector {
    /// Selector over `triangles`, placed by `node`'s world transform
    ///
    /// Without a node the triangles are taken as already in world space.
    pub fn new(node: Option<NodeId>, triangles: Vec<Triangle>) -> Self {
        Self { triangles: triangles.into(), node }
    }

    /// Selector over an imported mesh
    pub fn from_mesh(node: Option<NodeId>, mesh: &IndexedMesh) -> Self {
        Self::new(node, mesh.triangles.clone())
    }

    /// Local-space triangles
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }
}

impl TriangleSelector for MeshTriangleSelector {
    fn triangle_count(&self, _scene: &SceneManager) -> usize {
        self.triangles.len()
    }

    fn all_triangles(&self, query: &TriangleQuery<'_>, out: &mut Vec<Triangle>) {
        let Some(resolved) = resolve_transform(self.node, query) else {
            return;
        };
        out.extend(self.triangles.iter().map(|tri| resolved.output.apply(tri)));
    }

    fn node(&self) -> Option<NodeId> {
        self.node
    }

    fn clone_for_node(&self, node: NodeId) -> Box<dyn TriangleSelector> {
        Box::new(Self { triangles: Arc::clone(&self.triangles), node: Some(node) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4, Transform, Vec3};
    use crate::scene::SceneNode;
    use approx::assert_relative_eq;

    #[test]
    fn test_reports_world_space_triangles() {
        let mut scene = SceneManager::new();
        let node = scene.add_node(SceneNode::new("ramp").with_transform(Transform {
            position: Vec3::new(0.0, 1.0, 0.0),
            scale: Vec3::new(2.0, 2.0, 2.0),
            ..Default::default()
        }));
        let selector = MeshTriangleSelector::new(
            Some(node),
            vec![Triangle::new(Vec3::zeros(), Vec3::z(), Vec3::x())],
        );

        let mut out = Vec::new();
        selector.all_triangles(&TriangleQuery::new(&scene), &mut out);
        assert!(out.is_empty(), "node without world transform reports nothing");

        scene.update_absolute_transforms();
        selector.all_triangles(&TriangleQuery::new(&scene), &mut out);
        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0].v1, Vec3::new(0.0, 1.0, 2.0), epsilon = 1e-6);

        // Extra transform is applied after the world transform
        let half = Mat4::new_scaling(0.5);
        out.clear();
        selector.all_triangles(&TriangleQuery::new(&scene).with_transform(&half), &mut out);
        assert_relative_eq!(out[0].v1, Vec3::new(0.0, 0.5, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_empty_selector_reports_nothing() {
        let scene = SceneManager::new();
        let selector = MeshTriangleSelector::new(None, Vec::new());

        let mut out = Vec::new();
        selector.all_triangles(&TriangleQuery::new(&scene), &mut out);
        assert!(out.is_empty());
        assert_eq!(selector.triangle_count(&scene), 0);
    }

    #[test]
    fn test_clone_shares_triangles() {
        let mut scene = SceneManager::new();
        let node = scene.add_node(SceneNode::new("copy"));
        let selector = MeshTriangleSelector::new(None, vec![Triangle::new(Vec3::zeros(), Vec3::z(), Vec3::x())]);

        let clone = selector.clone_for_node(node);
        assert_eq!(clone.node(), Some(node));
        assert_eq!(clone.triangle_count(&scene), 1);
    }
}
