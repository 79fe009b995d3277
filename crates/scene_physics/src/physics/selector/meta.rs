//! Meta selector fanning queries out to other selectors

use super::{TriangleQuery, TriangleSelector};
use crate::geometry::{Triangle, AABB};
use crate::scene::{NodeId, SceneManager, SelectorId};

/// Container selector, no triangles of its own
///
/// Children are handles into the scene's selector arena. Children belonging
/// to the query's excluded node are skipped, so a moving body's own proxy
/// never collides with itself.
#[derive(Debug, Clone, Default)]
pub struct MetaTriangleSelector {
    selectors: Vec<SelectorId>,
}

impl MetaTriangleSelector {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a container over `selectors`
    pub fn with_selectors(selectors: Vec<SelectorId>) -> Self {
        Self { selectors }
    }

    /// Add a child selector
    pub fn add_selector(&mut self, selector: SelectorId) {
        self.selectors.push(selector);
    }

    /// Remove a child selector, returns whether it was present
    pub fn remove_selector(&mut self, selector: SelectorId) -> bool {
        let before = self.selectors.len();
        self.selectors.retain(|&child| child != selector);
        self.selectors.len() != before
    }

    /// Remove every child
    pub fn remove_all(&mut self) {
        self.selectors.clear();
    }

    /// Child handles
    pub fn selectors(&self) -> &[SelectorId] {
        &self.selectors
    }

    fn for_each_child(&self, query: &TriangleQuery<'_>, mut f: impl FnMut(&dyn TriangleSelector)) {
        for &id in &self.selectors {
            let Some(child) = query.scene.selector(id) else {
                continue;
            };
            if query.exclude.is_some() && child.node() == query.exclude {
                continue;
            }
            f(child);
        }
    }
}

impl TriangleSelector for MetaTriangleSelector {
    fn triangle_count(&self, scene: &SceneManager) -> usize {
        self.selectors
            .iter()
            .filter_map(|&id| scene.selector(id))
            .map(|child| child.triangle_count(scene))
            .sum()
    }

    fn all_triangles(&self, query: &TriangleQuery<'_>, out: &mut Vec<Triangle>) {
        self.for_each_child(query, |child| child.all_triangles(query, out));
    }

    fn triangles_in_box(&self, aabb: &AABB, query: &TriangleQuery<'_>, out: &mut Vec<Triangle>) {
        self.for_each_child(query, |child| child.triangles_in_box(aabb, query, out));
    }

    fn node(&self) -> Option<NodeId> {
        None
    }

    fn clone_for_node(&self, _node: NodeId) -> Box<dyn TriangleSelector> {
        Box::new(self.clone())
    }

    fn as_meta_mut(&mut self) -> Option<&mut MetaTriangleSelector> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::physics::{BoundingBoxTriangleSelector, MeshTriangleSelector};
    use crate::scene::SceneNode;

    #[test]
    fn test_fans_out_and_skips_excluded_node() {
        let mut scene = SceneManager::new();
        let player = scene.add_node(SceneNode::new("player"));
        scene.update_absolute_transforms();

        let floor = scene.add_selector(Box::new(MeshTriangleSelector::new(
            None,
            vec![Triangle::new(Vec3::zeros(), Vec3::z(), Vec3::x())],
        )));
        let proxy = scene.add_selector(Box::new(BoundingBoxTriangleSelector::new(player)));
        let world = scene.add_selector(Box::new(MetaTriangleSelector::with_selectors(vec![floor, proxy])));

        let world_selector = scene.selector(world).unwrap();
        assert_eq!(world_selector.triangle_count(&scene), 13);

        let mut out = Vec::new();
        world_selector.all_triangles(&TriangleQuery::new(&scene), &mut out);
        assert_eq!(out.len(), 13);

        out.clear();
        world_selector.all_triangles(&TriangleQuery::new(&scene).excluding(Some(player)), &mut out);
        assert_eq!(out.len(), 1);

        // Exclusion is per query, the next one sees the proxy again
        out.clear();
        let everything = AABB::new(Vec3::new(-10.0, -10.0, -10.0), Vec3::new(10.0, 10.0, 10.0));
        world_selector.triangles_in_box(&everything, &TriangleQuery::new(&scene), &mut out);
        assert_eq!(out.len(), 13);
    }

    #[test]
    fn test_add_remove_children_through_scene() {
        let mut scene = SceneManager::new();
        let floor = scene.add_selector(Box::new(MeshTriangleSelector::new(None, Vec::new())));
        let world = scene.add_selector(Box::new(MetaTriangleSelector::new()));

        scene.meta_selector_mut(world).unwrap().add_selector(floor);
        assert_eq!(scene.meta_selector_mut(world).unwrap().selectors(), &[floor]);
        assert!(scene.meta_selector_mut(world).unwrap().remove_selector(floor));
        assert!(!scene.meta_selector_mut(world).unwrap().remove_selector(floor));

        scene.meta_selector_mut(world).unwrap().add_selector(floor);
        scene.meta_selector_mut(world).unwrap().remove_all();
        assert!(scene.meta_selector_mut(world).unwrap().selectors().is_empty());
        assert!(scene.meta_selector_mut(floor).is_none());
    }
}
