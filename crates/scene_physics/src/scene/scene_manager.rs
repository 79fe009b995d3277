//! Scene Manager - owner of all nodes and triangle selectors
//!
//! Both arenas live here so nodes and selectors can reference each other
//! through plain handles. The manager also drives the per-tick animation
//! pass: every node's animators run in order, and each animator sees the
//! node as the previous animator left it.

use slotmap::SlotMap;

use super::{NodeId, SceneError, SceneNode, SelectorId};
use crate::physics::{CollisionResponseAnimator, MetaTriangleSelector, TriangleSelector};

/// Scene Manager - arenas for nodes and selectors
#[derive(Debug, Default)]
pub struct SceneManager {
    /// Node arena
    nodes: SlotMap<NodeId, SceneNode>,

    /// Selector arena; selectors outlive the nodes they were built for
    selectors: SlotMap<SelectorId, Box<dyn TriangleSelector>>,
}

impl SceneManager {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node; its world transform stays unset until the next update
    pub fn add_node(&mut self, node: SceneNode) -> NodeId {
        self.nodes.insert(node)
    }

    /// Remove a node and hand it back
    ///
    /// Selectors built for the node stay in the arena and report no
    /// triangles from then on.
    pub fn remove_node(&mut self, id: NodeId) -> Result<SceneNode, SceneError> {
        self.nodes.remove(id).ok_or(SceneError::NodeNotFound(id))
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    /// Look up a node mutably
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    /// Iterate over all nodes
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter()
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Insert a selector into the arena
    pub fn add_selector(&mut self, selector: Box<dyn TriangleSelector>) -> SelectorId {
        self.selectors.insert(selector)
    }

    /// Look up a selector
    pub fn selector(&self, id: SelectorId) -> Option<&dyn TriangleSelector> {
        self.selectors.get(id).map(|selector| selector.as_ref())
    }

    /// Look up a meta selector to add or remove children
    pub fn meta_selector_mut(&mut self, id: SelectorId) -> Option<&mut MetaTriangleSelector> {
        self.selectors.get_mut(id).and_then(|selector| selector.as_meta_mut())
    }

    /// Remove a selector from the arena
    ///
    /// Nodes and meta selectors still holding the handle simply stop
    /// finding it.
    pub fn remove_selector(&mut self, id: SelectorId) -> Result<Box<dyn TriangleSelector>, SceneError> {
        self.selectors.remove(id).ok_or(SceneError::SelectorNotFound(id))
    }

    /// Assign (or clear) the collision selector of a node
    pub fn set_node_selector(&mut self, node: NodeId, selector: Option<SelectorId>) -> Result<(), SceneError> {
        if let Some(selector) = selector {
            if !self.selectors.contains_key(selector) {
                return Err(SceneError::SelectorNotFound(selector));
            }
        }

        let node = self.nodes.get_mut(node).ok_or(SceneError::NodeNotFound(node))?;
        node.set_selector(selector);
        Ok(())
    }

    /// Recompute every node's world transform from its local transform
    pub fn update_absolute_transforms(&mut self) {
        for node in self.nodes.values_mut() {
            node.update_absolute_transform();
        }
    }

    /// Duplicate a node together with its collision geometry
    ///
    /// The node is inserted first, then its selector is cloned for the new
    /// handle (sharing the triangle buffers) and assigned to it. Cloned
    /// animators start from a reset state.
    pub fn clone_node(&mut self, id: NodeId) -> Result<NodeId, SceneError> {
        let source = self.nodes.get(id).ok_or(SceneError::NodeNotFound(id))?;

        let mut copy = source.clone();
        copy.set_selector(None);
        for animator in copy.animators_mut() {
            animator.on_node_cloned();
        }
        let source_selector = source.selector();
        let new_id = self.nodes.insert(copy);

        // A selector removed from the arena leaves the copy without geometry
        let source_selector = source_selector.and_then(|id| Some((id, self.selectors.get(id)?)));
        if let Some((selector_id, selector)) = source_selector {
            let cloned = selector.clone_for_node(new_id);
            let cloned_id = self.selectors.insert(cloned);
            self.set_node_selector(new_id, Some(cloned_id))?;

            log::debug!("Cloned selector {:?} -> {:?} for node {:?}", selector_id, cloned_id, new_id);
        }

        Ok(new_id)
    }

    /// Run every node's animators for the tick at `time_ms`
    ///
    /// World transforms of all nodes are current afterwards.
    pub fn animate(&mut self, time_ms: u64) {
        let ids: Vec<NodeId> = self.nodes.keys().collect();

        for id in ids {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            let mut animators = node.take_animators();

            for animator in &mut animators {
                let update = animator.animate(id, self, time_ms);
                if let Some(node) = self.nodes.get_mut(id) {
                    node.apply(update);
                }
            }

            if let Some(node) = self.nodes.get_mut(id) {
                node.restore_animators(animators);
            }
        }

        self.update_absolute_transforms();
    }

    /// The collision-response animator of a node, if it carries one
    pub fn collision_response(&self, node: NodeId) -> Option<&CollisionResponseAnimator> {
        self.nodes
            .get(node)?
            .animators()
            .iter()
            .find_map(|animator| animator.as_collision_response())
    }

    /// Mutable collision-response animator of a node (to jump, reset, retune)
    pub fn collision_response_mut(&mut self, node: NodeId) -> Option<&mut CollisionResponseAnimator> {
        self.nodes
            .get_mut(node)?
            .animators_mut()
            .iter_mut()
            .find_map(|animator| animator.as_collision_response_mut())
    }
}
