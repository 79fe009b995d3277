//! Scene management
//!
//! A flat arena of scene nodes plus the triangle selectors that describe
//! their collision geometry. Nodes and selectors refer to each other by
//! handle only, so cloning a node with collision geometry is a two-phase
//! operation instead of an ownership cycle.
//!
//! ## Architecture
//!
//! ```text
//! SceneManager
//!   ├── nodes:     SlotMap<NodeId, SceneNode>
//!   │                 └── selector: Option<SelectorId>, animators: Vec<Animator>
//!   └── selectors: SlotMap<SelectorId, Box<dyn TriangleSelector>>
//!                     └── node: Option<NodeId>
//! ```

mod animator;
mod node;
mod scene_manager;

pub use animator::{Animator, NodeUpdate, VelocityAnimator};
pub use node::SceneNode;
pub use scene_manager::SceneManager;

slotmap::new_key_type! {
    /// Handle of a node in the [`SceneManager`] arena
    pub struct NodeId;

    /// Handle of a triangle selector in the [`SceneManager`] arena
    pub struct SelectorId;
}

/// Errors from scene construction and management
///
/// Per-frame physics never produces these; they only come from setting the
/// scene up.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Handle does not address a live node
    #[error("Scene node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Handle does not address a live selector
    #[error("Triangle selector not found: {0:?}")]
    SelectorNotFound(SelectorId),

    /// Index buffer references a vertex past the end of the vertex buffer
    #[error("Index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending index
        index: u32,
        /// Length of the vertex buffer
        vertex_count: usize,
    },

    /// Index buffer length is not a multiple of three
    #[error("Index count {index_count} does not describe whole triangles")]
    IncompleteTriangle {
        /// Length of the index buffer
        index_count: usize,
    },
}
