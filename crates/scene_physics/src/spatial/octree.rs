//! Octree spatial partitioning over a static triangle soup
//!
//! Built once from a mesh's triangles and read-only afterwards. Each node
//! is split into 8 octants around the center of its bounding box; a
//! triangle moves down into an octant only when it lies entirely inside it,
//! straddling triangles stay with the parent. No triangle is stored twice.
//! A changed world rebuilds the tree instead of re-inserting.

use serde::{Deserialize, Serialize};

use crate::geometry::{Triangle, TriangleTransform, AABB};

/// Configuration for octree construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// Nodes holding fewer triangles than this stay leaves
    pub min_polys_per_node: usize,

    /// Maximum subdivision depth
    pub max_depth: u32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            min_polys_per_node: 64,
            max_depth: 16,
        }
    }
}

/// Single node in the octree hierarchy
#[derive(Debug, Clone)]
pub struct OctreeNode {
    /// Local-space bounds of every triangle in this subtree
    pub bounds: AABB,

    /// Triangles kept at this level (leaf contents or octant stragglers)
    pub triangles: Vec<Triangle>,

    /// Child nodes per octant, `None` where no triangle fit entirely
    pub children: [Option<Box<OctreeNode>>; 8],

    /// Depth in the tree (0 = root)
    pub depth: u32,
}

impl OctreeNode {
    /// Build a subtree from `triangles`; the list must not be empty
    fn build(triangles: Vec<Triangle>, depth: u32, config: &OctreeConfig, stats: &mut BuildStats) -> Self {
        stats.node_count += 1;
        stats.max_depth = stats.max_depth.max(depth);

        let bounds = triangles
            .iter()
            .skip(1)
            .fold(triangles[0].bounding_box(), |mut aabb, tri| {
                aabb.add_internal_box(&tri.bounding_box());
                aabb
            });

        let mut node = Self {
            bounds,
            triangles,
            children: Default::default(),
            depth,
        };

        // Only a point box stops splitting: flat meshes have zero volume but
        // still spread out over two axes and benefit from the split
        let should_subdivide = node.triangles.len() >= config.min_polys_per_node
            && !node.bounds.is_point()
            && depth < config.max_depth;

        if should_subdivide {
            node.subdivide(config, stats);
        }

        node
    }

    /// Move every triangle that fits entirely inside an octant down into a child
    fn subdivide(&mut self, config: &OctreeConfig, stats: &mut BuildStats) {
        let center = self.bounds.center();
        let corners = self.bounds.corners();

        for (octant, corner) in corners.iter().enumerate() {
            let octant_box = AABB::from_points(center, *corner);

            let (inside, keep): (Vec<Triangle>, Vec<Triangle>) = std::mem::take(&mut self.triangles)
                .into_iter()
                .partition(|tri| tri.is_total_inside_box(&octant_box));
            self.triangles = keep;

            if !inside.is_empty() {
                self.children[octant] = Some(Box::new(OctreeNode::build(inside, self.depth + 1, config, stats)));
            }
        }
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    /// Iterate over the existing children
    pub fn child_nodes(&self) -> impl Iterator<Item = &OctreeNode> {
        self.children.iter().filter_map(|child| child.as_deref())
    }

    /// Collect triangles whose bounds touch `aabb`, pruning subtrees outside it
    ///
    /// The test is conservative: every triangle whose bounding box touches
    /// `aabb` is reported, extras may slip through.
    pub fn query_box(&self, aabb: &AABB, transform: &TriangleTransform, results: &mut Vec<Triangle>) {
        if !aabb.intersects(&self.bounds) {
            return;
        }

        results.extend(
            self.triangles
                .iter()
                .filter(|tri| !tri.is_total_outside_box(aabb))
                .map(|tri| transform.apply(tri)),
        );

        for child in self.child_nodes() {
            child.query_box(aabb, transform, results);
        }
    }

    /// Collect every triangle of the subtree
    pub fn query_all(&self, transform: &TriangleTransform, results: &mut Vec<Triangle>) {
        results.extend(self.triangles.iter().map(|tri| transform.apply(tri)));

        for child in self.child_nodes() {
            child.query_all(transform, results);
        }
    }

    /// Count total triangles in this node and all children
    pub fn count_triangles(&self) -> usize {
        self.triangles.len() + self.child_nodes().map(OctreeNode::count_triangles).sum::<usize>()
    }
}

#[derive(Debug, Default)]
struct BuildStats {
    node_count: usize,
    max_depth: u32,
}

/// Octree over a static triangle list, stored in local mesh space
#[derive(Debug, Clone)]
pub struct TriangleOctree {
    /// Root node; `None` for an empty triangle list
    root: Option<OctreeNode>,

    /// Total triangles stored in the tree
    triangle_count: usize,

    /// Number of nodes created during construction
    node_count: usize,
}

impl TriangleOctree {
    /// Build the tree over `triangles`
    pub fn build(triangles: Vec<Triangle>, config: &OctreeConfig) -> Self {
        let triangle_count = triangles.len();
        if triangles.is_empty() {
            return Self { root: None, triangle_count, node_count: 0 };
        }

        let mut stats = BuildStats::default();
        let root = OctreeNode::build(triangles, 0, config, &mut stats);

        log::debug!(
            "Built triangle octree: {} triangles in {} nodes, depth {}",
            triangle_count,
            stats.node_count,
            stats.max_depth
        );

        Self {
            root: Some(root),
            triangle_count,
            node_count: stats.node_count,
        }
    }

    /// Root node, `None` when the tree is empty
    pub fn root(&self) -> Option<&OctreeNode> {
        self.root.as_ref()
    }

    /// Query triangles touching `aabb` (given in the tree's local space)
    pub fn query_box(&self, aabb: &AABB, transform: &TriangleTransform, results: &mut Vec<Triangle>) {
        if let Some(root) = &self.root {
            root.query_box(aabb, transform, results);
        }
    }

    /// Query every triangle in the tree
    pub fn query_all(&self, transform: &TriangleTransform, results: &mut Vec<Triangle>) {
        if let Some(root) = &self.root {
            root.query_all(transform, results);
        }
    }

    /// Get total triangle count
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    /// Get node count
    pub fn node_count(&self) -> usize {
        self.node_count
    }
}
