//! Indexed triangle meshes
//!
//! The hand-off format from mesh importers: a vertex buffer in local mesh
//! space plus a triangle list index buffer. Selectors and octrees are built
//! from the resulting triangle soup once, at load time.

use super::{Triangle, AABB};
use crate::foundation::math::Vec3;
use crate::scene::SceneError;

/// Triangle soup built from a vertex and index buffer, in MODEL SPACE
#[derive(Debug, Clone, Default)]
pub struct IndexedMesh {
    /// Triangles in local coordinates (never modified after construction)
    pub triangles: Vec<Triangle>,
}

impl IndexedMesh {
    /// Build the triangle list from a triangle-list index buffer
    ///
    /// Every index must address an existing vertex and the index count must
    /// be a multiple of three.
    pub fn from_indexed(vertices: &[Vec3], indices: &[u32]) -> Result<Self, SceneError> {
        if indices.len() % 3 != 0 {
            return Err(SceneError::IncompleteTriangle { index_count: indices.len() });
        }

        let vertex = |index: u32| {
            vertices
                .get(index as usize)
                .copied()
                .ok_or(SceneError::IndexOutOfRange { index, vertex_count: vertices.len() })
        };

        let triangles = indices
            .chunks_exact(3)
            .map(|chunk| Ok(Triangle::new(vertex(chunk[0])?, vertex(chunk[1])?, vertex(chunk[2])?)))
            .collect::<Result<Vec<_>, SceneError>>()?;

        Ok(Self { triangles })
    }

    /// Wrap an already assembled triangle list
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// Bounding box of all triangles, `None` for an empty mesh
    pub fn bounding_box(&self) -> Option<AABB> {
        let (first, rest) = self.triangles.split_first()?;
        Some(rest.iter().fold(first.bounding_box(), |mut aabb, tri| {
            aabb.add_internal_box(&tri.bounding_box());
            aabb
        }))
    }

    /// Number of triangles
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// True when the mesh holds no triangles
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}
