//! Axis-aligned bounding boxes
//!
//! Used both as query regions (swept boxes, line boxes) and as bounding
//! volumes of octree nodes and scene nodes.

use crate::foundation::math::{Mat4, Point3, Vec3};

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a zero-sized AABB located at a single point
    pub fn from_point(point: Vec3) -> Self {
        Self { min: point, max: point }
    }

    /// Create the smallest AABB enclosing both points
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let mut aabb = Self::from_point(a);
        aabb.add_internal_point(b);
        aabb
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Grow the box so it encloses `point`
    pub fn add_internal_point(&mut self, point: Vec3) {
        self.min = self.min.inf(&point);
        self.max = self.max.sup(&point);
    }

    /// Grow the box so it encloses `other`
    pub fn add_internal_box(&mut self, other: &AABB) {
        self.add_internal_point(other.min);
        self.add_internal_point(other.max);
    }

    /// Grow the box by `amount` on every side (per axis)
    pub fn expand(&mut self, amount: Vec3) {
        self.min -= amount;
        self.max += amount;
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// True when the box has collapsed to a single point
    pub fn is_point(&self) -> bool {
        self.min == self.max
    }

    /// Volume of the box
    pub fn volume(&self) -> f32 {
        let size = self.max - self.min;
        size.x * size.y * size.z
    }

    /// The eight corners of the box
    ///
    /// Corner `i` takes max on X when bit 0 is set, on Y for bit 1, on Z for bit 2.
    pub fn corners(&self) -> [Vec3; 8] {
        std::array::from_fn(|i| {
            Vec3::new(
                if i & 1 != 0 { self.max.x } else { self.min.x },
                if i & 2 != 0 { self.max.y } else { self.min.y },
                if i & 4 != 0 { self.max.z } else { self.min.z },
            )
        })
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if this AABB intersects another AABB
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Box enclosing this box after transforming all eight corners by `matrix`
    pub fn transformed(&self, matrix: &Mat4) -> AABB {
        let corners = self.corners();
        let first = matrix.transform_point(&Point3::from(corners[0])).coords;
        corners[1..].iter().fold(AABB::from_point(first), |mut aabb, corner| {
            aabb.add_internal_point(matrix.transform_point(&Point3::from(*corner)).coords);
            aabb
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_add_internal_point_grows_box() {
        let mut aabb = AABB::from_point(Vec3::new(1.0, 1.0, 1.0));
        assert!(aabb.is_point());

        aabb.add_internal_point(Vec3::new(-1.0, 3.0, 0.0));

        assert_eq!(aabb.min, Vec3::new(-1.0, 1.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 3.0, 1.0));
        assert!(!aabb.is_point());
    }

    #[test]
    fn test_intersection_includes_touching_faces() {
        let a = AABB::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let touching = AABB::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        let apart = AABB::new(Vec3::new(1.5, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));

        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));
    }

    #[test]
    fn test_transformed_box_encloses_rotated_corners() {
        let aabb = AABB::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let rotation = Mat4::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_4);

        let rotated = aabb.transformed(&rotation);

        let half_diagonal = 2.0_f32.sqrt();
        assert_relative_eq!(rotated.max.x, half_diagonal, epsilon = 1e-5);
        assert_relative_eq!(rotated.min.z, -half_diagonal, epsilon = 1e-5);
        assert_relative_eq!(rotated.max.y, 1.0, epsilon = 1e-5);
    }
}
