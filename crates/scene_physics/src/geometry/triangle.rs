//! Triangle primitive and intersection algorithms
//!
//! Triangles are the unit of world geometry handed out by triangle
//! selectors. A query may return freshly transformed copies every frame,
//! so callers compare triangles by value, never by identity.

use super::{Plane, AABB};
use crate::foundation::math::{Mat4, Mat4Ext, Point3, Vec3};

/// Squared-area threshold (of the edge cross product) below which a triangle counts as degenerate
const DEGENERATE_EPSILON: f32 = 1e-12;

/// Slack allowed on barycentric borders so points on an edge count as inside
const ROUNDING_ERROR: f32 = 1e-6;

/// A triangle for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Unnormalized normal (right-hand rule), length is twice the area
    pub fn raw_normal(&self) -> Vec3 {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Calculates the normal of the triangle (right-hand rule)
    pub fn normal(&self) -> Vec3 {
        self.raw_normal().normalize()
    }

    /// Plane the triangle lies in
    pub fn plane(&self) -> Plane {
        Plane::from_point_normal(self.v0, self.normal())
    }

    /// True when the triangle has (nearly) zero area or all vertices coincide
    pub fn is_degenerate(&self) -> bool {
        self.raw_normal().magnitude_squared() <= DEGENERATE_EPSILON
    }

    /// True when the triangle's normal opposes `direction`
    ///
    /// The direction does not need to be normalized.
    pub fn is_front_facing(&self, direction: &Vec3) -> bool {
        self.normal().dot(direction) < 0.0
    }

    /// Bounding box of the three vertices
    pub fn bounding_box(&self) -> AABB {
        let mut aabb = AABB::from_point(self.v0);
        aabb.add_internal_point(self.v1);
        aabb.add_internal_point(self.v2);
        aabb
    }

    /// True when all three vertices lie inside `aabb`
    pub fn is_total_inside_box(&self, aabb: &AABB) -> bool {
        aabb.contains_point(self.v0) && aabb.contains_point(self.v1) && aabb.contains_point(self.v2)
    }

    /// True when all three vertices lie beyond the same face of `aabb`
    ///
    /// Equivalent to the triangle's bounding box not touching `aabb`.
    pub fn is_total_outside_box(&self, aabb: &AABB) -> bool {
        (self.v0.x > aabb.max.x && self.v1.x > aabb.max.x && self.v2.x > aabb.max.x)
            || (self.v0.y > aabb.max.y && self.v1.y > aabb.max.y && self.v2.y > aabb.max.y)
            || (self.v0.z > aabb.max.z && self.v1.z > aabb.max.z && self.v2.z > aabb.max.z)
            || (self.v0.x < aabb.min.x && self.v1.x < aabb.min.x && self.v2.x < aabb.min.x)
            || (self.v0.y < aabb.min.y && self.v1.y < aabb.min.y && self.v2.y < aabb.min.y)
            || (self.v0.z < aabb.min.z && self.v1.z < aabb.min.z && self.v2.z < aabb.min.z)
    }

    /// Point-in-triangle test using same-side checks against each edge
    ///
    /// Points on an edge count as inside. Intended for points already on the
    /// triangle's plane.
    pub fn is_point_inside(&self, point: &Vec3) -> bool {
        if self.is_degenerate() {
            return false;
        }

        is_on_same_side(point, &self.v0, &self.v1, &self.v2)
            && is_on_same_side(point, &self.v1, &self.v0, &self.v2)
            && is_on_same_side(point, &self.v2, &self.v0, &self.v1)
    }

    /// Barycentric point-in-triangle test using precomputed edge vectors
    ///
    /// Degenerate (zero-area) triangles never contain a point.
    pub fn is_point_inside_fast(&self, point: &Vec3) -> bool {
        let a = self.v2 - self.v0;
        let b = self.v1 - self.v0;
        let c = point - self.v0;

        let dot_aa = f64::from(a.dot(&a));
        let dot_ab = f64::from(a.dot(&b));
        let dot_ac = f64::from(a.dot(&c));
        let dot_bb = f64::from(b.dot(&b));
        let dot_bc = f64::from(b.dot(&c));

        let denominator = dot_aa * dot_bb - dot_ab * dot_ab;
        if denominator.abs() <= f64::EPSILON {
            return false;
        }

        let inv_denominator = 1.0 / denominator;
        let u = (dot_bb * dot_ac - dot_ab * dot_bc) * inv_denominator;
        let v = (dot_aa * dot_bc - dot_ab * dot_ac) * inv_denominator;

        let slack = f64::from(ROUNDING_ERROR);
        u > -slack && v > -slack && u + v < 1.0 + slack
    }

    /// Point where the infinite line crosses the triangle's plane
    ///
    /// Returns `None` for degenerate triangles and lines parallel to the plane.
    pub fn intersection_of_plane_with_line(&self, origin: &Vec3, direction: &Vec3) -> Option<Vec3> {
        if self.is_degenerate() {
            return None;
        }
        self.plane().intersection_with_line(origin, direction)
    }

    /// Point where the infinite line hits the triangle itself
    pub fn intersection_with_line(&self, origin: &Vec3, direction: &Vec3) -> Option<Vec3> {
        self.intersection_of_plane_with_line(origin, direction)
            .filter(|point| self.is_point_inside_fast(point))
    }

    /// Copy of this triangle with every vertex multiplied through `matrix`
    pub fn transformed(&self, matrix: &Mat4) -> Triangle {
        let apply = |v: Vec3| matrix.transform_point(&Point3::from(v)).coords;
        Triangle::new(apply(self.v0), apply(self.v1), apply(self.v2))
    }

    /// Copy of this triangle moved by `offset`
    pub fn translated(&self, offset: &Vec3) -> Triangle {
        Triangle::new(self.v0 + offset, self.v1 + offset, self.v2 + offset)
    }

    /// Copy of this triangle with every vertex scaled per axis by `factors`
    pub fn scaled(&self, factors: &Vec3) -> Triangle {
        Triangle::new(
            self.v0.component_mul(factors),
            self.v1.component_mul(factors),
            self.v2.component_mul(factors),
        )
    }
}

/// How a query's output transform is applied to each triangle
///
/// Identity and translate-only transforms take cheap paths since these
/// run for every candidate triangle every physics tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriangleTransform {
    /// Triangles are copied unchanged
    Identity,
    /// Triangles are offset by a vector
    Translation(Vec3),
    /// Triangles are multiplied through a full matrix
    Matrix(Mat4),
}

impl TriangleTransform {
    /// Classify a matrix into the cheapest equivalent transform
    pub fn from_matrix(matrix: Mat4) -> Self {
        if matrix == Mat4::identity() {
            Self::Identity
        } else if matrix.is_translation_only() {
            Self::Translation(matrix.translation_part())
        } else {
            Self::Matrix(matrix)
        }
    }

    /// Apply the transform to one triangle
    pub fn apply(&self, triangle: &Triangle) -> Triangle {
        match self {
            Self::Identity => *triangle,
            Self::Translation(offset) => triangle.translated(offset),
            Self::Matrix(matrix) => triangle.transformed(matrix),
        }
    }
}

/// True when `p1` and `p2` lie on the same side of the line through `a` and `b`
fn is_on_same_side(p1: &Vec3, p2: &Vec3, a: &Vec3, b: &Vec3) -> bool {
    let b_minus_a = (b - a).cast::<f64>();
    let cp1 = b_minus_a.cross(&(p1 - a).cast::<f64>());
    let cp2 = b_minus_a.cross(&(p2 - a).cast::<f64>());
    let mut result = cp1.dot(&cp2);

    if result < 0.0 {
        // p1 practically on the line counts as the same side
        let direction = b_minus_a.normalize();
        let offset = (p1 - a).cast::<f64>();
        if offset.magnitude_squared() == 0.0
            || direction.cross(&offset.normalize()).magnitude() <= f64::from(ROUNDING_ERROR)
        {
            result = 0.0;
        }
    }

    result >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn floor() -> Triangle {
        // Counter-clockwise seen from above, so the normal points up
        Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(10.0, 0.0, 0.0),
        )
    }

    #[test]
    fn test_normal_and_front_facing() {
        let tri = floor();
        assert_relative_eq!(tri.normal(), Vec3::y(), epsilon = 1e-6);
        assert!(tri.is_front_facing(&Vec3::new(0.0, -1.0, 0.0)));
        assert!(!tri.is_front_facing(&Vec3::new(0.3, 1.0, 0.0)));
    }

    #[test]
    fn test_point_inside_tests_agree() {
        let tri = floor();
        let inside = Vec3::new(2.0, 0.0, 2.0);
        let on_edge = Vec3::new(5.0, 0.0, 5.0);
        let outside = Vec3::new(8.0, 0.0, 8.0);

        assert!(tri.is_point_inside(&inside));
        assert!(tri.is_point_inside_fast(&inside));
        assert!(tri.is_point_inside(&on_edge));
        assert!(tri.is_point_inside_fast(&on_edge));
        assert!(!tri.is_point_inside(&outside));
        assert!(!tri.is_point_inside_fast(&outside));
    }

    #[test]
    fn test_degenerate_triangle_contains_nothing() {
        let collapsed = Triangle::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 1.0, 1.0));
        let sliver = Triangle::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0));

        assert!(collapsed.is_degenerate());
        assert!(sliver.is_degenerate());
        assert!(!collapsed.is_point_inside_fast(&Vec3::new(1.0, 1.0, 1.0)));
        assert!(!sliver.is_point_inside_fast(&Vec3::new(1.0, 0.0, 0.0)));
        assert!(!sliver.is_point_inside(&Vec3::new(1.0, 0.0, 0.0)));
        assert!(sliver.intersection_with_line(&Vec3::new(1.0, 5.0, 0.0), &Vec3::new(0.0, -1.0, 0.0)).is_none());
    }

    #[test]
    fn test_line_intersection() {
        let tri = floor();

        let hit = tri
            .intersection_with_line(&Vec3::new(1.0, 5.0, 1.0), &Vec3::new(0.0, -1.0, 0.0))
            .expect("vertical line through the triangle");
        assert_relative_eq!(hit, Vec3::new(1.0, 0.0, 1.0), epsilon = 1e-5);

        // Crosses the plane outside the triangle
        assert!(tri.intersection_with_line(&Vec3::new(9.0, 5.0, 9.0), &Vec3::new(0.0, -1.0, 0.0)).is_none());
        // Parallel to the plane
        assert!(tri.intersection_with_line(&Vec3::new(1.0, 5.0, 1.0), &Vec3::x()).is_none());
    }

    #[test]
    fn test_box_containment() {
        let tri = floor();
        let around = AABB::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(11.0, 1.0, 11.0));
        let partial = AABB::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(5.0, 1.0, 5.0));
        let above = AABB::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(10.0, 4.0, 10.0));

        assert!(tri.is_total_inside_box(&around));
        assert!(!tri.is_total_inside_box(&partial));
        assert!(!tri.is_total_outside_box(&partial));
        assert!(tri.is_total_outside_box(&above));
    }

    #[test]
    fn test_transform_classification() {
        assert_eq!(TriangleTransform::from_matrix(Mat4::identity()), TriangleTransform::Identity);

        let offset = Vec3::new(0.0, 3.0, 0.0);
        let translation = TriangleTransform::from_matrix(Mat4::new_translation(&offset));
        assert_eq!(translation, TriangleTransform::Translation(offset));
        assert_eq!(translation.apply(&floor()), floor().translated(&offset));

        let scale = Mat4::new_scaling(0.5);
        let scaled = TriangleTransform::from_matrix(scale).apply(&floor());
        assert_relative_eq!(scaled.v1, Vec3::new(0.0, 0.0, 5.0), epsilon = 1e-6);
    }
}
