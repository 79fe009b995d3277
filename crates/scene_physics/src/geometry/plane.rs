//! Infinite planes
//!
//! Planes are stored as `normal · p + distance = 0`, so
//! [`Plane::distance_to_point`] is positive on the side the normal points to.

use crate::foundation::math::Vec3;

/// Plane defined by normal and distance from origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Normal vector (should be normalized)
    pub normal: Vec3,
    /// Distance from origin along the normal
    pub distance: f32,
}

impl Plane {
    /// Create a new plane from normal and distance
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal: normal.normalize(), distance }
    }

    /// Create a plane through `point` with the given (already normalized) normal
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        Self {
            normal,
            distance: -point.dot(&normal),
        }
    }

    /// Create the plane through three points, normal following the right-hand rule
    ///
    /// Collinear points produce a NaN normal; callers reject degenerate
    /// triangles before asking for their plane.
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let normal = (b - a).cross(&(c - a)).normalize();
        Self::from_point_normal(a, normal)
    }

    /// Calculate signed distance from plane to point
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(&point) + self.distance
    }

    /// True when the plane faces against `direction`
    pub fn is_front_facing(&self, direction: &Vec3) -> bool {
        self.normal.dot(direction) < 0.0
    }

    /// Point where the infinite line `origin + t * direction` crosses the plane
    ///
    /// Returns `None` when the line runs parallel to the plane.
    pub fn intersection_with_line(&self, origin: &Vec3, direction: &Vec3) -> Option<Vec3> {
        let denominator = self.normal.dot(direction);
        if denominator.abs() <= f32::EPSILON {
            return None;
        }

        let t = -self.distance_to_point(*origin) / denominator;
        Some(origin + direction * t)
    }
}
