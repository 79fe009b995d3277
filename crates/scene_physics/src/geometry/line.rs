//! Finite line segments for ray-style queries

use super::AABB;
use crate::foundation::math::Vec3;

/// A line segment from `start` to `end`, used for line-of-sight and weapon queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line3 {
    /// Start point of the segment
    pub start: Vec3,
    /// End point of the segment
    pub end: Vec3,
}

impl Line3 {
    /// Creates a new segment
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    /// Vector from start to end
    pub fn vector(&self) -> Vec3 {
        self.end - self.start
    }

    /// Squared length of the segment
    pub fn length_squared(&self) -> f32 {
        self.vector().magnitude_squared()
    }

    /// Box enclosing the whole segment
    pub fn bounding_box(&self) -> AABB {
        AABB::from_points(self.start, self.end)
    }
}
