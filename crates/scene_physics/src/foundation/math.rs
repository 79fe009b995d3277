//! Math utilities and types
//!
//! Provides fundamental math types for 3D collision queries.

pub use nalgebra::{
    Vector3,
    Matrix3, Matrix4,
    Quaternion,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Point3) -> Point3 {
        self.to_matrix().transform_point(&point)
    }

    /// Yaw angle (radians around +Y) of the transform's forward (+Z) axis
    pub fn yaw(&self) -> f32 {
        let forward = self.rotation * Vec3::z();
        forward.x.atan2(forward.z)
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Scale matrix dividing every axis by the matching radius component
    ///
    /// This is the world-to-ellipsoid-space matrix used by the sweep solver.
    fn new_inverse_scaling(radius: &Vec3) -> Mat4;

    /// True when the matrix is exactly a translation (upper 3x3 identity, no projection)
    fn is_translation_only(&self) -> bool;

    /// Translation column of the matrix
    fn translation_part(&self) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn new_inverse_scaling(radius: &Vec3) -> Mat4 {
        Mat4::new_nonuniform_scaling(&Vec3::new(1.0 / radius.x, 1.0 / radius.y, 1.0 / radius.z))
    }

    fn is_translation_only(&self) -> bool {
        self.fixed_view::<3, 3>(0, 0) == Mat3::identity()
            && self.m41 == 0.0
            && self.m42 == 0.0
            && self.m43 == 0.0
            && self.m44 == 1.0
    }

    fn translation_part(&self) -> Vec3 {
        Vec3::new(self.m14, self.m24, self.m34)
    }
}
