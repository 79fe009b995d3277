//! Configuration system
//!
//! Physics tuning lives in plain serde structs so levels can ship their own
//! TOML or RON files next to the geometry.

pub use serde::{Serialize, Deserialize};

use crate::foundation::math::Vec3;
use crate::spatial::OctreeConfig;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Tuning for one collision-response animator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionResponseConfig {
    /// Ellipsoid radii per axis; all three must be positive for collision to run
    pub ellipsoid_radius: Vec3,

    /// Gravity acceleration in units per second squared
    pub gravity: Vec3,

    /// Offset from the node's pivot to the ellipsoid center
    pub ellipsoid_translation: Vec3,

    /// Fixed sliding-speed epsilon in world units; derived from the radius when unset
    pub sliding_speed: Option<f32>,

    /// Whether gravity is integrated at all
    pub gravity_enabled: bool,

    /// Tilt the node to the ground normal under it (vehicles)
    pub follow_ground_inclination: bool,
}

impl Default for CollisionResponseConfig {
    fn default() -> Self {
        Self {
            ellipsoid_radius: Vec3::new(30.0, 60.0, 30.0),
            gravity: Vec3::new(0.0, -100.0, 0.0),
            ellipsoid_translation: Vec3::zeros(),
            sliding_speed: None,
            gravity_enabled: true,
            follow_ground_inclination: false,
        }
    }
}

/// Top-level physics configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Defaults for collision-response animators
    pub collision_response: CollisionResponseConfig,

    /// Octree construction parameters for world selectors
    pub octree: OctreeConfig,
}

impl Config for PhysicsConfig {}
