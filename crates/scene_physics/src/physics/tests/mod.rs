//! Scenario tests for the sweep solver and the collision-response animator

mod animator_scenarios;

use crate::foundation::logging;
use crate::foundation::math::Vec3;
use crate::geometry::Triangle;
use crate::physics::MeshTriangleSelector;
use crate::scene::{SceneManager, SelectorId};

/// Horizontal triangle at y = 0, normal +Y, far larger than any sweep box
fn floor() -> Triangle {
    Triangle::new(
        Vec3::new(-1000.0, 0.0, -1000.0),
        Vec3::new(-1000.0, 0.0, 3000.0),
        Vec3::new(3000.0, 0.0, -1000.0),
    )
}

/// Vertical triangle in the plane x = `x`, normal -X
fn wall(x: f32) -> Triangle {
    Triangle::new(
        Vec3::new(x, -1000.0, -1000.0),
        Vec3::new(x, -1000.0, 3000.0),
        Vec3::new(x, 3000.0, -1000.0),
    )
}

/// Scene holding one world-space mesh selector over `triangles`
fn world(triangles: Vec<Triangle>) -> (SceneManager, SelectorId) {
    logging::init_for_tests();
    let mut scene = SceneManager::new();
    let selector = scene.add_selector(Box::new(MeshTriangleSelector::new(None, triangles)));
    (scene, selector)
}
