//! Collision-response animator
//!
//! Per-tick driver that turns whatever moved the node since the last tick
//! into a collision-corrected movement: it adds gravity and any active jump
//! impulse, runs the ellipsoid sweep against the world selector and writes
//! the corrected position back.
//!
//! ## States
//!
//! - **Grounded**: gravity is applied at a small fraction so the ellipsoid
//!   stays pressed onto the surface without visible free fall.
//! - **Falling**: gravity's effect ramps with the time spent falling, capped
//!   at [`MAX_FALL_RAMP_SECS`], approximating acceleration.

use super::collision_manager::{default_sliding_speed, EllipsoidSweep, SceneCollisionManager};
use crate::config::CollisionResponseConfig;
use crate::foundation::math::{Quat, Vec3};
use crate::geometry::Triangle;
use crate::scene::{NodeId, NodeUpdate, SceneManager, SelectorId};

/// Cap on the fall-time gravity ramp, seconds
pub const MAX_FALL_RAMP_SECS: f32 = 5.0;

/// Fraction of gravity applied per second while standing on something
const GROUNDED_GRAVITY_FACTOR: f32 = 0.1;

/// Jump speed to jump force scale
const JUMP_FORCE_SCALE: f32 = 100.0;

/// Jump force to per-millisecond lift scale
const JUMP_LIFT_SCALE: f32 = 0.001;

/// Moves its node through the world with collision, gravity and jumping
#[derive(Debug, Clone)]
pub struct CollisionResponseAnimator {
    /// World geometry to collide with
    world: SelectorId,

    radius: Vec3,
    gravity: Vec3,
    translation: Vec3,
    sliding_speed: Option<f32>,
    gravity_enabled: bool,
    follow_ground_inclination: bool,

    /// Position the node had after the previous tick
    last_position: Vec3,
    /// Time of the previous tick, `None` until the next tick resynchronizes
    last_time_ms: Option<u64>,

    falling: bool,
    fall_start_time_ms: u64,
    /// Remaining jump impulse, counts down by elapsed milliseconds
    jump_force: f32,

    last_triangle: Option<Triangle>,
    last_hit_position: Option<Vec3>,
    warned_missing_world: bool,
}

impl CollisionResponseAnimator {
    /// Animator colliding with `world`, default tuning
    pub fn new(world: SelectorId) -> Self {
        Self::from_config(world, &CollisionResponseConfig::default())
    }

    /// Animator colliding with `world`, tuned by `config`
    pub fn from_config(world: SelectorId, config: &CollisionResponseConfig) -> Self {
        Self {
            world,
            radius: config.ellipsoid_radius,
            gravity: config.gravity,
            translation: config.ellipsoid_translation,
            sliding_speed: config.sliding_speed,
            gravity_enabled: config.gravity_enabled,
            follow_ground_inclination: config.follow_ground_inclination,
            last_position: Vec3::zeros(),
            last_time_ms: None,
            falling: false,
            fall_start_time_ms: 0,
            jump_force: 0.0,
            last_triangle: None,
            last_hit_position: None,
            warned_missing_world: false,
        }
    }

    /// True while nothing is below the ellipsoid
    pub fn is_falling(&self) -> bool {
        self.falling
    }

    /// Time the current fall started, `None` while grounded
    pub fn fall_start_time(&self) -> Option<u64> {
        self.falling.then_some(self.fall_start_time_ms)
    }

    /// Start a jump unless one is still in progress
    pub fn jump(&mut self, speed: f32) {
        if self.jump_force == 0.0 {
            self.jump_force = speed * JUMP_FORCE_SCALE;
        }
    }

    /// Remaining jump force
    pub fn jump_force(&self) -> f32 {
        self.jump_force
    }

    /// Forget the last position; the next tick takes the node's position as is
    ///
    /// Call after teleporting the node so the jump is not swept as movement.
    pub fn reset(&mut self) {
        self.last_time_ms = None;
    }

    /// World geometry selector
    pub fn world(&self) -> SelectorId {
        self.world
    }

    /// Collide with a different world selector
    pub fn set_world(&mut self, world: SelectorId) {
        self.world = world;
        self.warned_missing_world = false;
    }

    /// Ellipsoid radii
    pub fn ellipsoid_radius(&self) -> Vec3 {
        self.radius
    }

    /// Set the ellipsoid radii
    pub fn set_ellipsoid_radius(&mut self, radius: Vec3) {
        self.radius = radius;
    }

    /// Gravity acceleration, units per second squared
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Set the gravity acceleration
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    /// Offset from the node's pivot to the ellipsoid center
    pub fn ellipsoid_translation(&self) -> Vec3 {
        self.translation
    }

    /// Set the pivot to ellipsoid center offset
    pub fn set_ellipsoid_translation(&mut self, translation: Vec3) {
        self.translation = translation;
    }

    /// Effective sliding-speed epsilon in world units
    pub fn sliding_speed(&self) -> f32 {
        self.sliding_speed.unwrap_or_else(|| default_sliding_speed(&self.radius))
    }

    /// Pin the sliding speed, or derive it from the radius again with `None`
    pub fn set_sliding_speed(&mut self, sliding_speed: Option<f32>) {
        self.sliding_speed = sliding_speed;
    }

    /// Whether gravity is integrated
    pub fn gravity_enabled(&self) -> bool {
        self.gravity_enabled
    }

    /// Turn gravity on or off
    pub fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity_enabled = enabled;
    }

    /// Whether the node is tilted to the ground under it
    pub fn follow_ground_inclination(&self) -> bool {
        self.follow_ground_inclination
    }

    /// Turn ground-inclination following on or off
    pub fn set_follow_ground_inclination(&mut self, follow: bool) {
        self.follow_ground_inclination = follow;
    }

    /// Triangle hit by the last tick, world space
    pub fn last_triangle(&self) -> Option<&Triangle> {
        self.last_triangle.as_ref()
    }

    /// Contact point of the last tick, world space
    pub fn last_hit_position(&self) -> Option<Vec3> {
        self.last_hit_position
    }

    /// Advance to `time_ms` and report the corrected node placement
    pub fn animate(&mut self, node: NodeId, scene: &SceneManager, time_ms: u64) -> NodeUpdate {
        let Some(scene_node) = scene.node(node) else {
            return NodeUpdate::default();
        };
        let position = scene_node.position();

        let Some(last_time_ms) = self.last_time_ms else {
            self.last_position = position;
            self.last_time_ms = Some(time_ms);
            self.falling = false;
            self.jump_force = 0.0;
            return NodeUpdate::default();
        };

        let dt_ms = time_ms.saturating_sub(last_time_ms);
        if dt_ms == 0 {
            return NodeUpdate::default();
        }
        self.last_time_ms = Some(time_ms);

        let Some(world) = scene.selector(self.world) else {
            if !self.warned_missing_world {
                log::warn!("Collision animator on {:?} references missing selector {:?}", node, self.world);
                self.warned_missing_world = true;
            }
            self.last_position = position;
            return NodeUpdate::default();
        };

        let mut velocity = position - self.last_position;
        let gravity = self.frame_gravity(time_ms, dt_ms);

        if self.jump_force > 0.0 {
            velocity.y += self.jump_force * JUMP_LIFT_SCALE * dt_ms as f32;
            self.jump_force = (self.jump_force - dt_ms as f32).max(0.0);
        }

        let sweep = EllipsoidSweep {
            position: self.last_position + self.translation,
            radius: self.radius,
            velocity,
            gravity,
            sliding_speed: self.sliding_speed(),
        };
        let result = SceneCollisionManager::new(scene).collision_result_position(world, &sweep, Some(node));
        let new_position = result.position - self.translation;

        if result.falling && !self.falling {
            self.fall_start_time_ms = time_ms;
            log::debug!("{:?} started falling at {} ms", node, time_ms);
        } else if !result.falling && self.falling {
            log::debug!("{:?} landed after {} ms", node, time_ms.saturating_sub(self.fall_start_time_ms));
        }
        self.falling = result.falling;
        self.last_triangle = result.triangle;
        self.last_hit_position = result.hit_position;
        self.last_position = new_position;

        let rotation = if self.follow_ground_inclination && !result.falling {
            result
                .triangle
                .filter(|triangle| !triangle.is_degenerate())
                .map(|triangle| ground_rotation(&triangle, scene_node.transform.yaw()))
        } else {
            None
        };

        NodeUpdate { position: Some(new_position), rotation }
    }

    /// Gravity displacement for this tick
    fn frame_gravity(&self, time_ms: u64, dt_ms: u64) -> Vec3 {
        if !self.gravity_enabled {
            return Vec3::zeros();
        }

        let dt = dt_ms as f32 / 1000.0;
        if self.falling {
            let fall_secs = time_ms.saturating_sub(self.fall_start_time_ms) as f32 / 1000.0;
            return self.gravity * dt * fall_secs.clamp(dt, MAX_FALL_RAMP_SECS);
        }

        // Grounded: a light pull, but long enough in ellipsoid space to reach
        // a surface the previous tick left the ellipsoid resting on
        let pull = self.gravity * dt * GROUNDED_GRAVITY_FACTOR;
        let e_length = pull.component_div(&self.radius).magnitude();
        let min_length = 2.0 * self.sliding_speed() / self.radius.min();
        if e_length > 0.0 && e_length < min_length {
            pull * (min_length / e_length)
        } else {
            pull
        }
    }
}

/// Rotation standing the node on `ground` while keeping its heading
fn ground_rotation(ground: &Triangle, yaw: f32) -> Quat {
    let mut normal = ground.normal();
    if normal.y < 0.0 {
        normal = -normal;
    }

    let tilt = Quat::rotation_between(&Vec3::y(), &normal).unwrap_or_else(Quat::identity);
    tilt * Quat::from_axis_angle(&Vec3::y_axis(), yaw)
}
