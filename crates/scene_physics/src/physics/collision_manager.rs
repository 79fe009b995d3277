//! Swept ellipsoid collision ("collide and slide")
//!
//! World coordinates are divided by the ellipsoid's radii, turning the
//! ellipsoid into a unit sphere ("ellipsoid space"). The sphere is swept
//! along its velocity against every candidate triangle; on the nearest hit
//! it stops just short of the contact and the remaining movement is
//! projected onto the sliding plane at the contact point. That repeats up
//! to a fixed recursion depth.
//!
//! A full resolution runs two independent sweeps: the intended movement
//! first, then gravity from wherever the first sweep ended. Whether the
//! gravity sweep touched ground decides the falling state.

use super::selector::{LineHit, TriangleQuery, TriangleSelector};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::geometry::{Line3, Plane, Triangle, AABB};
use crate::scene::{NodeId, SceneManager, SelectorId};

/// Sweeps deeper than this fall back to an epsilon step
const MAX_RECURSION_DEPTH: u32 = 5;

/// Tolerance for "velocity runs parallel to the triangle plane"
const PARALLEL_EPSILON: f32 = 1e-6;

/// Default sliding-speed epsilon per unit of radius length
pub const SLIDING_SPEED_FACTOR: f32 = 0.001;

/// Input of one collision resolution, in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipsoidSweep {
    /// Center of the ellipsoid
    pub position: Vec3,
    /// Ellipsoid radii per axis
    pub radius: Vec3,
    /// Intended movement this tick
    pub velocity: Vec3,
    /// Gravity displacement this tick, swept separately after `velocity`
    pub gravity: Vec3,
    /// How far to stay away from surfaces, in WORLD units
    ///
    /// The solver divides it by the smallest radius to get its
    /// ellipsoid-space back-off distance.
    pub sliding_speed: f32,
}

impl EllipsoidSweep {
    /// Sweep with the default sliding speed derived from `radius`
    pub fn new(position: Vec3, radius: Vec3, velocity: Vec3, gravity: Vec3) -> Self {
        Self {
            position,
            radius,
            velocity,
            gravity,
            sliding_speed: default_sliding_speed(&radius),
        }
    }
}

/// Sliding-speed epsilon used when none is configured
pub fn default_sliding_speed(radius: &Vec3) -> f32 {
    radius.magnitude() * SLIDING_SPEED_FACTOR
}

/// Outcome of one collision resolution, in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Corrected ellipsoid center
    pub position: Vec3,
    /// True when the gravity sweep found no ground to stand on
    pub falling: bool,
    /// Nearest triangle hit by the last sweep that hit anything
    pub triangle: Option<Triangle>,
    /// Contact point on that triangle
    pub hit_position: Option<Vec3>,
}

impl CollisionResult {
    fn unchanged(position: Vec3) -> Self {
        Self { position, falling: false, triangle: None, hit_position: None }
    }
}

/// Transient per-resolution state, all vectors in ellipsoid space
#[derive(Debug, Clone)]
pub(crate) struct CollisionData {
    /// World-to-ellipsoid-space scale applied to candidate triangles
    scale: Mat4,
    pub(crate) radius: Vec3,
    pub(crate) sliding_speed: f32,
    exclude: Option<NodeId>,

    velocity: Vec3,
    normalized_velocity: Vec3,
    base_point: Vec3,

    found_collision: bool,
    nearest_distance: f32,
    pub(crate) intersection_point: Vec3,
    pub(crate) intersection_triangle: Option<Triangle>,
    pub(crate) triangle_hits: u32,

    /// Candidate buffer reused across recursion steps
    candidates: Vec<Triangle>,
}

impl CollisionData {
    /// State for sweeping an ellipsoid of `radius`; `sliding_speed` is in world units
    pub(crate) fn new(radius: Vec3, sliding_speed: f32, exclude: Option<NodeId>) -> Self {
        Self {
            scale: Mat4::new_inverse_scaling(&radius),
            radius,
            // Longest ellipsoid-space length a world step of this size can have
            sliding_speed: sliding_speed / radius.min(),
            exclude,
            velocity: Vec3::zeros(),
            normalized_velocity: Vec3::zeros(),
            base_point: Vec3::zeros(),
            found_collision: false,
            nearest_distance: f32::MAX,
            intersection_point: Vec3::zeros(),
            intersection_triangle: None,
            triangle_hits: 0,
            candidates: Vec::new(),
        }
    }

    /// Sweep the unit sphere at `base_point` along `velocity` against one triangle
    ///
    /// Records the hit when it is nearer than anything found so far in this
    /// step and returns whether it did.
    pub(crate) fn test_triangle(&mut self, triangle: &Triangle) -> bool {
        if triangle.is_degenerate() || !triangle.is_front_facing(&self.normalized_velocity) {
            return false;
        }

        let plane = triangle.plane();
        let signed_distance = plane.distance_to_point(self.base_point);
        let normal_dot_velocity = plane.normal.dot(&self.velocity);

        // Interval of the sweep during which the sphere touches the plane
        let embedded_in_plane = normal_dot_velocity.abs() <= PARALLEL_EPSILON;
        let t0 = if embedded_in_plane {
            if signed_distance.abs() >= 1.0 {
                return false;
            }
            0.0
        } else {
            let inverse = 1.0 / normal_dot_velocity;
            let mut t0 = (-1.0 - signed_distance) * inverse;
            let mut t1 = (1.0 - signed_distance) * inverse;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t0 > 1.0 || t1 < 0.0 {
                return false;
            }
            t0.clamp(0.0, 1.0)
        };

        let mut hit: Option<(f32, Vec3)> = None;

        // Sphere touches the inside of the triangle first
        if !embedded_in_plane {
            let plane_point = self.base_point - plane.normal + self.velocity * t0;
            if triangle.is_point_inside(&plane_point) {
                hit = Some((t0, plane_point));
            }
        }

        // Otherwise against the vertices, then the edges
        if hit.is_none() {
            hit = self.sweep_vertices_and_edges(triangle);
        }

        let Some((t, point)) = hit else {
            return false;
        };

        let distance = t * self.velocity.magnitude();
        if self.found_collision && distance >= self.nearest_distance {
            return false;
        }

        self.found_collision = true;
        self.nearest_distance = distance;
        self.intersection_point = point;
        self.intersection_triangle = Some(*triangle);
        self.triangle_hits += 1;
        true
    }

    /// Earliest contact with a vertex or edge within the whole sweep
    fn sweep_vertices_and_edges(&self, triangle: &Triangle) -> Option<(f32, Vec3)> {
        let velocity = self.velocity;
        let base = self.base_point;
        let velocity_squared = velocity.magnitude_squared();

        let mut t = 1.0;
        let mut point = None;

        for vertex in [triangle.v0, triangle.v1, triangle.v2] {
            let a = velocity_squared;
            let b = 2.0 * velocity.dot(&(base - vertex));
            let c = (vertex - base).magnitude_squared() - 1.0;
            if let Some(root) = lowest_root(a, b, c, t) {
                t = root;
                point = Some(vertex);
            }
        }

        for (start, end) in [(triangle.v0, triangle.v1), (triangle.v1, triangle.v2), (triangle.v2, triangle.v0)] {
            let edge = end - start;
            let base_to_vertex = start - base;
            let edge_squared = edge.magnitude_squared();
            let edge_dot_velocity = edge.dot(&velocity);
            let edge_dot_base_to_vertex = edge.dot(&base_to_vertex);

            let a = edge_squared * -velocity_squared + edge_dot_velocity * edge_dot_velocity;
            let b = edge_squared * (2.0 * velocity.dot(&base_to_vertex))
                - 2.0 * edge_dot_velocity * edge_dot_base_to_vertex;
            let c = edge_squared * (1.0 - base_to_vertex.magnitude_squared())
                + edge_dot_base_to_vertex * edge_dot_base_to_vertex;

            if let Some(root) = lowest_root(a, b, c, t) {
                // Position of the contact along the edge, must lie on the segment
                let f = (edge_dot_velocity * root - edge_dot_base_to_vertex) / edge_squared;
                if (0.0..=1.0).contains(&f) {
                    t = root;
                    point = Some(start + edge * f);
                }
            }
        }

        point.map(|point| (t, point))
    }
}

/// Smallest root of `a·t² + b·t + c = 0` inside `(0, max_root)`
///
/// Negative discriminants and a vanishing `a` mean "no collision".
pub(crate) fn lowest_root(a: f32, b: f32, c: f32, max_root: f32) -> Option<f32> {
    let determinant = b * b - 4.0 * a * c;
    if determinant < 0.0 || a == 0.0 {
        return None;
    }

    let sqrt_d = determinant.sqrt();
    let mut r1 = (-b - sqrt_d) / (2.0 * a);
    let mut r2 = (-b + sqrt_d) / (2.0 * a);
    if r1 > r2 {
        std::mem::swap(&mut r1, &mut r2);
    }

    if r1 > 0.0 && r1 < max_root {
        return Some(r1);
    }
    if r2 > 0.0 && r2 < max_root {
        return Some(r2);
    }
    None
}

/// Scene-level collision queries
#[derive(Debug, Clone, Copy)]
pub struct SceneCollisionManager<'a> {
    scene: &'a SceneManager,
}

impl<'a> SceneCollisionManager<'a> {
    /// Collision queries against `scene`
    pub fn new(scene: &'a SceneManager) -> Self {
        Self { scene }
    }

    /// Move an ellipsoid through the world, sliding along what it hits
    ///
    /// Geometry belonging to `exclude` is ignored. Degenerate input (any
    /// radius component zero) returns the position unchanged.
    pub fn collision_result_position(
        &self,
        selector: &dyn TriangleSelector,
        sweep: &EllipsoidSweep,
        exclude: Option<NodeId>,
    ) -> CollisionResult {
        let radius = sweep.radius;
        if radius.x == 0.0 || radius.y == 0.0 || radius.z == 0.0 {
            return CollisionResult::unchanged(sweep.position);
        }

        let mut data = CollisionData::new(radius, sweep.sliding_speed, exclude);

        let e_position = sweep.position.component_div(&radius);
        let e_velocity = sweep.velocity.component_div(&radius);
        let mut final_position = self.collide_with_world(selector, &mut data, 0, e_position, e_velocity);

        let mut falling = false;
        if sweep.gravity != Vec3::zeros() {
            data.triangle_hits = 0;
            let e_gravity = sweep.gravity.component_div(&radius);
            final_position = self.collide_with_world(selector, &mut data, 0, final_position, e_gravity);

            falling = data.triangle_hits == 0;
            if !falling {
                // Resting against a wall does not count as standing
                let on_ground = data
                    .intersection_triangle
                    .map_or(false, |tri| is_y_dominant(&tri.scaled(&radius).raw_normal()));
                falling = !on_ground;
            }
        }

        let triangle = data.intersection_triangle.map(|tri| tri.scaled(&radius));
        let hit_position = triangle.map(|_| data.intersection_point.component_mul(&radius));

        let position = final_position.component_mul(&radius);
        log::trace!(
            "Ellipsoid sweep {:?} -> {:?}, falling: {}, hits: {}",
            sweep.position,
            position,
            falling,
            data.triangle_hits
        );

        CollisionResult { position, falling, triangle, hit_position }
    }

    /// One recursive collide-and-slide step, all vectors in ellipsoid space
    pub(crate) fn collide_with_world(
        &self,
        selector: &dyn TriangleSelector,
        data: &mut CollisionData,
        depth: u32,
        position: Vec3,
        velocity: Vec3,
    ) -> Vec3 {
        let very_close_distance = data.sliding_speed;

        if depth > MAX_RECURSION_DEPTH {
            log::trace!("Slide recursion cap reached at {:?}", position);
            let step = if velocity.magnitude() > very_close_distance {
                velocity.normalize() * very_close_distance
            } else {
                velocity
            };
            return position + step;
        }

        if velocity == Vec3::zeros() {
            return position;
        }

        data.velocity = velocity;
        data.normalized_velocity = velocity.normalize();
        data.base_point = position;
        data.found_collision = false;
        data.nearest_distance = f32::MAX;

        // Candidates around the world-space segment, delivered in ellipsoid space
        let radius = data.radius;
        let mut query_box = AABB::from_points(
            position.component_mul(&radius),
            (position + velocity).component_mul(&radius),
        );
        query_box.expand(radius);

        let scale = data.scale;
        let query = TriangleQuery::new(self.scene).with_transform(&scale).excluding(data.exclude);
        let mut candidates = std::mem::take(&mut data.candidates);
        candidates.clear();
        selector.triangles_in_box(&query_box, &query, &mut candidates);

        for triangle in &candidates {
            data.test_triangle(triangle);
        }
        data.candidates = candidates;

        if !data.found_collision {
            return position + velocity;
        }

        let destination = position + velocity;
        let mut new_base_point = position;

        // Stop just short of the contact
        if data.nearest_distance >= very_close_distance {
            let direction = velocity.normalize();
            new_base_point = data.base_point + direction * (data.nearest_distance - very_close_distance);
            data.intersection_point -= direction * very_close_distance;
        }

        let slide_origin = data.intersection_point;
        let slide_normal = (new_base_point - slide_origin).normalize();
        let sliding_plane = Plane::from_point_normal(slide_origin, slide_normal);

        let new_destination = destination - slide_normal * sliding_plane.distance_to_point(destination);
        let new_velocity = new_destination - slide_origin;

        if new_velocity.magnitude() < very_close_distance {
            return new_base_point;
        }

        self.collide_with_world(selector, data, depth + 1, new_base_point, new_velocity)
    }

    /// Nearest hit of `line` against the selector `selector`, `None` for unknown selectors
    pub fn collision_point(
        &self,
        line: &Line3,
        selector: SelectorId,
        ignore_back_faces: bool,
        exclude: Option<NodeId>,
    ) -> Option<LineHit> {
        let selector = self.scene.selector(selector)?;
        let query = TriangleQuery::new(self.scene).excluding(exclude);
        selector.collision_point_with_line(line, ignore_back_faces, &query)
    }
}

/// True when the Y component dominates the other two
fn is_y_dominant(normal: &Vec3) -> bool {
    normal.y.abs() >= normal.x.abs() && normal.y.abs() >= normal.z.abs()
}
