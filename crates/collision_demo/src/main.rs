//! Collision Response Demo
//!
//! Scripted walk through a small level:
//! - The player starts on a raised platform and walks off its edge
//! - Halfway across the ground it jumps once
//! - It ends up pressed against the wall at the far end
//! - Finally it is teleported back onto the platform
//!
//! Position and falling state are logged twice a second. An optional
//! first argument names a `.toml` or `.ron` physics config file.

use scene_physics::prelude::*;

// Level layout
const GROUND_HALF_SIZE: f32 = 1000.0;
const GROUND_CELLS: u32 = 20;
const WALL_X: f32 = 600.0;
const WALL_HEIGHT: f32 = 300.0;
const PLATFORM_CENTER: Vec3 = Vec3::new(-450.0, 50.0, 0.0);
const PLATFORM_EXTENTS: Vec3 = Vec3::new(150.0, 50.0, 200.0);
const PLAYER_START: Vec3 = Vec3::new(-450.0, 200.0, 0.0);

// Script, all times on the 16 ms tick grid
const TICK_MS: u64 = 16;
const LOG_INTERVAL_MS: u64 = 500;
const WALK_START_MS: u64 = 1008;
const JUMP_MS: u64 = 4000;
const TELEPORT_MS: u64 = 12000;
const SCRIPT_END_MS: u64 = 13008;

const WALK_SPEED: f32 = 150.0;
const JUMP_SPEED: f32 = 4.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading physics config from {}", path);
            PhysicsConfig::load_from_file(&path)?
        }
        None => PhysicsConfig::default(),
    };

    let mut scene = SceneManager::new();
    let level = build_level(&mut scene, &config)?;

    let player = scene.add_node(
        SceneNode::new("player")
            .with_position(PLAYER_START)
            .with_animator(VelocityAnimator::new(Vec3::zeros()))
            .with_animator(CollisionResponseAnimator::from_config(level, &config.collision_response)),
    );

    run_script(&mut scene, player);
    report_ground(&scene, player, level);

    Ok(())
}

/// Ground grid in an octree, a wall mesh and a box platform, combined in one meta selector
fn build_level(scene: &mut SceneManager, config: &PhysicsConfig) -> Result<SelectorId, SceneError> {
    let ground_mesh = ground_mesh()?;
    let ground = OctreeTriangleSelector::from_mesh(None, &ground_mesh, &config.octree);
    log::info!(
        "Ground: {} triangles in {} octree nodes",
        ground.octree().triangle_count(),
        ground.octree().node_count()
    );
    let ground = scene.add_selector(Box::new(ground));

    let wall = scene.add_selector(Box::new(MeshTriangleSelector::from_mesh(None, &wall_mesh()?)));

    let platform = scene.add_node(
        SceneNode::new("platform")
            .with_position(PLATFORM_CENTER)
            .with_bounding_box(AABB::from_center_extents(Vec3::zeros(), PLATFORM_EXTENTS)),
    );
    let platform_proxy = scene.add_selector(Box::new(BoundingBoxTriangleSelector::new(platform)));
    scene.set_node_selector(platform, Some(platform_proxy))?;

    scene.update_absolute_transforms();

    Ok(scene.add_selector(Box::new(MetaTriangleSelector::with_selectors(vec![
        ground,
        wall,
        platform_proxy,
    ]))))
}

/// Flat grid at y = 0, facing up
fn ground_mesh() -> Result<IndexedMesh, SceneError> {
    let cell = 2.0 * GROUND_HALF_SIZE / GROUND_CELLS as f32;
    let row = GROUND_CELLS + 1;

    let mut vertices = Vec::with_capacity((row * row) as usize);
    for i in 0..row {
        for j in 0..row {
            vertices.push(Vec3::new(
                -GROUND_HALF_SIZE + i as f32 * cell,
                0.0,
                -GROUND_HALF_SIZE + j as f32 * cell,
            ));
        }
    }

    let mut indices = Vec::with_capacity((GROUND_CELLS * GROUND_CELLS * 6) as usize);
    for i in 0..GROUND_CELLS {
        for j in 0..GROUND_CELLS {
            let a = i * row + j;
            let b = a + 1;
            let c = b + row;
            let d = a + row;
            indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }

    IndexedMesh::from_indexed(&vertices, &indices)
}

/// Quad in the plane x = WALL_X, facing -X
fn wall_mesh() -> Result<IndexedMesh, SceneError> {
    let vertices = [
        Vec3::new(WALL_X, 0.0, -GROUND_HALF_SIZE),
        Vec3::new(WALL_X, 0.0, GROUND_HALF_SIZE),
        Vec3::new(WALL_X, WALL_HEIGHT, GROUND_HALF_SIZE),
        Vec3::new(WALL_X, WALL_HEIGHT, -GROUND_HALF_SIZE),
    ];
    IndexedMesh::from_indexed(&vertices, &[0, 1, 3, 1, 2, 3])
}

fn run_script(scene: &mut SceneManager, player: NodeId) {
    let mut next_log_ms = 0;
    let mut time_ms = 0;

    while time_ms <= SCRIPT_END_MS {
        match time_ms {
            WALK_START_MS => {
                log::info!("Walking towards +X at {} units/s", WALK_SPEED);
                set_walk_velocity(scene, player, Vec3::new(WALK_SPEED, 0.0, 0.0));
            }
            JUMP_MS => {
                log::info!("Jump");
                if let Some(response) = scene.collision_response_mut(player) {
                    response.jump(JUMP_SPEED);
                }
            }
            TELEPORT_MS => {
                log::info!("Teleporting back onto the platform");
                set_walk_velocity(scene, player, Vec3::zeros());
                if let Some(node) = scene.node_mut(player) {
                    node.set_position(PLAYER_START);
                }
                if let Some(response) = scene.collision_response_mut(player) {
                    response.reset();
                }
            }
            _ => {}
        }

        scene.animate(time_ms);

        if time_ms >= next_log_ms {
            log_state(scene, player, time_ms);
            next_log_ms += LOG_INTERVAL_MS;
        }

        time_ms += TICK_MS;
    }
}

fn set_walk_velocity(scene: &mut SceneManager, player: NodeId, velocity: Vec3) {
    let Some(node) = scene.node_mut(player) else {
        return;
    };
    if let Some(walker) = node.animators_mut().iter_mut().find_map(Animator::as_velocity_mut) {
        walker.set_velocity(velocity);
    }
}

fn log_state(scene: &SceneManager, player: NodeId, time_ms: u64) {
    let (Some(node), Some(response)) = (scene.node(player), scene.collision_response(player)) else {
        return;
    };
    let p = node.position();
    log::info!(
        "t={:>5} ms  pos=({:>7.1}, {:>6.1}, {:>5.1})  falling={}",
        time_ms,
        p.x,
        p.y,
        p.z,
        response.is_falling()
    );
}

/// Line pick straight down from the player, ignoring its own geometry
fn report_ground(scene: &SceneManager, player: NodeId, level: SelectorId) {
    let Some(node) = scene.node(player) else {
        return;
    };
    let start = node.position();
    let line = Line3::new(start, start - Vec3::new(0.0, 1000.0, 0.0));

    match SceneCollisionManager::new(scene).collision_point(&line, level, true, Some(player)) {
        Some(hit) => log::info!("Ground below the player at y = {:.1}", hit.point.y),
        None => log::warn!("Nothing below the player"),
    }
}
