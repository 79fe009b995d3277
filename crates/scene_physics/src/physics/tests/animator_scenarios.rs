use approx::assert_relative_eq;

use super::{floor, wall, world};
use crate::config::CollisionResponseConfig;
use crate::foundation::math::Vec3;
use crate::geometry::{Triangle, AABB};
use crate::physics::{BoundingBoxTriangleSelector, CollisionResponseAnimator, MeshTriangleSelector, MetaTriangleSelector};
use crate::scene::{NodeId, SceneManager, SceneNode, SelectorId, VelocityAnimator};

const TICK_MS: u64 = 16;

fn player_config() -> CollisionResponseConfig {
    CollisionResponseConfig { ellipsoid_radius: Vec3::repeat(10.0), ..Default::default() }
}

fn spawn_player(scene: &mut SceneManager, world: SelectorId, position: Vec3) -> NodeId {
    let animator = CollisionResponseAnimator::from_config(world, &player_config());
    scene.add_node(SceneNode::new("player").with_position(position).with_animator(animator))
}

/// Tick the scene every `TICK_MS` from `from` through `to`
fn run(scene: &mut SceneManager, from: u64, to: u64, mut on_tick: impl FnMut(&SceneManager)) {
    let mut time = from;
    while time <= to {
        scene.animate(time);
        on_tick(scene);
        time += TICK_MS;
    }
}

fn position(scene: &SceneManager, node: NodeId) -> Vec3 {
    scene.node(node).unwrap().position()
}

#[test]
fn test_falls_then_rests_on_floor() {
    let (mut scene, world) = world(vec![floor()]);
    let player = spawn_player(&mut scene, world, Vec3::new(0.0, 100.0, 0.0));

    let mut fall_start = None;
    run(&mut scene, 0, 5000, |scene| {
        let animator = scene.collision_response(player).unwrap();
        if fall_start.is_none() {
            fall_start = animator.fall_start_time();
        }
    });

    assert_eq!(fall_start, Some(16));

    let animator = scene.collision_response(player).unwrap();
    assert!(!animator.is_falling());
    assert!(animator.fall_start_time().is_none());
    assert_relative_eq!(animator.last_triangle().unwrap().normal(), Vec3::y(), epsilon = 1e-6);

    let resting = position(&scene, player);
    assert!((10.0..10.1).contains(&resting.y), "resting at {:?}", resting);
    assert_relative_eq!(resting.x, 0.0, epsilon = 1e-4);
}

#[test]
fn test_walking_into_wall_stops_at_one_radius() {
    let (mut scene, world) = world(vec![floor(), wall(50.0)]);
    let player = spawn_player(&mut scene, world, Vec3::new(0.0, 10.5, 0.0));
    scene
        .node_mut(player)
        .unwrap()
        .animators_mut()
        .insert(0, VelocityAnimator::new(Vec3::new(100.0, 0.0, 0.0)).into());

    run(&mut scene, 0, 2000, |scene| {
        let p = position(scene, player);
        assert!(p.x <= 40.0 + 1e-3, "went through the wall: {:?}", p);
        assert!(p.y >= 10.0 - 1e-3, "sank into the floor: {:?}", p);
    });

    let stopped = position(&scene, player);
    assert!(stopped.x > 39.9);
    assert!(stopped.y < 10.1);
    assert!(!scene.collision_response(player).unwrap().is_falling());
}

#[test]
fn test_jump_lifts_then_lands() {
    let (mut scene, world) = world(vec![floor()]);
    let player = spawn_player(&mut scene, world, Vec3::new(0.0, 10.5, 0.0));
    run(&mut scene, 0, 1000, |_| {});
    assert!(!scene.collision_response(player).unwrap().is_falling());

    scene.collision_response_mut(player).unwrap().jump(3.0);

    let mut peak: f32 = 0.0;
    let mut airborne = false;
    run(&mut scene, 1016, 1600, |scene| {
        peak = peak.max(position(scene, player).y);
        airborne |= scene.collision_response(player).unwrap().is_falling();
    });
    assert!(peak > 25.0, "peak only {}", peak);
    assert!(airborne);
    assert_relative_eq!(scene.collision_response(player).unwrap().jump_force(), 0.0);

    run(&mut scene, 1616, 6000, |_| {});
    let landed = position(&scene, player);
    assert!((10.0..10.1).contains(&landed.y), "landed at {:?}", landed);
    assert!(!scene.collision_response(player).unwrap().is_falling());
}

#[test]
fn test_reset_turns_teleport_into_a_jump_cut() {
    let teleport = |reset: bool| {
        let (mut scene, world) = world(vec![floor(), wall(50.0)]);
        let player = spawn_player(&mut scene, world, Vec3::new(0.0, 10.5, 0.0));
        run(&mut scene, 0, 1000, |_| {});

        scene.node_mut(player).unwrap().set_position(Vec3::new(200.0, 10.5, 0.0));
        if reset {
            scene.collision_response_mut(player).unwrap().reset();
        }
        run(&mut scene, 1016, 1500, |_| {});
        position(&scene, player)
    };

    // Without a reset the teleport is swept as movement and the wall blocks it
    assert!(teleport(false).x < 41.0);

    let moved = teleport(true);
    assert_relative_eq!(moved.x, 200.0, epsilon = 1e-3);
    assert!((10.0..10.1).contains(&moved.y));
}

#[test]
fn test_missing_world_leaves_node_alone() {
    let (mut scene, world) = world(vec![floor()]);
    let player = spawn_player(&mut scene, world, Vec3::new(0.0, 100.0, 0.0));
    scene.remove_selector(world).unwrap();

    run(&mut scene, 0, 500, |_| {});
    assert_eq!(position(&scene, player), Vec3::new(0.0, 100.0, 0.0));
    assert!(!scene.collision_response(player).unwrap().is_falling());

    // Pointing it at real geometry resumes normal behaviour
    let floor_selector = scene.add_selector(Box::new(MeshTriangleSelector::new(None, vec![floor()])));
    scene.collision_response_mut(player).unwrap().set_world(floor_selector);
    run(&mut scene, 516, 700, |_| {});
    assert!(position(&scene, player).y < 100.0);
}

#[test]
fn test_disabled_gravity_hovers() {
    let (mut scene, world) = world(vec![floor()]);
    let config = CollisionResponseConfig { gravity_enabled: false, ..player_config() };
    let animator = CollisionResponseAnimator::from_config(world, &config);
    let player = scene.add_node(SceneNode::new("drone").with_position(Vec3::new(0.0, 100.0, 0.0)).with_animator(animator));

    run(&mut scene, 0, 1000, |_| {});

    assert_eq!(position(&scene, player), Vec3::new(0.0, 100.0, 0.0));
    assert!(!scene.collision_response(player).unwrap().is_falling());
}

#[test]
fn test_ellipsoid_translation_offsets_the_pivot() {
    let (mut scene, world) = world(vec![floor()]);
    let player = spawn_player(&mut scene, world, Vec3::new(0.0, 50.0, 0.0));
    // Pivot at the feet, ellipsoid center one radius above
    scene
        .collision_response_mut(player)
        .unwrap()
        .set_ellipsoid_translation(Vec3::new(0.0, 10.0, 0.0));

    run(&mut scene, 0, 4000, |_| {});

    let feet = position(&scene, player);
    assert!((0.0..0.1).contains(&feet.y), "feet at {:?}", feet);
}

#[test]
fn test_follows_ramp_inclination() {
    // 30 degree ramp rising towards +X through the origin
    let rise = 1000.0 * 30f32.to_radians().tan();
    let ramp = Triangle::new(
        Vec3::new(-1000.0, -rise, -1000.0),
        Vec3::new(-1000.0, -rise, 3000.0),
        Vec3::new(3000.0, 3.0 * rise, -1000.0),
    );
    assert_relative_eq!(ramp.normal(), Vec3::new(-0.5, 3f32.sqrt() / 2.0, 0.0), epsilon = 1e-4);

    let (mut scene, world) = world(vec![ramp]);
    let config = CollisionResponseConfig { follow_ground_inclination: true, ..player_config() };
    let animator = CollisionResponseAnimator::from_config(world, &config);
    let player = scene.add_node(SceneNode::new("player").with_position(Vec3::new(0.0, 40.0, 0.0)).with_animator(animator));

    run(&mut scene, 0, 3000, |_| {});

    assert!(!scene.collision_response(player).unwrap().is_falling());
    let up = scene.node(player).unwrap().rotation() * Vec3::y();
    assert_relative_eq!(up, ramp.normal(), epsilon = 1e-3);
}

#[test]
fn test_own_proxy_is_ignored_but_others_block() {
    let mut scene = SceneManager::new();
    let crate_node = scene.add_node(
        SceneNode::new("crate")
            .with_position(Vec3::new(0.0, 20.0, 0.0))
            .with_bounding_box(AABB::new(Vec3::new(-20.0, -5.0, -20.0), Vec3::new(20.0, 5.0, 20.0))),
    );
    let player = scene.add_node(
        SceneNode::new("player")
            .with_position(Vec3::new(0.0, 100.0, 0.0))
            .with_bounding_box(AABB::from_center_extents(Vec3::zeros(), Vec3::repeat(10.0))),
    );

    let ground = scene.add_selector(Box::new(MeshTriangleSelector::new(None, vec![floor()])));
    let crate_proxy = scene.add_selector(Box::new(BoundingBoxTriangleSelector::new(crate_node)));
    let player_proxy = scene.add_selector(Box::new(BoundingBoxTriangleSelector::new(player)));
    scene.set_node_selector(crate_node, Some(crate_proxy)).unwrap();
    scene.set_node_selector(player, Some(player_proxy)).unwrap();

    let level = scene.add_selector(Box::new(MetaTriangleSelector::new()));
    let meta = scene.meta_selector_mut(level).unwrap();
    meta.add_selector(ground);
    meta.add_selector(crate_proxy);
    meta.add_selector(player_proxy);

    let animator = CollisionResponseAnimator::from_config(level, &player_config());
    scene.node_mut(player).unwrap().add_animator(animator);
    scene.update_absolute_transforms();

    run(&mut scene, 0, 4000, |_| {});

    // Standing on the crate top at y = 25
    let standing = position(&scene, player);
    assert!((35.0..35.1).contains(&standing.y), "standing at {:?}", standing);
    assert!(!scene.collision_response(player).unwrap().is_falling());
}
