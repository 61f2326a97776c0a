use cgmath::{Point3, Vector3};
use voxel_world::config::PhysicsConfig;
use voxel_world::engine_state::physics::{
    resolve_entity_collision, Entity, EntityKind, PhysicsBody, PhysicsIntegrator,
};
use voxel_world::engine_state::voxels::{block::block_type::BlockType, world::World};
use web_time::Duration;

const DT: Duration = Duration::from_micros(16_667);

/// Stone floor at y = 0 with a one block high platform from x = 3 to the edge.
fn ledge_world() -> World {
    let mut world = World::new([2, 1, 2], 8);
    let (min, max) = world.block_bounds();
    for z in min.z..max.z {
        for x in min.x..max.x {
            world.set_block_at(Point3::new(x, 0, z), BlockType::Stone.id());
            if x >= 3 {
                world.set_block_at(Point3::new(x, 1, z), BlockType::Stone.id());
            }
        }
    }
    world
}

#[test]
fn walking_into_a_ledge_steps_up_one_block() {
    let world = ledge_world();
    let integrator = PhysicsIntegrator::new(PhysicsConfig::default());
    let start_y = 1.9;
    let mut player = Entity::new(EntityKind::Player, Point3::new(2.0, start_y, 0.5));

    let mut stepped = false;
    for _ in 0..120 {
        if player.position.x < 4.5 {
            player.velocity.x = 4.0;
        }
        integrator.tick(&mut player, &world, DT);
        stepped |= player.step_remaining > 0.0;
        assert!(player.velocity.y <= 0.0, "body was launched upwards");
    }

    assert!(stepped);
    assert!(player.position.x > 3.3);
    assert!((player.position.y - (start_y + 1.0)).abs() < 1e-2);
    assert!(player.on_ground);
    assert_eq!(player.step_remaining, 0.0);
}

#[test]
fn two_block_wall_blocks_the_step() {
    let mut world = ledge_world();
    for z in -8..8 {
        world.set_block_at(Point3::new(3, 2, z), BlockType::Stone.id());
    }
    let integrator = PhysicsIntegrator::new(PhysicsConfig::default());
    let mut player = Entity::new(EntityKind::Player, Point3::new(2.0, 1.9, 0.5));

    for _ in 0..90 {
        player.velocity.x = 4.0;
        integrator.tick(&mut player, &world, DT);
    }
    assert!(player.position.x <= 2.7 + 1e-3);
    assert!((player.position.y - 1.9).abs() < 1e-2);
}

#[test]
fn nearby_animals_are_pushed_apart_on_the_ground() {
    let world = ledge_world();
    let integrator = PhysicsIntegrator::new(PhysicsConfig::default());
    let mut boar = Entity::new(EntityKind::Boar, Point3::new(-2.0, 1.45, 0.5));
    let mut rabbit = Entity::new(EntityKind::Rabbit, Point3::new(-1.7, 1.25, 0.5));
    boar.velocity = Vector3::new(1.0, 0.0, 0.0);

    for _ in 0..30 {
        integrator.tick(&mut boar, &world, DT);
        integrator.tick(&mut rabbit, &world, DT);
        resolve_entity_collision(&mut boar, &mut rabbit);
    }
    let gap = rabbit.bounding_box().min.x - boar.bounding_box().max.x;
    assert!(gap > -1e-4);
    assert!(rabbit.position.x > -1.7);
}
