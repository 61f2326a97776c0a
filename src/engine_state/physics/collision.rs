//! # Collision
//!
//! Axis-aligned collision between bodies and the block grid, and between
//! pairs of bodies.
//!
//! World collisions are resolved iteratively: every solid block overlapping the
//! body's box is pushed out along its shallowest axis, and the box moves with
//! each correction before the next block is checked.
//!
//! A horizontal hit against a one-block ledge at foot level with two free blocks
//! above it does not stop the body. Instead the body keeps its horizontal
//! velocity and starts an auto-step, which the integrator turns into a smooth
//! one-block climb over the following ticks.

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::world::World;

use super::{bounding_box::BoundingBox, entity::PhysicsBody};

/// Height an auto-step climbs, in blocks.
pub const STEP_HEIGHT: f32 = 1.0;

/// Shrinks box maxima before flooring so a box touching a block face does not
/// count as overlapping it.
const MAX_EPSILON: f32 = 1e-4;

/// Slack used when deciding which block row a body's feet stand in.
const FOOT_EPSILON: f32 = 0.01;

const AXIS_Y: usize = 1;

/// Integer block coordinates overlapped by `bb`, inclusive.
pub fn overlapped_blocks(bb: &BoundingBox) -> (Point3<i32>, Point3<i32>) {
    let lo = Point3::new(
        bb.min.x.floor() as i32,
        bb.min.y.floor() as i32,
        bb.min.z.floor() as i32,
    );
    let hi = Point3::new(
        (bb.max.x - MAX_EPSILON).floor() as i32,
        (bb.max.y - MAX_EPSILON).floor() as i32,
        (bb.max.z - MAX_EPSILON).floor() as i32,
    );
    (lo, hi)
}

/// Whether a body whose feet are at `foot_y` can climb onto `obstruction`.
fn can_step(world: &World, obstruction: Point3<i32>, foot_y: f32) -> bool {
    (foot_y + FOOT_EPSILON).floor() as i32 == obstruction.y
        && !world.is_solid_at(obstruction + Vector3::new(0, 1, 0))
        && !world.is_solid_at(obstruction + Vector3::new(0, 2, 0))
}

/// Moves `body` towards `proposed` and returns the corrected position.
///
/// Side effects on `body`:
/// - velocity on a penetrated axis is zeroed, except for horizontal hits
///   that start or continue an auto-step
/// - the on-ground flag is set when a block pushed the body up
/// - the auto-step counter is armed when a ledge is hit
///
/// The body's position itself is not written; the caller decides what to do
/// with the result.
pub fn resolve_world_collision<B: PhysicsBody + ?Sized>(
    body: &mut B,
    world: &World,
    proposed: Point3<f32>,
) -> Point3<f32> {
    let dimensions = body.dimensions();
    let mut bb = BoundingBox::new(proposed, dimensions);
    let mut position = proposed;
    let mut velocity = body.velocity();
    let may_step = body.on_ground() || body.step_remaining() > 0.0;

    let (lo, hi) = overlapped_blocks(&bb);
    for x in lo.x..=hi.x {
        for y in lo.y..=hi.y {
            for z in lo.z..=hi.z {
                let block_position = Point3::new(x, y, z);
                if !world.is_solid_at(block_position) {
                    continue;
                }
                let block = BoundingBox::block(block_position);
                if !bb.intersects(&block) {
                    continue;
                }

                let push = bb.penetration_vector(&block);
                let axis = (0..3).find(|&i| push[i] != 0.0).unwrap_or(AXIS_Y);

                position += push;
                bb = bb.translated(push);

                if axis != AXIS_Y && may_step && can_step(world, block_position, bb.min.y) {
                    if body.step_remaining() <= 0.0 {
                        body.set_step_remaining(STEP_HEIGHT);
                    }
                    continue;
                }

                velocity[axis] = 0.0;
                if axis == AXIS_Y && push.y > 0.0 {
                    body.set_on_ground(true);
                }
            }
        }
    }

    body.set_velocity(velocity);
    position
}

/// Separates two overlapping bodies and exchanges velocity along the contact axis.
///
/// Each body moves by a share of the correction equal to the other body's
/// fraction of the combined volume, so larger bodies shove smaller ones. On
/// the contact axis each body then takes half of the other's velocity.
/// Returns whether the bodies were in contact.
pub fn resolve_entity_collision<A, B>(a: &mut A, b: &mut B) -> bool
where
    A: PhysicsBody + ?Sized,
    B: PhysicsBody + ?Sized,
{
    let box_a = a.bounding_box();
    let box_b = b.bounding_box();
    if !box_a.intersects(&box_b) {
        return false;
    }

    let push = box_a.penetration_vector(&box_b);
    let volume_a = a.volume();
    let volume_b = b.volume();
    let total = volume_a + volume_b;
    let (share_a, share_b) = if total > 0.0 {
        (volume_b / total, volume_a / total)
    } else {
        (0.5, 0.5)
    };

    a.set_position(a.position() + push * share_a);
    b.set_position(b.position() - push * share_b);

    let axis = (0..3).find(|&i| push[i] != 0.0).unwrap_or(AXIS_Y);
    let mut velocity_a = a.velocity();
    let mut velocity_b = b.velocity();
    let (before_a, before_b) = (velocity_a[axis], velocity_b[axis]);
    velocity_a[axis] = before_b * 0.5;
    velocity_b[axis] = before_a * 0.5;
    a.set_velocity(velocity_a);
    b.set_velocity(velocity_b);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::{
        physics::entity::{Entity, EntityKind},
        voxels::block::block_type::BlockType,
    };

    fn floor_world() -> World {
        let mut world = World::new([2, 1, 2], 8);
        let (min, max) = world.block_bounds();
        for z in min.z..max.z {
            for x in min.x..max.x {
                world.set_block_at(Point3::new(x, 0, z), BlockType::Stone.id());
            }
        }
        world
    }

    #[test]
    fn sinking_body_is_pushed_onto_the_floor() {
        let world = floor_world();
        let mut player = Entity::new(EntityKind::Player, Point3::new(0.5, 2.0, 0.5));
        player.velocity = Vector3::new(1.0, -5.0, 0.0);

        let resolved = resolve_world_collision(&mut player, &world, Point3::new(0.5, 1.85, 0.5));
        assert!((resolved.y - 1.9).abs() < 1e-4);
        assert_eq!(player.velocity.y, 0.0);
        assert_eq!(player.velocity.x, 1.0);
        assert!(player.on_ground);

        let bb = BoundingBox::new(resolved, player.dimensions());
        assert!(bb.min.y >= 1.0 - 1e-4);
    }

    #[test]
    fn tall_wall_stops_horizontal_motion() {
        let mut world = floor_world();
        for y in 1..4 {
            world.set_block_at(Point3::new(2, y, 0), BlockType::Stone.id());
        }
        let mut player = Entity::new(EntityKind::Player, Point3::new(1.6, 1.9, 0.5));
        player.on_ground = true;
        player.velocity = Vector3::new(3.0, 0.0, 0.0);

        let resolved = resolve_world_collision(&mut player, &world, Point3::new(1.75, 1.9, 0.5));
        assert!((resolved.x - 1.7).abs() < 1e-4);
        assert_eq!(player.velocity.x, 0.0);
        assert_eq!(player.step_remaining, 0.0);
    }

    #[test]
    fn ledge_at_foot_level_arms_auto_step() {
        let mut world = floor_world();
        world.set_block_at(Point3::new(2, 1, 0), BlockType::Stone.id());
        let mut player = Entity::new(EntityKind::Player, Point3::new(1.6, 1.9, 0.5));
        player.on_ground = true;
        player.velocity = Vector3::new(3.0, 0.0, 0.0);

        let resolved = resolve_world_collision(&mut player, &world, Point3::new(1.75, 1.9, 0.5));
        assert!((resolved.x - 1.7).abs() < 1e-4);
        assert_eq!(player.velocity.x, 3.0);
        assert_eq!(player.step_remaining, STEP_HEIGHT);
    }

    #[test]
    fn airborne_body_does_not_step() {
        let mut world = floor_world();
        world.set_block_at(Point3::new(2, 1, 0), BlockType::Stone.id());
        let mut player = Entity::new(EntityKind::Player, Point3::new(1.6, 1.9, 0.5));
        player.velocity = Vector3::new(3.0, 0.0, 0.0);

        resolve_world_collision(&mut player, &world, Point3::new(1.75, 1.9, 0.5));
        assert_eq!(player.velocity.x, 0.0);
        assert_eq!(player.step_remaining, 0.0);
    }

    #[test]
    fn larger_entity_displaces_smaller_one_more() {
        let mut deer = Entity::new(EntityKind::Deer, Point3::new(0.0, 1.0, 0.0));
        let mut rabbit = Entity::new(EntityKind::Rabbit, Point3::new(0.5, 1.0, 0.0));
        deer.velocity = Vector3::new(2.0, 0.0, 0.0);
        rabbit.velocity = Vector3::new(-1.0, 0.0, 0.0);

        assert!(resolve_entity_collision(&mut deer, &mut rabbit));
        let deer_moved = deer.position.x.abs();
        let rabbit_moved = (rabbit.position.x - 0.5).abs();
        assert!(rabbit_moved > deer_moved);
        assert!(deer.position.x < 0.0 && rabbit.position.x > 0.5);

        let gap = rabbit.bounding_box().min.x - deer.bounding_box().max.x;
        assert!(gap.abs() < 1e-4);
        assert_eq!(deer.velocity.x, -0.5);
        assert_eq!(rabbit.velocity.x, 1.0);
    }

    #[test]
    fn separated_entities_are_untouched() {
        let mut a = Entity::new(EntityKind::Wolf, Point3::new(0.0, 1.0, 0.0));
        let mut b = Entity::new(EntityKind::Wolf, Point3::new(5.0, 1.0, 0.0));
        let before = (a.clone(), b.clone());
        assert!(!resolve_entity_collision(&mut a, &mut b));
        assert_eq!((a, b), before);
    }
}
