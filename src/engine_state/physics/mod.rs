//! # Physics Module
//!
//! Axis-aligned physics for entities moving through the block grid.
//!
//! ## Key Components
//!
//! * `BoundingBox` - axis-aligned boxes, intersection and single-axis penetration
//! * `collision` - world and entity-entity collision resolution, auto-step detection
//! * `entity` - the `PhysicsBody` contract, entity kinds and activity timers
//! * `PhysicsIntegrator` - per-tick gravity, friction, climbing and ground probing
//!
//! ## Tick order
//!
//! 1. Gravity, unless an auto-step is in progress
//! 2. Exponential friction on horizontal velocity, snapped to zero near rest
//! 3. Auto-step climb for this tick
//! 4. Collision against the world at the proposed position
//! 5. Ground probe just below the box, setting the on-ground flag
//!
//! An entity is either grounded or airborne, decided purely by the probe on
//! each tick. The auto-step counter is the only other persistent state.

use cgmath::{Point3, Vector3};
use web_time::Duration;

use crate::{config::PhysicsConfig, engine_state::voxels::world::World};

pub mod bounding_box;
pub mod collision;
pub mod entity;

pub use bounding_box::BoundingBox;
pub use collision::{resolve_entity_collision, resolve_world_collision};
pub use entity::{Activity, ActivityTimer, Entity, EntityKind, PhysicsBody};

/// How far below the box the ground probe looks.
pub const GROUND_PROBE_OFFSET: f32 = 0.05;

/// Integrates body motion with the configured tunables.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsIntegrator {
    config: PhysicsConfig,
}

impl PhysicsIntegrator {
    pub fn new(config: PhysicsConfig) -> Self {
        PhysicsIntegrator { config }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Whether a solid block lies just under the footprint of `body`.
    pub fn probe_ground<B: PhysicsBody + ?Sized>(body: &B, world: &World) -> bool {
        let bb = body.bounding_box();
        let probe = bb.translated(Vector3::new(0.0, -GROUND_PROBE_OFFSET, 0.0));
        let (lo, hi) = collision::overlapped_blocks(&probe);
        let y = probe.min.y.floor() as i32;
        (lo.x..=hi.x).any(|x| (lo.z..=hi.z).any(|z| world.is_solid_at(Point3::new(x, y, z))))
    }

    /// Advances `body` by `dt`.
    pub fn tick<B: PhysicsBody + ?Sized>(&self, body: &mut B, world: &World, dt: Duration) {
        let seconds = dt.as_secs_f32();
        if seconds <= 0.0 {
            return;
        }

        let mut velocity = body.velocity();
        let mut position = body.position();

        let stepping = body.step_remaining() > 0.0;
        if stepping {
            let rise = (self.config.step_climb_rate * seconds).min(body.step_remaining());
            position.y += rise;
            body.set_step_remaining(body.step_remaining() - rise);
        } else {
            velocity.y -= self.config.gravity * self.config.gravity_multiplier * seconds;
        }

        let friction = if body.on_ground() {
            self.config.ground_friction
        } else {
            self.config.air_friction
        };
        let decay = friction.powf(seconds);
        velocity.x *= decay;
        velocity.z *= decay;
        if velocity.x.abs() < self.config.velocity_snap {
            velocity.x = 0.0;
        }
        if velocity.z.abs() < self.config.velocity_snap {
            velocity.z = 0.0;
        }

        body.set_velocity(velocity);
        let proposed = position + velocity * seconds;
        let resolved = resolve_world_collision(body, world, proposed);
        body.set_position(resolved);

        let grounded = Self::probe_ground(body, world);
        body.set_on_ground(grounded);
    }
}
