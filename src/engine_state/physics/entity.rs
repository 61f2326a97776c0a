//! # Entities
//!
//! The generic state the physics code needs from anything that moves:
//! position, velocity, a fixed footprint, the on-ground flag and the auto-step
//! counter. Per-kind data (footprint, visual prefab) comes from a static table
//! keyed by [`EntityKind`].

use cgmath::{Point3, Vector3};
use web_time::Duration;

use super::bounding_box::BoundingBox;

/// Access to the physics state of a moving body.
///
/// The collision resolver and the integrator only work through this trait, so
/// callers can keep their own entity types.
pub trait PhysicsBody {
    /// Centre of the body's bounding box.
    fn position(&self) -> Point3<f32>;
    fn set_position(&mut self, position: Point3<f32>);
    fn velocity(&self) -> Vector3<f32>;
    fn set_velocity(&mut self, velocity: Vector3<f32>);
    /// Fixed `(width, height, depth)` footprint.
    fn dimensions(&self) -> Vector3<f32>;
    fn on_ground(&self) -> bool;
    fn set_on_ground(&mut self, on_ground: bool);
    /// Height still to climb from an auto-step in progress.
    fn step_remaining(&self) -> f32;
    fn set_step_remaining(&mut self, remaining: f32);

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.position(), self.dimensions())
    }

    fn volume(&self) -> f32 {
        let d = self.dimensions();
        d.x * d.y * d.z
    }
}

/// Every kind of entity the world can hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Deer,
    Wolf,
    Rabbit,
    Boar,
    Lizard,
}

/// Static per-kind data.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EntityKindInfo {
    pub kind: EntityKind,
    /// `(width, height, depth)` in blocks.
    pub footprint: [f32; 3],
    /// Identifier of the visual prefab a renderer should use.
    pub prefab: &'static str,
}

#[rustfmt::skip]
static ENTITY_KINDS: [EntityKindInfo; 6] = [
    EntityKindInfo { kind: EntityKind::Player, footprint: [0.6, 1.8, 0.6], prefab: "player" },
    EntityKindInfo { kind: EntityKind::Deer,   footprint: [0.9, 1.6, 1.4], prefab: "deer" },
    EntityKindInfo { kind: EntityKind::Wolf,   footprint: [0.6, 0.85, 1.2], prefab: "wolf" },
    EntityKindInfo { kind: EntityKind::Rabbit, footprint: [0.4, 0.5, 0.5], prefab: "rabbit" },
    EntityKindInfo { kind: EntityKind::Boar,   footprint: [0.8, 0.9, 1.3], prefab: "boar" },
    EntityKindInfo { kind: EntityKind::Lizard, footprint: [0.3, 0.25, 0.7], prefab: "lizard" },
];

impl EntityKind {
    pub fn info(self) -> &'static EntityKindInfo {
        &ENTITY_KINDS[self as usize]
    }

    pub fn footprint(self) -> Vector3<f32> {
        let [w, h, d] = self.info().footprint;
        Vector3::new(w, h, d)
    }

    pub fn prefab(self) -> &'static str {
        self.info().prefab
    }
}

/// What an entity is currently busy with.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Activity {
    #[default]
    Idle,
    Wandering,
    Resting,
    Hunting,
    Basking,
}

/// A countdown for the current activity, advanced by tick time.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ActivityTimer {
    activity: Activity,
    remaining: Duration,
}

impl ActivityTimer {
    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Begins `activity` for `duration`, replacing whatever was running.
    pub fn start(&mut self, activity: Activity, duration: Duration) {
        self.activity = activity;
        self.remaining = duration;
    }

    /// Counts down by `dt`.
    ///
    /// Returns the activity that just finished, after which the timer is idle.
    pub fn advance(&mut self, dt: Duration) -> Option<Activity> {
        if self.activity == Activity::Idle {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(dt);
        if self.remaining.is_zero() {
            let finished = self.activity;
            self.activity = Activity::Idle;
            Some(finished)
        } else {
            None
        }
    }
}

/// A simulated entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub kind: EntityKind,
    pub position: Point3<f32>,
    pub velocity: Vector3<f32>,
    /// Heading around the vertical axis in radians.
    pub yaw: f32,
    pub on_ground: bool,
    pub step_remaining: f32,
    pub activity: ActivityTimer,
}

impl Entity {
    pub fn new(kind: EntityKind, position: Point3<f32>) -> Self {
        Entity {
            kind,
            position,
            velocity: Vector3::new(0.0, 0.0, 0.0),
            yaw: 0.0,
            on_ground: false,
            step_remaining: 0.0,
            activity: ActivityTimer::default(),
        }
    }

    /// Launches the entity upwards if it stands on the ground.
    ///
    /// Returns whether the jump happened.
    pub fn jump(&mut self, speed: f32) -> bool {
        if !self.on_ground || self.step_remaining > 0.0 {
            return false;
        }
        self.velocity.y = speed;
        self.on_ground = false;
        true
    }
}

impl PhysicsBody for Entity {
    fn position(&self) -> Point3<f32> {
        self.position
    }

    fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
    }

    fn velocity(&self) -> Vector3<f32> {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vector3<f32>) {
        self.velocity = velocity;
    }

    fn dimensions(&self) -> Vector3<f32> {
        self.kind.footprint()
    }

    fn on_ground(&self) -> bool {
        self.on_ground
    }

    fn set_on_ground(&mut self, on_ground: bool) {
        self.on_ground = on_ground;
    }

    fn step_remaining(&self) -> f32 {
        self.step_remaining
    }

    fn set_step_remaining(&mut self, remaining: f32) {
        self.step_remaining = remaining;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_table_is_indexed_by_variant() {
        for kind in [
            EntityKind::Player,
            EntityKind::Deer,
            EntityKind::Wolf,
            EntityKind::Rabbit,
            EntityKind::Boar,
            EntityKind::Lizard,
        ] {
            assert_eq!(kind.info().kind, kind);
        }
        assert_eq!(EntityKind::Player.footprint(), Vector3::new(0.6, 1.8, 0.6));
        assert_eq!(EntityKind::Wolf.prefab(), "wolf");
    }

    #[test]
    fn activity_timer_counts_down() {
        let mut timer = ActivityTimer::default();
        assert_eq!(timer.advance(Duration::from_secs(1)), None);

        timer.start(Activity::Resting, Duration::from_millis(250));
        assert_eq!(timer.advance(Duration::from_millis(100)), None);
        assert_eq!(timer.activity(), Activity::Resting);
        assert_eq!(timer.advance(Duration::from_millis(200)), Some(Activity::Resting));
        assert_eq!(timer.activity(), Activity::Idle);
        assert_eq!(timer.remaining(), Duration::ZERO);
    }

    #[test]
    fn jump_requires_ground() {
        let mut entity = Entity::new(EntityKind::Player, Point3::new(0.0, 5.0, 0.0));
        assert!(!entity.jump(8.0));
        entity.on_ground = true;
        assert!(entity.jump(8.0));
        assert_eq!(entity.velocity.y, 8.0);
        assert!(!entity.on_ground);
        assert!(!entity.jump(8.0));
    }
}
