//! Motion domain: the kinematic motor contract the controller consumes.
//!
//! The motor owns the sweep-and-resolve algorithm and grounding detection.
//! The controller only reads its reports and issues the few requests below.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::motion::math;

/// Opaque collider handle shared between a motor and its controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColliderId(pub u64);

impl From<Entity> for ColliderId {
    fn from(entity: Entity) -> Self {
        Self(entity.to_bits())
    }
}

/// Grounding result of one motor step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundingReport {
    /// The surface under the character is walkable.
    pub is_stable_on_ground: bool,
    /// Some surface was found, walkable or not.
    pub found_any_ground: bool,
    pub ground_normal: Vec3,
}

impl Default for GroundingReport {
    fn default() -> Self {
        Self {
            is_stable_on_ground: false,
            found_any_ground: false,
            ground_normal: Vec3::Y,
        }
    }
}

impl GroundingReport {
    pub fn stable(normal: Vec3) -> Self {
        Self {
            is_stable_on_ground: true,
            found_any_ground: true,
            ground_normal: normal,
        }
    }

    pub fn sliding(normal: Vec3) -> Self {
        Self {
            is_stable_on_ground: false,
            found_any_ground: true,
            ground_normal: normal,
        }
    }

    pub fn airborne() -> Self {
        Self::default()
    }

    /// Whether jumping is allowed from this report under the sliding policy.
    pub fn can_jump_from(&self, allow_jumping_when_sliding: bool) -> bool {
        if allow_jumping_when_sliding {
            self.found_any_ground
        } else {
            self.is_stable_on_ground
        }
    }
}

/// Stability evaluation the motor attaches to every hit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HitStabilityReport {
    pub is_stable: bool,
}

/// A single contact produced by the motor's sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub collider: ColliderId,
    pub normal: Vec3,
    pub point: Vec3,
}

/// The three independent solver stages a motor can switch off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionSolver {
    /// Capsule overlap/depenetration.
    Capsule,
    /// Movement sweeps against obstructions.
    Movement,
    /// Ground probing and snapping.
    Ground,
}

impl CollisionSolver {
    pub const ALL: [CollisionSolver; 3] = [
        CollisionSolver::Capsule,
        CollisionSolver::Movement,
        CollisionSolver::Ground,
    ];
}

/// Calls the controller makes into the motor.
pub trait CharacterMotor {
    fn character_up(&self) -> Vec3;

    fn character_forward(&self) -> Vec3;

    /// Grounding report of the current step.
    fn grounding_status(&self) -> GroundingReport;

    /// Grounding report of the previous step.
    fn last_grounding_status(&self) -> GroundingReport;

    /// Skip ground probing/snapping for `duration` seconds.
    fn force_unground(&mut self, duration: f32);

    /// Reorient `direction` onto the tangent plane of `surface_normal`.
    /// Returns a unit vector, or zero when degenerate.
    fn direction_tangent_to_surface(&self, direction: Vec3, surface_normal: Vec3) -> Vec3 {
        math::tangent_to_surface(direction, surface_normal, self.character_up())
    }

    fn set_collision_solving(&mut self, solver: CollisionSolver, active: bool);
}
