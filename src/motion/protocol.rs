//! Motion domain: the callback contract a motor drives every physics step.
//!
//! A motor MUST call these in this order, once per step:
//!
//! 1. [`CharacterController::before_character_update`]
//! 2. [`CharacterController::update_rotation`]
//! 3. [`CharacterController::update_velocity`]
//! 4. sweep/solve, calling [`CharacterController::is_collider_valid_for_collisions`],
//!    [`CharacterController::process_hit_stability_report`],
//!    [`CharacterController::on_ground_hit`] and
//!    [`CharacterController::on_movement_hit`] zero or more times
//! 5. [`CharacterController::after_character_update`]
//! 6. [`CharacterController::post_grounding_update`]
//! 7. [`CharacterController::on_discrete_collision_detected`] for each
//!    discrete overlap found
//!
//! Input is applied outside this sequence, whenever it arrives. No step is
//! reentrant and state carries over from the previous step untouched.

use bevy::prelude::*;

use crate::motion::motor::{CharacterMotor, ColliderId, HitStabilityReport, SurfaceHit};

pub trait CharacterController {
    fn before_character_update(&mut self, motor: &mut dyn CharacterMotor, dt: f32);

    /// Returns the rotation the motor should apply this step.
    fn update_rotation(&mut self, motor: &dyn CharacterMotor, current_rotation: Quat, dt: f32)
    -> Quat;

    /// Returns the velocity the motor should sweep with this step.
    fn update_velocity(
        &mut self,
        motor: &mut dyn CharacterMotor,
        current_velocity: Vec3,
        dt: f32,
    ) -> Vec3;

    fn after_character_update(&mut self, motor: &mut dyn CharacterMotor, dt: f32);

    /// Called once grounding for the step is final.
    fn post_grounding_update(&mut self, motor: &mut dyn CharacterMotor, dt: f32);

    fn is_collider_valid_for_collisions(&self, collider: ColliderId) -> bool;

    fn on_ground_hit(
        &mut self,
        motor: &mut dyn CharacterMotor,
        hit: &SurfaceHit,
        report: &mut HitStabilityReport,
    );

    fn on_movement_hit(
        &mut self,
        motor: &mut dyn CharacterMotor,
        hit: &SurfaceHit,
        report: &mut HitStabilityReport,
    );

    /// Lets the controller amend the motor's stability verdict for a hit.
    fn process_hit_stability_report(
        &mut self,
        hit: &SurfaceHit,
        at_position: Vec3,
        at_rotation: Quat,
        report: &mut HitStabilityReport,
    );

    fn on_discrete_collision_detected(&mut self, collider: ColliderId);
}
