//! Motion domain: walking, air control and jumping.

use bevy::prelude::*;

use crate::motion::animation::{AnimParam, AnimationSink};
use crate::motion::jump::JumpState;
use crate::motion::math;
use crate::motion::motor::{CharacterMotor, HitStabilityReport, SurfaceHit};
use crate::tuning::MotionTuning;

/// Data that only exists while the character is in Default mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultState {
    pub jump: JumpState,
    /// Additive velocity queued by external effects, applied once.
    pub pending_velocity: Vec3,
}

impl DefaultState {
    pub fn add_velocity(&mut self, velocity: Vec3) {
        self.pending_velocity += velocity;
    }

    pub fn update_velocity(
        &mut self,
        mut velocity: Vec3,
        move_input: Vec3,
        dt: f32,
        tuning: &MotionTuning,
        motor: &mut dyn CharacterMotor,
        animator: &mut dyn AnimationSink,
    ) -> Vec3 {
        let grounding = motor.grounding_status();
        let up = motor.character_up();

        if grounding.is_stable_on_ground {
            // keep speed across slope changes
            let speed = velocity.length();
            velocity = motor.direction_tangent_to_surface(velocity, grounding.ground_normal) * speed;

            let input_right = move_input.cross(up);
            let reoriented_input = grounding
                .ground_normal
                .cross(input_right)
                .normalize_or_zero()
                * move_input.length();
            let target = reoriented_input * tuning.max_stable_move_speed;

            velocity = velocity.lerp(
                target,
                math::sharpness_blend(tuning.stable_movement_sharpness, dt),
            );

            let speed_ratio = if tuning.max_stable_move_speed > f32::EPSILON {
                velocity.length() / tuning.max_stable_move_speed
            } else {
                0.0
            };
            animator.set_float(AnimParam::Velocity, speed_ratio);
            animator.set_bool(AnimParam::OnAir, false);
        } else {
            if move_input.length_squared() > 0.0 {
                let mut target = move_input * tuning.max_air_move_speed;

                // No climbing unstable slopes with air control.
                if grounding.found_any_ground {
                    let obstruction_normal = up
                        .cross(grounding.ground_normal)
                        .cross(up)
                        .normalize_or_zero();
                    target = math::project_on_plane(target, obstruction_normal);
                }

                let velocity_diff = math::project_on_plane(target - velocity, tuning.gravity);
                velocity += velocity_diff * tuning.air_acceleration_speed * dt;
            }

            velocity += tuning.gravity * dt;
            velocity *= 1.0 / (1.0 + tuning.drag * dt);

            animator.set_bool(AnimParam::OnAir, true);
        }

        velocity = self.jump.resolve(velocity, dt, tuning, motor);

        if self.pending_velocity.length_squared() > 0.0 {
            velocity += self.pending_velocity;
            self.pending_velocity = Vec3::ZERO;
        }

        velocity
    }

    pub fn on_movement_hit(
        &mut self,
        hit: &SurfaceHit,
        report: &HitStabilityReport,
        tuning: &MotionTuning,
        motor: &dyn CharacterMotor,
    ) {
        if tuning.allow_wall_jump
            && !motor.grounding_status().is_stable_on_ground
            && !report.is_stable
        {
            self.jump.capture_wall(hit.normal);
        }
    }

    pub fn after_update(&mut self, dt: f32, tuning: &MotionTuning, motor: &dyn CharacterMotor) {
        self.jump.after_update(dt, tuning, motor);
    }
}
