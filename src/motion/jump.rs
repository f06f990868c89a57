//! Motion domain: jump, double-jump and wall-jump bookkeeping for Default mode.

use bevy::prelude::*;

use crate::motion::math;
use crate::motion::motor::CharacterMotor;
use crate::tuning::MotionTuning;

/// Seconds of skipped ground probing after any jump, so the motor does not
/// snap the character back down on the launch step.
pub const JUMP_UNGROUND_DURATION: f32 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct JumpState {
    pub requested: bool,
    pub consumed: bool,
    pub double_jump_consumed: bool,
    /// Normal of the unstable wall hit this step, if a wall jump is possible.
    pub wall_jump_normal: Option<Vec3>,
    pub jumped_this_frame: bool,
    pub time_since_jump_requested: f32,
    pub time_since_last_able_to_jump: f32,
}

impl Default for JumpState {
    /// No pending request and no grace window: the first grounded step opens
    /// the jump window.
    fn default() -> Self {
        Self {
            requested: false,
            consumed: false,
            double_jump_consumed: false,
            wall_jump_normal: None,
            jumped_this_frame: false,
            time_since_jump_requested: f32::INFINITY,
            time_since_last_able_to_jump: f32::INFINITY,
        }
    }
}

impl JumpState {
    pub fn request(&mut self) {
        self.requested = true;
        self.time_since_jump_requested = 0.0;
    }

    pub fn capture_wall(&mut self, normal: Vec3) {
        self.wall_jump_normal = Some(normal);
    }

    /// Apply any jump that is allowed this step and return the new velocity.
    pub fn resolve(
        &mut self,
        mut velocity: Vec3,
        dt: f32,
        tuning: &MotionTuning,
        motor: &mut dyn CharacterMotor,
    ) -> Vec3 {
        self.jumped_this_frame = false;
        self.time_since_jump_requested += dt;

        if self.requested {
            let grounding = motor.grounding_status();
            let up = motor.character_up();

            if tuning.allow_double_jump {
                let airborne = !grounding.can_jump_from(tuning.allow_jumping_when_sliding);
                if self.consumed && !self.double_jump_consumed && airborne {
                    motor.force_unground(JUMP_UNGROUND_DURATION);
                    velocity += up * tuning.jump_speed - math::project(velocity, up);
                    self.requested = false;
                    self.double_jump_consumed = true;
                    self.jumped_this_frame = true;
                    debug!("Double jump: velocity={:?}", velocity);
                }
            }

            let within_grace =
                self.time_since_last_able_to_jump <= tuning.jump_post_grounding_grace_time;
            let can_ground_jump = !self.consumed
                && (grounding.can_jump_from(tuning.allow_jumping_when_sliding) || within_grace);

            if self.requested && (self.wall_jump_normal.is_some() || can_ground_jump) {
                let direction = if let Some(normal) = self.wall_jump_normal {
                    normal
                } else if grounding.found_any_ground && !grounding.is_stable_on_ground {
                    grounding.ground_normal
                } else {
                    up
                };

                motor.force_unground(JUMP_UNGROUND_DURATION);
                velocity += direction * tuning.jump_speed - math::project(velocity, up);
                self.requested = false;
                self.consumed = true;
                self.jumped_this_frame = true;
                debug!(
                    "Jump: wall={}, direction={:?}, velocity={:?}",
                    self.wall_jump_normal.is_some(),
                    direction,
                    velocity
                );
            }
        }

        self.wall_jump_normal = None;
        velocity
    }

    /// Expire stale requests and refresh the grounded window once the motor
    /// has moved the character.
    pub fn after_update(&mut self, dt: f32, tuning: &MotionTuning, motor: &dyn CharacterMotor) {
        if self.requested && self.time_since_jump_requested > tuning.jump_pre_grounding_grace_time {
            self.requested = false;
        }

        let grounding = motor.grounding_status();
        if grounding.can_jump_from(tuning.allow_jumping_when_sliding) {
            if !self.jumped_this_frame {
                self.consumed = false;
                self.double_jump_consumed = false;
            }
            self.time_since_last_able_to_jump = 0.0;
        } else {
            self.time_since_last_able_to_jump += dt;
        }
    }
}
