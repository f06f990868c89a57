//! Motion domain: the player character controller.
//!
//! Resolves input into camera-relative move/look vectors, owns the mode
//! state machine and answers the motor's per-step callbacks.

use bevy::prelude::*;

use crate::motion::animation::{AnimParam, AnimTrigger, AnimationSink, CueRecorder};
use crate::motion::default_mode::DefaultState;
use crate::motion::input::{CameraPlanarFrame, InputSnapshot};
use crate::motion::jump::JumpState;
use crate::motion::math;
use crate::motion::mode::{MotionMode, MotionModeKind};
use crate::motion::motor::{CharacterMotor, ColliderId, HitStabilityReport, SurfaceHit};
use crate::motion::noclip::noclip_velocity;
use crate::motion::protocol::CharacterController;
use crate::motion::rolling::RollState;
use crate::motion::rotation::smoothed_rotation;
use crate::tuning::{MotionTuning, OrientationMethod};

#[derive(Debug, Clone)]
pub struct PlayerCharacterController<S: AnimationSink = CueRecorder> {
    tuning: MotionTuning,
    mode: MotionMode,
    move_input: Vec3,
    look_input: Vec3,
    jump_held: bool,
    animator: S,
}

impl PlayerCharacterController<CueRecorder> {
    pub fn new(tuning: MotionTuning) -> Self {
        Self::with_animator(tuning, CueRecorder::default())
    }
}

impl<S: AnimationSink> PlayerCharacterController<S> {
    /// Starts in Default mode.
    pub fn with_animator(tuning: MotionTuning, animator: S) -> Self {
        Self {
            tuning,
            mode: MotionMode::default(),
            move_input: Vec3::ZERO,
            look_input: Vec3::ZERO,
            jump_held: false,
            animator,
        }
    }

    pub fn tuning(&self) -> &MotionTuning {
        &self.tuning
    }

    pub fn mode(&self) -> &MotionMode {
        &self.mode
    }

    pub fn mode_kind(&self) -> MotionModeKind {
        self.mode.kind()
    }

    pub fn jump_state(&self) -> Option<&JumpState> {
        match &self.mode {
            MotionMode::Default(state) => Some(&state.jump),
            _ => None,
        }
    }

    pub fn roll_state(&self) -> Option<&RollState> {
        match &self.mode {
            MotionMode::Rolling(roll) => Some(roll),
            _ => None,
        }
    }

    pub fn move_input(&self) -> Vec3 {
        self.move_input
    }

    pub fn look_input(&self) -> Vec3 {
        self.look_input
    }

    pub fn animator(&self) -> &S {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut S {
        &mut self.animator
    }

    /// Exit the current mode, switch, then enter the new one. Always runs
    /// both hooks, even when `kind` is the current mode.
    pub fn transition_to(&mut self, motor: &mut dyn CharacterMotor, kind: MotionModeKind) {
        let from = self.mode.kind();
        self.mode.on_exit(motor);
        self.mode = MotionMode::fresh(kind);
        self.mode.on_enter(&self.tuning, motor, &mut self.animator);
        debug!("Motion mode: {:?} -> {:?}", from, kind);
    }

    /// Queue an additive velocity for the next Default-mode velocity update.
    /// Ignored in other modes.
    pub fn add_velocity(&mut self, velocity: Vec3) {
        if let MotionMode::Default(state) = &mut self.mode {
            state.add_velocity(velocity);
        }
    }

    pub fn set_inputs(&mut self, motor: &mut dyn CharacterMotor, inputs: &InputSnapshot) {
        if inputs.noclip_down {
            match self.mode.kind() {
                MotionModeKind::Default => self.transition_to(motor, MotionModeKind::NoClip),
                MotionModeKind::NoClip => self.transition_to(motor, MotionModeKind::Default),
                MotionModeKind::Rolling => {}
            }
        } else if inputs.roll_down && self.mode.kind() == MotionModeKind::Default {
            self.transition_to(motor, MotionModeKind::Rolling);
        }

        self.jump_held = inputs.jump_held;

        let move_axes = inputs.clamped_move_axes();
        let up = motor.character_up();
        let camera = CameraPlanarFrame::resolve(inputs.camera_rotation, up);

        match &mut self.mode {
            MotionMode::Default(state) => {
                self.move_input = camera.rotation * move_axes;
                self.look_input = match self.tuning.orientation_method {
                    OrientationMethod::TowardsCamera => camera.direction,
                    OrientationMethod::TowardsMovement => math::normalize_or_zero_eps(self.move_input),
                };

                if inputs.jump_down {
                    state.jump.request();
                    self.animator.set_trigger(AnimTrigger::Jump);
                }

                self.animator.set_bool(AnimParam::OnAiming, inputs.aiming);
            }
            MotionMode::NoClip => {
                self.move_input = inputs.camera_rotation * move_axes;
                self.look_input = match self.tuning.orientation_method {
                    OrientationMethod::TowardsCamera => camera.direction,
                    OrientationMethod::TowardsMovement => {
                        math::normalize_or_zero_eps(math::project_on_plane(self.move_input, up))
                    }
                };
            }
            MotionMode::Rolling(_) => {}
        }
    }
}

impl<S: AnimationSink> CharacterController for PlayerCharacterController<S> {
    fn before_character_update(&mut self, _motor: &mut dyn CharacterMotor, dt: f32) {
        if let MotionMode::Rolling(roll) = &mut self.mode {
            roll.before_update(dt);
        }
    }

    fn update_rotation(&mut self, motor: &dyn CharacterMotor, current_rotation: Quat, dt: f32) -> Quat {
        match self.mode {
            MotionMode::Default(_) | MotionMode::NoClip => smoothed_rotation(
                current_rotation,
                self.look_input,
                motor.character_forward(),
                motor.character_up(),
                dt,
                &self.tuning,
            ),
            MotionMode::Rolling(_) => current_rotation,
        }
    }

    fn update_velocity(
        &mut self,
        motor: &mut dyn CharacterMotor,
        current_velocity: Vec3,
        dt: f32,
    ) -> Vec3 {
        match &mut self.mode {
            MotionMode::Default(state) => state.update_velocity(
                current_velocity,
                self.move_input,
                dt,
                &self.tuning,
                motor,
                &mut self.animator,
            ),
            MotionMode::Rolling(roll) => roll.update_velocity(
                current_velocity,
                dt,
                self.tuning.gravity,
                motor.character_up(),
            ),
            MotionMode::NoClip => noclip_velocity(
                current_velocity,
                self.move_input,
                motor.character_up(),
                self.jump_held,
                dt,
                &self.tuning,
            ),
        }
    }

    fn after_character_update(&mut self, motor: &mut dyn CharacterMotor, dt: f32) {
        let roll_finished = match &mut self.mode {
            MotionMode::Default(state) => {
                state.after_update(dt, &self.tuning, motor);
                false
            }
            MotionMode::Rolling(roll) => roll.after_update(&self.tuning),
            MotionMode::NoClip => false,
        };

        if roll_finished {
            self.transition_to(motor, MotionModeKind::Default);
        }
    }

    fn post_grounding_update(&mut self, motor: &mut dyn CharacterMotor, _dt: f32) {
        let now = motor.grounding_status().is_stable_on_ground;
        let before = motor.last_grounding_status().is_stable_on_ground;

        if now && !before {
            debug!("Landed");
            self.animator.set_trigger(AnimTrigger::Landed);
        } else if !now && before {
            debug!("Left stable ground");
            self.animator.set_trigger(AnimTrigger::LeaveStableGround);
        }
    }

    fn is_collider_valid_for_collisions(&self, collider: ColliderId) -> bool {
        !self.tuning.ignored_colliders.contains(&collider)
    }

    fn on_ground_hit(
        &mut self,
        _motor: &mut dyn CharacterMotor,
        _hit: &SurfaceHit,
        _report: &mut HitStabilityReport,
    ) {
    }

    fn on_movement_hit(
        &mut self,
        motor: &mut dyn CharacterMotor,
        hit: &SurfaceHit,
        report: &mut HitStabilityReport,
    ) {
        match &mut self.mode {
            MotionMode::Default(state) => state.on_movement_hit(hit, report, &self.tuning, motor),
            MotionMode::Rolling(roll) => roll.on_movement_hit(hit, report),
            MotionMode::NoClip => {}
        }
    }

    fn process_hit_stability_report(
        &mut self,
        _hit: &SurfaceHit,
        _at_position: Vec3,
        _at_rotation: Quat,
        _report: &mut HitStabilityReport,
    ) {
    }

    fn on_discrete_collision_detected(&mut self, _collider: ColliderId) {}
}

impl<S: AnimationSink> PlayerCharacterController<S> {
    /// Snapshot of the Default-mode data, mainly for debugging overlays.
    pub fn default_state(&self) -> Option<&DefaultState> {
        match &self.mode {
            MotionMode::Default(state) => Some(state),
            _ => None,
        }
    }
}
