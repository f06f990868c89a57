//! Motion domain: the per-step character motion core.
//!
//! Everything in here is engine-agnostic apart from Bevy's math types and log
//! macros. A motor (see [`CharacterMotor`]) drives [`PlayerCharacterController`]
//! through the [`CharacterController`] callbacks.

pub mod animation;
mod controller;
mod default_mode;
mod input;
mod jump;
pub mod math;
mod mode;
mod motor;
mod noclip;
mod protocol;
mod rolling;
mod rotation;

#[cfg(test)]
mod tests;

pub use animation::{
    AnimParam, AnimTrigger, AnimationCue, AnimationSink, CueRecorder, MAX_BUFFERED_CUES,
};
pub use controller::PlayerCharacterController;
pub use default_mode::DefaultState;
pub use input::{CameraPlanarFrame, InputSnapshot};
pub use jump::{JUMP_UNGROUND_DURATION, JumpState};
pub use mode::{MotionMode, MotionModeKind};
pub use motor::{
    CharacterMotor, ColliderId, CollisionSolver, GroundingReport, HitStabilityReport, SurfaceHit,
};
pub use protocol::CharacterController;
pub use rolling::{ROLL_OBSTRUCTION_DOT, RollState};
