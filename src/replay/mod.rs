//! Replay domain: recorded input logs played back against the plane motor.
//!
//! A log is a list of fixed steps, each optionally carrying a fresh input
//! snapshot. Playback is deterministic, so the same log always yields the
//! same samples.


use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::motion::{CharacterMotor, InputSnapshot, MotionModeKind};
use crate::sim::PlayerMotion;
use crate::tuning::MotionTuning;

/// Where every replay starts, one unit above the ground plane.
pub const REPLAY_SPAWN: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// One physics step. `input` is applied before stepping; `None` keeps the
/// previous intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub input: Option<InputSnapshot>,
    pub dt: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayLog {
    pub frames: Vec<ReplayFrame>,
}

/// Character state after one replayed step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplaySample {
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: Quat,
    pub mode: MotionModeKind,
    pub stable_on_ground: bool,
}

#[derive(Debug)]
pub struct ReplayError {
    pub message: String,
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid replay: {}", self.message)
    }
}

impl std::error::Error for ReplayError {}

impl ReplayLog {
    pub fn to_json(&self) -> Result<String, ReplayError> {
        serde_json::to_string_pretty(self).map_err(|e| ReplayError {
            message: format!("Encode error: {}", e),
        })
    }

    /// Decode a log, rejecting frames whose step length is not a positive
    /// finite number.
    pub fn from_json(source: &str) -> Result<Self, ReplayError> {
        let log: ReplayLog = serde_json::from_str(source).map_err(|e| ReplayError {
            message: format!("Parse error: {}", e),
        })?;

        if let Some(index) = log
            .frames
            .iter()
            .position(|frame| !frame.dt.is_finite() || frame.dt <= 0.0)
        {
            return Err(ReplayError {
                message: format!("frame {} has dt = {}", index, log.frames[index].dt),
            });
        }

        Ok(log)
    }

    pub fn duration(&self) -> f32 {
        self.frames.iter().map(|frame| frame.dt).sum()
    }
}

/// Play `log` from [`REPLAY_SPAWN`] with a fresh controller and motor.
pub fn run_replay(log: &ReplayLog, tuning: &MotionTuning) -> Vec<ReplaySample> {
    let mut motion = PlayerMotion::new(tuning.clone(), REPLAY_SPAWN);
    let mut samples = Vec::with_capacity(log.frames.len());

    for frame in &log.frames {
        if let Some(input) = &frame.input {
            motion.apply_input(input);
        }
        motion.step(frame.dt);
        motion.controller.animator_mut().cues.clear();

        samples.push(ReplaySample {
            position: motion.motor.position,
            velocity: motion.motor.velocity,
            rotation: motion.motor.rotation,
            mode: motion.controller.mode_kind(),
            stable_on_ground: motion.motor.grounding_status().is_stable_on_ground,
        });
    }

    debug!(
        "Replayed {} frames ({:.2}s)",
        log.frames.len(),
        log.duration()
    );
    samples
}

/// Build a seeded pseudo-random log. Roughly a third of the frames carry no
/// new input.
pub fn random_log(seed: u64, frames: usize, dt: f32) -> ReplayLog {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let frames = (0..frames)
        .map(|_| {
            let input = if rng.random_bool(0.65) {
                Some(random_snapshot(&mut rng))
            } else {
                None
            };
            ReplayFrame { input, dt }
        })
        .collect();

    ReplayLog { frames }
}

fn random_snapshot(rng: &mut ChaCha8Rng) -> InputSnapshot {
    let jump_down = rng.random_bool(0.05);
    InputSnapshot {
        move_axis_forward: rng.random_range(-1.0..=1.0),
        move_axis_right: rng.random_range(-1.0..=1.0),
        camera_rotation: Quat::from_rotation_y(rng.random_range(-PI..PI)),
        jump_down,
        jump_held: jump_down || rng.random_bool(0.2),
        roll_down: rng.random_bool(0.02),
        noclip_down: rng.random_bool(0.01),
        aiming: rng.random_bool(0.1),
    }
}
