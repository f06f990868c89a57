//! Motion domain: the charge-then-stop roll.
//!
//! A roll drives the character along a fixed horizontal charge velocity until
//! either the charge time runs out or an unstable obstruction is hit head-on,
//! then dwells under gravity before handing control back to Default mode.

use bevy::prelude::*;

use crate::motion::math;
use crate::motion::motor::{CharacterMotor, HitStabilityReport, SurfaceHit};
use crate::tuning::MotionTuning;

/// Minimum alignment between the charge direction and an obstruction's
/// inverted normal for the obstruction to stop the roll.
pub const ROLL_OBSTRUCTION_DOT: f32 = 0.5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RollState {
    pub charge_velocity: Vec3,
    pub stopped: bool,
    /// One-shot: zero the velocity on the next velocity update.
    pub must_stop_velocity: bool,
    pub time_since_started_charge: f32,
    pub time_since_stopped: f32,
}

impl RollState {
    pub fn on_enter(&mut self, tuning: &MotionTuning, motor: &dyn CharacterMotor) {
        let up = motor.character_up();
        let heading = math::project_on_plane(motor.character_forward(), up).normalize_or_zero();
        self.charge_velocity = heading * tuning.rolling_speed;
        self.stopped = false;
        self.must_stop_velocity = false;
        self.time_since_started_charge = 0.0;
        self.time_since_stopped = 0.0;
    }

    pub fn before_update(&mut self, dt: f32) {
        self.time_since_started_charge += dt;
        if self.stopped {
            self.time_since_stopped += dt;
        }
    }

    pub fn update_velocity(&mut self, velocity: Vec3, dt: f32, gravity: Vec3, up: Vec3) -> Vec3 {
        if self.must_stop_velocity {
            self.must_stop_velocity = false;
            return Vec3::ZERO;
        }

        if self.stopped {
            return velocity + gravity * dt;
        }

        let vertical = math::project(velocity, up);
        self.charge_velocity + vertical + gravity * dt
    }

    pub fn on_movement_hit(&mut self, hit: &SurfaceHit, report: &HitStabilityReport) {
        if self.stopped || report.is_stable {
            return;
        }
        let alignment = (-hit.normal).dot(self.charge_velocity.normalize_or_zero());
        if alignment > ROLL_OBSTRUCTION_DOT {
            debug!("Roll stopped by obstruction: normal={:?}", hit.normal);
            self.stop();
        }
    }

    /// Returns true once the post-stop dwell is over.
    pub fn after_update(&mut self, tuning: &MotionTuning) -> bool {
        if !self.stopped && self.time_since_started_charge > tuning.max_roll_time {
            debug!("Roll stopped after {:.2}s", self.time_since_started_charge);
            self.stop();
            // The dwell starts where the charge limit fell inside this step.
            self.time_since_stopped = self.time_since_started_charge - tuning.max_roll_time;
        }

        self.stopped && self.time_since_stopped > tuning.stopped_time
    }

    fn stop(&mut self) {
        self.must_stop_velocity = true;
        self.stopped = true;
    }
}
