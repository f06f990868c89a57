//! Kinematic player character controller: a camera-relative, mode-based
//! controller for a third-person character driven by a kinematic motor.

pub mod motion;
pub mod replay;
pub mod sim;
pub mod tuning;
