//! Motion domain: the animation side-channel.
//!
//! The controller writes parameters and triggers, it never reads them back.

use bevy::prelude::*;

/// Continuous animator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimParam {
    /// Ground speed as a ratio of max stable speed.
    Velocity,
    OnAir,
    OnAiming,
}

impl AnimParam {
    pub fn name(&self) -> &'static str {
        match self {
            AnimParam::Velocity => "Velocity",
            AnimParam::OnAir => "OnAir",
            AnimParam::OnAiming => "OnAiming",
        }
    }
}

/// One-shot animator triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimTrigger {
    Jump,
    Roll,
    Landed,
    LeaveStableGround,
}

impl AnimTrigger {
    pub fn name(&self) -> &'static str {
        match self {
            AnimTrigger::Jump => "IsJump",
            AnimTrigger::Roll => "IsRoll",
            AnimTrigger::Landed => "IsLanded",
            AnimTrigger::LeaveStableGround => "IsLeaveStableGround",
        }
    }
}

/// Receiver of animation writes.
pub trait AnimationSink {
    fn set_trigger(&mut self, trigger: AnimTrigger);
    fn set_bool(&mut self, param: AnimParam, value: bool);
    fn set_float(&mut self, param: AnimParam, value: f32);
}

/// A single recorded animation write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationCue {
    Trigger(AnimTrigger),
    Bool(AnimParam, bool),
    Float(AnimParam, f32),
}

/// Most cues a [`CueRecorder`] holds before dropping the oldest.
pub const MAX_BUFFERED_CUES: usize = 1024;

/// Sink that buffers every write until drained.
///
/// Owners are expected to [`drain`](CueRecorder::drain) it once per step, as
/// the ECS plugin does. An undrained recorder keeps only the newest
/// [`MAX_BUFFERED_CUES`] writes.
#[derive(Debug, Default, Clone)]
pub struct CueRecorder {
    pub cues: Vec<AnimationCue>,
}

impl CueRecorder {
    fn push(&mut self, cue: AnimationCue) {
        if self.cues.len() >= MAX_BUFFERED_CUES {
            let overflow = self.cues.len() + 1 - MAX_BUFFERED_CUES;
            self.cues.drain(..overflow);
        }
        self.cues.push(cue);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = AnimationCue> + '_ {
        self.cues.drain(..)
    }

    pub fn triggers(&self) -> impl Iterator<Item = AnimTrigger> + '_ {
        self.cues.iter().filter_map(|cue| match cue {
            AnimationCue::Trigger(trigger) => Some(*trigger),
            _ => None,
        })
    }

    /// Most recent bool written for `param`.
    pub fn last_bool(&self, param: AnimParam) -> Option<bool> {
        self.cues.iter().rev().find_map(|cue| match cue {
            AnimationCue::Bool(p, value) if *p == param => Some(*value),
            _ => None,
        })
    }

    /// Most recent float written for `param`.
    pub fn last_float(&self, param: AnimParam) -> Option<f32> {
        self.cues.iter().rev().find_map(|cue| match cue {
            AnimationCue::Float(p, value) if *p == param => Some(*value),
            _ => None,
        })
    }
}

impl AnimationSink for CueRecorder {
    fn set_trigger(&mut self, trigger: AnimTrigger) {
        trace!("anim trigger {}", trigger.name());
        self.push(AnimationCue::Trigger(trigger));
    }

    fn set_bool(&mut self, param: AnimParam, value: bool) {
        self.push(AnimationCue::Bool(param, value));
    }

    fn set_float(&mut self, param: AnimParam, value: f32) {
        self.push(AnimationCue::Float(param, value));
    }
}
