//! Motion events
//!
//! The sequencer reports each physically completed primitive as a
//! [`MotionEvent`]; the motion model consumes them. Nothing in the filter
//! touches hardware.

use std::fmt;

/// A completed motion primitive with its commanded magnitude
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionEvent {
    /// Straight segment (cm)
    Translate { distance_cm: f64 },
    /// In-place turn, in the units the drive was commanded with
    Rotate { degrees: f64 },
}

impl fmt::Display for MotionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Translate { distance_cm } => write!(f, "translate {} cm", distance_cm),
            Self::Rotate { degrees } => write!(f, "rotate {}", degrees),
        }
    }
}
