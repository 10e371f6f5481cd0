//! Mark state machine.

use crate::core::time::format_timecode;

/// Mark state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MarkState {
    /// Idle - no in-point recorded
    #[default]
    Idle,
    /// Armed - waiting for the out-point
    Armed {
        start: f64, // seconds
    },
}

impl MarkState {
    /// Check if idle
    pub fn is_idle(&self) -> bool {
        matches!(self, MarkState::Idle)
    }

    /// Arm with `start`, or consume the mark.
    ///
    /// Returns the previous in-point when this press completes a cycle;
    /// the state is `Idle` afterwards either way.
    pub fn press(&mut self, position: f64) -> Option<f64> {
        match std::mem::take(self) {
            MarkState::Idle => {
                *self = MarkState::Armed { start: position };
                None
            }
            MarkState::Armed { start } => Some(start),
        }
    }
}

impl std::fmt::Display for MarkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkState::Idle => write!(f, "idle"),
            MarkState::Armed { start } => write!(f, "armed at {}", format_timecode(*start)),
        }
    }
}
