use std::f32::consts::TAU;

use crate::config::{TRACE_POS_X, TRACE_POS_Y, TRACE_RADIUS};

/// A point riding the trace circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatingPoint {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
}

impl RotatingPoint {
    /// Point at the given starting phase. The position is computed on the
    /// first `advance`.
    pub const fn at_angle(angle: f32) -> Self {
        Self { x: 0.0, y: 0.0, angle }
    }

    /// Advance the angle and recompute the position on the trace circle.
    pub fn advance(&mut self, angular_speed: f32) {
        self.angle = normalize_angle(self.angle + angular_speed);
        self.x = TRACE_POS_X + TRACE_RADIUS * self.angle.cos();
        self.y = TRACE_POS_Y + TRACE_RADIUS * self.angle.sin();
    }
}

/// Keep an angle within [0, 2π). A single subtraction is enough: per-frame
/// speeds are always well below a full turn.
pub fn normalize_angle(angle: f32) -> f32 {
    if angle >= TAU {
        angle - TAU
    } else {
        angle
    }
}
