use crate::config::{RADAR_SPEED_FACTOR, TRACE_ANGULAR_SPEED};
use crate::display::{Palette, ScreenScale};
use crate::geometry::RotatingPoint;
use crate::input::Button;

/// Phase offset of the radar point relative to the circle point, radians.
pub const RADAR_PHASE: f32 = 0.5;

/// All mutable demo state, threaded through the main loop by reference.
#[derive(Debug, Clone)]
pub struct AppState {
    pub interlace_mode: bool,
    pub radar_mode: bool,
    pub stop_movement: bool,
    pub angular_speed: f32,
    pub scale: ScreenScale,
    pub palette: Palette,
    pub circle_pos: RotatingPoint,
    pub radar_pos: RotatingPoint,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            interlace_mode: false,
            radar_mode: false,
            stop_movement: false,
            angular_speed: TRACE_ANGULAR_SPEED,
            scale: ScreenScale::IDENTITY,
            palette: Palette::for_interlace(false),
            circle_pos: RotatingPoint::at_angle(0.0),
            radar_pos: RotatingPoint::at_angle(RADAR_PHASE),
        }
    }

    /// Trace rate for the current radar flag.
    fn trace_rate(&self) -> f32 {
        if self.radar_mode {
            RADAR_SPEED_FACTOR * TRACE_ANGULAR_SPEED
        } else {
            TRACE_ANGULAR_SPEED
        }
    }

    /// Apply one edge-triggered button press. Returns true when the press
    /// changed the interlace flag and the display mode must be re-applied.
    ///
    /// B and Z both write `angular_speed`; whichever fired last wins. A
    /// Z-resume restores the rate for the current radar flag, so leaving
    /// pause inside radar mode comes back at the radar rate.
    pub fn handle_button(&mut self, button: Button) -> bool {
        match button {
            Button::A => {
                self.interlace_mode = !self.interlace_mode;
                true
            }
            Button::B => {
                self.radar_mode = !self.radar_mode;
                self.angular_speed = self.trace_rate();
                false
            }
            Button::Z => {
                self.stop_movement = !self.stop_movement;
                self.angular_speed = if self.stop_movement {
                    0.0
                } else {
                    self.trace_rate()
                };
                false
            }
        }
    }

    /// Advance both tracked points by the current angular speed.
    pub fn step(&mut self) {
        self.circle_pos.advance(self.angular_speed);
        self.radar_pos.advance(self.angular_speed);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
