use bon::Builder;

use crate::display::TvStandard;

/// RGBA color, channel order matching the framebuffer layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn as_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Logical canvas all demo geometry is expressed in, independent of the
/// actual framebuffer resolution.
pub const INTERNAL_WIDTH: f32 = 320.0;
pub const INTERNAL_HEIGHT: f32 = 240.0;

/// Center of the trace circle both tracked points orbit.
pub const TRACE_POS_X: f32 = 160.0;
pub const TRACE_POS_Y: f32 = 120.0;
pub const TRACE_RADIUS: f32 = 80.0;

/// Base angular speed in radians per frame.
pub const TRACE_ANGULAR_SPEED: f32 = 0.01;
/// Radar mode runs the trace this much faster. Tuned by eye.
pub const RADAR_SPEED_FACTOR: f32 = 8.0;

/// Radius of the pseudo-circle drawn around the tracked point.
pub const CIRCLE_RADIUS: f32 = 30.0;
/// Segments used to approximate the filled circle.
pub const CIRCLE_SEGMENTS: usize = 32;

/// Clear color for every frame.
pub const BACKGROUND: Color = Color::new(0, 0, 100, 255);

/// Runtime configuration for the demo window and animation.
#[derive(Debug, Clone, Builder)]
pub struct DemoConfig {
    #[builder(default = "Orbitscope".to_string())]
    pub title: String,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
    /// Region override; `None` queries the environment at startup.
    pub tv_standard: Option<TvStandard>,
    #[builder(default = CIRCLE_SEGMENTS)]
    pub circle_segments: usize,
}
