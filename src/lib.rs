//! Interactive orbit/radar demo.
//!
//! Two points ride a fixed circle while the renderer draws either a filled
//! pseudo-circle around one of them or a shaded "radar" triangle between
//! both, with keyboard toggles for display resolution, draw mode, and
//! pausing the motion. All geometry lives on a logical 320x240 canvas and
//! is scaled to the framebuffer picked by the active video mode.

pub mod app;
pub mod config;
pub mod display;
pub mod geometry;
pub mod input;
pub mod render;

pub use app::AppState;
pub use config::{Color, DemoConfig};
pub use display::{
    DisplayError, DisplayModeManager, DisplayService, Palette, PixelsDisplay, Resolution,
    ScreenScale, TvStandard,
};
pub use geometry::RotatingPoint;
pub use input::{Button, InputCollector};
pub use render::{render_frame, RasterService, SoftwareRaster, Vertex};
