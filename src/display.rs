use std::sync::Arc;

use pixels::{Pixels, SurfaceTexture};
use thiserror::Error;
use winit::dpi::LogicalSize;
use winit::window::Window;

use crate::config::{Color, INTERNAL_HEIGHT, INTERNAL_WIDTH};

/// Broadcast standard reported by the host; decides the available
/// resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TvStandard {
    Pal,
    Ntsc,
}

impl TvStandard {
    /// Query the environment once at startup. Anything that is not PAL is
    /// treated as NTSC, matching the hardware query this stands in for.
    pub fn detect() -> Self {
        match std::env::var("TV_STANDARD") {
            Ok(value) if value.eq_ignore_ascii_case("pal") => TvStandard::Pal,
            _ => TvStandard::Ntsc,
        }
    }
}

/// Scanline handling of a video mode. `Half` only survives as mode
/// metadata on the desktop; it selects the high-resolution geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interlace {
    Off,
    Half,
}

/// One selectable video mode. Always 32-bit color, double buffered, no
/// gamma correction, no filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
    pub interlace: Interlace,
}

/// The two modes a standard offers: low-res progressive and high-res
/// interlaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoModes {
    pub lo_res: Resolution,
    pub hi_res: Resolution,
}

impl VideoModes {
    pub fn for_standard(standard: TvStandard) -> Self {
        match standard {
            TvStandard::Pal => Self {
                lo_res: Resolution {
                    width: 320,
                    height: 288,
                    interlace: Interlace::Off,
                },
                hi_res: Resolution {
                    width: 640,
                    height: 576,
                    interlace: Interlace::Half,
                },
            },
            TvStandard::Ntsc => Self {
                lo_res: Resolution {
                    width: 320,
                    height: 240,
                    interlace: Interlace::Off,
                },
                hi_res: Resolution {
                    width: 640,
                    height: 480,
                    interlace: Interlace::Half,
                },
            },
        }
    }
}

/// Per-axis multiplier from the logical 320x240 canvas to framebuffer
/// coordinates. Recomputed with every mode change, never in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenScale {
    pub x: f32,
    pub y: f32,
}

impl ScreenScale {
    pub const IDENTITY: Self = Self { x: 1.0, y: 1.0 };

    pub fn from_framebuffer(width: u32, height: u32) -> Self {
        Self {
            x: width as f32 / INTERNAL_WIDTH,
            y: height as f32 / INTERNAL_HEIGHT,
        }
    }

    pub fn map_x(&self, x: f32) -> f32 {
        x * self.x
    }

    pub fn map_y(&self, y: f32) -> f32 {
        y * self.y
    }
}

/// Bright/dark drawing pair, reselected on every mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bright: Color,
    pub dark: Color,
}

impl Palette {
    /// Green in interlaced mode, red otherwise.
    pub fn for_interlace(interlaced: bool) -> Self {
        if interlaced {
            Self {
                bright: Color::new(0, 255, 0, 255),
                dark: Color::new(0, 60, 0, 255),
            }
        } else {
            Self {
                bright: Color::new(255, 0, 0, 255),
                dark: Color::new(60, 0, 0, 255),
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("video output failed: {0}")]
    Backend(#[from] pixels::Error),
    #[error("display reopened while still active")]
    AlreadyOpen,
    #[error("display used before it was opened")]
    NotOpen,
}

/// Video output lifecycle. `close` drains outstanding rendering work
/// before releasing the output; `open` on an active display is an error,
/// the caller must close first.
pub trait DisplayService {
    fn open(&mut self, mode: Resolution) -> Result<(), DisplayError>;
    fn close(&mut self);
    fn is_open(&self) -> bool;
    /// Dimensions of the active mode's framebuffer, or `(0, 0)` while the
    /// display is closed.
    fn framebuffer_size(&self) -> (u32, u32);
}

/// Owns the mode table for the detected standard and drives a display
/// through mode changes.
#[derive(Debug, Clone)]
pub struct DisplayModeManager {
    modes: VideoModes,
}

impl DisplayModeManager {
    pub fn new(standard: TvStandard) -> Self {
        log::info!("TV standard is {standard:?}");
        Self {
            modes: VideoModes::for_standard(standard),
        }
    }

    pub fn mode_for(&self, interlaced: bool) -> Resolution {
        if interlaced {
            self.modes.hi_res
        } else {
            self.modes.lo_res
        }
    }

    /// Switch the display to the mode selected by `interlaced` and return
    /// the screen scale and palette that go with it.
    ///
    /// An already-open output is drained and closed before the new mode is
    /// opened; the two-step order is the one lifecycle rule in the system.
    pub fn apply<D: DisplayService>(
        &self,
        display: &mut D,
        interlaced: bool,
    ) -> Result<(ScreenScale, Palette), DisplayError> {
        if display.is_open() {
            display.close();
        }
        let mode = self.mode_for(interlaced);
        display.open(mode)?;

        let (width, height) = display.framebuffer_size();
        let scale = ScreenScale::from_framebuffer(width, height);
        let palette = Palette::for_interlace(interlaced);
        log::info!("resolution: {width}x{height} ({}:{})", scale.x, scale.y);
        Ok((scale, palette))
    }
}

/// Production display backed by a winit window and a `pixels` framebuffer.
///
/// Dropping the `Pixels` instance flushes outstanding GPU work and releases
/// the surface, which is the teardown `close` relies on.
pub struct PixelsDisplay {
    window: Arc<Window>,
    gpu: Option<Pixels<'static>>,
    mode: Option<Resolution>,
}

impl PixelsDisplay {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            gpu: None,
            mode: None,
        }
    }

    pub fn frame_mut(&mut self) -> Result<&mut [u8], DisplayError> {
        self.gpu
            .as_mut()
            .map(|gpu| gpu.frame_mut())
            .ok_or(DisplayError::NotOpen)
    }

    /// Present the current frame. Blocks until the surface accepts it.
    pub fn present(&mut self) -> Result<(), DisplayError> {
        let gpu = self.gpu.as_mut().ok_or(DisplayError::NotOpen)?;
        gpu.render()?;
        Ok(())
    }

    /// Track window-manager resizes of the backing surface. The framebuffer
    /// keeps the mode's dimensions; only the surface scales.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        if let Some(gpu) = self.gpu.as_mut() {
            let _ = gpu.resize_surface(width, height);
        }
    }
}

impl DisplayService for PixelsDisplay {
    fn open(&mut self, mode: Resolution) -> Result<(), DisplayError> {
        if self.gpu.is_some() {
            return Err(DisplayError::AlreadyOpen);
        }
        let _ = self
            .window
            .request_inner_size(LogicalSize::new(mode.width as f64, mode.height as f64));
        let surface = SurfaceTexture::new(mode.width, mode.height, self.window.clone());
        self.gpu = Some(Pixels::new(mode.width, mode.height, surface)?);
        self.mode = Some(mode);
        Ok(())
    }

    fn close(&mut self) {
        self.gpu = None;
        self.mode = None;
    }

    fn is_open(&self) -> bool {
        self.gpu.is_some()
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        match self.mode {
            Some(mode) => (mode.width, mode.height),
            None => (0, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum LifecycleEvent {
        Open,
        Close,
    }

    #[derive(Default)]
    struct FakeDisplay {
        mode: Option<Resolution>,
        events: Vec<LifecycleEvent>,
    }

    impl DisplayService for FakeDisplay {
        fn open(&mut self, mode: Resolution) -> Result<(), DisplayError> {
            if self.mode.is_some() {
                return Err(DisplayError::AlreadyOpen);
            }
            self.events.push(LifecycleEvent::Open);
            self.mode = Some(mode);
            Ok(())
        }

        fn close(&mut self) {
            self.events.push(LifecycleEvent::Close);
            self.mode = None;
        }

        fn is_open(&self) -> bool {
            self.mode.is_some()
        }

        fn framebuffer_size(&self) -> (u32, u32) {
            match self.mode {
                Some(mode) => (mode.width, mode.height),
                None => (0, 0),
            }
        }
    }

    #[test]
    fn mode_tables_are_deterministic() {
        assert_eq!(
            VideoModes::for_standard(TvStandard::Pal),
            VideoModes::for_standard(TvStandard::Pal)
        );
        assert_eq!(
            VideoModes::for_standard(TvStandard::Ntsc),
            VideoModes::for_standard(TvStandard::Ntsc)
        );
    }

    #[test]
    fn ntsc_low_res_is_the_logical_canvas() {
        let modes = VideoModes::for_standard(TvStandard::Ntsc);
        assert_eq!(modes.lo_res.width, 320);
        assert_eq!(modes.lo_res.height, 240);
        assert_eq!(modes.lo_res.interlace, Interlace::Off);

        let scale = ScreenScale::from_framebuffer(modes.lo_res.width, modes.lo_res.height);
        assert_eq!(scale, ScreenScale::IDENTITY);
    }

    #[test]
    fn pal_modes_match_the_standard() {
        let modes = VideoModes::for_standard(TvStandard::Pal);
        assert_eq!((modes.lo_res.width, modes.lo_res.height), (320, 288));
        assert_eq!(modes.lo_res.interlace, Interlace::Off);
        assert_eq!((modes.hi_res.width, modes.hi_res.height), (640, 576));
        assert_eq!(modes.hi_res.interlace, Interlace::Half);
    }

    #[test]
    fn apply_closes_before_reopening() {
        let manager = DisplayModeManager::new(TvStandard::Ntsc);
        let mut display = FakeDisplay::default();

        let (scale, palette) = manager.apply(&mut display, false).unwrap();
        assert_eq!(scale, ScreenScale::IDENTITY);
        assert_eq!(palette, Palette::for_interlace(false));
        assert_eq!(display.events, vec![LifecycleEvent::Open]);

        let (scale, palette) = manager.apply(&mut display, true).unwrap();
        assert_eq!(
            display.events,
            vec![
                LifecycleEvent::Open,
                LifecycleEvent::Close,
                LifecycleEvent::Open
            ]
        );
        assert_eq!(display.mode.unwrap().width, 640);
        assert_eq!(display.mode.unwrap().height, 480);
        assert_eq!(display.mode.unwrap().interlace, Interlace::Half);
        assert_eq!(scale.x, 2.0);
        assert_eq!(scale.y, 2.0);
        assert_eq!(palette.bright, Color::new(0, 255, 0, 255));
        assert_eq!(palette.dark, Color::new(0, 60, 0, 255));
    }

    #[test]
    fn closed_display_reports_zero_framebuffer() {
        let mut display = FakeDisplay::default();
        assert_eq!(display.framebuffer_size(), (0, 0));

        let mode = VideoModes::for_standard(TvStandard::Ntsc).lo_res;
        display.open(mode).unwrap();
        assert_eq!(display.framebuffer_size(), (320, 240));

        display.close();
        assert_eq!(display.framebuffer_size(), (0, 0));
    }

    #[test]
    fn opening_an_active_display_is_an_error() {
        let mut display = FakeDisplay::default();
        let mode = VideoModes::for_standard(TvStandard::Ntsc).lo_res;
        display.open(mode).unwrap();
        assert!(matches!(
            display.open(mode),
            Err(DisplayError::AlreadyOpen)
        ));
    }

    #[test]
    fn palette_pairs_follow_the_interlace_flag() {
        let progressive = Palette::for_interlace(false);
        assert_eq!(progressive.bright, Color::new(255, 0, 0, 255));
        assert_eq!(progressive.dark, Color::new(60, 0, 0, 255));

        let interlaced = Palette::for_interlace(true);
        assert_eq!(interlaced.bright, Color::new(0, 255, 0, 255));
        assert_eq!(interlaced.dark, Color::new(0, 60, 0, 255));
    }
}
