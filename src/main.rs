use std::env;
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use orbitscope::config::DemoConfig;
use orbitscope::display::{DisplayModeManager, DisplayService, PixelsDisplay, TvStandard};
use orbitscope::input::InputCollector;
use orbitscope::render::{render_frame, SoftwareRaster};
use orbitscope::AppState;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Parse --title and an optional region override from the command line
    let mut title: Option<String> = None;
    let mut standard: Option<TvStandard> = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--title" => {
                if let Some(value) = args.next() {
                    title = Some(value);
                }
            }
            "--pal" => standard = Some(TvStandard::Pal),
            "--ntsc" => standard = Some(TvStandard::Ntsc),
            _ => {}
        }
    }

    let config = DemoConfig::builder()
        .maybe_title(title)
        .maybe_tv_standard(standard)
        .build();

    let standard = config.tv_standard.unwrap_or_else(TvStandard::detect);
    let manager = DisplayModeManager::new(standard);
    let mut state = AppState::new();

    let initial_mode = manager.mode_for(state.interlace_mode);
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(&config.title)
        .with_inner_size(LogicalSize::new(
            initial_mode.width as f64,
            initial_mode.height as f64,
        ))
        .with_resizable(false)
        .build(&event_loop)?;
    let window = Arc::new(window);

    let mut display = PixelsDisplay::new(window.clone());
    let (scale, palette) = manager.apply(&mut display, state.interlace_mode)?;
    state.scale = scale;
    state.palette = palette;

    let mut input = InputCollector::new();
    let frame_duration = Duration::from_secs_f64(1.0 / config.max_framerate);
    let mut last_frame = Instant::now();

    event_loop.run(move |event, target| {
        target.set_control_flow(ControlFlow::Poll);
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    process::exit(0);
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input.record_key(&event);
                }
                WindowEvent::Resized(size) => {
                    display.resize_surface(size.width, size.height);
                }
                WindowEvent::RedrawRequested => {
                    for button in input.drain() {
                        if state.handle_button(button) {
                            // A flipped the interlace flag: close the drained
                            // display and reopen at the other resolution.
                            let (scale, palette) = manager
                                .apply(&mut display, state.interlace_mode)
                                .unwrap_or_else(|err| fatal(err));
                            state.scale = scale;
                            state.palette = palette;
                        }
                    }

                    state.step();

                    let (width, height) = display.framebuffer_size();
                    let frame = display.frame_mut().unwrap_or_else(|err| fatal(err));
                    let mut raster = SoftwareRaster::new(frame, width, height);
                    render_frame(&mut raster, &state, config.circle_segments);

                    display.present().unwrap_or_else(|err| fatal(err));
                }
                _ => {}
            },
            Event::AboutToWait => {
                // Pace redraws to the target frame rate
                let now = Instant::now();
                let elapsed = now.duration_since(last_frame);
                if elapsed < frame_duration {
                    std::thread::sleep(frame_duration - elapsed);
                }
                last_frame = Instant::now();
                window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}

/// Video backend failures have no recovery path; log and halt.
fn fatal(err: orbitscope::DisplayError) -> ! {
    log::error!("display failure: {err}");
    process::exit(1);
}
