use std::f32::consts::TAU;

use crate::app::AppState;
use crate::config::{
    Color, BACKGROUND, CIRCLE_RADIUS, INTERNAL_HEIGHT, INTERNAL_WIDTH, TRACE_POS_X, TRACE_POS_Y,
};
use crate::display::{Palette, ScreenScale};
use crate::geometry::RotatingPoint;

/// A framebuffer-space vertex with its own color, for shaded triangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub color: Color,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Color) -> Self {
        Self { x, y, color }
    }
}

/// Rasterization capability the renderer draws through. All coordinates
/// are in framebuffer space; callers apply `ScreenScale` before submitting.
pub trait RasterService {
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Color);
    /// Flat-filled triangle.
    fn triangle(&mut self, a: (f32, f32), b: (f32, f32), c: (f32, f32), color: Color);
    /// Triangle with per-vertex colors interpolated across the face.
    fn triangle_shaded(&mut self, a: Vertex, b: Vertex, c: Vertex);
}

/// Render one frame: clear, then exactly one of the two draw modes.
pub fn render_frame<R: RasterService>(raster: &mut R, state: &AppState, circle_segments: usize) {
    raster.clear(BACKGROUND);
    if state.radar_mode {
        render_radar(
            raster,
            state.scale,
            state.palette,
            &state.circle_pos,
            &state.radar_pos,
        );
    } else {
        render_circle(
            raster,
            state.scale,
            state.palette,
            &state.circle_pos,
            circle_segments,
        );
    }
}

/// Radar sweep: one shaded triangle, dark at the trace center, bright at
/// the two tracked points.
pub fn render_radar<R: RasterService>(
    raster: &mut R,
    scale: ScreenScale,
    palette: Palette,
    circle_pos: &RotatingPoint,
    radar_pos: &RotatingPoint,
) {
    let center = Vertex::new(
        scale.map_x(TRACE_POS_X),
        scale.map_y(TRACE_POS_Y),
        palette.dark,
    );
    let sweep_a = Vertex::new(
        scale.map_x(circle_pos.x),
        scale.map_y(circle_pos.y),
        palette.bright,
    );
    let sweep_b = Vertex::new(
        scale.map_x(radar_pos.x),
        scale.map_y(radar_pos.y),
        palette.bright,
    );
    raster.triangle_shaded(center, sweep_a, sweep_b);
}

/// Filled pseudo-circle around the tracked point, plus the fixed visual
/// markers: a 2x2 anchor dot at the trace center and two 20px reference
/// bars at the top-left and bottom-right of the canvas.
pub fn render_circle<R: RasterService>(
    raster: &mut R,
    scale: ScreenScale,
    palette: Palette,
    circle_pos: &RotatingPoint,
    segments: usize,
) {
    raster.fill_rect(
        scale.map_x(TRACE_POS_X - 1.0),
        scale.map_y(TRACE_POS_Y - 1.0),
        scale.map_x(TRACE_POS_X + 1.0),
        scale.map_y(TRACE_POS_Y + 1.0),
        palette.bright,
    );
    raster.fill_rect(
        scale.map_x(0.0),
        scale.map_y(0.0),
        scale.map_x(INTERNAL_WIDTH / 2.0),
        scale.map_y(20.0),
        palette.bright,
    );
    raster.fill_rect(
        scale.map_x(INTERNAL_WIDTH / 2.0),
        scale.map_y(INTERNAL_HEIGHT - 20.0),
        scale.map_x(INTERNAL_WIDTH),
        scale.map_y(INTERNAL_HEIGHT),
        palette.bright,
    );

    let center = (scale.map_x(circle_pos.x), scale.map_y(circle_pos.y));
    let angle_step = TAU / segments as f32;
    let rim: Vec<(f32, f32)> = (0..segments)
        .map(|i| {
            let angle = angle_step * i as f32;
            (
                scale.map_x(circle_pos.x + CIRCLE_RADIUS * angle.cos()),
                scale.map_y(circle_pos.y + CIRCLE_RADIUS * angle.sin()),
            )
        })
        .collect();

    // Fan the center against consecutive rim vertex pairs.
    for i in 0..segments {
        let next = (i + 1) % segments;
        raster.triangle(center, rim[i], rim[next], palette.bright);
    }
}

/// Software rasterizer writing RGBA bytes straight into a frame in the
/// `pixels` layout: row-major, four bytes per pixel.
pub struct SoftwareRaster<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> SoftwareRaster<'a> {
    pub fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        debug_assert_eq!(frame.len(), (width * height * 4) as usize);
        Self {
            frame,
            width,
            height,
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.frame[idx..idx + 4].copy_from_slice(&color.as_array());
    }
}

/// Signed parallelogram area of (a, b, p); sign tells which side of the
/// edge a-b the point p lies on.
fn edge(ax: f32, ay: f32, bx: f32, by: f32, px: f32, py: f32) -> f32 {
    (bx - ax) * (py - ay) - (by - ay) * (px - ax)
}

impl RasterService for SoftwareRaster<'_> {
    fn clear(&mut self, color: Color) {
        for pixel in self.frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color.as_array());
        }
    }

    fn fill_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Color) {
        let x0 = (x0.round().max(0.0) as i32).min(self.width as i32);
        let y0 = (y0.round().max(0.0) as i32).min(self.height as i32);
        let x1 = (x1.round().max(0.0) as i32).min(self.width as i32);
        let y1 = (y1.round().max(0.0) as i32).min(self.height as i32);
        for y in y0..y1 {
            for x in x0..x1 {
                self.set_pixel(x, y, color);
            }
        }
    }

    fn triangle(&mut self, a: (f32, f32), b: (f32, f32), c: (f32, f32), color: Color) {
        self.triangle_shaded(
            Vertex::new(a.0, a.1, color),
            Vertex::new(b.0, b.1, color),
            Vertex::new(c.0, c.1, color),
        );
    }

    fn triangle_shaded(&mut self, a: Vertex, mut b: Vertex, mut c: Vertex) {
        // Wind consistently so all three edge functions share a sign.
        let mut area = edge(a.x, a.y, b.x, b.y, c.x, c.y);
        if area == 0.0 {
            return;
        }
        if area < 0.0 {
            std::mem::swap(&mut b, &mut c);
            area = -area;
        }

        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as i32;
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as i32;
        let max_x = a.x.max(b.x).max(c.x).ceil().min(self.width as f32) as i32;
        let max_y = a.y.max(b.y).max(c.y).ceil().min(self.height as f32) as i32;

        for y in min_y..max_y {
            for x in min_x..max_x {
                // Sample at the pixel center.
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;
                let w0 = edge(b.x, b.y, c.x, c.y, px, py);
                let w1 = edge(c.x, c.y, a.x, a.y, px, py);
                let w2 = edge(a.x, a.y, b.x, b.y, px, py);
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }
                let (l0, l1, l2) = (w0 / area, w1 / area, w2 / area);
                let color = Color::new(
                    (l0 * a.color.r as f32 + l1 * b.color.r as f32 + l2 * c.color.r as f32).round()
                        as u8,
                    (l0 * a.color.g as f32 + l1 * b.color.g as f32 + l2 * c.color.g as f32).round()
                        as u8,
                    (l0 * a.color.b as f32 + l1 * b.color.b as f32 + l2 * c.color.b as f32).round()
                        as u8,
                    (l0 * a.color.a as f32 + l1 * b.color.a as f32 + l2 * c.color.a as f32).round()
                        as u8,
                );
                self.set_pixel(x, y, color);
            }
        }
    }
}
