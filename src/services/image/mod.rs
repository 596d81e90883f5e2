//! Raster export of the laid-out grid.
//!
//! Draws the geometry and projected events into an RGBA buffer and encodes
//! it as a PNG at an integer pixel-density multiplier. Purely a rendering
//! concern: the data model never touches this, and text stays in the
//! interactive shell.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::event::Event;
use crate::services::layout::GridGeometry;

// Palette, matching the interactive shell's dark theme.
const BACKGROUND: [u8; 4] = [15, 18, 32, 255];
const HEADER_BAND: [u8; 4] = [24, 28, 46, 255];
const GRID_LINE: [u8; 4] = [38, 43, 66, 255];
const MAJOR_LINE: [u8; 4] = [64, 71, 104, 255];
/// #4f46e5, used when an event's color token fails to parse.
const FALLBACK_EVENT_COLOR: [u8; 4] = [79, 70, 229, 255];

/// RGBA8 pixel buffer, row-major.
#[derive(Debug, Clone)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Raster {
    fn new(width: u32, height: u32, fill: [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            pixels.extend_from_slice(&fill);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Fill a rectangle, clipped to the buffer.
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [u8; 4]) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let x0 = x.max(0.0) as u32;
        let y0 = y.max(0.0) as u32;
        let x1 = ((x + w).max(0.0) as u32).min(self.width);
        let y1 = ((y + h).max(0.0) as u32).min(self.height);

        for py in y0..y1 {
            for px in x0..x1 {
                let at = ((py * self.width + px) * 4) as usize;
                self.pixels[at..at + 4].copy_from_slice(&color);
            }
        }
    }
}

/// Render the grid and its events into an RGBA buffer at `scale`x density.
pub fn render_grid(geometry: &GridGeometry, events: &[Event], scale: u32) -> Raster {
    let scale = scale.max(1);
    let s = scale as f32;
    let (grid_w, grid_h) = geometry.size();
    let width = (grid_w.ceil() as u32) * scale;
    let height = (grid_h.ceil() as u32) * scale;

    let mut raster = Raster::new(width, height, BACKGROUND);
    let line = s;

    // Header band.
    raster.fill_rect(0.0, 0.0, grid_w * s, geometry.metrics.header_height * s, HEADER_BAND);

    // Horizontal gridlines, one per row start, major rows emphasized.
    for (i, row) in geometry.rows.iter().enumerate() {
        let y = (geometry.metrics.header_height + i as f32 * geometry.metrics.row_height) * s;
        let color = if row.major { MAJOR_LINE } else { GRID_LINE };
        raster.fill_rect(0.0, y, grid_w * s, line, color);
    }

    // Vertical separators between the time gutter and each day column.
    for column in &geometry.columns {
        raster.fill_rect(column.x * s, 0.0, line, grid_h * s, GRID_LINE);
    }

    // Event blocks, in their own colors.
    for event in events {
        if let Some(rect) = geometry.project(event) {
            let color = parse_hex_color(&event.color).unwrap_or(FALLBACK_EVENT_COLOR);
            raster.fill_rect(rect.x * s, rect.y * s, rect.width * s, rect.height * s, color);
        }
    }

    raster
}

/// Rasterize the grid and write it as a PNG file.
pub fn export_png(
    path: &Path,
    geometry: &GridGeometry,
    events: &[Event],
    scale: u32,
) -> Result<()> {
    let raster = render_grid(geometry, events, scale);

    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, raster.width, raster.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut png_writer = encoder.write_header().context("failed to write PNG header")?;
    png_writer
        .write_image_data(&raster.pixels)
        .context("failed to write PNG data")?;

    log::info!(
        "exported {}x{} PNG ({}x scale) to {}",
        raster.width,
        raster.height,
        scale.max(1),
        path.display()
    );
    Ok(())
}

/// Parse a `#RRGGBB` or `#RGB` color token.
fn parse_hex_color(text: &str) -> Option<[u8; 4]> {
    let hex = text.strip_prefix('#')?;
    match hex.len() {
        6 => {
            let n = u32::from_str_radix(hex, 16).ok()?;
            Some([(n >> 16) as u8, (n >> 8) as u8, n as u8, 255])
        }
        3 => {
            let n = u32::from_str_radix(hex, 16).ok()?;
            let r = ((n >> 8) & 0xf) as u8;
            let g = ((n >> 4) & 0xf) as u8;
            let b = (n & 0xf) as u8;
            Some([r * 17, g * 17, b * 17, 255])
        }
        _ => None,
    }
}
