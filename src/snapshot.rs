use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::info;
use png::ColorType;

use crate::colors::{Palette, Rgb};
use crate::coordinate::Coordinate;
use crate::error::ExportError;
use crate::maze::Maze;
use crate::route::Route;

/// Largest frame `render_frame` will allocate, in pixels.
pub const MAX_FRAME_PIXELS: usize = 1 << 26;

/// An RGBA image of the maze.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Frame {
    /// Sizes the frame for `maze`, refusing anything over `MAX_FRAME_PIXELS`.
    fn for_maze(maze: &Maze, cell_size: u32) -> Result<Self, ExportError> {
        let too_large = || ExportError::FrameTooLarge {
            width: maze.width(),
            length: maze.length(),
            cell_size,
        };
        let side = |cells: usize| {
            u32::try_from(cells)
                .ok()
                .and_then(|cells| cells.checked_mul(cell_size))
        };
        let width = side(maze.width()).ok_or_else(too_large)?;
        let height = side(maze.length()).ok_or_else(too_large)?;
        let pixels = (width as usize)
            .checked_mul(height as usize)
            .filter(|&pixels| pixels <= MAX_FRAME_PIXELS)
            .ok_or_else(too_large)?;

        Ok(Self {
            width,
            height,
            pixels: vec![0u8; pixels * 4],
        })
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.offset(x, y);
        self.pixels[idx..idx + 4].try_into().ok()
    }

    /// Fills the square of `size` pixels at cell `(cx, cy)`, inset by `margin`.
    fn fill_cell(&mut self, cx: u32, cy: u32, size: u32, margin: u32, (r, g, b): Rgb) {
        let inner = size.saturating_sub(2 * margin).max(1);
        for dy in 0..inner {
            for dx in 0..inner {
                let px = cx * size + margin + dx;
                let py = cy * size + margin + dy;
                if px < self.width && py < self.height {
                    let idx = self.offset(px, py);
                    self.pixels[idx..idx + 4].copy_from_slice(&[r, g, b, 255]);
                }
            }
        }
    }
}

/// Draws walls, pheromone intensity relative to the strongest cell, and the
/// route on top if one is given.
pub fn render_frame(
    maze: &Maze,
    route: Option<&Route>,
    palette: &Palette,
    cell_size: u32,
) -> Result<Frame, ExportError> {
    let cell_size = cell_size.max(1);
    let mut frame = Frame::for_maze(maze, cell_size)?;
    let max_level = maze.pheromones().max_level();

    for y in 0..maze.length() {
        for x in 0..maze.width() {
            let position = Coordinate::new(x as i32, y as i32);
            let color = if !maze.is_open(position) {
                palette.wall
            } else if max_level > 0.0 {
                palette.pheromone_rgb(maze.pheromone_at(position) / max_level)
            } else {
                palette.open
            };
            frame.fill_cell(x as u32, y as u32, cell_size, 0, color);
        }
    }

    if let Some(route) = route {
        let margin = cell_size / 4;
        for position in route.coordinates().filter(|&c| maze.in_bounds(c)) {
            frame.fill_cell(position.x as u32, position.y as u32, cell_size, margin, palette.route);
        }
        let start = route.start();
        let end = route.end();
        for (position, color) in [(start, palette.start), (end, palette.end)] {
            if maze.in_bounds(position) {
                frame.fill_cell(position.x as u32, position.y as u32, cell_size, margin, color);
            }
        }
    }

    Ok(frame)
}

pub fn save_png(path: impl AsRef<Path>, frame: &Frame) -> Result<(), ExportError> {
    let path = path.as_ref();
    let io_error = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let w = BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, frame.width, frame.height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&frame.pixels)?;
    info!("wrote {}x{} snapshot to {}", frame.width, frame.height, path.display());
    Ok(())
}

pub fn render_png(
    maze: &Maze,
    route: Option<&Route>,
    palette: &Palette,
    cell_size: u32,
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    save_png(path, &render_frame(maze, route, palette, cell_size)?)
}
