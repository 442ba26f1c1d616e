use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::debug;

use crate::coordinate::Coordinate;
use crate::error::MazeError;
use crate::pheromones::{PheromoneField, SurroundingPheromone};
use crate::route::{PathSpecification, Route};

/// Fixed wall layout plus the pheromone field laid over it.
#[derive(Debug, Clone)]
pub struct Maze {
    width: usize,
    length: usize,
    open: Vec<bool>,
    pheromones: PheromoneField,
}

impl Maze {
    /// Builds a maze from a column-major grid where `walls[x][y]` is 1 for an
    /// open cell and 0 for a wall.
    pub fn new(walls: Vec<Vec<u8>>, width: usize, length: usize) -> Result<Self, MazeError> {
        let found_length = walls.iter().map(Vec::len).find(|&l| l != length).unwrap_or(length);
        if walls.len() != width || found_length != length {
            return Err(MazeError::Dimensions {
                width,
                length,
                found_width: walls.len(),
                found_length,
            });
        }

        let mut open = vec![false; width * length];
        for (x, column) in walls.iter().enumerate() {
            for (y, &cell) in column.iter().enumerate() {
                open[y * width + x] = cell != 0;
            }
        }

        let mut maze = Self {
            width,
            length,
            open,
            pheromones: PheromoneField::new(width, length),
        };
        maze.reset();
        Ok(maze)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MazeError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| MazeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let maze: Maze = text.parse()?;
        debug!("read {}x{} maze from {}", maze.width, maze.length, path.display());
        Ok(maze)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn in_bounds(&self, position: Coordinate) -> bool {
        self.pheromones.index(position).is_some()
    }

    pub fn is_open(&self, position: Coordinate) -> bool {
        self.pheromones.index(position).is_some_and(|idx| self.open[idx])
    }

    pub fn open_cells(&self) -> usize {
        self.open.iter().filter(|&&open| open).count()
    }

    pub fn pheromones(&self) -> &PheromoneField {
        &self.pheromones
    }

    /// Puts 1.0 on every open cell and 0.0 on every wall.
    pub fn reset(&mut self) {
        for y in 0..self.length {
            for x in 0..self.width {
                let position = Coordinate::new(x as i32, y as i32);
                let level = if self.open[y * self.width + x] { 1.0 } else { 0.0 };
                self.pheromones.set(position, level);
            }
        }
    }

    pub fn surrounding_pheromone(&self, position: Coordinate) -> SurroundingPheromone {
        self.pheromones.surrounding(position)
    }

    pub fn pheromone_at(&self, position: Coordinate) -> f64 {
        self.pheromones.get(position)
    }

    pub fn evaporate(&mut self, rho: f64) {
        self.pheromones.evaporate(rho);
    }

    /// Adds `q / route.len()` to every cell on the route, start and end included.
    pub fn deposit_route(&mut self, route: &Route, q: f64) -> Result<(), MazeError> {
        if route.is_empty() {
            return Err(MazeError::EmptyRoute);
        }
        let path: Vec<Coordinate> = route.coordinates().collect();
        for &position in &path {
            if !self.in_bounds(position) {
                return Err(MazeError::OutOfBounds(position));
            }
            if !self.is_open(position) {
                return Err(MazeError::Blocked(position));
            }
        }

        let delta = q / route.len() as f64;
        for position in path {
            self.pheromones.deposit(position, delta);
        }
        Ok(())
    }

    /// Deposits every route on its own. Returns the rejected routes by index;
    /// the valid ones are deposited regardless.
    #[must_use]
    pub fn deposit_routes(&mut self, routes: &[Route], q: f64) -> Vec<(usize, MazeError)> {
        routes
            .iter()
            .enumerate()
            .filter_map(|(idx, route)| self.deposit_route(route, q).err().map(|e| (idx, e)))
            .collect()
    }

    /// Checks that both ends of `spec` are open cells inside the maze.
    pub fn validate_spec(&self, spec: &PathSpecification) -> Result<(), MazeError> {
        for position in [spec.start(), spec.end()] {
            if !self.in_bounds(position) {
                return Err(MazeError::OutOfBounds(position));
            }
            if !self.is_open(position) {
                return Err(MazeError::Blocked(position));
            }
        }
        Ok(())
    }
}

impl FromStr for Maze {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines().enumerate().filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines
            .next()
            .ok_or_else(|| MazeError::parse(1, "missing dimensions"))?;
        let dimensions: Vec<usize> = header
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<_, _>>()
            .map_err(|_| MazeError::parse(1, format!("bad dimensions {header:?}")))?;
        let (width, length) = match dimensions.as_slice() {
            &[width, length] => (width, length),
            _ => return Err(MazeError::parse(1, format!("bad dimensions {header:?}"))),
        };

        if width == 0 || length == 0 {
            return Err(MazeError::parse(1, format!("empty maze {header:?}")));
        }

        // rows are read before anything is sized from the header
        let mut rows: Vec<Vec<u8>> = Vec::new();
        for y in 0..length {
            let (index, line) = lines
                .next()
                .ok_or_else(|| MazeError::parse(y + 2, format!("expected {length} rows")))?;
            let cells: Vec<&str> = line.split_whitespace().collect();
            if cells.len() < width {
                return Err(MazeError::parse(
                    index + 1,
                    format!("expected {width} cells, found {}", cells.len()),
                ));
            }
            let row = cells
                .iter()
                .take(width)
                .map(|cell| match *cell {
                    "0" => Ok(0),
                    "1" => Ok(1),
                    other => Err(MazeError::parse(index + 1, format!("bad cell {other:?}"))),
                })
                .collect::<Result<Vec<u8>, _>>()?;
            rows.push(row);
        }

        let walls = (0..width)
            .map(|x| rows.iter().map(|row| row[x]).collect())
            .collect();
        Maze::new(walls, width, length)
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {} ", self.width, self.length)?;
        for y in 0..self.length {
            for x in 0..self.width {
                write!(f, "{} ", u8::from(self.open[y * self.width + x]))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
