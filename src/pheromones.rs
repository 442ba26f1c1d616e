use rayon::prelude::*;

use crate::coordinate::{Coordinate, Direction};

/// Pheromone levels over the maze grid, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneField {
    pub width: usize,
    pub length: usize,
    levels: Vec<f64>,
}

impl PheromoneField {
    pub fn new(width: usize, length: usize) -> Self {
        Self {
            width,
            length,
            levels: vec![0.0; width * length],
        }
    }

    pub fn index(&self, position: Coordinate) -> Option<usize> {
        let (x, y) = (position.x, position.y);
        if x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.length {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// Level at `position`, 0 outside the grid.
    pub fn get(&self, position: Coordinate) -> f64 {
        self.index(position).map_or(0.0, |idx| self.levels[idx])
    }

    pub fn set(&mut self, position: Coordinate, level: f64) {
        if let Some(idx) = self.index(position) {
            self.levels[idx] = level;
        }
    }

    pub fn deposit(&mut self, position: Coordinate, amount: f64) {
        if let Some(idx) = self.index(position) {
            self.levels[idx] += amount;
        }
    }

    pub fn evaporate(&mut self, rho: f64) {
        self.levels.par_iter_mut().for_each(|level| *level *= rho);
    }

    pub fn max_level(&self) -> f64 {
        self.levels.iter().copied().fold(0.0, f64::max)
    }

    pub fn total(&self) -> f64 {
        self.levels.iter().sum()
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    pub fn surrounding(&self, position: Coordinate) -> SurroundingPheromone {
        SurroundingPheromone {
            north: self.get(position.step(Direction::North)),
            east: self.get(position.step(Direction::East)),
            south: self.get(position.step(Direction::South)),
            west: self.get(position.step(Direction::West)),
        }
    }
}

/// Snapshot of the four neighbour levels around one cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurroundingPheromone {
    pub north: f64,
    pub east: f64,
    pub south: f64,
    pub west: f64,
}

impl SurroundingPheromone {
    pub fn get(&self, direction: Direction) -> f64 {
        match direction {
            Direction::East => self.east,
            Direction::North => self.north,
            Direction::West => self.west,
            Direction::South => self.south,
        }
    }

    pub fn total(&self) -> f64 {
        self.north + self.east + self.south + self.west
    }

    /// Levels in canonical direction order.
    pub fn levels(&self) -> [f64; 4] {
        Direction::ALL.map(|direction| self.get(direction))
    }

    /// Levels divided by their sum. `None` when every neighbour is at zero.
    pub fn probabilities(&self) -> Option<[f64; 4]> {
        let total = self.total();
        if total > 0.0 {
            Some(self.levels().map(|level| level / total))
        } else {
            None
        }
    }
}
