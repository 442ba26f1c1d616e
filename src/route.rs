use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coordinate::{Coordinate, Direction};
use crate::error::MazeError;

/// An ordered list of moves anchored at a start cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    start: Coordinate,
    directions: Vec<Direction>,
}

impl Route {
    pub fn new(start: Coordinate) -> Self {
        Self {
            start,
            directions: Vec::new(),
        }
    }

    pub fn start(&self) -> Coordinate {
        self.start
    }

    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Number of moves.
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    pub fn push(&mut self, direction: Direction) {
        self.directions.push(direction);
    }

    pub fn remove_last(&mut self) -> Option<Direction> {
        self.directions.pop()
    }

    pub fn last_direction(&self) -> Option<Direction> {
        self.directions.last().copied()
    }

    /// Drops moves from the end until at most `len` remain.
    pub fn truncate(&mut self, len: usize) {
        while self.directions.len() > len {
            self.remove_last();
        }
    }

    pub fn shorter_than(&self, other: &Route) -> bool {
        self.len() < other.len()
    }

    /// Every cell the route touches, start first, end last.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        let tail = self.directions.iter().scan(self.start, |position, &direction| {
            *position = position.step(direction);
            Some(*position)
        });
        std::iter::once(self.start).chain(tail)
    }

    pub fn end(&self) -> Coordinate {
        self.coordinates().last().unwrap_or(self.start)
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), MazeError> {
        let path = path.as_ref();
        fs::write(path, self.to_string()).map_err(|source| MazeError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{};", self.len())?;
        writeln!(f, "{};", self.start)?;
        for direction in &self.directions {
            writeln!(f, "{};", direction)?;
        }
        Ok(())
    }
}

impl FromStr for Route {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines().enumerate().filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines
            .next()
            .ok_or_else(|| MazeError::parse(1, "missing route length"))?;
        let expected: usize = strip_terminator(header)
            .parse()
            .map_err(|_| MazeError::parse(1, format!("bad route length {header:?}")))?;

        let (index, start_line) = lines
            .next()
            .ok_or_else(|| MazeError::parse(2, "missing start coordinate"))?;
        let mut route = Route::new(parse_coordinate(start_line, index + 1)?);

        for (index, line) in lines {
            let direction = strip_terminator(line)
                .parse::<usize>()
                .ok()
                .and_then(Direction::from_index)
                .ok_or_else(|| MazeError::parse(index + 1, format!("bad direction {line:?}")))?;
            route.push(direction);
        }

        if route.len() != expected {
            return Err(MazeError::parse(
                1,
                format!("header says {expected} moves, found {}", route.len()),
            ));
        }
        Ok(route)
    }
}

/// Start and end cell of one optimisation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSpecification {
    start: Coordinate,
    end: Coordinate,
}

impl PathSpecification {
    pub fn new(start: Coordinate, end: Coordinate) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> Coordinate {
        self.start
    }

    pub fn end(&self) -> Coordinate {
        self.end
    }

    /// Reads a coordinates file: `x, y;` for the start, then the end.
    pub fn read_coordinates(path: impl AsRef<Path>) -> Result<Self, MazeError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| MazeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        text.parse()
    }
}

impl FromStr for PathSpecification {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines().enumerate().filter(|(_, line)| !line.trim().is_empty());
        let (start_index, start) = lines
            .next()
            .ok_or_else(|| MazeError::parse(1, "missing start coordinate"))?;
        let (end_index, end) = lines
            .next()
            .ok_or_else(|| MazeError::parse(start_index + 2, "missing end coordinate"))?;
        Ok(Self::new(
            parse_coordinate(start, start_index + 1)?,
            parse_coordinate(end, end_index + 1)?,
        ))
    }
}

fn strip_terminator(line: &str) -> &str {
    let line = line.trim();
    line.strip_suffix(';').unwrap_or(line).trim()
}

fn parse_coordinate(line: &str, line_number: usize) -> Result<Coordinate, MazeError> {
    let bad = || MazeError::parse(line_number, format!("bad coordinate {line:?}"));
    let (x, y) = strip_terminator(line).split_once(',').ok_or_else(bad)?;
    let x = x.trim().parse().map_err(|_| bad())?;
    let y = y.trim().parse().map_err(|_| bad())?;
    Ok(Coordinate::new(x, y))
}
