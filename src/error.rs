use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::coordinate::Coordinate;

/// Errors raised while building a maze, reading its text formats or
/// writing pheromone into it.
#[derive(Debug, Error)]
pub enum MazeError {
    #[error("wall grid is {found_width}x{found_length}, expected {width}x{length}")]
    Dimensions {
        width: usize,
        length: usize,
        found_width: usize,
        found_length: usize,
    },
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("cannot deposit pheromone for an empty route")]
    EmptyRoute,
    #[error("coordinate {0} lies outside the maze")]
    OutOfBounds(Coordinate),
    #[error("coordinate {0} lies on a wall")]
    Blocked(Coordinate),
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MazeError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        MazeError::Parse {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config")]
    Toml(#[from] toml::de::Error),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors from writing snapshots and run reports.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{width}x{length} maze at {cell_size}px per cell is too large to render")]
    FrameTooLarge {
        width: usize,
        length: usize,
        cell_size: u32,
    },
    #[error("png encoding failed")]
    Png(#[from] png::EncodingError),
    #[error("json encoding failed")]
    Json(#[from] serde_json::Error),
}
