//! Shortest-path search through grid mazes with an ant colony.
//!
//! Each generation a batch of ants walks the maze independently, biased by a
//! shared pheromone field. Once every ant is back, the field evaporates and
//! each successful route reinforces the cells it crossed.

pub mod ant;
pub mod colony;
pub mod colors;
pub mod config;
pub mod coordinate;
pub mod error;
pub mod maze;
pub mod pheromones;
pub mod report;
pub mod route;
pub mod snapshot;

pub use ant::{Ant, SearchFailure, SearchState, DEFAULT_MAX_STEPS};
pub use colony::{AntColonyOptimization, GenerationStats};
pub use config::{AppConfig, ColonyConfig, OutputConfig};
pub use coordinate::{Coordinate, Direction};
pub use error::{ConfigError, ExportError, MazeError};
pub use maze::Maze;
pub use pheromones::{PheromoneField, SurroundingPheromone};
pub use route::{PathSpecification, Route};
