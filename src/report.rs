use std::fs;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::colony::GenerationStats;
use crate::config::ColonyConfig;
use crate::error::ExportError;
use crate::route::{PathSpecification, Route};

/// Summary of one colony run, written as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub timestamp: String,
    pub maze_width: usize,
    pub maze_length: usize,
    pub spec: PathSpecification,
    pub config: ColonyConfig,
    pub best_length: Option<usize>,
    pub best_route: Option<Route>,
    pub generations: Vec<GenerationStats>,
}

impl RunReport {
    pub fn new(
        maze_size: (usize, usize),
        spec: PathSpecification,
        config: ColonyConfig,
        best: Option<&Route>,
        generations: &[GenerationStats],
    ) -> Self {
        Self {
            timestamp: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            maze_width: maze_size.0,
            maze_length: maze_size.1,
            spec,
            config,
            best_length: best.map(Route::len),
            best_route: best.cloned(),
            generations: generations.to_vec(),
        }
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("wrote run report to {}", path.display());
        Ok(())
    }
}
