use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ant::Ant;
use crate::config::ColonyConfig;
use crate::maze::Maze;
use crate::route::{PathSpecification, Route};

/// Summary of the successful ants in one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub routes_found: usize,
    pub min_length: usize,
    pub mean_length: f64,
}

impl GenerationStats {
    /// `None` when no ant of the generation found a route.
    pub fn from_routes(generation: usize, routes: &[Route]) -> Option<Self> {
        let min_length = routes.iter().map(Route::len).min()?;
        let total: usize = routes.iter().map(Route::len).sum();
        Some(Self {
            generation,
            routes_found: routes.len(),
            min_length,
            mean_length: total as f64 / routes.len() as f64,
        })
    }
}

/// Runs generations of ants over one maze and keeps the shortest route seen.
pub struct AntColonyOptimization {
    maze: Maze,
    config: ColonyConfig,
    stats: Vec<GenerationStats>,
}

impl AntColonyOptimization {
    pub fn new(maze: Maze, config: ColonyConfig) -> Self {
        Self {
            maze,
            config,
            stats: Vec::new(),
        }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn into_maze(self) -> Maze {
        self.maze
    }

    pub fn config(&self) -> &ColonyConfig {
        &self.config
    }

    /// Statistics of the last run, one entry per generation with at least
    /// one successful ant.
    pub fn generation_stats(&self) -> &[GenerationStats] {
        &self.stats
    }

    pub fn find_shortest_route(&mut self, spec: &PathSpecification) -> Option<Route> {
        self.maze.reset();
        self.stats.clear();
        let mut seeds = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut best: Option<Route> = None;
        for generation in 1..=self.config.generations {
            let routes = self.run_generation(generation, spec, &mut seeds);

            for route in &routes {
                if best.as_ref().map_or(true, |b| route.shorter_than(b)) {
                    best = Some(route.clone());
                }
            }

            self.maze.evaporate(self.config.evaporation);
            for (ant, e) in self.maze.deposit_routes(&routes, self.config.q) {
                error!("generation {}: route {} not deposited: {}", generation, ant, e);
            }

            match GenerationStats::from_routes(generation, &routes) {
                Some(stats) => {
                    info!(
                        "generation {}: minimum distance {}, {} of {} ants found a route",
                        generation, stats.min_length, stats.routes_found, self.config.ants_per_generation
                    );
                    self.stats.push(stats);
                }
                None => warn!("generation {}: no ant found a route", generation),
            }
        }
        best
    }

    /// Runs every ant of one generation against the current field. Ants only
    /// read the maze here; it is written after all of them have returned.
    fn run_generation(
        &self,
        generation: usize,
        spec: &PathSpecification,
        seeds: &mut StdRng,
    ) -> Vec<Route> {
        let ant_seeds: Vec<u64> = (0..self.config.ants_per_generation)
            .map(|_| seeds.gen())
            .collect();
        let maze = &self.maze;
        let max_steps = self.config.max_steps;

        let results: Vec<_> = ant_seeds
            .into_par_iter()
            .map(|seed| {
                Ant::with_seed(maze, spec, seed)
                    .with_max_steps(max_steps)
                    .search()
            })
            .collect();

        results
            .into_iter()
            .enumerate()
            .filter_map(|(ant, result)| match result {
                Ok(route) if !route.is_empty() => {
                    debug!("generation {} ant {}: route of {} moves", generation, ant + 1, route.len());
                    Some(route)
                }
                Ok(_) => {
                    debug!("generation {} ant {}: empty route", generation, ant + 1);
                    None
                }
                Err(failure) => {
                    debug!("generation {} ant {}: {}", generation, ant + 1, failure);
                    None
                }
            })
            .collect()
    }
}
